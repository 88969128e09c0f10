//! Catalog use cases shared by the HTML pages and the JSON read API.
//!
//! The service enforces referential checks the handlers rely on: items may
//! only point at existing categories, and every mutation is attributed to a
//! user record resolved from the session identity.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::json;
use tracing::{debug, info};

use crate::domain::ports::{
    CategoryRepository, CategoryRepositoryError, ItemRepository, ItemRepositoryError,
    UserPersistenceError, UserRepository,
};
use crate::domain::{
    Category, CategoryId, CategoryName, Error, Item, ItemDraft, ItemId, NewCategory, NewItem,
    NewUser, SessionIdentity, User,
};

/// Number of items shown on the catalog root page.
pub const LATEST_ITEMS_LIMIT: usize = 10;

/// Item paired with the name of its category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemWithCategory {
    /// The item.
    pub item: Item,
    /// Name of [`Item::category_id`].
    pub category_name: String,
}

/// Data behind the catalog root page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogOverview {
    /// All categories ordered by name.
    pub categories: Vec<Category>,
    /// Most recent items, newest first.
    pub latest: Vec<ItemWithCategory>,
}

/// Data behind a category page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryListing {
    /// The selected category.
    pub category: Category,
    /// All categories ordered by name.
    pub categories: Vec<Category>,
    /// Items of the selected category.
    pub items: Vec<Item>,
}

/// Item joined with its category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemDetail {
    /// The item.
    pub item: Item,
    /// Its category.
    pub category: Category,
}

/// Catalog service over the persistence ports.
#[derive(Clone)]
pub struct CatalogService {
    users: Arc<dyn UserRepository>,
    categories: Arc<dyn CategoryRepository>,
    items: Arc<dyn ItemRepository>,
}

impl CatalogService {
    /// Create a service over the given repositories.
    pub fn new(
        users: Arc<dyn UserRepository>,
        categories: Arc<dyn CategoryRepository>,
        items: Arc<dyn ItemRepository>,
    ) -> Self {
        Self {
            users,
            categories,
            items,
        }
    }

    fn map_user_error(error: UserPersistenceError) -> Error {
        match error {
            UserPersistenceError::Connection { message } => {
                Error::service_unavailable(format!("user repository unavailable: {message}"))
            }
            UserPersistenceError::Query { message } => {
                Error::internal(format!("user repository error: {message}"))
            }
        }
    }

    fn map_category_error(error: CategoryRepositoryError) -> Error {
        match error {
            CategoryRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("category repository unavailable: {message}"))
            }
            CategoryRepositoryError::Query { message } => {
                Error::internal(format!("category repository error: {message}"))
            }
        }
    }

    fn map_item_error(error: ItemRepositoryError) -> Error {
        match error {
            ItemRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("item repository unavailable: {message}"))
            }
            ItemRepositoryError::Query { message } => {
                Error::internal(format!("item repository error: {message}"))
            }
            ItemRepositoryError::UnknownCategory { category_id } => {
                Self::unknown_category(CategoryId::new(category_id))
            }
        }
    }

    fn unknown_category(id: CategoryId) -> Error {
        Error::invalid_request(format!("category {id} does not exist")).with_details(json!({
            "field": "category",
            "code": "unknown_category",
        }))
    }

    /// Resolve the stored user for a session identity, recording it if the
    /// store has never seen it.
    pub async fn resolve_user(&self, identity: &SessionIdentity) -> Result<User, Error> {
        self.users
            .insert_or_get_existing(&NewUser {
                email: identity.email.clone(),
                name: identity.name.clone(),
            })
            .await
            .map_err(Self::map_user_error)
    }

    /// All categories ordered by name.
    pub async fn categories(&self) -> Result<Vec<Category>, Error> {
        self.categories
            .list_all()
            .await
            .map_err(Self::map_category_error)
    }

    /// Categories plus the most recent items with their category names.
    pub async fn overview(&self) -> Result<CatalogOverview, Error> {
        let categories = self.categories().await?;
        let latest = self
            .items
            .latest(LATEST_ITEMS_LIMIT)
            .await
            .map_err(Self::map_item_error)?;
        let names: HashMap<CategoryId, &str> = categories
            .iter()
            .map(|category| (category.id, category.name.as_ref()))
            .collect();
        let latest = latest
            .into_iter()
            .map(|item| ItemWithCategory {
                category_name: names
                    .get(&item.category_id)
                    .map(|name| (*name).to_owned())
                    .unwrap_or_default(),
                item,
            })
            .collect();
        Ok(CatalogOverview { categories, latest })
    }

    /// The category page for `id`.
    ///
    /// # Errors
    /// `not_found` when no category has the identifier.
    pub async fn category_listing(&self, id: CategoryId) -> Result<CategoryListing, Error> {
        let category = self.category(id).await?;
        let categories = self.categories().await?;
        let items = self
            .items
            .list_by_category(id)
            .await
            .map_err(Self::map_item_error)?;
        Ok(CategoryListing {
            category,
            categories,
            items,
        })
    }

    async fn category(&self, id: CategoryId) -> Result<Category, Error> {
        self.categories
            .find_by_id(id)
            .await
            .map_err(Self::map_category_error)?
            .ok_or_else(|| Error::not_found(format!("category {id} not found")))
    }

    /// Category looked up by exact name.
    ///
    /// # Errors
    /// `not_found` when no category has the name.
    pub async fn category_named(&self, name: &str) -> Result<Category, Error> {
        self.categories
            .find_by_name(name)
            .await
            .map_err(Self::map_category_error)?
            .ok_or_else(|| Error::not_found(format!("category {name} not found")))
    }

    /// Insert a category, or return the stored one when the name is taken.
    ///
    /// # Errors
    /// `invalid_request` for blank or overlong names.
    pub async fn create_category(&self, name: &str, creator: &User) -> Result<Category, Error> {
        let name = CategoryName::new(name).map_err(|err| {
            Error::invalid_request(err.to_string()).with_details(json!({
                "field": "name",
                "code": "invalid_category_name",
            }))
        })?;
        let category = self
            .categories
            .insert_or_get_existing(&NewCategory {
                name,
                creator_id: creator.id(),
            })
            .await
            .map_err(Self::map_category_error)?;
        info!(category_id = %category.id, user_id = %creator.id(), "category stored");
        Ok(category)
    }

    /// Item joined with its category.
    ///
    /// # Errors
    /// `not_found` when no item has the identifier.
    pub async fn item_detail(&self, id: ItemId) -> Result<ItemDetail, Error> {
        let item = self.item(id).await?;
        let category = self.category(item.category_id).await?;
        Ok(ItemDetail { item, category })
    }

    async fn item(&self, id: ItemId) -> Result<Item, Error> {
        self.items
            .find_by_id(id)
            .await
            .map_err(Self::map_item_error)?
            .ok_or_else(|| Error::not_found(format!("item {id} not found")))
    }

    async fn ensure_category(&self, id: CategoryId) -> Result<(), Error> {
        let exists = self
            .categories
            .find_by_id(id)
            .await
            .map_err(Self::map_category_error)?
            .is_some();
        if exists {
            Ok(())
        } else {
            debug!(category_id = %id, "rejecting item for unknown category");
            Err(Self::unknown_category(id))
        }
    }

    /// Insert an item into an existing category.
    ///
    /// # Errors
    /// `invalid_request` with `unknown_category` details when the category
    /// does not exist.
    pub async fn create_item(&self, draft: ItemDraft, creator: &User) -> Result<Item, Error> {
        self.ensure_category(draft.category_id).await?;
        let item = self
            .items
            .insert(&NewItem {
                draft,
                creator_id: creator.id(),
            })
            .await
            .map_err(Self::map_item_error)?;
        info!(item_id = %item.id, user_id = %creator.id(), "item created");
        Ok(item)
    }

    /// Replace the editable fields of an item.
    ///
    /// # Errors
    /// `not_found` when the item is absent; `invalid_request` when the new
    /// category does not exist.
    pub async fn update_item(&self, id: ItemId, draft: ItemDraft) -> Result<Item, Error> {
        self.item(id).await?;
        self.ensure_category(draft.category_id).await?;
        let item = self
            .items
            .update(id, &draft)
            .await
            .map_err(Self::map_item_error)?
            .ok_or_else(|| Error::not_found(format!("item {id} not found")))?;
        info!(item_id = %id, "item updated");
        Ok(item)
    }

    /// Delete an item.
    ///
    /// # Errors
    /// `not_found` when no item has the identifier.
    pub async fn delete_item(&self, id: ItemId) -> Result<(), Error> {
        let removed = self
            .items
            .delete(id)
            .await
            .map_err(Self::map_item_error)?;
        if !removed {
            return Err(Error::not_found(format!("item {id} not found")));
        }
        info!(item_id = %id, "item deleted");
        Ok(())
    }

    /// Items in the named category.
    ///
    /// # Errors
    /// `not_found` when no category has the name.
    pub async fn items_in_category_named(
        &self,
        name: &str,
    ) -> Result<(Category, Vec<Item>), Error> {
        let category = self.category_named(name).await?;
        let items = self
            .items
            .list_by_category(category.id)
            .await
            .map_err(Self::map_item_error)?;
        Ok((category, items))
    }

    /// Items whose name equals `name`.
    pub async fn items_named(&self, name: &str) -> Result<Vec<Item>, Error> {
        self.items
            .list_by_name(name)
            .await
            .map_err(Self::map_item_error)
    }

    /// Every item ordered by identifier.
    pub async fn all_items(&self) -> Result<Vec<Item>, Error> {
        self.items.list_all().await.map_err(Self::map_item_error)
    }
}
