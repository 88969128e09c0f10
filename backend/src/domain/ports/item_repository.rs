//! Driven port for item persistence.

use async_trait::async_trait;

use crate::domain::{CategoryId, Item, ItemDraft, ItemId, NewItem};

use super::define_port_error;

define_port_error! {
    /// Errors raised by item repository adapters.
    pub enum ItemRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "item repository connection failed: {message}",
        /// Query failed during execution or row conversion.
        Query { message: String } =>
            "item repository query failed: {message}",
        /// The referenced category does not exist.
        UnknownCategory { category_id: i32 } =>
            "category {category_id} does not exist",
    }
}

/// Port for item CRUD and filtered reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// Insert a new item.
    async fn insert(&self, item: &NewItem) -> Result<Item, ItemRepositoryError>;

    /// Fetch an item by identifier.
    async fn find_by_id(&self, id: ItemId) -> Result<Option<Item>, ItemRepositoryError>;

    /// All items ordered by identifier.
    async fn list_all(&self) -> Result<Vec<Item>, ItemRepositoryError>;

    /// Items belonging to `category_id`, ordered by identifier.
    async fn list_by_category(
        &self,
        category_id: CategoryId,
    ) -> Result<Vec<Item>, ItemRepositoryError>;

    /// Items whose name equals `name` exactly.
    async fn list_by_name(&self, name: &str) -> Result<Vec<Item>, ItemRepositoryError>;

    /// The `limit` most recently created items, newest first.
    async fn latest(&self, limit: usize) -> Result<Vec<Item>, ItemRepositoryError>;

    /// Replace the editable fields of an item in place.
    ///
    /// Returns `None` when no item has the given identifier.
    async fn update(
        &self,
        id: ItemId,
        draft: &ItemDraft,
    ) -> Result<Option<Item>, ItemRepositoryError>;

    /// Delete an item; returns whether a record was removed.
    async fn delete(&self, id: ItemId) -> Result<bool, ItemRepositoryError>;
}
