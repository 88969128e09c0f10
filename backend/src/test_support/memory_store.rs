//! In-memory implementation of the persistence ports.
//!
//! Mirrors the PostgreSQL adapters: unique emails and category names resolve
//! to the existing row, items reject unknown categories, and listings use the
//! same orderings.

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::ports::{
    CategoryRepository, CategoryRepositoryError, ItemRepository, ItemRepositoryError,
    UserPersistenceError, UserRepository,
};
use crate::domain::{
    Category, CategoryId, Item, ItemDraft, ItemId, NewCategory, NewItem, NewUser, User,
    UserId,
};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    categories: Vec<Category>,
    items: Vec<Item>,
    next_id: i32,
}

impl Tables {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }

    fn has_category(&self, id: CategoryId) -> bool {
        self.categories.iter().any(|category| category.id == id)
    }
}

/// Shared store implementing every persistence port.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of recorded users.
    pub fn user_count(&self) -> usize {
        self.tables().users.len()
    }

    /// Number of stored categories.
    pub fn category_count(&self) -> usize {
        self.tables().categories.len()
    }

    /// Snapshot of every stored item.
    pub fn items(&self) -> Vec<Item> {
        self.tables().items.clone()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn insert_or_get_existing(&self, user: &NewUser) -> Result<User, UserPersistenceError> {
        let mut tables = self.tables();
        if let Some(existing) = tables.users.iter().find(|u| u.email() == &user.email) {
            return Ok(existing.clone());
        }
        let id = UserId::new(tables.next_id());
        let stored = User::new(id, user.email.clone(), user.name.clone());
        tables.users.push(stored.clone());
        Ok(stored)
    }
}

#[async_trait]
impl CategoryRepository for MemoryStore {
    async fn insert_or_get_existing(
        &self,
        category: &NewCategory,
    ) -> Result<Category, CategoryRepositoryError> {
        let mut tables = self.tables();
        if let Some(existing) = tables.categories.iter().find(|c| c.name == category.name) {
            return Ok(existing.clone());
        }
        let stored = Category {
            id: CategoryId::new(tables.next_id()),
            name: category.name.clone(),
            creator_id: category.creator_id,
            created_at: Utc::now(),
        };
        tables.categories.push(stored.clone());
        Ok(stored)
    }

    async fn find_by_id(&self, id: CategoryId) -> Result<Option<Category>, CategoryRepositoryError> {
        Ok(self
            .tables()
            .categories
            .iter()
            .find(|category| category.id == id)
            .cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Category>, CategoryRepositoryError> {
        Ok(self
            .tables()
            .categories
            .iter()
            .find(|category| category.name.as_ref() == name)
            .cloned())
    }

    async fn list_all(&self) -> Result<Vec<Category>, CategoryRepositoryError> {
        let mut categories = self.tables().categories.clone();
        categories.sort_by(|a, b| a.name.as_ref().cmp(b.name.as_ref()));
        Ok(categories)
    }
}

#[async_trait]
impl ItemRepository for MemoryStore {
    async fn insert(&self, item: &NewItem) -> Result<Item, ItemRepositoryError> {
        let mut tables = self.tables();
        let category_id = item.draft.category_id;
        if !tables.has_category(category_id) {
            return Err(ItemRepositoryError::unknown_category(category_id.get()));
        }
        let stored = Item {
            id: ItemId::new(tables.next_id()),
            name: item.draft.name.clone(),
            description: item.draft.description.clone(),
            category_id,
            creator_id: item.creator_id,
            created_at: Utc::now(),
        };
        tables.items.push(stored.clone());
        Ok(stored)
    }

    async fn find_by_id(&self, id: ItemId) -> Result<Option<Item>, ItemRepositoryError> {
        Ok(self.tables().items.iter().find(|item| item.id == id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<Item>, ItemRepositoryError> {
        let mut items = self.tables().items.clone();
        items.sort_by_key(|item| item.id);
        Ok(items)
    }

    async fn list_by_category(
        &self,
        category_id: CategoryId,
    ) -> Result<Vec<Item>, ItemRepositoryError> {
        let mut items = ItemRepository::list_all(self).await?;
        items.retain(|item| item.category_id == category_id);
        Ok(items)
    }

    async fn list_by_name(&self, name: &str) -> Result<Vec<Item>, ItemRepositoryError> {
        let mut items = ItemRepository::list_all(self).await?;
        items.retain(|item| item.name.as_ref() == name);
        Ok(items)
    }

    async fn latest(&self, limit: usize) -> Result<Vec<Item>, ItemRepositoryError> {
        let mut items = self.tables().items.clone();
        items.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        items.truncate(limit);
        Ok(items)
    }

    async fn update(
        &self,
        id: ItemId,
        draft: &ItemDraft,
    ) -> Result<Option<Item>, ItemRepositoryError> {
        let mut tables = self.tables();
        if !tables.has_category(draft.category_id) {
            return Err(ItemRepositoryError::unknown_category(draft.category_id.get()));
        }
        let Some(item) = tables.items.iter_mut().find(|item| item.id == id) else {
            return Ok(None);
        };
        item.name = draft.name.clone();
        item.description = draft.description.clone();
        item.category_id = draft.category_id;
        Ok(Some(item.clone()))
    }

    async fn delete(&self, id: ItemId) -> Result<bool, ItemRepositoryError> {
        let mut tables = self.tables();
        let before = tables.items.len();
        tables.items.retain(|item| item.id != id);
        Ok(tables.items.len() != before)
    }
}
