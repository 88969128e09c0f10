//! Driven port for category persistence.

use async_trait::async_trait;

use crate::domain::{Category, CategoryId, NewCategory};

use super::define_port_error;

define_port_error! {
    /// Errors raised by category repository adapters.
    pub enum CategoryRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "category repository connection failed: {message}",
        /// Query failed during execution or row conversion.
        Query { message: String } =>
            "category repository query failed: {message}",
    }
}

/// Port for reading and creating categories.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Insert the category, or return the stored one when the name is taken.
    ///
    /// Idempotent on name: repeated calls yield a single record whose
    /// creator is the first submitter.
    async fn insert_or_get_existing(
        &self,
        category: &NewCategory,
    ) -> Result<Category, CategoryRepositoryError>;

    /// Fetch a category by identifier.
    async fn find_by_id(&self, id: CategoryId) -> Result<Option<Category>, CategoryRepositoryError>;

    /// Fetch a category by exact name.
    async fn find_by_name(&self, name: &str) -> Result<Option<Category>, CategoryRepositoryError>;

    /// All categories ordered by name.
    async fn list_all(&self) -> Result<Vec<Category>, CategoryRepositoryError>;
}
