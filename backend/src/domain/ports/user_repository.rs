//! Driven port for user persistence.
use async_trait::async_trait;

use crate::domain::{NewUser, User};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
    }
}

/// Port for recording users by their email identity key.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert the user unless one with the same email exists.
    ///
    /// Returns the stored record either way; an existing record is left
    /// untouched.
    async fn insert_or_get_existing(&self, user: &NewUser) -> Result<User, UserPersistenceError>;
}
