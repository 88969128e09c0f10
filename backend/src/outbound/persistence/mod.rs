//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repository implementations only translate between Diesel rows and domain
//! types; the catalog rules live in the domain service. Row structs
//! (`models.rs`) and table definitions (`schema.rs`) stay private to this
//! module.
//!
//! # Example
//!
//! ```ignore
//! use catalog::outbound::persistence::{DbPool, DieselItemRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/catalog")).await?;
//! let items = DieselItemRepository::new(pool);
//! ```

mod diesel_category_repository;
mod diesel_item_repository;
mod diesel_user_repository;
mod error_mapping;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_category_repository::DieselCategoryRepository;
pub use diesel_item_repository::DieselItemRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
