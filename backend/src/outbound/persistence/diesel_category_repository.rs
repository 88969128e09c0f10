//! PostgreSQL-backed `CategoryRepository` implementation using Diesel ORM.
//!
//! Duplicate names are absorbed with `ON CONFLICT DO NOTHING` followed by a
//! lookup, so concurrent submissions of the same name converge on one row.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{CategoryRepository, CategoryRepositoryError};
use crate::domain::{Category, CategoryId, NewCategory};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{CategoryRow, NewCategoryRow};
use super::pool::DbPool;
use super::schema::categories;

/// Diesel-backed implementation of the [`CategoryRepository`] port.
#[derive(Clone)]
pub struct DieselCategoryRepository {
    pool: DbPool,
}

impl DieselCategoryRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn conn(
        &self,
    ) -> Result<
        diesel_async::pooled_connection::bb8::PooledConnection<'_, diesel_async::AsyncPgConnection>,
        CategoryRepositoryError,
    > {
        self.pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, CategoryRepositoryError::connection))
    }
}

fn diesel_error(error: diesel::result::Error) -> CategoryRepositoryError {
    map_diesel_error(
        error,
        CategoryRepositoryError::query,
        CategoryRepositoryError::connection,
    )
}

fn to_category(row: CategoryRow) -> Result<Category, CategoryRepositoryError> {
    Category::try_from(row).map_err(CategoryRepositoryError::query)
}

#[async_trait]
impl CategoryRepository for DieselCategoryRepository {
    async fn insert_or_get_existing(
        &self,
        category: &NewCategory,
    ) -> Result<Category, CategoryRepositoryError> {
        let mut conn = self.conn().await?;

        let inserted: Option<CategoryRow> = diesel::insert_into(categories::table)
            .values(NewCategoryRow {
                name: category.name.as_ref(),
                creator_id: category.creator_id.get(),
            })
            .on_conflict(categories::name)
            .do_nothing()
            .returning(CategoryRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;

        let row = match inserted {
            Some(row) => row,
            None => categories::table
                .filter(categories::name.eq(category.name.as_ref()))
                .select(CategoryRow::as_select())
                .first(&mut conn)
                .await
                .map_err(diesel_error)?,
        };
        to_category(row)
    }

    async fn find_by_id(&self, id: CategoryId) -> Result<Option<Category>, CategoryRepositoryError> {
        let mut conn = self.conn().await?;
        categories::table
            .find(id.get())
            .select(CategoryRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?
            .map(to_category)
            .transpose()
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Category>, CategoryRepositoryError> {
        let mut conn = self.conn().await?;
        categories::table
            .filter(categories::name.eq(name))
            .select(CategoryRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?
            .map(to_category)
            .transpose()
    }

    async fn list_all(&self) -> Result<Vec<Category>, CategoryRepositoryError> {
        let mut conn = self.conn().await?;
        let rows: Vec<CategoryRow> = categories::table
            .order(categories::name.asc())
            .select(CategoryRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        rows.into_iter().map(to_category).collect()
    }
}
