//! PostgreSQL-backed `ItemRepository` implementation using Diesel ORM.
//!
//! The `items_category_id_fkey` constraint backs the referential check done
//! by the catalog service; a violation racing a category lookup is reported
//! as [`ItemRepositoryError::UnknownCategory`].

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ItemRepository, ItemRepositoryError};
use crate::domain::{CategoryId, Item, ItemDraft, ItemId, NewItem};

use super::error_mapping::{is_foreign_key_violation, map_diesel_error, map_pool_error};
use super::models::{ItemChangeset, ItemRow, NewItemRow};
use super::pool::DbPool;
use super::schema::items;

const CATEGORY_FKEY: &str = "items_category_id_fkey";

/// Diesel-backed implementation of the [`ItemRepository`] port.
#[derive(Clone)]
pub struct DieselItemRepository {
    pool: DbPool,
}

impl DieselItemRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn conn(
        &self,
    ) -> Result<
        diesel_async::pooled_connection::bb8::PooledConnection<'_, diesel_async::AsyncPgConnection>,
        ItemRepositoryError,
    > {
        self.pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, ItemRepositoryError::connection))
    }

    async fn load(
        &self,
        query: items::BoxedQuery<'_, diesel::pg::Pg>,
    ) -> Result<Vec<Item>, ItemRepositoryError> {
        let mut conn = self.conn().await?;
        let rows: Vec<ItemRow> = query
            .select(ItemRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        rows.into_iter().map(to_item).collect()
    }
}

fn diesel_error(error: diesel::result::Error) -> ItemRepositoryError {
    map_diesel_error(
        error,
        ItemRepositoryError::query,
        ItemRepositoryError::connection,
    )
}

fn write_error(error: diesel::result::Error, category_id: CategoryId) -> ItemRepositoryError {
    if is_foreign_key_violation(&error, CATEGORY_FKEY) {
        ItemRepositoryError::unknown_category(category_id.get())
    } else {
        diesel_error(error)
    }
}

fn to_item(row: ItemRow) -> Result<Item, ItemRepositoryError> {
    Item::try_from(row).map_err(ItemRepositoryError::query)
}

#[async_trait]
impl ItemRepository for DieselItemRepository {
    async fn insert(&self, item: &NewItem) -> Result<Item, ItemRepositoryError> {
        let mut conn = self.conn().await?;
        let draft = &item.draft;
        let row: ItemRow = diesel::insert_into(items::table)
            .values(NewItemRow {
                name: draft.name.as_ref(),
                description: draft.description.as_deref(),
                category_id: draft.category_id.get(),
                creator_id: item.creator_id.get(),
            })
            .returning(ItemRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| write_error(err, draft.category_id))?;
        to_item(row)
    }

    async fn find_by_id(&self, id: ItemId) -> Result<Option<Item>, ItemRepositoryError> {
        let mut conn = self.conn().await?;
        items::table
            .find(id.get())
            .select(ItemRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?
            .map(to_item)
            .transpose()
    }

    async fn list_all(&self) -> Result<Vec<Item>, ItemRepositoryError> {
        self.load(items::table.order(items::id.asc()).into_boxed())
            .await
    }

    async fn list_by_category(
        &self,
        category_id: CategoryId,
    ) -> Result<Vec<Item>, ItemRepositoryError> {
        self.load(
            items::table
                .filter(items::category_id.eq(category_id.get()))
                .order(items::id.asc())
                .into_boxed(),
        )
        .await
    }

    async fn list_by_name(&self, name: &str) -> Result<Vec<Item>, ItemRepositoryError> {
        self.load(
            items::table
                .filter(items::name.eq(name.to_owned()))
                .order(items::id.asc())
                .into_boxed(),
        )
        .await
    }

    async fn latest(&self, limit: usize) -> Result<Vec<Item>, ItemRepositoryError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        self.load(
            items::table
                .order((items::created_at.desc(), items::id.desc()))
                .limit(limit)
                .into_boxed(),
        )
        .await
    }

    async fn update(
        &self,
        id: ItemId,
        draft: &ItemDraft,
    ) -> Result<Option<Item>, ItemRepositoryError> {
        let mut conn = self.conn().await?;
        diesel::update(items::table.find(id.get()))
            .set(ItemChangeset {
                name: draft.name.as_ref(),
                description: draft.description.as_deref(),
                category_id: draft.category_id.get(),
            })
            .returning(ItemRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(|err| write_error(err, draft.category_id))?
            .map(to_item)
            .transpose()
    }

    async fn delete(&self, id: ItemId) -> Result<bool, ItemRepositoryError> {
        let mut conn = self.conn().await?;
        let removed = diesel::delete(items::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(removed > 0)
    }
}
