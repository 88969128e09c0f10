//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Conversions into domain types re-validate
//! stored values and report corrupt rows as query errors.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::domain::{
    Category, CategoryId, CategoryName, DisplayName, Email, Item, ItemId, ItemName, User, UserId,
};

use super::schema::{categories, items, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i32,
    pub email: String,
    pub name: String,
}

impl TryFrom<UserRow> for User {
    type Error = String;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let email = Email::new(&row.email).map_err(|err| format!("user {}: {err}", row.id))?;
        let name = DisplayName::new(row.name).map_err(|err| format!("user {}: {err}", row.id))?;
        Ok(User::new(UserId::new(row.id), email, name))
    }
}

/// Insertable struct for creating user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub email: &'a str,
    pub name: &'a str,
}

/// Row struct for reading from the categories table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = categories)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CategoryRow {
    pub id: i32,
    pub name: String,
    pub creator_id: i32,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<CategoryRow> for Category {
    type Error = String;

    fn try_from(row: CategoryRow) -> Result<Self, Self::Error> {
        let name = CategoryName::new(&row.name).map_err(|err| format!("category {}: {err}", row.id))?;
        Ok(Category {
            id: CategoryId::new(row.id),
            name,
            creator_id: UserId::new(row.creator_id),
            created_at: row.created_at,
        })
    }
}

/// Insertable struct for creating category records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = categories)]
pub(crate) struct NewCategoryRow<'a> {
    pub name: &'a str,
    pub creator_id: i32,
}

/// Row struct for reading from the items table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ItemRow {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub category_id: i32,
    pub creator_id: i32,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<ItemRow> for Item {
    type Error = String;

    fn try_from(row: ItemRow) -> Result<Self, Self::Error> {
        let name = ItemName::new(&row.name).map_err(|err| format!("item {}: {err}", row.id))?;
        Ok(Item {
            id: ItemId::new(row.id),
            name,
            description: row.description,
            category_id: CategoryId::new(row.category_id),
            creator_id: UserId::new(row.creator_id),
            created_at: row.created_at,
        })
    }
}

/// Insertable struct for creating item records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = items)]
pub(crate) struct NewItemRow<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub category_id: i32,
    pub creator_id: i32,
}

/// Changeset replacing the editable item fields.
///
/// `description` is written even when `None` so clearing it sticks.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = items)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct ItemChangeset<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub category_id: i32,
}
