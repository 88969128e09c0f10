//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly; regenerate with
//! `diesel print-schema` when the migrations change.

diesel::table! {
    /// Users recorded on first successful login.
    users (id) {
        id -> Int4,
        /// Identity key reported by the provider.
        email -> Varchar,
        name -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Catalog categories; `name` is unique.
    categories (id) {
        id -> Int4,
        name -> Varchar,
        creator_id -> Int4,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Catalog items, each owned by one category.
    items (id) {
        id -> Int4,
        name -> Varchar,
        description -> Nullable<Text>,
        category_id -> Int4,
        creator_id -> Int4,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(categories -> users (creator_id));
diesel::joinable!(items -> categories (category_id));

diesel::allow_tables_to_appear_in_same_query!(users, categories, items);
