//! Catalog root and category pages.
//!
//! ```text
//! GET  /                 latest items and all categories
//! GET  /categories/{id}  items of one category
//! GET  /categories/new   new-category form (signed in)
//! POST /categories/new   insert-or-get by name (signed in)
//! ```

use actix_web::{HttpRequest, HttpResponse, get, post, web};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::domain::{AuthStage, CategoryId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::pages::{
    HOME_PATH, categories_view, category_view, item_view, login_redirect, redirect, render,
};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Title of the item list on the catalog root.
pub const LATEST_ITEMS_TITLE: &str = "Latest Items";

/// Urlencoded body of `POST /categories/new`.
#[derive(Debug, Deserialize)]
pub struct CategoryForm {
    /// Requested category name.
    pub name: String,
}

/// Catalog root: every category and the most recent items.
#[get("/")]
pub async fn show_catalog(
    state: web::Data<HttpState>,
    session: SessionContext,
    req: HttpRequest,
) -> ApiResult<HttpResponse> {
    session.set_target(req.path())?;
    let overview = state.catalog.overview().await?;
    let items: Vec<Value> = overview
        .latest
        .iter()
        .map(|entry| {
            json!({
                "id": entry.item.id,
                "name": entry.item.name,
                "category_name": entry.category_name,
            })
        })
        .collect();
    render(
        &state,
        "catalog.html",
        &json!({
            "user": session.identity(),
            "categories": categories_view(&overview.categories),
            "items": items,
            "item_title": LATEST_ITEMS_TITLE,
        }),
    )
}

/// Items of one category next to the category list.
#[get("/categories/{id}")]
pub async fn show_category(
    state: web::Data<HttpState>,
    session: SessionContext,
    req: HttpRequest,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    session.set_target(req.path())?;
    let listing = state
        .catalog
        .category_listing(CategoryId::new(path.into_inner()))
        .await?;
    let items: Vec<Value> = listing.items.iter().map(item_view).collect();
    render(
        &state,
        "view_category.html",
        &json!({
            "user": session.identity(),
            "category": category_view(&listing.category),
            "categories": categories_view(&listing.categories),
            "items": items,
            "item_title": format!("{} Items", listing.category.name),
        }),
    )
}

/// New-category form.
#[get("/categories/new")]
pub async fn new_category_form(
    state: web::Data<HttpState>,
    session: SessionContext,
    req: HttpRequest,
) -> ApiResult<HttpResponse> {
    let AuthStage::Authenticated(identity) = session.stage() else {
        return login_redirect(&session, &req);
    };
    render(&state, "new_category.html", &json!({ "user": identity }))
}

/// Store a category; an existing name is reused.
#[post("/categories/new")]
pub async fn create_category(
    state: web::Data<HttpState>,
    session: SessionContext,
    req: HttpRequest,
    form: web::Form<CategoryForm>,
) -> ApiResult<HttpResponse> {
    let AuthStage::Authenticated(identity) = session.stage() else {
        return login_redirect(&session, &req);
    };
    let user = state.catalog.resolve_user(&identity).await?;
    state.catalog.create_category(&form.name, &user).await?;
    Ok(redirect(HOME_PATH))
}
