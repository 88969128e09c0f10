//! Item pages and mutations.
//!
//! ```text
//! GET  /items/{id}          item page
//! GET  /items/new           new-item form (signed in)
//! POST /items/new           insert into an existing category (signed in)
//! GET  /items/{id}/edit     edit form (signed in)
//! POST /items/{id}/edit     update (signed in)
//! GET  /items/{id}/delete   confirmation page (signed in)
//! POST /items/{id}/delete   delete (signed in)
//! ```
//!
//! Any signed-in visitor may change any item.

use actix_web::{HttpRequest, HttpResponse, get, post, web};
use serde::Deserialize;
use serde_json::json;

use crate::domain::{AuthStage, CategoryId, Error, ItemDraft, ItemId, ItemValidationError};
use crate::inbound::http::ApiResult;
use crate::inbound::http::pages::{
    HOME_PATH, categories_view, category_view, item_view, login_redirect, redirect, render,
};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Urlencoded body of the new and edit item forms.
#[derive(Debug, Deserialize)]
pub struct ItemForm {
    /// Item name; trimmed and length-checked on conversion.
    pub name: String,
    /// Free text; blank means no description.
    #[serde(default)]
    pub description: String,
    /// Identifier of the owning category.
    pub category: i32,
}

impl TryFrom<ItemForm> for ItemDraft {
    type Error = ItemValidationError;

    fn try_from(value: ItemForm) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.name, &value.description, CategoryId::new(value.category))
    }
}

fn map_item_validation_error(err: ItemValidationError) -> Error {
    let code = match err {
        ItemValidationError::EmptyName => "empty_name",
        ItemValidationError::NameTooLong { .. } => "name_too_long",
    };
    Error::invalid_request(err.to_string()).with_details(json!({ "field": "name", "code": code }))
}

fn item_path(id: ItemId) -> String {
    format!("/items/{id}")
}

/// New-item form offering every category.
#[get("/items/new")]
pub async fn new_item_form(
    state: web::Data<HttpState>,
    session: SessionContext,
    req: HttpRequest,
) -> ApiResult<HttpResponse> {
    let AuthStage::Authenticated(identity) = session.stage() else {
        return login_redirect(&session, &req);
    };
    let categories = state.catalog.categories().await?;
    render(
        &state,
        "new_item.html",
        &json!({ "user": identity, "categories": categories_view(&categories) }),
    )
}

/// Insert an item; the category must exist.
#[post("/items/new")]
pub async fn create_item(
    state: web::Data<HttpState>,
    session: SessionContext,
    req: HttpRequest,
    form: web::Form<ItemForm>,
) -> ApiResult<HttpResponse> {
    let AuthStage::Authenticated(identity) = session.stage() else {
        return login_redirect(&session, &req);
    };
    let draft = ItemDraft::try_from(form.into_inner()).map_err(map_item_validation_error)?;
    let user = state.catalog.resolve_user(&identity).await?;
    state.catalog.create_item(draft, &user).await?;
    Ok(redirect(HOME_PATH))
}

/// Item page.
#[get("/items/{id}")]
pub async fn show_item(
    state: web::Data<HttpState>,
    session: SessionContext,
    req: HttpRequest,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    session.set_target(req.path())?;
    let detail = state.catalog.item_detail(ItemId::new(path.into_inner())).await?;
    render(
        &state,
        "view_item.html",
        &json!({
            "user": session.identity(),
            "item": item_view(&detail.item),
            "category": category_view(&detail.category),
        }),
    )
}

/// Edit form prefilled with the current values.
#[get("/items/{id}/edit")]
pub async fn edit_item_form(
    state: web::Data<HttpState>,
    session: SessionContext,
    req: HttpRequest,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    let AuthStage::Authenticated(identity) = session.stage() else {
        return login_redirect(&session, &req);
    };
    let detail = state.catalog.item_detail(ItemId::new(path.into_inner())).await?;
    let categories = state.catalog.categories().await?;
    render(
        &state,
        "edit_item.html",
        &json!({
            "user": identity,
            "item": item_view(&detail.item),
            "categories": categories_view(&categories),
        }),
    )
}

/// Replace an item's fields and show it.
#[post("/items/{id}/edit")]
pub async fn update_item(
    state: web::Data<HttpState>,
    session: SessionContext,
    req: HttpRequest,
    path: web::Path<i32>,
    form: web::Form<ItemForm>,
) -> ApiResult<HttpResponse> {
    let AuthStage::Authenticated(_) = session.stage() else {
        return login_redirect(&session, &req);
    };
    let id = ItemId::new(path.into_inner());
    let draft = ItemDraft::try_from(form.into_inner()).map_err(map_item_validation_error)?;
    state.catalog.update_item(id, draft).await?;
    Ok(redirect(&item_path(id)))
}

/// Delete confirmation page.
#[get("/items/{id}/delete")]
pub async fn delete_item_form(
    state: web::Data<HttpState>,
    session: SessionContext,
    req: HttpRequest,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    let AuthStage::Authenticated(identity) = session.stage() else {
        return login_redirect(&session, &req);
    };
    let detail = state.catalog.item_detail(ItemId::new(path.into_inner())).await?;
    render(
        &state,
        "delete_item.html",
        &json!({
            "user": identity,
            "item": item_view(&detail.item),
            "category": category_view(&detail.category),
        }),
    )
}

/// Delete an item and return to the catalog root.
#[post("/items/{id}/delete")]
pub async fn delete_item(
    state: web::Data<HttpState>,
    session: SessionContext,
    req: HttpRequest,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    let AuthStage::Authenticated(_) = session.stage() else {
        return login_redirect(&session, &req);
    };
    state.catalog.delete_item(ItemId::new(path.into_inner())).await?;
    Ok(redirect(HOME_PATH))
}
