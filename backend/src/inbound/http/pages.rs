//! Helpers shared by the HTML page handlers: rendering, redirects, the login
//! guard and the JSON shapes handed to templates.

use actix_web::http::header::{self, ContentType};
use actix_web::{HttpRequest, HttpResponse};
use serde_json::{Value, json};

use crate::domain::{Category, Error, Item};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Route that starts a login.
pub const LOGIN_PATH: &str = "/gconnect";

/// Fallback destination after login and logout.
pub const HOME_PATH: &str = "/";

/// `302 Found` pointing at `location`.
pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Remember the current path and send the visitor to the login route.
pub fn login_redirect(session: &SessionContext, req: &HttpRequest) -> ApiResult<HttpResponse> {
    session.set_target(req.path())?;
    Ok(redirect(LOGIN_PATH))
}

/// Render `template` as an HTML response.
pub fn render(state: &HttpState, template: &str, context: &Value) -> ApiResult<HttpResponse> {
    let body = state
        .views
        .render(template, context)
        .map_err(|err| Error::internal(err.to_string()))?;
    Ok(HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(body))
}

pub(crate) fn category_view(category: &Category) -> Value {
    json!({ "id": category.id, "name": category.name })
}

pub(crate) fn categories_view(categories: &[Category]) -> Value {
    Value::Array(categories.iter().map(category_view).collect())
}

pub(crate) fn item_view(item: &Item) -> Value {
    json!({
        "id": item.id,
        "name": item.name,
        "description": item.description,
        "category_id": item.category_id,
    })
}
