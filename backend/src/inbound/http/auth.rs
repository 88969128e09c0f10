//! Login and logout handlers driving [`crate::domain::AuthFlow`].
//!
//! ```text
//! GET /gconnect                 -> 302 to the provider consent screen
//! GET /login?state=..&code=..   -> 302 to the stored target, or 401
//! GET /logout                   -> 302 to the stored target
//! ```

use actix_web::{HttpResponse, get, web};
use tracing::debug;

use crate::domain::{AuthError, AuthStage, LoginCallback};
use crate::inbound::http::ApiResult;
use crate::inbound::http::pages::{HOME_PATH, redirect};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Body returned when the callback state does not match the session.
pub const INVALID_STATE_BODY: &str = "Invalid state parameter.";

fn return_to_target(session: &SessionContext) -> HttpResponse {
    let target = session.take_target();
    redirect(target.as_deref().unwrap_or(HOME_PATH))
}

/// Start a login: store a fresh anti-forgery token and redirect to the
/// provider. Visitors who are already signed in go straight back.
#[get("/gconnect")]
pub async fn gconnect(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    if let AuthStage::Authenticated(_) = session.stage() {
        return Ok(return_to_target(&session));
    }
    let pending = state.auth.begin();
    session.set_state_token(&pending.state)?;
    Ok(redirect(pending.authorization_url.as_str()))
}

/// OAuth2 callback.
///
/// A missing or mismatched `state` answers `401` with a JSON string body and
/// records nothing.
#[get("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    callback: web::Query<LoginCallback>,
) -> ApiResult<HttpResponse> {
    let expected = session.state_token();
    match state.auth.complete(expected.as_ref(), &callback).await {
        Ok(identity) => {
            session.set_identity(&identity)?;
            session.clear_state_token();
            Ok(return_to_target(&session))
        }
        Err(AuthError::StateMismatch) => {
            Ok(HttpResponse::Unauthorized().json(INVALID_STATE_BODY))
        }
        Err(other) => Err(other.into()),
    }
}

/// Sign out and return to the stored target.
#[get("/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    debug!(signed_in = session.identity().is_some(), "logout");
    session.clear_identity();
    return_to_target(&session)
}
