//! Typed access to the cookie session.
//!
//! The session carries three optional keys: `state` (pending anti-forgery
//! token), `userinfo` (the authenticated [`SessionIdentity`]) and `target`
//! (path to return to after login or logout). Handlers use
//! [`SessionContext`] rather than raw string keys.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::domain::{AuthStage, Error, SessionIdentity, StateToken};

pub(crate) const STATE_KEY: &str = "state";
pub(crate) const USERINFO_KEY: &str = "userinfo";
pub(crate) const TARGET_KEY: &str = "target";

/// Newtype wrapper exposing typed session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    fn read<T: DeserializeOwned>(&self, key: &'static str) -> Option<T> {
        match self.0.get::<T>(key) {
            Ok(value) => value,
            Err(error) => {
                warn!(key, %error, "discarding unreadable session value");
                self.0.remove(key);
                None
            }
        }
    }

    fn write<T: serde::Serialize>(&self, key: &'static str, value: &T) -> Result<(), Error> {
        self.0
            .insert(key, value)
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Authentication stage implied by the `userinfo` and `state` keys.
    ///
    /// Guards destructure [`AuthStage::Authenticated`] to obtain the
    /// signed-in identity.
    pub fn stage(&self) -> AuthStage {
        AuthStage::of(self.identity(), self.state_token())
    }

    /// Pending anti-forgery token, if any.
    pub fn state_token(&self) -> Option<StateToken> {
        self.read(STATE_KEY)
    }

    /// Store the token minted for a login attempt.
    pub fn set_state_token(&self, token: &StateToken) -> Result<(), Error> {
        self.write(STATE_KEY, token)
    }

    /// Forget the pending token once it has been used.
    pub fn clear_state_token(&self) {
        self.0.remove(STATE_KEY);
    }

    /// Authenticated identity, if any.
    pub fn identity(&self) -> Option<SessionIdentity> {
        self.read(USERINFO_KEY)
    }

    /// Record the identity of a completed login.
    pub fn set_identity(&self, identity: &SessionIdentity) -> Result<(), Error> {
        self.write(USERINFO_KEY, identity)
    }

    /// Sign out; the token and target are left untouched.
    pub fn clear_identity(&self) {
        self.0.remove(USERINFO_KEY);
    }

    /// Return-to-origin path, if any.
    pub fn target(&self) -> Option<String> {
        self.read(TARGET_KEY)
    }

    /// Remember `path` as the place to return to.
    pub fn set_target(&self, path: &str) -> Result<(), Error> {
        self.write(TARGET_KEY, &path)
    }

    /// Remove and return the stored target.
    pub fn take_target(&self) -> Option<String> {
        let target = self.target();
        self.0.remove(TARGET_KEY);
        target
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}

#[cfg(test)]
mod tests {
    use actix_session::Session;
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test, web};

    use super::*;
    use crate::domain::{DisplayName, Email};
    use crate::inbound::http::test_utils::{session_cookie, test_session_middleware};

    fn identity() -> SessionIdentity {
        SessionIdentity {
            name: DisplayName::new("Ada").expect("name"),
            email: Email::new("ada@example.com").expect("email"),
        }
    }

    #[actix_web::test]
    async fn round_trips_identity_and_target() {
        let app = test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .route(
                    "/set",
                    web::get().to(|session: SessionContext| async move {
                        session.set_identity(&identity())?;
                        session.set_target("/items/new")?;
                        Ok::<_, Error>(HttpResponse::Ok())
                    }),
                )
                .route(
                    "/get",
                    web::get().to(|session: SessionContext| async move {
                        assert_eq!(session.stage(), AuthStage::Authenticated(identity()));
                        let target = session.take_target().unwrap_or_default();
                        assert!(session.target().is_none());
                        HttpResponse::Ok().body(target)
                    }),
                ),
        )
        .await;

        let set_res =
            test::call_service(&app, test::TestRequest::get().uri("/set").to_request()).await;
        assert_eq!(set_res.status(), StatusCode::OK);
        let cookie = session_cookie(&set_res);

        let get_res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/get")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(get_res.status(), StatusCode::OK);
        assert_eq!(test::read_body(get_res).await, "/items/new");
    }

    #[actix_web::test]
    async fn tampered_identity_reads_as_anonymous() {
        let app = test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .route(
                    "/set-invalid",
                    web::get().to(|session: Session| async move {
                        session
                            .insert(USERINFO_KEY, serde_json::json!({"name": "x", "email": "nope"}))
                            .expect("set malformed identity");
                        HttpResponse::Ok()
                    }),
                )
                .route(
                    "/stage",
                    web::get().to(|session: SessionContext| async move {
                        let anonymous = session.stage() == AuthStage::Anonymous;
                        HttpResponse::Ok().body(anonymous.to_string())
                    }),
                ),
        )
        .await;

        let set_res = test::call_service(
            &app,
            test::TestRequest::get().uri("/set-invalid").to_request(),
        )
        .await;
        let cookie = session_cookie(&set_res);

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/stage")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(test::read_body(res).await, "true");
    }

    #[actix_web::test]
    async fn pending_token_yields_to_identity() {
        let app = test::init_service(
            App::new().wrap(test_session_middleware()).route(
                "/",
                web::get().to(|session: SessionContext| async move {
                    let token = StateToken::generate(&mut rand::rngs::OsRng);
                    session.set_state_token(&token)?;
                    assert_eq!(session.stage(), AuthStage::Pending(token));
                    session.set_identity(&identity())?;
                    assert_eq!(session.stage(), AuthStage::Authenticated(identity()));
                    session.clear_identity();
                    session.clear_state_token();
                    assert_eq!(session.stage(), AuthStage::Anonymous);
                    Ok::<_, Error>(HttpResponse::Ok())
                }),
            ),
        )
        .await;

        let res = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);
    }
}
