//! Shared harness for catalog HTTP integration tests.

use std::sync::Arc;

use actix_http::Request;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::body::BoxBody;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::header;
use actix_web::{App, test, web};
use catalog::Trace;
use catalog::inbound::http::{auth, categories, items, json_api};
use catalog::test_support::{MemoryStore, StubIdentityProvider, http_state};

pub const SESSION_COOKIE: &str = "session";

/// Build the catalog app over `store` with the routes registered as in the
/// server binary.
pub async fn init_app(
    store: Arc<MemoryStore>,
) -> impl Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error> {
    let session = SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name(SESSION_COOKIE.to_owned())
        .cookie_secure(false)
        .build();
    test::init_service(
        App::new()
            .app_data(web::Data::new(http_state(store, StubIdentityProvider::default())))
            .wrap(session)
            .wrap(Trace)
            .service(json_api::query_catalog)
            .service(auth::gconnect)
            .service(auth::login)
            .service(auth::logout)
            .service(categories::show_catalog)
            .service(categories::new_category_form)
            .service(categories::create_category)
            .service(categories::show_category)
            .service(items::new_item_form)
            .service(items::create_item)
            .service(items::edit_item_form)
            .service(items::update_item)
            .service(items::delete_item_form)
            .service(items::delete_item)
            .service(items::show_item),
    )
    .await
}

/// Browser-like cookie jar holding the session cookie.
#[derive(Default)]
pub struct Jar(Option<Cookie<'static>>);

impl Jar {
    /// Attach the current cookie, if any, to `request`.
    pub fn apply(&self, request: test::TestRequest) -> test::TestRequest {
        match &self.0 {
            Some(cookie) => request.cookie(cookie.clone()),
            None => request,
        }
    }

    /// Keep the cookie set by `res`, if it set one.
    pub fn update<B>(&mut self, res: &ServiceResponse<B>) {
        if let Some(cookie) = res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == SESSION_COOKIE)
        {
            self.0 = Some(cookie.into_owned());
        }
    }
}

/// `Location` header of a redirect.
pub fn location<B>(res: &ServiceResponse<B>) -> String {
    res.headers()
        .get(header::LOCATION)
        .expect("location header")
        .to_str()
        .expect("ascii location")
        .to_owned()
}
