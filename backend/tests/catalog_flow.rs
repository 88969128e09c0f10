//! End-to-end flow through the catalog routes: login with state
//! verification, category and item creation, JSON queries and logout.

mod catalog_support;

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use catalog::domain::ports::CategoryRepository;
use catalog::domain::{CategoryName, NewCategory, UserId};
use catalog::inbound::http::json_api::{CatalogJson, ItemJson};
use catalog::test_support::{MemoryStore, STUB_CODE};
use catalog_support::{Jar, init_app, location};
use rstest::{fixture, rstest};
use serde_json::Value;
use url::Url;

#[fixture]
fn store() -> Arc<MemoryStore> {
    Arc::new(MemoryStore::new())
}

fn state_param(authorization_url: &str) -> String {
    Url::parse(authorization_url)
        .expect("absolute authorization url")
        .query_pairs()
        .find(|(key, _)| key == "state")
        .map(|(_, value)| value.into_owned())
        .expect("state parameter")
}

#[rstest]
#[actix_rt::test]
async fn login_create_and_query_the_catalog(store: Arc<MemoryStore>) {
    let app = init_app(store.clone()).await;
    let mut jar = Jar::default();

    let guarded = test::call_service(&app, TestRequest::get().uri("/items/new").to_request()).await;
    assert_eq!(guarded.status(), StatusCode::FOUND);
    assert_eq!(location(&guarded), "/gconnect");
    jar.update(&guarded);

    let start =
        test::call_service(&app, jar.apply(TestRequest::get().uri("/gconnect")).to_request()).await;
    assert_eq!(start.status(), StatusCode::FOUND);
    jar.update(&start);
    let state = state_param(&location(&start));

    let forged = test::call_service(
        &app,
        jar.apply(TestRequest::get().uri(&format!("/login?state=FORGED&code={STUB_CODE}")))
            .to_request(),
    )
    .await;
    assert_eq!(forged.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(forged).await;
    assert_eq!(body, Value::from("Invalid state parameter."));
    assert_eq!(store.user_count(), 0);

    let callback = test::call_service(
        &app,
        jar.apply(TestRequest::get().uri(&format!("/login?state={state}&code={STUB_CODE}")))
            .to_request(),
    )
    .await;
    assert_eq!(callback.status(), StatusCode::FOUND);
    assert_eq!(location(&callback), "/items/new");
    assert_eq!(store.user_count(), 1);
    jar.update(&callback);

    let replay = test::call_service(
        &app,
        jar.apply(TestRequest::get().uri(&format!("/login?state={state}&code={STUB_CODE}")))
            .to_request(),
    )
    .await;
    assert_eq!(replay.status(), StatusCode::UNAUTHORIZED);

    for _ in 0..2 {
        let created = test::call_service(
            &app,
            jar.apply(TestRequest::post().uri("/categories/new"))
                .set_form([("name", "Soccer")])
                .to_request(),
        )
        .await;
        assert_eq!(created.status(), StatusCode::FOUND);
        assert_eq!(location(&created), "/");
    }

    let dump = test::call_service(&app, TestRequest::get().uri("/json").to_request()).await;
    let catalog: CatalogJson = test::read_body_json(dump).await;
    assert_eq!(catalog.categories.len(), 1);
    let soccer = catalog.categories[0].id;

    let created = test::call_service(
        &app,
        jar.apply(TestRequest::post().uri("/items/new"))
            .set_form([
                ("name", "Ball".to_owned()),
                ("description", "Size 5".to_owned()),
                ("category", soccer.to_string()),
            ])
            .to_request(),
    )
    .await;
    assert_eq!(created.status(), StatusCode::FOUND);

    let listing =
        test::call_service(&app, TestRequest::get().uri("/json?category=Soccer").to_request()).await;
    assert_eq!(listing.status(), StatusCode::OK);
    let body: Value = test::read_body_json(listing).await;
    assert_eq!(body["category_id"], Value::from(soccer));
    assert_eq!(body["category_name"], "Soccer");
    let items: Vec<ItemJson> = serde_json::from_value(body["items"].clone()).expect("items");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].name, "Ball");
    assert_eq!(items[0].category_id, soccer);
    assert_eq!(items[0].description.as_deref(), Some("Size 5"));

    let logout =
        test::call_service(&app, jar.apply(TestRequest::get().uri("/logout")).to_request()).await;
    assert_eq!(location(&logout), "/");
    jar.update(&logout);

    let guarded_again =
        test::call_service(&app, jar.apply(TestRequest::get().uri("/items/new")).to_request()).await;
    assert_eq!(location(&guarded_again), "/gconnect");
}

#[rstest]
#[actix_rt::test]
async fn logout_returns_to_the_last_page_viewed(store: Arc<MemoryStore>) {
    let category = CategoryRepository::insert_or_get_existing(
        store.as_ref(),
        &NewCategory {
            name: CategoryName::new("Hockey").expect("name"),
            creator_id: UserId::new(1),
        },
    )
    .await
    .expect("seed category");
    let app = init_app(store).await;
    let mut jar = Jar::default();
    let page_path = format!("/categories/{}", category.id);

    let page = test::call_service(&app, TestRequest::get().uri(&page_path).to_request()).await;
    assert_eq!(page.status(), StatusCode::OK);
    jar.update(&page);

    let first =
        test::call_service(&app, jar.apply(TestRequest::get().uri("/logout")).to_request()).await;
    assert_eq!(location(&first), page_path);
    jar.update(&first);

    let second =
        test::call_service(&app, jar.apply(TestRequest::get().uri("/logout")).to_request()).await;
    assert_eq!(location(&second), "/");
}

#[rstest]
#[actix_rt::test]
async fn item_for_unknown_category_is_rejected(store: Arc<MemoryStore>) {
    let app = init_app(store.clone()).await;
    let mut jar = Jar::default();

    let start = test::call_service(&app, TestRequest::get().uri("/gconnect").to_request()).await;
    jar.update(&start);
    let state = state_param(&location(&start));
    let callback = test::call_service(
        &app,
        jar.apply(TestRequest::get().uri(&format!("/login?state={state}&code={STUB_CODE}")))
            .to_request(),
    )
    .await;
    jar.update(&callback);

    let res = test::call_service(
        &app,
        jar.apply(TestRequest::post().uri("/items/new"))
            .set_form([("name", "Puck"), ("category", "404")])
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert!(res.headers().contains_key("trace-id"));
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["details"]["code"], "unknown_category");
    assert!(store.items().is_empty());
}
