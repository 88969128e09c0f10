//! Read-only JSON view of the catalog.
//!
//! ```text
//! GET /json                 {"categories": [..], "items": [..]}
//! GET /json?category=Soccer {"category_id": 1, "category_name": "Soccer", "items": [..]}
//! GET /json?item=Ball       [..]
//! ```
//!
//! `category` wins when both parameters are present.

use actix_web::{get, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{Category, Error, Item};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Query string accepted by `GET /json`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CatalogQuery {
    /// Exact category name.
    pub category: Option<String>,
    /// Exact item name.
    pub item: Option<String>,
}

/// Item as exposed by the JSON API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ItemJson {
    /// Item identifier.
    #[schema(example = 4)]
    pub id: i32,
    /// Display name; not unique.
    #[schema(example = "Goggles")]
    pub name: String,
    /// Identifier of the owning category.
    #[schema(example = 2)]
    pub category_id: i32,
    /// Free text, `null` when absent.
    #[schema(example = "Anti-fog lenses")]
    pub description: Option<String>,
}

impl From<&Item> for ItemJson {
    fn from(item: &Item) -> Self {
        Self {
            id: item.id.get(),
            name: item.name.to_string(),
            category_id: item.category_id.get(),
            description: item.description.clone(),
        }
    }
}

/// Category reference in the catalog dump.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CategoryJson {
    /// Category identifier.
    #[schema(example = 2)]
    pub id: i32,
    /// Unique category name.
    #[schema(example = "Snowboarding")]
    pub name: String,
}

impl From<&Category> for CategoryJson {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id.get(),
            name: category.name.to_string(),
        }
    }
}

/// Items of a single category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CategoryItemsJson {
    /// Identifier of the requested category.
    pub category_id: i32,
    /// Name of the requested category.
    pub category_name: String,
    /// Items in the category, oldest first.
    pub items: Vec<ItemJson>,
}

/// Whole catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CatalogJson {
    /// Every category, ordered by name.
    pub categories: Vec<CategoryJson>,
    /// Every item, oldest first.
    pub items: Vec<ItemJson>,
}

/// Response of `GET /json`; the shape depends on the query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(untagged)]
pub enum CatalogResponse {
    /// `?category=` was given.
    Category(CategoryItemsJson),
    /// `?item=` was given; possibly empty.
    Items(Vec<ItemJson>),
    /// No filter.
    Catalog(CatalogJson),
}

fn items_json(items: &[Item]) -> Vec<ItemJson> {
    items.iter().map(ItemJson::from).collect()
}

/// Query the catalog.
#[utoipa::path(
    get,
    path = "/json",
    params(CatalogQuery),
    responses(
        (status = 200, description = "Catalog, category or item listing", body = CatalogResponse),
        (status = 404, description = "Unknown category", body = Error),
        (status = 503, description = "Database unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["catalog"],
    operation_id = "queryCatalog"
)]
#[get("/json")]
pub async fn query_catalog(
    state: web::Data<HttpState>,
    query: web::Query<CatalogQuery>,
) -> ApiResult<web::Json<CatalogResponse>> {
    let CatalogQuery { category, item } = query.into_inner();
    let response = match (category, item) {
        (Some(name), _) => {
            let (category, items) = state.catalog.items_in_category_named(&name).await?;
            CatalogResponse::Category(CategoryItemsJson {
                category_id: category.id.get(),
                category_name: category.name.to_string(),
                items: items_json(&items),
            })
        }
        (None, Some(name)) => CatalogResponse::Items(items_json(&state.catalog.items_named(&name).await?)),
        (None, None) => {
            let categories = state.catalog.categories().await?;
            let items = state.catalog.all_items().await?;
            CatalogResponse::Catalog(CatalogJson {
                categories: categories.iter().map(CategoryJson::from).collect(),
                items: items_json(&items),
            })
        }
    };
    Ok(web::Json(response))
}
