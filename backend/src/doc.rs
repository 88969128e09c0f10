//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers the JSON read API, the health checks and the shared
//! error payload. The HTML pages and the login redirects are not documented.
//!
//! The generated document is served by Swagger UI in debug builds and printed
//! by `cargo run --bin openapi-dump` for external tooling.

use utoipa::OpenApi;

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::json_api::{
    CatalogJson, CatalogResponse, CategoryItemsJson, CategoryJson, ItemJson,
};

/// OpenAPI document for the JSON API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Item catalog API",
        description = "Read-only catalog queries and health checks."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::json_api::query_catalog,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        CatalogResponse,
        CatalogJson,
        CategoryItemsJson,
        CategoryJson,
        ItemJson,
        Error,
        ErrorCode
    )),
    tags(
        (name = "catalog", description = "Catalog queries"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[test]
    fn item_schema_exposes_wire_fields() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let item = schemas.get("ItemJson").expect("ItemJson schema");
        for field in ["id", "name", "category_id", "description"] {
            assert_object_schema_has_field(item, field);
        }
    }

    #[test]
    fn json_fields_carry_descriptions() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        for name in ["ItemJson", "CategoryJson"] {
            let Some(RefOr::T(Schema::Object(obj))) = schemas.get(name) else {
                panic!("expected Object schema for {name}");
            };
            for (field, property) in &obj.properties {
                let description = match property {
                    RefOr::T(Schema::Object(prop)) => prop.description.as_deref(),
                    _ => None,
                };
                assert!(
                    description.is_some_and(|text| !text.is_empty()),
                    "{name}.{field} should be documented"
                );
            }
        }
    }

    #[test]
    fn documents_json_and_health_paths() {
        let doc = ApiDoc::openapi();
        for path in ["/json", "/health/ready", "/health/live"] {
            assert!(doc.paths.paths.contains_key(path), "missing path {path}");
        }
    }
}
