//! Domain primitives, services and ports.
//!
//! Purpose: define strongly typed catalog entities and the authentication
//! flow independent of HTTP and storage. Adapters reach persistence, the
//! identity provider and view rendering only through [`ports`].
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic error payload.
//! - User, Category, Item and their validated value types.
//! - AuthFlow: OAuth2 login with anti-forgery state verification.
//! - CatalogService: catalog reads and mutations with referential checks.

pub mod auth;
pub mod catalog_service;
pub mod category;
pub mod error;
pub mod item;
pub mod ports;
pub mod trace_id;
pub mod user;

pub use self::auth::{
    AccessToken, AuthError, AuthFlow, AuthStage, LoginCallback, PendingLogin, ProviderProfile,
    STATE_TOKEN_LEN, SessionIdentity, StateToken,
};
pub use self::catalog_service::{
    CatalogOverview, CatalogService, CategoryListing, ItemDetail, ItemWithCategory,
    LATEST_ITEMS_LIMIT,
};
pub use self::category::{
    CATEGORY_NAME_MAX, Category, CategoryId, CategoryName, CategoryValidationError, NewCategory,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::item::{
    ITEM_NAME_MAX, Item, ItemDraft, ItemId, ItemName, ItemValidationError, NewItem,
};
pub use self::trace_id::TraceId;
pub use self::user::{
    DISPLAY_NAME_MAX, DisplayName, EMAIL_MAX, Email, NewUser, User, UserId, UserValidationError,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use catalog::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
