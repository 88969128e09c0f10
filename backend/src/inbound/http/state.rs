//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain services and ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    CategoryRepository, IdentityProvider, ItemRepository, UserRepository, ViewRenderer,
};
use crate::domain::{AuthFlow, CatalogService};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub identity: Arc<dyn IdentityProvider>,
    pub users: Arc<dyn UserRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub items: Arc<dyn ItemRepository>,
    pub views: Arc<dyn ViewRenderer>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Login state machine.
    pub auth: AuthFlow,
    /// Catalog reads and mutations.
    pub catalog: CatalogService,
    /// HTML template renderer.
    pub views: Arc<dyn ViewRenderer>,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

impl HttpState {
    /// Wire the domain services over the given ports.
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            identity,
            users,
            categories,
            items,
            views,
        } = ports;
        Self {
            auth: AuthFlow::new(identity, users.clone()),
            catalog: CatalogService::new(users, categories, items),
            views,
        }
    }
}
