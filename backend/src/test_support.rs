//! Test utilities for the catalog crate.
//!
//! This module provides shared helpers for both unit tests (in `src/`) and
//! integration tests (in `tests/`). It is only compiled for tests or with the
//! `test-support` feature.

mod identity;
mod memory_store;

use std::sync::Arc;

pub use identity::{STUB_AUTHORIZATION_URL, STUB_CODE, StubIdentityProvider};
pub use memory_store::MemoryStore;

use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::outbound::views::MiniJinjaRenderer;

/// Build handler state over an in-memory store, the stub provider and the
/// real template environment.
///
/// # Panics
/// Panics when the embedded templates fail to parse.
pub fn http_state(store: Arc<MemoryStore>, provider: StubIdentityProvider) -> HttpState {
    let views = match MiniJinjaRenderer::new() {
        Ok(views) => views,
        Err(error) => panic!("embedded templates must parse: {error}"),
    };
    HttpState::new(HttpStatePorts {
        identity: Arc::new(provider),
        users: store.clone(),
        categories: store.clone(),
        items: store,
        views: Arc::new(views),
    })
}
