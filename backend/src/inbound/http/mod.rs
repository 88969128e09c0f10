//! HTTP inbound adapter exposing the catalog pages, the login flow and the
//! JSON read API.

pub mod auth;
pub mod categories;
pub mod error;
pub mod health;
pub mod items;
pub mod json_api;
pub mod pages;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;

pub use error::ApiResult;
