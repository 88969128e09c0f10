//! Driven port for the OAuth2 identity provider.
//!
//! The domain owns the flow (state verification, user recording); adapters
//! own endpoints, credentials and wire formats.

use async_trait::async_trait;
use url::Url;

use crate::domain::{AccessToken, ProviderProfile, StateToken};

use super::define_port_error;

define_port_error! {
    /// Errors surfaced while talking to the identity provider.
    pub enum IdentityProviderError {
        /// Network transport failed before a response arrived.
        Transport { message: String } =>
            "identity provider transport failed: {message}",
        /// The provider answered with a non-success status.
        Rejected { status: u16, message: String } =>
            "identity provider rejected request ({status}): {message}",
        /// The response body could not be decoded.
        Decode { message: String } =>
            "identity provider response decode failed: {message}",
    }
}

/// Port for the authorization-code exchange.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Consent screen URL carrying `state` and the configured callback.
    fn authorization_url(&self, state: &StateToken) -> Url;

    /// Exchange an authorization code for a short-lived access token.
    async fn exchange_code(&self, code: &str) -> Result<AccessToken, IdentityProviderError>;

    /// Fetch the profile with `token`, consuming it.
    async fn fetch_profile(
        &self,
        token: AccessToken,
    ) -> Result<ProviderProfile, IdentityProviderError>;
}
