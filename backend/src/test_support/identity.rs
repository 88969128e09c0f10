//! Identity provider double answering one authorization code.

use async_trait::async_trait;
use url::Url;

use crate::domain::ports::{IdentityProvider, IdentityProviderError};
use crate::domain::{AccessToken, ProviderProfile, StateToken};

/// Consent screen the stub redirects to.
pub const STUB_AUTHORIZATION_URL: &str = "https://accounts.example.test/o/oauth2/auth";

/// Authorization code the stub accepts.
pub const STUB_CODE: &str = "stub-code";

/// Provider returning a fixed profile for [`STUB_CODE`].
#[derive(Debug, Clone)]
pub struct StubIdentityProvider {
    profile: ProviderProfile,
}

impl StubIdentityProvider {
    /// Stub that signs in as `name <email>`.
    pub fn new(name: &str, email: &str) -> Self {
        Self {
            profile: ProviderProfile {
                name: Some(name.to_owned()),
                email: email.to_owned(),
            },
        }
    }
}

impl Default for StubIdentityProvider {
    fn default() -> Self {
        Self::new("Ada Lovelace", "ada@example.com")
    }
}

#[async_trait]
impl IdentityProvider for StubIdentityProvider {
    fn authorization_url(&self, state: &StateToken) -> Url {
        let mut url = match Url::parse(STUB_AUTHORIZATION_URL) {
            Ok(url) => url,
            Err(error) => panic!("stub authorization URL must parse: {error}"),
        };
        url.query_pairs_mut().append_pair("state", state.as_ref());
        url
    }

    async fn exchange_code(&self, code: &str) -> Result<AccessToken, IdentityProviderError> {
        if code == STUB_CODE {
            Ok(AccessToken::new(format!("token-for-{code}")))
        } else {
            Err(IdentityProviderError::rejected(400_u16, "invalid_grant"))
        }
    }

    async fn fetch_profile(
        &self,
        token: AccessToken,
    ) -> Result<ProviderProfile, IdentityProviderError> {
        if token.secret().starts_with("token-for-") {
            Ok(self.profile.clone())
        } else {
            Err(IdentityProviderError::rejected(401_u16, "invalid token"))
        }
    }
}
