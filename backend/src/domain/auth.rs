//! Authentication flow: OAuth2 authorization-code login with anti-forgery
//! state verification.
//!
//! A visitor moves through three stages, all recorded in the client-held
//! session:
//!
//! - [`AuthStage::Anonymous`]: no identity and no pending state token.
//! - [`AuthStage::Pending`]: a [`StateToken`] was minted by
//!   [`AuthFlow::begin`] and the visitor was sent to the provider.
//! - [`AuthStage::Authenticated`]: [`AuthFlow::complete`] verified the echoed
//!   token, exchanged the code, fetched the profile and returned a
//!   [`SessionIdentity`].
//!
//! The provider access token is consumed by the profile fetch and never
//! stored.

use std::fmt;
use std::sync::Arc;

use rand::rngs::OsRng;
use rand::seq::SliceRandom;
use rand::{CryptoRng, Rng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use url::Url;
use zeroize::Zeroizing;

use super::ports::{IdentityProvider, IdentityProviderError, UserPersistenceError, UserRepository};
use super::{DisplayName, Email, Error, NewUser, UserValidationError};

/// Length of generated anti-forgery tokens.
pub const STATE_TOKEN_LEN: usize = 32;

const STATE_TOKEN_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Anti-forgery token round-tripped through the identity provider.
///
/// # Examples
/// ```
/// use catalog::domain::{StateToken, STATE_TOKEN_LEN};
///
/// let token = StateToken::generate(&mut rand::rngs::OsRng);
/// assert_eq!(token.as_ref().len(), STATE_TOKEN_LEN);
/// assert!(token.matches(token.as_ref()));
/// assert!(!token.matches("forged"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateToken(String);

impl StateToken {
    /// Draw a fresh token of [`STATE_TOKEN_LEN`] upper-case letters and digits.
    pub fn generate<R: Rng + CryptoRng + ?Sized>(rng: &mut R) -> Self {
        let token = (0..STATE_TOKEN_LEN)
            .filter_map(|_| STATE_TOKEN_ALPHABET.choose(&mut *rng))
            .map(|byte| char::from(*byte))
            .collect();
        Self(token)
    }

    /// Whether `received` is exactly this token.
    pub fn matches(&self, received: &str) -> bool {
        let expected = self.0.as_bytes();
        let received = received.as_bytes();
        expected.len() == received.len()
            && expected
                .iter()
                .zip(received)
                .fold(0_u8, |acc, (a, b)| acc | (a ^ b))
                == 0
    }
}

impl AsRef<str> for StateToken {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Short-lived provider credential. Consumed by the profile fetch.
pub struct AccessToken(Zeroizing<String>);

impl AccessToken {
    /// Wrap a token returned by the provider.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(Zeroizing::new(raw.into()))
    }

    /// Secret value for the `Authorization` header.
    pub fn secret(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

/// Profile fields returned by the provider's userinfo endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProviderProfile {
    /// Display name; providers may omit it.
    #[serde(default)]
    pub name: Option<String>,
    /// Verified email address.
    pub email: String,
}

/// Identity stored in the session once login completes.
///
/// Serialised under the `userinfo` session key as `{name, email}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionIdentity {
    /// Provider-reported name.
    pub name: DisplayName,
    /// Identity key.
    pub email: Email,
}

/// Authentication stage derived from the session contents.
///
/// An identity takes precedence over a leftover token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthStage {
    /// Nothing recorded.
    Anonymous,
    /// A state token awaits the provider callback.
    Pending(StateToken),
    /// An identity is present.
    Authenticated(SessionIdentity),
}

impl AuthStage {
    /// Classify a session from its optional fields.
    #[must_use]
    pub fn of(identity: Option<SessionIdentity>, state: Option<StateToken>) -> Self {
        match (identity, state) {
            (Some(identity), _) => Self::Authenticated(identity),
            (None, Some(token)) => Self::Pending(token),
            (None, None) => Self::Anonymous,
        }
    }

    /// Identity of a signed-in visitor.
    #[must_use]
    pub fn into_identity(self) -> Option<SessionIdentity> {
        match self {
            Self::Authenticated(identity) => Some(identity),
            Self::Pending(_) | Self::Anonymous => None,
        }
    }
}

/// Query parameters the provider sends back to the callback route.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LoginCallback {
    /// Echoed anti-forgery token.
    pub state: Option<String>,
    /// Authorization code to exchange.
    pub code: Option<String>,
}

/// Outcome of [`AuthFlow::begin`].
#[derive(Debug, Clone)]
pub struct PendingLogin {
    /// Token to store in the session.
    pub state: StateToken,
    /// Provider consent screen carrying the token.
    pub authorization_url: Url,
}

/// Failures of the authentication flow.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The callback `state` did not match the session token.
    #[error("Invalid state parameter.")]
    StateMismatch,
    /// The callback carried no authorization code.
    #[error("authorization code missing from callback")]
    MissingCode,
    /// The provider call failed.
    #[error(transparent)]
    Provider(#[from] IdentityProviderError),
    /// The profile could not be turned into a user identity.
    #[error("identity provider returned an unusable profile: {0}")]
    InvalidProfile(#[from] UserValidationError),
    /// Recording the user failed.
    #[error(transparent)]
    Persistence(#[from] UserPersistenceError),
}

impl From<AuthError> for Error {
    fn from(value: AuthError) -> Self {
        match value {
            AuthError::StateMismatch => Error::unauthorized("Invalid state parameter."),
            AuthError::MissingCode => Error::invalid_request("authorization code missing"),
            AuthError::Provider(err) => Error::internal(err.to_string()),
            AuthError::InvalidProfile(err) => Error::forbidden(err.to_string()),
            AuthError::Persistence(UserPersistenceError::Connection { message }) => {
                Error::service_unavailable(message)
            }
            AuthError::Persistence(err) => Error::internal(err.to_string()),
        }
    }
}

/// Drives the login state machine against an identity provider and the user
/// store.
#[derive(Clone)]
pub struct AuthFlow {
    provider: Arc<dyn IdentityProvider>,
    users: Arc<dyn UserRepository>,
}

impl AuthFlow {
    /// Create a flow over the given collaborators.
    pub fn new(provider: Arc<dyn IdentityProvider>, users: Arc<dyn UserRepository>) -> Self {
        Self { provider, users }
    }

    /// Anonymous → Pending: mint a state token and build the consent URL.
    pub fn begin(&self) -> PendingLogin {
        let state = StateToken::generate(&mut OsRng);
        let authorization_url = self.provider.authorization_url(&state);
        debug!(provider = %authorization_url.host_str().unwrap_or_default(), "login started");
        PendingLogin {
            state,
            authorization_url,
        }
    }

    /// Pending → Authenticated.
    ///
    /// Verifies the echoed token before any outbound call so a forged
    /// callback never reaches the provider or the user store.
    ///
    /// # Errors
    /// [`AuthError::StateMismatch`] when `expected` is absent or differs from
    /// the callback; other variants when the provider or store fail.
    pub async fn complete(
        &self,
        expected: Option<&StateToken>,
        callback: &LoginCallback,
    ) -> Result<SessionIdentity, AuthError> {
        let verified = match (expected, callback.state.as_deref()) {
            (Some(token), Some(received)) => token.matches(received),
            _ => false,
        };
        if !verified {
            warn!("login callback rejected: state mismatch");
            return Err(AuthError::StateMismatch);
        }

        let code = callback
            .code
            .as_deref()
            .filter(|code| !code.is_empty())
            .ok_or(AuthError::MissingCode)?;

        let token = self.provider.exchange_code(code).await?;
        let profile = self.provider.fetch_profile(token).await?;

        let email = Email::new(&profile.email)?;
        let name = DisplayName::new(profile.name.unwrap_or_default())?;
        let user = self
            .users
            .insert_or_get_existing(&NewUser {
                email: email.clone(),
                name: name.clone(),
            })
            .await?;
        info!(user_id = %user.id(), "login completed");

        Ok(SessionIdentity { name, email })
    }
}
