//! Identity provider adapters.

mod client_secrets;
mod google_oauth;

pub use client_secrets::{ClientSecrets, ClientSecretsError};
pub use google_oauth::{DEFAULT_SCOPES, GOOGLE_USERINFO_URL, GoogleOAuthConfig, GoogleOAuthProvider};
