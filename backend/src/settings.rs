//! Application settings loaded via OrthoConfig.
//!
//! Every field can be supplied as a `CATALOG_*` environment variable, a CLI
//! flag or a configuration file entry. Session cookie settings are read
//! separately; see [`crate::inbound::http::session_config`].

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

use crate::outbound::identity::{
    ClientSecrets, DEFAULT_SCOPES, GOOGLE_USERINFO_URL, GoogleOAuthConfig,
};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_CLIENT_SECRETS: &str = "client_secrets.json";

/// Errors raised while turning settings into adapter configuration.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// No database URL was configured.
    #[error("CATALOG_DATABASE_URL must be set")]
    MissingDatabaseUrl,
    /// A configured address does not parse.
    #[error("invalid bind address {value}: {source}")]
    BindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
    /// A configured URL does not parse.
    #[error("invalid {field} {value}: {source}")]
    Url {
        field: &'static str,
        value: String,
        #[source]
        source: url::ParseError,
    },
    /// Neither the settings nor the client secrets name a callback URL.
    #[error("no OAuth redirect URI configured and none registered in client secrets")]
    MissingRedirectUri,
}

/// Configuration values for the catalog server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "CATALOG")]
pub struct AppSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection string.
    pub database_url: Option<String>,
    /// Maximum pooled database connections.
    pub pool_max_size: Option<u32>,
    /// Apply embedded migrations before serving.
    #[ortho_config(default = true)]
    pub migrate: bool,
    /// Path of the provider `client_secrets.json`.
    pub client_secrets_path: Option<PathBuf>,
    /// OAuth callback URL; defaults to the first registered redirect URI.
    pub redirect_uri: Option<String>,
    /// Provider profile endpoint.
    pub userinfo_url: Option<String>,
    /// Space-separated OAuth scopes.
    pub scopes: Option<String>,
    /// Timeout in seconds for provider requests.
    #[ortho_config(default = 10)]
    pub http_timeout_secs: u64,
}

fn parse_url(field: &'static str, value: &str) -> Result<Url, SettingsError> {
    Url::parse(value).map_err(|source| SettingsError::Url {
        field,
        value: value.to_owned(),
        source,
    })
}

impl AppSettings {
    /// Address to bind, defaulting to all interfaces on port 8080.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value.parse().map_err(|source| SettingsError::BindAddr {
            value: value.to_owned(),
            source,
        })
    }

    /// Configured database URL.
    pub fn database_url(&self) -> Result<&str, SettingsError> {
        self.database_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or(SettingsError::MissingDatabaseUrl)
    }

    /// Location of the client secrets file.
    pub fn client_secrets_path(&self) -> PathBuf {
        self.client_secrets_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CLIENT_SECRETS))
    }

    /// Timeout applied to every provider request.
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    /// Requested scopes, defaulting to `profile email`.
    pub fn scopes(&self) -> Vec<String> {
        let configured: Vec<String> = self
            .scopes
            .as_deref()
            .unwrap_or_default()
            .split_whitespace()
            .map(str::to_owned)
            .collect();
        if configured.is_empty() {
            DEFAULT_SCOPES.iter().map(|scope| (*scope).to_owned()).collect()
        } else {
            configured
        }
    }

    /// Combine these settings with the client registration.
    pub fn oauth_config(&self, secrets: ClientSecrets) -> Result<GoogleOAuthConfig, SettingsError> {
        let redirect_uri = match self.redirect_uri.as_deref() {
            Some(value) => parse_url("redirect URI", value)?,
            None => secrets
                .redirect_uris
                .first()
                .cloned()
                .ok_or(SettingsError::MissingRedirectUri)?,
        };
        let userinfo_uri = parse_url(
            "userinfo URL",
            self.userinfo_url.as_deref().unwrap_or(GOOGLE_USERINFO_URL),
        )?;
        Ok(GoogleOAuthConfig {
            secrets,
            redirect_uri,
            userinfo_uri,
            scopes: self.scopes(),
        })
    }
}
