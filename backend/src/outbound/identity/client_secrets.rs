//! Provider client credentials in the Google `client_secrets.json` layout.
//!
//! ```json
//! {"web": {"client_id": "...", "client_secret": "...",
//!          "auth_uri": "https://accounts.google.com/o/oauth2/auth",
//!          "token_uri": "https://oauth2.googleapis.com/token",
//!          "redirect_uris": ["http://localhost:8000/login"]}}
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use url::Url;
use zeroize::Zeroizing;

/// Errors raised while loading client credentials.
#[derive(Debug, thiserror::Error)]
pub enum ClientSecretsError {
    /// The file could not be read.
    #[error("failed to read client secrets at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid client secrets JSON.
    #[error("invalid client secrets: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Deserialize)]
struct ClientSecretsFile {
    web: WebClientDto,
}

#[derive(Deserialize)]
struct WebClientDto {
    client_id: String,
    client_secret: String,
    auth_uri: Url,
    token_uri: Url,
    #[serde(default)]
    redirect_uris: Vec<Url>,
}

/// OAuth2 web client registration.
#[derive(Clone)]
pub struct ClientSecrets {
    /// Public client identifier.
    pub client_id: String,
    /// Confidential client secret; wiped from memory on drop.
    pub client_secret: Zeroizing<String>,
    /// Authorization (consent screen) endpoint.
    pub auth_uri: Url,
    /// Token exchange endpoint.
    pub token_uri: Url,
    /// Registered callback URLs.
    pub redirect_uris: Vec<Url>,
}

impl ClientSecrets {
    /// Parse credentials from JSON text.
    ///
    /// # Examples
    /// ```
    /// use catalog::outbound::identity::ClientSecrets;
    ///
    /// let secrets = ClientSecrets::from_json(r#"{"web": {
    ///     "client_id": "abc.apps.googleusercontent.com",
    ///     "client_secret": "s3cret",
    ///     "auth_uri": "https://accounts.google.com/o/oauth2/auth",
    ///     "token_uri": "https://oauth2.googleapis.com/token"
    /// }}"#).expect("valid secrets");
    /// assert_eq!(secrets.client_id, "abc.apps.googleusercontent.com");
    /// assert!(secrets.redirect_uris.is_empty());
    /// ```
    pub fn from_json(raw: &str) -> Result<Self, ClientSecretsError> {
        let ClientSecretsFile { web } = serde_json::from_str(raw)?;
        Ok(Self {
            client_id: web.client_id,
            client_secret: Zeroizing::new(web.client_secret),
            auth_uri: web.auth_uri,
            token_uri: web.token_uri,
            redirect_uris: web.redirect_uris,
        })
    }

    /// Read and parse credentials from `path`.
    pub fn from_path(path: &Path) -> Result<Self, ClientSecretsError> {
        let raw = Zeroizing::new(std::fs::read_to_string(path).map_err(|source| {
            ClientSecretsError::Read {
                path: path.to_path_buf(),
                source,
            }
        })?);
        Self::from_json(&raw)
    }
}

impl fmt::Debug for ClientSecrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientSecrets")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("auth_uri", &self.auth_uri.as_str())
            .field("token_uri", &self.token_uri.as_str())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use rstest::rstest;

    use super::*;

    const SAMPLE: &str = r#"{"web": {
        "client_id": "id-123",
        "client_secret": "hunter2",
        "auth_uri": "https://accounts.example.com/auth",
        "token_uri": "https://accounts.example.com/token",
        "redirect_uris": ["http://localhost:8000/login"],
        "project_id": "ignored"
    }}"#;

    #[rstest]
    fn reads_secrets_from_disk() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(SAMPLE.as_bytes()).expect("write secrets");

        let secrets = ClientSecrets::from_path(file.path()).expect("secrets load");
        assert_eq!(secrets.client_secret.as_str(), "hunter2");
        assert_eq!(secrets.redirect_uris.len(), 1);
    }

    #[rstest]
    fn debug_output_hides_the_secret() {
        let secrets = ClientSecrets::from_json(SAMPLE).expect("secrets parse");
        let rendered = format!("{secrets:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("id-123"));
    }

    #[rstest]
    #[case(r#"{"installed": {}}"#)]
    #[case(r#"{"web": {"client_id": "x"}}"#)]
    #[case("not json")]
    fn malformed_secrets_are_rejected(#[case] raw: &str) {
        assert!(matches!(
            ClientSecrets::from_json(raw),
            Err(ClientSecretsError::Parse(_))
        ));
    }

    #[rstest]
    fn missing_file_reports_path() {
        let err = ClientSecrets::from_path(Path::new("/nonexistent/client_secrets.json"))
            .expect_err("missing file");
        assert!(err.to_string().contains("/nonexistent/client_secrets.json"));
    }
}
