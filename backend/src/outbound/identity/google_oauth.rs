//! Reqwest-backed OAuth2 authorization-code adapter for Google.
//!
//! This adapter owns transport details only: consent URL construction, the
//! form-encoded token exchange, the bearer userinfo fetch and mapping of HTTP
//! failures into [`IdentityProviderError`]. No retries are attempted.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;
use url::Url;
use zeroize::Zeroizing;

use super::ClientSecrets;
use crate::domain::ports::{IdentityProvider, IdentityProviderError};
use crate::domain::{AccessToken, ProviderProfile, StateToken};

/// Google's v2 userinfo endpoint.
pub const GOOGLE_USERINFO_URL: &str = "https://www.googleapis.com/userinfo/v2/me";

/// Scopes needed for the `{name, email}` profile.
pub const DEFAULT_SCOPES: [&str; 2] = ["profile", "email"];

/// Endpoints and client identity for [`GoogleOAuthProvider`].
#[derive(Debug, Clone)]
pub struct GoogleOAuthConfig {
    /// Client registration.
    pub secrets: ClientSecrets,
    /// Callback URL the provider redirects to.
    pub redirect_uri: Url,
    /// Profile endpoint.
    pub userinfo_uri: Url,
    /// Requested scopes.
    pub scopes: Vec<String>,
}

/// OAuth2 provider adapter performing the code exchange over HTTPS.
pub struct GoogleOAuthProvider {
    client: Client,
    client_id: String,
    client_secret: Zeroizing<String>,
    auth_uri: Url,
    token_uri: Url,
    userinfo_uri: Url,
    redirect_uri: Url,
    scope: String,
}

#[derive(Deserialize)]
struct TokenResponseDto {
    access_token: String,
}

impl GoogleOAuthProvider {
    /// Build an adapter using a reqwest client with an explicit request
    /// timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(config: GoogleOAuthConfig, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        let GoogleOAuthConfig {
            secrets,
            redirect_uri,
            userinfo_uri,
            scopes,
        } = config;
        Ok(Self {
            client,
            client_id: secrets.client_id,
            client_secret: secrets.client_secret,
            auth_uri: secrets.auth_uri,
            token_uri: secrets.token_uri,
            userinfo_uri,
            redirect_uri,
            scope: scopes.join(" "),
        })
    }
}

#[async_trait]
impl IdentityProvider for GoogleOAuthProvider {
    fn authorization_url(&self, state: &StateToken) -> Url {
        let mut url = self.auth_uri.clone();
        url.query_pairs_mut()
            .append_pair("response_type", "code")
            .append_pair("client_id", &self.client_id)
            .append_pair("redirect_uri", self.redirect_uri.as_str())
            .append_pair("scope", &self.scope)
            .append_pair("state", state.as_ref());
        url
    }

    async fn exchange_code(&self, code: &str) -> Result<AccessToken, IdentityProviderError> {
        let form = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("redirect_uri", self.redirect_uri.as_str()),
        ];
        let response = self
            .client
            .post(self.token_uri.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .form(&form)
            .send()
            .await
            .map_err(map_transport_error)?;

        let body = read_success_body(response).await?;
        let token: TokenResponseDto = serde_json::from_slice(&body).map_err(|error| {
            IdentityProviderError::decode(format!("invalid token response: {error}"))
        })?;
        debug!("authorization code exchanged");
        Ok(AccessToken::new(token.access_token))
    }

    async fn fetch_profile(
        &self,
        token: AccessToken,
    ) -> Result<ProviderProfile, IdentityProviderError> {
        let response = self
            .client
            .get(self.userinfo_uri.clone())
            .bearer_auth(token.secret())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;
        drop(token);

        let body = read_success_body(response).await?;
        parse_profile(&body)
    }
}

async fn read_success_body(response: reqwest::Response) -> Result<Vec<u8>, IdentityProviderError> {
    let status = response.status();
    let body = response.bytes().await.map_err(map_transport_error)?;
    if !status.is_success() {
        return Err(map_status_error(status, &body));
    }
    Ok(body.to_vec())
}

fn parse_profile(body: &[u8]) -> Result<ProviderProfile, IdentityProviderError> {
    serde_json::from_slice(body).map_err(|error| {
        IdentityProviderError::decode(format!("invalid userinfo payload: {error}"))
    })
}

fn map_transport_error(error: reqwest::Error) -> IdentityProviderError {
    IdentityProviderError::transport(error.to_string())
}

fn map_status_error(status: StatusCode, body: &[u8]) -> IdentityProviderError {
    IdentityProviderError::rejected(status.as_u16(), body_preview(body))
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

#[cfg(test)]
mod tests {
    //! Coverage for consent URL construction, payload decoding and a full
    //! exchange against a local fake provider.

    use actix_web::{App, HttpResponse, HttpServer, web};
    use rstest::{fixture, rstest};

    use super::*;

    fn secrets(base: &str) -> ClientSecrets {
        ClientSecrets::from_json(&format!(
            r#"{{"web": {{
                "client_id": "client-1",
                "client_secret": "shh",
                "auth_uri": "{base}/auth",
                "token_uri": "{base}/token"
            }}}}"#
        ))
        .expect("valid secrets")
    }

    fn provider(base: &str) -> GoogleOAuthProvider {
        let config = GoogleOAuthConfig {
            secrets: secrets(base),
            redirect_uri: Url::parse("http://localhost:8000/login").expect("url"),
            userinfo_uri: Url::parse(&format!("{base}/userinfo")).expect("url"),
            scopes: DEFAULT_SCOPES.iter().map(|scope| (*scope).to_owned()).collect(),
        };
        GoogleOAuthProvider::new(config, Duration::from_secs(5)).expect("client builds")
    }

    #[fixture]
    fn offline_provider() -> GoogleOAuthProvider {
        provider("https://accounts.example.com")
    }

    #[rstest]
    fn authorization_url_carries_state_and_callback(offline_provider: GoogleOAuthProvider) {
        let state = StateToken::generate(&mut rand::rngs::OsRng);
        let url = offline_provider.authorization_url(&state);

        assert_eq!(url.path(), "/auth");
        let pairs: std::collections::HashMap<_, _> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs.get("state").map(String::as_str), Some(state.as_ref()));
        assert_eq!(
            pairs.get("redirect_uri").map(String::as_str),
            Some("http://localhost:8000/login")
        );
        assert_eq!(pairs.get("scope").map(String::as_str), Some("profile email"));
        assert_eq!(pairs.get("response_type").map(String::as_str), Some("code"));
        assert!(!url.as_str().contains("shh"));
    }

    #[rstest]
    fn profile_without_name_decodes() {
        let profile = parse_profile(br#"{"email": "ada@example.com", "id": "42"}"#)
            .expect("profile decodes");
        assert_eq!(profile.email, "ada@example.com");
        assert!(profile.name.is_none());
    }

    #[rstest]
    fn profile_without_email_is_a_decode_error() {
        let error = parse_profile(br#"{"name": "Ada"}"#).expect_err("email is required");
        assert!(matches!(error, IdentityProviderError::Decode { .. }));
    }

    #[rstest]
    fn status_errors_keep_a_compact_preview() {
        let error = map_status_error(StatusCode::BAD_REQUEST, b"{\n  \"error\": \"invalid_grant\"\n}");
        assert_eq!(
            error,
            IdentityProviderError::rejected(400_u16, r#"{ "error": "invalid_grant" }"#)
        );
    }

    async fn token(form: web::Form<std::collections::HashMap<String, String>>) -> HttpResponse {
        let valid = form.get("code").map(String::as_str) == Some("good-code")
            && form.get("client_secret").map(String::as_str) == Some("shh")
            && form.get("grant_type").map(String::as_str) == Some("authorization_code");
        if valid {
            HttpResponse::Ok().json(serde_json::json!({
                "access_token": "at-1",
                "token_type": "Bearer",
                "expires_in": 3599
            }))
        } else {
            HttpResponse::BadRequest().json(serde_json::json!({"error": "invalid_grant"}))
        }
    }

    async fn userinfo(req: actix_web::HttpRequest) -> HttpResponse {
        let authorised = req
            .headers()
            .get(actix_web::http::header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            == Some("Bearer at-1");
        if authorised {
            HttpResponse::Ok().json(serde_json::json!({
                "name": "Ada Lovelace",
                "email": "ada@example.com"
            }))
        } else {
            HttpResponse::Unauthorized().finish()
        }
    }

    #[actix_web::test]
    async fn exchanges_code_and_fetches_profile_from_provider() {
        let server = HttpServer::new(|| {
            App::new()
                .route("/token", web::post().to(token))
                .route("/userinfo", web::get().to(userinfo))
        })
        .workers(1)
        .bind(("127.0.0.1", 0))
        .expect("bind fake provider");
        let addr = server.addrs()[0];
        let server = server.run();
        let handle = server.handle();
        actix_web::rt::spawn(server);

        let provider = provider(&format!("http://{addr}"));
        let access = provider.exchange_code("good-code").await.expect("exchange");
        assert_eq!(access.secret(), "at-1");
        let profile = provider.fetch_profile(access).await.expect("profile");
        assert_eq!(profile.name.as_deref(), Some("Ada Lovelace"));

        let rejected = provider
            .exchange_code("stale-code")
            .await
            .expect_err("stale code rejected");
        assert!(matches!(rejected, IdentityProviderError::Rejected { status: 400, .. }));

        handle.stop(true).await;
    }
}
