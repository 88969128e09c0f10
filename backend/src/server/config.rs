//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use actix_web::cookie::{Key, SameSite};
use catalog::inbound::http::session_config::SessionSettings;
use catalog::inbound::http::state::HttpState;

/// Everything needed to start the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) http_state: HttpState,
}

impl ServerConfig {
    /// Combine cookie settings, the listen address and the handler state.
    #[must_use]
    pub fn new(session: SessionSettings, bind_addr: SocketAddr, http_state: HttpState) -> Self {
        let SessionSettings {
            key,
            cookie_secure,
            same_site,
            ephemeral_key: _,
        } = session;
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            http_state,
        }
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
