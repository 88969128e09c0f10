//! Catalog server entry-point: loads settings, prepares the database and the
//! identity provider, then serves the pages, the JSON API and the health checks.

mod server;

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultEnv;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use catalog::inbound::http::health::HealthState;
use catalog::inbound::http::session_config::{BuildMode, session_settings_from_env};
use catalog::inbound::http::state::{HttpState, HttpStatePorts};
use catalog::outbound::identity::{ClientSecrets, GoogleOAuthProvider};
use catalog::outbound::persistence::{
    DbPool, DieselCategoryRepository, DieselItemRepository, DieselUserRepository, PoolConfig,
    run_pending_migrations,
};
use catalog::outbound::views::MiniJinjaRenderer;
use catalog::settings::AppSettings;
use ortho_config::OrthoConfig;
use server::{ServerConfig, create_server};

fn startup_error(context: &str, error: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::other(format!("{context}: {error}"))
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load_from_iter(std::env::args_os())
        .map_err(|e| startup_error("loading settings", e))?;
    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .map_err(|e| startup_error("session configuration", e))?;
    if session.ephemeral_key {
        warn!("session key is ephemeral; all sessions end when the process restarts");
    }

    let database_url = settings
        .database_url()
        .map_err(|e| startup_error("database", e))?;
    if settings.migrate {
        run_pending_migrations(database_url)
            .await
            .map_err(|e| startup_error("applying migrations", e))?;
    }
    let mut pool_config = PoolConfig::new(database_url);
    if let Some(max_size) = settings.pool_max_size {
        pool_config = pool_config.with_max_size(max_size);
    }
    let pool = DbPool::new(pool_config)
        .await
        .map_err(|e| startup_error("database pool", e))?;

    let secrets = ClientSecrets::from_path(&settings.client_secrets_path())
        .map_err(|e| startup_error("client secrets", e))?;
    let oauth = settings
        .oauth_config(secrets)
        .map_err(|e| startup_error("identity provider", e))?;
    let identity = GoogleOAuthProvider::new(oauth, settings.http_timeout())
        .map_err(|e| startup_error("identity provider client", e))?;
    let views = MiniJinjaRenderer::new().map_err(|e| startup_error("templates", e))?;

    let http_state = HttpState::new(HttpStatePorts {
        identity: Arc::new(identity),
        users: Arc::new(DieselUserRepository::new(pool.clone())),
        categories: Arc::new(DieselCategoryRepository::new(pool.clone())),
        items: Arc::new(DieselItemRepository::new(pool)),
        views: Arc::new(views),
    });

    let bind_addr = settings
        .bind_addr()
        .map_err(|e| startup_error("bind address", e))?;
    let config = ServerConfig::new(session, bind_addr, http_state);
    info!(address = %config.bind_addr(), "starting catalog server");

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config)?;
    let result = server.await;
    health_state.mark_unhealthy();
    result
}
