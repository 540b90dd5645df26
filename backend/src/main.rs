//! Backend entry-point: loads settings, prepares storage and runs the server.

mod server;

use std::io;

use actix_web::web;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use jobboard::inbound::http::health::HealthState;
use jobboard::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use jobboard::outbound::security::{BuildMode, token_key_from_env};
use server::{ServerConfig, ServerSettings, create_server};

/// Apply migrations and open the pool for `database_url`.
async fn connect_database(database_url: &str) -> io::Result<DbPool> {
    let url = database_url.to_owned();
    let applied = tokio::task::spawn_blocking(move || run_pending_migrations(&url))
        .await
        .map_err(|err| io::Error::other(format!("migration task failed: {err}")))?
        .map_err(|err| io::Error::other(err.to_string()))?;
    info!(applied, "database migrations complete");

    DbPool::new(PoolConfig::new(database_url))
        .await
        .map_err(|err| io::Error::other(err.to_string()))
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load()
        .map_err(|err| io::Error::other(format!("failed to load settings: {err}")))?;
    let token_key = token_key_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .map_err(|err| io::Error::other(err.to_string()))?;
    let mut config = ServerConfig::from_settings(&settings, token_key)
        .map_err(|err| io::Error::other(err.to_string()))?;

    if let Some(database_url) = settings.database_url.as_deref() {
        config = config.with_db_pool(connect_database(database_url).await?);
    }

    let health_state = web::Data::new(HealthState::new(config.backend_name()));
    let server = create_server(health_state.clone(), config)?;
    let handle = server.handle();
    actix_web::rt::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown requested; draining");
            health_state.mark_draining();
            handle.stop(true).await;
        }
    });
    server.await
}
