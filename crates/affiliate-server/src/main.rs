//! Affiliate Server: application entry point.

use affiliate_db::DbManager;
use affiliate_server::{AppState, ServerConfig, build_router};
use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("affiliate=info,tower_http=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .init();

    let config = ServerConfig::parse();

    let manager = DbManager::connect(&config.db_config())
        .await
        .context("connecting to SurrealDB")?;
    affiliate_db::run_migrations(manager.client())
        .await
        .context("running migrations")?;

    let app = build_router(AppState::new(
        manager.client().clone(),
        config.service_config(),
    ));

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("binding {}", config.bind))?;
    tracing::info!(addr = %config.bind, "Starting affiliate server");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving HTTP")?;

    tracing::info!("Affiliate server stopped.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
