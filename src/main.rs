use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use bootcamp_api::config::AppConfig;
use bootcamp_api::database::{DatabaseManager, PgStore};
use bootcamp_api::services::LogMailer;
use bootcamp_api::{app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("bootcamp_api=info,tower_http=info")),
        )
        .init();

    let config = AppConfig::from_env().context("invalid configuration")?;
    tracing::info!("Starting Bootcamp API in {:?} mode", config.environment);

    let db = DatabaseManager::connect(&config.database)
        .await
        .context("failed to connect to database")?;
    db.health_check().await.context("database did not answer")?;
    db.ensure_schema().await.context("failed to apply schema")?;

    let store = Arc::new(PgStore::new(db.pool().clone()));
    let port = config.server.port;
    let state = AppState::new(config, store.clone(), store, Arc::new(LogMailer))
        .context("failed to initialise token issuer")?;

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Bootcamp API listening on http://{}", bind_addr);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    db.close().await;
    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        // Keep serving; without a signal handler the process is stopped externally
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
