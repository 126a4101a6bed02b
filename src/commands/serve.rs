//! Serve command - Starts the HTTP server.

use std::net::SocketAddr;
use std::sync::Arc;

use crate::api::{create_router, AppState};
use crate::cli::args::ServeArgs;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::infra::{Cache, Database, MemoryStore, MysqlTools, SessionStore};

/// Redis in production; outside production an unreachable Redis falls back
/// to in-process sessions.
async fn session_store(config: &Config) -> AppResult<Arc<dyn SessionStore>> {
    match Cache::connect(config).await {
        Ok(cache) => Ok(Arc::new(cache)),
        Err(e) if config.is_production() => Err(e.into()),
        Err(e) => {
            tracing::warn!(error = %e, "Redis unavailable, keeping sessions in memory");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

/// Execute the serve command
pub async fn execute(args: ServeArgs, mut config: Config) -> AppResult<()> {
    tracing::info!("Starting server...");

    if let Some(host) = args.host {
        config.server_host = host;
    }
    if let Some(port) = args.port {
        config.server_port = port;
    }

    let database = Database::connect(&config).await?;
    let sessions = session_store(&config).await?;
    let tool = Arc::new(MysqlTools::from_config(&config)?);

    tokio::fs::create_dir_all(&config.media_dir).await?;
    tokio::fs::create_dir_all(&config.checkpoint_dir).await?;

    let addr = config.server_addr();
    let app_state = AppState::from_config(database, sessions, config, tool);
    let app = create_router(app_state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind to {}: {}", addr, e)))?;

    tracing::info!("Server running on http://{}", addr);

    // Client addresses feed the login rate limiter
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Could not listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
