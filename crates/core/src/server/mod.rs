//! HTTP batch quality analysis API.
//!
//! Serves the analysis endpoints and read-only batch views over a
//! [`StateManager`]. Every origin is allowed so browser dashboards on other
//! hosts can call it.

pub mod api;
pub mod error;

pub use api::{api_router, AppState, SharedState, API_TITLE};
pub use error::ApiError;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::state::StateManager;

/// Where and as whom the API is served.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub plant_name: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            plant_name: "AAC Plant".to_string(),
        }
    }
}

/// Build the full application router.
pub fn build_router(state: SharedState) -> Router {
    api_router()
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind the configured address and serve until Ctrl+C.
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server fails.
pub async fn serve(config: ServerConfig, manager: StateManager) -> Result<()> {
    let listener = bind(&config).await?;
    serve_on(listener, config.plant_name, manager, shutdown_signal()).await
}

/// Bind a listener for `config`. Port 0 picks a free port.
pub async fn bind(config: &ServerConfig) -> Result<tokio::net::TcpListener> {
    let addr = format!("{}:{}", config.host, config.port);
    tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))
}

/// Serve on an already bound listener until `shutdown` resolves.
pub async fn serve_on(
    listener: tokio::net::TcpListener,
    plant_name: String,
    manager: StateManager,
    shutdown: impl std::future::Future<Output = ()> + Send + 'static,
) -> Result<()> {
    let state = Arc::new(AppState {
        manager,
        plant_name,
    });
    let app = build_router(state);

    let local_addr: SocketAddr = listener.local_addr()?;
    tracing::info!(addr = %local_addr, "analysis API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .context("Server error")?;

    tracing::info!("analysis API shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}
