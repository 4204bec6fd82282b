//! Axum server setup
//!
//! - Frontend-origin CORS by default
//! - Tracing middleware
//! - Graceful shutdown on SIGTERM/Ctrl+C

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::HeaderValue;
use axum::Router;
use pmg_core::config::ApiConfig;
use pmg_core::ParliamentaryCalendar;
use sqlx::PgPool;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::routes;
use crate::reports::ReportRegistry;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to (default: 127.0.0.1:5001)
    pub bind_addr: SocketAddr,

    /// Allow any origin (default: false = the frontend's origins only)
    pub cors_permissive: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 5001)),
            cors_permissive: false,
        }
    }
}

impl From<&ApiConfig> for ServerConfig {
    fn from(api: &ApiConfig) -> Self {
        Self {
            bind_addr: api.bind,
            cors_permissive: api.cors_permissive,
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    /// Externally visible API root, used for `next` links
    pub public_url: String,
    pub results_per_page: u32,
    pub calendar: Arc<ParliamentaryCalendar>,
    pub reports: Arc<ReportRegistry>,
}

impl AppState {
    pub fn new(pool: PgPool, api: &ApiConfig, calendar: ParliamentaryCalendar) -> Self {
        Self {
            pool,
            public_url: api.public_url.trim_end_matches('/').to_string(),
            results_per_page: api.results_per_page,
            calendar: Arc::new(calendar),
            reports: Arc::new(ReportRegistry::standard()),
        }
    }
}

/// Build the API router with all routes, CORS and tracing.
pub fn build_router(state: AppState, cors_permissive: bool) -> Router {
    let cors = if cors_permissive {
        tracing::warn!("CORS: Permissive mode enabled - all origins allowed");
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
            .allow_origin([
                HeaderValue::from_static("http://localhost:5000"),
                HeaderValue::from_static("http://127.0.0.1:5000"),
                HeaderValue::from_static("http://pmg.test:5000"),
            ])
            .allow_methods(Any)
            .allow_headers(Any)
    };

    Router::new()
        .merge(routes::health::router())
        .merge(routes::committees::router())
        .merge(routes::meetings::router())
        .merge(routes::bills::router())
        .merge(routes::members::router())
        .merge(routes::proceedings::router())
        .merge(routes::questions::router())
        .merge(routes::search::router())
        .merge(routes::reports::router())
        .fallback(routes::not_found)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// Run the API server until Ctrl+C or SIGTERM.
///
/// ```ignore
/// let pool = create_pool(&config.database.url).await?;
/// let state = AppState::new(pool, &config.api, calendar);
/// run_server(state, ServerConfig::from(&config.api)).await?;
/// ```
pub async fn run_server(state: AppState, config: ServerConfig) -> Result<(), ServerError> {
    tracing::info!(
        reports = state.reports.len(),
        public_url = %state.public_url,
        "API state ready"
    );
    let app = build_router(state, config.cors_permissive);

    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("API listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("API shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting shutdown");
        }
    }
}

/// Server error type
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr.port(), 5001);
        assert!(!config.cors_permissive);
    }

    #[test]
    fn config_from_api_section() {
        let api = ApiConfig {
            cors_permissive: true,
            ..ApiConfig::default()
        };
        let config = ServerConfig::from(&api);
        assert_eq!(config.bind_addr, api.bind);
        assert!(config.cors_permissive);
    }
}
