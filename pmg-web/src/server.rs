//! Frontend server setup
//!
//! - Page routes
//! - Pageview tracking middleware
//! - Graceful shutdown on SIGTERM/Ctrl+C

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Request, State};
use axum::http::Method;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use pmg_core::config::{AnalyticsConfig, WebConfig};
use pmg_core::externalise_url;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::analytics::PageviewTracker;
use crate::client::ApiClient;
use crate::session::RequestInfo;
use crate::views;

/// Timeout for a single API request
const API_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Shared frontend state
#[derive(Debug, Clone)]
pub struct WebState {
    pub client: ApiClient,
    pub tracker: PageviewTracker,
    pub results_per_page: u32,
    /// Host serving uploaded files, without scheme
    pub static_host: String,
    pub debug: bool,
}

impl WebState {
    pub fn new(web: &WebConfig, analytics: &AnalyticsConfig) -> Result<Self, ServerError> {
        let http = reqwest::Client::builder().timeout(API_TIMEOUT).build()?;
        Ok(Self::with_client(http, web, analytics))
    }

    pub fn with_client(http: reqwest::Client, web: &WebConfig, analytics: &AnalyticsConfig) -> Self {
        let static_host = web
            .static_host
            .split_once("://")
            .map(|(_, rest)| rest)
            .unwrap_or(&web.static_host)
            .trim_end_matches('/')
            .to_string();

        Self {
            client: ApiClient::new(http.clone(), &web.api_host),
            tracker: PageviewTracker::new(http, analytics.google_analytics_id.clone()),
            results_per_page: web.results_per_page.max(1),
            static_host,
            debug: web.debug,
        }
    }

    /// Public URL of an uploaded file.
    pub fn static_url(&self, path: &str) -> String {
        externalise_url(path, &self.static_host, self.debug)
    }
}

/// Build the frontend router.
pub fn build_router(state: WebState) -> Router {
    let state = Arc::new(state);

    Router::new()
        .route("/", get(views::index))
        .route("/bills/", get(views::bills))
        .route("/bills/current/", get(views::current_bills))
        .route("/bill/{bill_id}/", get(views::bill))
        .route("/committees/", get(views::committees))
        .route("/committee/{committee_id}/", get(views::committee_detail))
        .route("/committee-meetings/", get(views::committee_meetings_first))
        .route("/committee-meetings/{page}/", get(views::committee_meetings))
        .route("/committee-meeting/{event_id}/", get(views::committee_meeting))
        .route("/members/", get(views::members_first))
        .route("/members/{page}/", get(views::members))
        .route("/member/{member_id}", get(views::member))
        .route("/hansard/{hansard_id}", get(views::hansard))
        .route("/briefing/{briefing_id}", get(views::briefing))
        .route("/question_reply/{reply_id}", get(views::question_reply))
        .route("/search/", get(views::search_first))
        .route("/search/{page}/", get(views::search))
        .route("/login", get(views::login_form).post(views::login))
        .layer(middleware::from_fn_with_state(state.clone(), track_pageview))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Record a pageview for every successful GET.
async fn track_pageview(State(state): State<Arc<WebState>>, request: Request, next: Next) -> Response {
    let is_get = request.method() == Method::GET;
    let info = RequestInfo::new(request.uri(), request.headers());

    let response = next.run(request).await;
    if is_get && response.status().is_success() {
        state.tracker.track(&info);
    }
    response
}

/// Run the frontend until Ctrl+C or SIGTERM.
pub async fn run_web(state: WebState, bind_addr: SocketAddr) -> Result<(), ServerError> {
    tracing::info!(api_host = %state.client.api_host(), "Frontend state ready");
    let app = build_router(state);

    let listener = TcpListener::bind(bind_addr).await?;
    tracing::info!("Frontend listening on {}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Frontend shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
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
        _ = ctrl_c => tracing::info!("Received Ctrl+C, starting graceful shutdown"),
        _ = terminate => tracing::info!("Received SIGTERM, starting graceful shutdown"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(static_host: &str, debug: bool) -> WebState {
        let web = WebConfig {
            static_host: static_host.to_string(),
            debug,
            ..WebConfig::default()
        };
        WebState::with_client(reqwest::Client::new(), &web, &AnalyticsConfig::default())
    }

    #[test]
    fn static_urls_use_static_host() {
        let s = state("https://static.pmg.org.za/", false);
        assert_eq!(s.static_host, "static.pmg.org.za");
        assert_eq!(
            s.static_url("/2015/report.pdf"),
            "https://static.pmg.org.za/2015/report.pdf"
        );
        assert_eq!(
            s.static_url("http://old.pmg.org.za/files/a.mp3"),
            "https://static.pmg.org.za/files/a.mp3"
        );
    }

    #[test]
    fn debug_static_urls_are_plain_http() {
        let s = state("localhost:8000", true);
        assert_eq!(s.static_url("docs/x.pdf"), "http://localhost:8000/docs/x.pdf");
    }

    #[test]
    fn results_per_page_is_positive() {
        let web = WebConfig {
            results_per_page: 0,
            ..WebConfig::default()
        };
        let s = WebState::with_client(reqwest::Client::new(), &web, &AnalyticsConfig::default());
        assert_eq!(s.results_per_page, 1);
    }
}
