//! Axum API server for the review service.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::review::ReviewService;

/// Shared state for all API handlers.
#[derive(Clone)]
pub struct AppState {
    /// The review pipeline. Auth, rate limiting, caching, and the model
    /// call all live behind this one handle.
    pub service: Arc<ReviewService>,
}

impl AppState {
    pub fn new(service: ReviewService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}

/// Build the axum router with all API routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/review", post(super::routes::review::review_code))
        .route("/health", get(super::routes::health::health_check))
        // Body size limit: 1 MiB.  Oversized payloads are rejected before
        // any credential or JSON work.
        .layer(DefaultBodyLimit::max(1024 * 1024))
        // CORS: wide open.  Credentialed mode stays off; a wildcard origin
        // cannot be combined with allow-credentials, and the Authorization
        // header set by callers does not need it.
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the API server and block until shutdown.
///
/// The router is served with per-connection peer addresses so the rate
/// limiter can key on the client IP.
pub async fn start_server(
    bind: &str,
    port: u16,
    state: AppState,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let app = build_router(state);
    let addr = format!("{bind}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Review API server listening on {addr}");
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;
    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Resolve when the process receives Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down"),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}

// ============================================================================
// Tests
// ============================================================================
