//! Health endpoint for the review API.

use axum::Json;
use serde_json::{json, Value};

/// GET /health — liveness probe, no auth and no rate limit.
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
