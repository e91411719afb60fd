//! Code review endpoint.
//!
//! The handler only translates between HTTP and the pipeline: it pulls the
//! client address and basic-auth credentials off the request and hands the
//! payload to [`ReviewService`](crate::review::ReviewService). Status codes
//! and response bodies for every failure live in the [`IntoResponse`] impl
//! below, so the pipeline itself never sees HTTP types.

use std::net::SocketAddr;

use axum::extract::rejection::JsonRejection;
use axum::extract::{ConnectInfo, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::{debug, error};

use crate::api::server::AppState;
use crate::auth;
use crate::error::CritiqError;
use crate::review::ReviewRequest;

/// POST /api/review — authenticated, rate-limited code review.
pub async fn review_code(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    payload: Result<Json<ReviewRequest>, JsonRejection>,
) -> Result<Response, CritiqError> {
    let credentials = match headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
    {
        Some(value) => auth::parse_basic_header(value)?,
        None => {
            return Err(CritiqError::Unauthorized(
                "missing Authorization header".to_string(),
            ))
        }
    };

    // A body axum cannot deserialize still gets the uniform error shape.
    let Json(request) = payload.map_err(|e| {
        CritiqError::Validation(format!("invalid request body: {}", e.body_text()))
    })?;

    let feedback = state
        .service
        .review_code(&request, addr.ip(), &credentials)
        .await?;
    Ok(Json(json!({ "feedback": feedback })).into_response())
}

impl IntoResponse for CritiqError {
    /// Map pipeline errors onto the wire.
    ///
    /// Client errors carry their display string in an `{"error": ...}` body.
    /// Everything else collapses to a generic 500; the detail goes to the log
    /// only, so upstream provider messages never leak to callers.
    fn into_response(self) -> Response {
        match &self {
            CritiqError::Validation(_) => {
                error_body(StatusCode::BAD_REQUEST, &self.to_string()).into_response()
            }
            CritiqError::Unauthorized(reason) => {
                debug!("Rejected credentials: {reason}");
                (
                    [(header::WWW_AUTHENTICATE, "Basic")],
                    error_body(StatusCode::UNAUTHORIZED, &self.to_string()),
                )
                    .into_response()
            }
            CritiqError::RateLimited => {
                error_body(StatusCode::TOO_MANY_REQUESTS, &self.to_string()).into_response()
            }
            other => {
                error!("Error processing code review: {other}");
                error_body(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
                    .into_response()
            }
        }
    }
}

fn error_body(status: StatusCode, message: &str) -> (StatusCode, Json<serde_json::Value>) {
    (status, Json(json!({ "error": message })))
}

// ============================================================================
// Tests
// ============================================================================
