//! Error types for critiq.
//!
//! Every layer below the HTTP boundary returns [`CritiqError`]; the mapping
//! to status codes and response bodies lives in `api::routes`.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, CritiqError>;

/// All failure modes a review request can produce.
#[derive(Error, Debug)]
pub enum CritiqError {
    /// The request payload failed structural validation. The message is safe
    /// to return to the client.
    #[error("{0}")]
    Validation(String),

    /// Presented credentials did not match the configured pair. The payload
    /// is the internal reason; the client only ever sees a fixed message.
    #[error("Invalid credentials")]
    Unauthorized(String),

    /// The client exceeded its per-address request quota.
    #[error("Rate limit exceeded. Please try again later.")]
    RateLimited,

    /// The model answered, but its output was not the expected JSON shape.
    #[error("Upstream format error: {0}")]
    UpstreamFormat(String),

    /// The model call itself failed: connect, TLS, timeout, or a non-2xx
    /// status from the provider API.
    #[error("Upstream transport error: {0}")]
    UpstreamTransport(String),

    /// Invalid or missing configuration. Only produced at startup.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl CritiqError {
    /// True for errors caused by the client (4xx). Their messages are
    /// surfaced in responses; everything else collapses to an opaque 500.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            CritiqError::Validation(_) | CritiqError::Unauthorized(_) | CritiqError::RateLimited
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized_display_never_leaks_reason() {
        let err = CritiqError::Unauthorized("password mismatch for user admin".into());
        assert_eq!(err.to_string(), "Invalid credentials");
    }

    #[test]
    fn test_rate_limited_display_matches_response_body() {
        let err = CritiqError::RateLimited;
        assert_eq!(err.to_string(), "Rate limit exceeded. Please try again later.");
    }

    #[test]
    fn test_validation_display_is_bare_message() {
        let err = CritiqError::Validation("code must not be empty".into());
        assert_eq!(err.to_string(), "code must not be empty");
    }

    #[test]
    fn test_client_error_classification() {
        assert!(CritiqError::Validation("x".into()).is_client_error());
        assert!(CritiqError::Unauthorized("x".into()).is_client_error());
        assert!(CritiqError::RateLimited.is_client_error());
        assert!(!CritiqError::UpstreamFormat("x".into()).is_client_error());
        assert!(!CritiqError::UpstreamTransport("x".into()).is_client_error());
        assert!(!CritiqError::Config("x".into()).is_client_error());
    }
}
