//! Code review orchestration.
//!
//! [`ReviewService`] owns the full request pipeline: credential check, rate
//! limit, input validation, cache lookup, model call, response parsing, and
//! cache fill. HTTP concerns stay in the API layer; everything here works on
//! plain types so the pipeline is testable without a server.

pub mod feedback;
pub mod prompt;

use std::net::IpAddr;
use std::time::Instant;

use serde::Deserialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::auth::{AccessGuard, Credentials};
use crate::cache::ReviewCache;
use crate::error::{CritiqError, Result};
use crate::providers::LlmProvider;
use crate::ratelimit::RateLimiter;

pub use feedback::ReviewFeedback;
pub use prompt::build_review_prompt;

/// Minimum accepted code length, in characters.
pub const MIN_CODE_CHARS: usize = 1;
/// Maximum accepted code length, in characters.
pub const MAX_CODE_CHARS: usize = 10_000;
/// Languages the review prompt knows how to frame.
pub const SUPPORTED_LANGUAGES: &[&str] = &["python", "javascript"];

/// One code review submission.
#[derive(Debug, Clone, Deserialize)]
pub struct ReviewRequest {
    /// Source code to review.
    pub code: String,
    /// Language of the submitted code, lowercase.
    pub language: String,
}

/// The review pipeline behind `POST /api/review`.
pub struct ReviewService {
    guard: AccessGuard,
    limiter: RateLimiter,
    cache: ReviewCache,
    provider: Box<dyn LlmProvider>,
}

impl ReviewService {
    pub fn new(
        guard: AccessGuard,
        limiter: RateLimiter,
        cache: ReviewCache,
        provider: Box<dyn LlmProvider>,
    ) -> Self {
        Self {
            guard,
            limiter,
            cache,
            provider,
        }
    }

    /// Run one submission through the full pipeline.
    ///
    /// Credentials are checked before the rate limit so an attacker guessing
    /// passwords cannot burn a victim's quota, and a rejected request never
    /// counts against it.
    ///
    /// # Errors
    ///
    /// * [`CritiqError::Unauthorized`] when credentials do not match.
    /// * [`CritiqError::RateLimited`] when the client is over quota.
    /// * [`CritiqError::Validation`] for out-of-range code or an unsupported
    ///   language.
    /// * [`CritiqError::UpstreamTransport`] / [`CritiqError::UpstreamFormat`]
    ///   when the model call fails or returns unparseable output.
    pub async fn review_code(
        &self,
        request: &ReviewRequest,
        client: IpAddr,
        credentials: &Credentials,
    ) -> Result<ReviewFeedback> {
        self.guard.verify(credentials)?;
        self.limiter.try_acquire(client)?;
        validate(request)?;

        let request_id = Uuid::new_v4();
        info!(
            %request_id,
            language = %request.language,
            "Received code review request"
        );
        let started = Instant::now();

        let key = ReviewCache::cache_key(&request.language, &request.code);
        if let Some(hit) = self.cache.get(&key) {
            info!(%request_id, "Returning cached review");
            return Ok(hit);
        }
        debug!(
            %request_id,
            language = %request.language,
            "Cache miss for code review"
        );

        let prompt = build_review_prompt(&request.language, &request.code);
        debug!(
            %request_id,
            provider = self.provider.name(),
            "Requesting model completion"
        );
        let raw = self.provider.complete(&prompt).await?;

        // Unparseable output is not cached; a retry gets a fresh completion.
        let parsed = feedback::parse_feedback(&raw)?;
        self.cache.put(key, parsed.clone());

        info!(
            %request_id,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Code review completed"
        );
        Ok(parsed)
    }
}

/// Reject out-of-range code and unsupported languages.
fn validate(request: &ReviewRequest) -> Result<()> {
    let chars = request.code.chars().count();
    if !(MIN_CODE_CHARS..=MAX_CODE_CHARS).contains(&chars) {
        return Err(CritiqError::Validation(format!(
            "code must be between {MIN_CODE_CHARS} and {MAX_CODE_CHARS} characters"
        )));
    }

    if !SUPPORTED_LANGUAGES.contains(&request.language.as_str()) {
        return Err(CritiqError::Validation(format!(
            "language must be one of: {}",
            SUPPORTED_LANGUAGES.join(", ")
        )));
    }

    Ok(())
}
