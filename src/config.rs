//! Runtime configuration loaded from environment variables.
//!
//! `.env` loading happens in `main` via dotenvy before [`Config::from_env`]
//! runs, so a local env file and real environment variables behave the same.

use std::time::Duration;

use crate::error::{CritiqError, Result};

/// Username accepted when `AUTH_USERNAME` is unset.
pub const DEFAULT_AUTH_USERNAME: &str = "admin";

/// Password accepted when `AUTH_PASSWORD` is unset.
///
/// Startup logs a warning while this default is active.
pub const DEFAULT_AUTH_PASSWORD: &str = "password123";

/// Model requested when `CRITIQ_MODEL` is unset.
pub const DEFAULT_MODEL: &str = "claude-3-opus-20240229";

/// Completion budget for a single review.
pub const DEFAULT_MAX_TOKENS: u32 = 1500;

/// Upper bound on one model call, connect through full response.
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 60;

/// Requests admitted per client address within one window.
pub const DEFAULT_RATE_LIMIT_REQUESTS: usize = 10;

/// Sliding-window width for the rate limiter.
pub const DEFAULT_RATE_LIMIT_WINDOW_SECS: u64 = 60;

/// Review cache capacity in entries.
pub const DEFAULT_CACHE_CAPACITY: usize = 100;

const DEFAULT_BIND: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8000;

/// Everything the service needs to run, resolved once at startup.
#[derive(Clone)]
pub struct Config {
    /// Bind address for the HTTP server (`CRITIQ_BIND`).
    pub bind: String,
    /// Port for the HTTP server (`CRITIQ_PORT`).
    pub port: u16,
    /// Anthropic API key (`ANTHROPIC_API_KEY`, required).
    pub anthropic_api_key: String,
    /// Model identifier sent on every review call (`CRITIQ_MODEL`).
    pub model: String,
    /// Completion token budget per review (`CRITIQ_MAX_TOKENS`).
    pub max_tokens: u32,
    /// Timeout applied to each model call (`CRITIQ_UPSTREAM_TIMEOUT_SECS`).
    pub upstream_timeout: Duration,
    /// Expected basic-auth username (`AUTH_USERNAME`).
    pub auth_username: String,
    /// Expected basic-auth password (`AUTH_PASSWORD`).
    pub auth_password: String,
    /// Requests admitted per client per window (`CRITIQ_RATE_LIMIT_REQUESTS`).
    pub rate_limit_requests: usize,
    /// Rate-limit window width (`CRITIQ_RATE_LIMIT_WINDOW_SECS`).
    pub rate_limit_window: Duration,
    /// Review cache capacity in entries (`CRITIQ_CACHE_CAPACITY`).
    pub cache_capacity: usize,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("bind", &self.bind)
            .field("port", &self.port)
            .field("anthropic_api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("upstream_timeout", &self.upstream_timeout)
            .field("auth_username", &self.auth_username)
            .field("auth_password", &"[REDACTED]")
            .field("rate_limit_requests", &self.rate_limit_requests)
            .field("rate_limit_window", &self.rate_limit_window)
            .field("cache_capacity", &self.cache_capacity)
            .finish()
    }
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`CritiqError::Config`] when `ANTHROPIC_API_KEY` is missing or
    /// empty, or when a numeric variable fails to parse.
    pub fn from_env() -> Result<Self> {
        Self::from_source(|key| std::env::var(key).ok())
    }

    /// Core loader, parameterized over the variable source so tests can feed
    /// a plain map instead of mutating the process environment.
    fn from_source<F>(get: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let anthropic_api_key = get("ANTHROPIC_API_KEY")
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                CritiqError::Config("ANTHROPIC_API_KEY must be set in the environment".to_string())
            })?;

        Ok(Self {
            bind: get("CRITIQ_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string()),
            port: parse_var(&get, "CRITIQ_PORT", DEFAULT_PORT)?,
            anthropic_api_key,
            model: get("CRITIQ_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            max_tokens: parse_var(&get, "CRITIQ_MAX_TOKENS", DEFAULT_MAX_TOKENS)?,
            upstream_timeout: Duration::from_secs(parse_var(
                &get,
                "CRITIQ_UPSTREAM_TIMEOUT_SECS",
                DEFAULT_UPSTREAM_TIMEOUT_SECS,
            )?),
            auth_username: get("AUTH_USERNAME")
                .unwrap_or_else(|| DEFAULT_AUTH_USERNAME.to_string()),
            auth_password: get("AUTH_PASSWORD")
                .unwrap_or_else(|| DEFAULT_AUTH_PASSWORD.to_string()),
            rate_limit_requests: parse_var(
                &get,
                "CRITIQ_RATE_LIMIT_REQUESTS",
                DEFAULT_RATE_LIMIT_REQUESTS,
            )?,
            rate_limit_window: Duration::from_secs(parse_var(
                &get,
                "CRITIQ_RATE_LIMIT_WINDOW_SECS",
                DEFAULT_RATE_LIMIT_WINDOW_SECS,
            )?),
            cache_capacity: parse_var(&get, "CRITIQ_CACHE_CAPACITY", DEFAULT_CACHE_CAPACITY)?,
        })
    }

    /// True while the built-in default password is still in effect.
    pub fn uses_default_password(&self) -> bool {
        self.auth_password == DEFAULT_AUTH_PASSWORD
    }
}

/// Read `name` from the source and parse it, falling back to `default` when
/// the variable is unset.
fn parse_var<T, F>(get: &F, name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match get(name) {
        None => Ok(default),
        Some(raw) => raw
            .parse()
            .map_err(|e| CritiqError::Config(format!("{name}: {e}"))),
    }
}
