//! critiq server binary.

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::Parser;
use tracing::{info, warn};

use critiq::api::server::{start_server, AppState};
use critiq::auth::AccessGuard;
use critiq::cache::ReviewCache;
use critiq::config::Config;
use critiq::providers::AnthropicProvider;
use critiq::ratelimit::RateLimiter;
use critiq::review::ReviewService;

#[derive(Parser)]
#[command(name = "critiq", about = "LLM-backed code review API", version)]
struct Args {
    /// Bind address for the HTTP server (overrides CRITIQ_BIND)
    #[arg(long)]
    bind: Option<String>,

    /// Port for the HTTP server (overrides CRITIQ_PORT)
    #[arg(long)]
    port: Option<u16>,

    /// Load environment variables from this file instead of ./.env
    #[arg(long, value_name = "PATH")]
    env_file: Option<PathBuf>,

    /// Log filter (trace, debug, info, warn, error)
    #[arg(long, env = "CRITIQ_LOG")]
    log: Option<String>,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,
}

fn init_tracing(filter: &str, json: bool) {
    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .compact()
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Env files load before Config reads the environment. An explicit
    // --env-file must exist; the implicit ./.env may not.
    if let Some(path) = &args.env_file {
        dotenvy::from_path(path)
            .with_context(|| format!("failed to load env file {}", path.display()))?;
    } else {
        let _ = dotenvy::dotenv();
    }

    init_tracing(args.log.as_deref().unwrap_or("info"), args.log_json);

    let mut config = Config::from_env().context("invalid configuration")?;
    if let Some(bind) = args.bind {
        config.bind = bind;
    }
    if let Some(port) = args.port {
        config.port = port;
    }

    if config.uses_default_password() {
        warn!("AUTH_PASSWORD is not set; the built-in default is for local testing only");
    }

    let provider = AnthropicProvider::new(
        &config.anthropic_api_key,
        &config.model,
        config.max_tokens,
        config.upstream_timeout,
    )?;
    let service = ReviewService::new(
        AccessGuard::new(&config.auth_username, &config.auth_password),
        RateLimiter::new(config.rate_limit_requests, config.rate_limit_window),
        ReviewCache::new(config.cache_capacity),
        Box::new(provider),
    );

    info!(model = %config.model, "Starting review service");
    start_server(&config.bind, config.port, AppState::new(service))
        .await
        .map_err(|e| anyhow::anyhow!("Review API server error: {e}"))?;
    Ok(())
}
