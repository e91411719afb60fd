//! Anthropic Messages API provider.
//!
//! Speaks the `/v1/messages` REST endpoint directly: API key in the
//! `x-api-key` header, pinned `anthropic-version`, single user turn per
//! request. The HTTP client carries a hard timeout so a stalled upstream
//! call surfaces as a transport error instead of hanging the request task.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

use crate::error::{CritiqError, Result};

use super::LlmProvider;

/// Anthropic REST API base.
const ANTHROPIC_API_BASE: &str = "https://api.anthropic.com/v1";

/// API version header required on every request.
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// API key wrapper whose Debug impl never prints the key material.
pub struct ApiKey(String);

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiKey([REDACTED])")
    }
}

/// Provider backed by the Anthropic Messages API.
pub struct AnthropicProvider {
    api_key: ApiKey,
    model: String,
    max_tokens: u32,
    client: Client,
}

impl std::fmt::Debug for AnthropicProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnthropicProvider")
            .field("api_key", &self.api_key)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

impl AnthropicProvider {
    /// Build a provider with its own HTTP client.
    ///
    /// `timeout` bounds each call from connect through the full response.
    ///
    /// # Errors
    ///
    /// Returns [`CritiqError::Config`] if the HTTP client cannot be built.
    pub fn new(api_key: &str, model: &str, max_tokens: u32, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CritiqError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            api_key: ApiKey(api_key.to_string()),
            model: model.to_string(),
            max_tokens,
            client,
        })
    }

    /// Build the full API URL for the messages endpoint.
    fn api_url(&self) -> String {
        format!("{}/messages", ANTHROPIC_API_BASE)
    }

    /// Build a messages request body for a single user turn.
    pub fn build_request_body(&self, prompt: &str) -> Value {
        json!({
            "model": self.model,
            "max_tokens": self.max_tokens,
            "messages": [{ "role": "user", "content": prompt }]
        })
    }

    /// Extract the response text from a Messages API response.
    ///
    /// Joins all `text` content blocks; non-text blocks are skipped. Returns
    /// `None` when the response carries no text at all.
    pub fn extract_text(response: &Value) -> Option<String> {
        let blocks = response["content"].as_array()?;

        let texts: Vec<&str> = blocks
            .iter()
            .filter(|b| b["type"].as_str() == Some("text"))
            .filter_map(|b| b["text"].as_str())
            .collect();

        if texts.is_empty() {
            None
        } else {
            Some(texts.join(""))
        }
    }
}

#[async_trait]
impl LlmProvider for AnthropicProvider {
    fn name(&self) -> &str {
        "anthropic"
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        let body = self.build_request_body(prompt);

        debug!(model = %self.model, "Anthropic messages request");

        let response = self
            .client
            .post(self.api_url())
            .header("x-api-key", self.api_key.0.as_str())
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| CritiqError::UpstreamTransport(format!("Anthropic request failed: {e}")))?;

        if response.status().is_success() {
            let json: Value = response.json().await.map_err(|e| {
                CritiqError::UpstreamTransport(format!("Failed to parse Anthropic response: {e}"))
            })?;

            return Self::extract_text(&json).ok_or_else(|| {
                CritiqError::UpstreamFormat(
                    "Anthropic response contained no text content".to_string(),
                )
            });
        }

        let status = response.status().as_u16();
        let error_text = response.text().await.unwrap_or_default();

        // Try to extract a useful message from the Anthropic error body.
        let body_msg = serde_json::from_str::<Value>(&error_text)
            .ok()
            .and_then(|v| {
                v["error"]["message"]
                    .as_str()
                    .map(|s| format!("Anthropic API error ({status}): {s}"))
            })
            .unwrap_or_else(|| format!("Anthropic API error ({status}): {error_text}"));

        Err(CritiqError::UpstreamTransport(body_msg))
    }
}
