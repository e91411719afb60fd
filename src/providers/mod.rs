//! LLM provider abstraction.
//!
//! The review pipeline talks to the model through [`LlmProvider`] so the
//! HTTP client can be swapped for a scripted mock in tests.

pub mod anthropic;

pub use anthropic::AnthropicProvider;

use async_trait::async_trait;

use crate::error::Result;

/// A language-model backend that can complete a single prompt.
///
/// # Example
///
/// ```rust
/// # tokio_test::block_on(async {
/// use async_trait::async_trait;
/// use critiq::error::Result;
/// use critiq::providers::LlmProvider;
///
/// struct Echo;
///
/// #[async_trait]
/// impl LlmProvider for Echo {
///     fn name(&self) -> &str {
///         "echo"
///     }
///
///     async fn complete(&self, prompt: &str) -> Result<String> {
///         Ok(prompt.to_string())
///     }
/// }
///
/// let reply = Echo.complete("hi").await.unwrap();
/// assert_eq!(reply, "hi");
/// # });
/// ```
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Provider name for logs.
    fn name(&self) -> &str;

    /// Send `prompt` as a single user turn and return the model's raw text.
    ///
    /// The implementation owns model selection, token budget, and timeout;
    /// callers only see the finished text or a transport/format error.
    async fn complete(&self, prompt: &str) -> Result<String>;
}
