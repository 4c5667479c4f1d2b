use async_trait::async_trait;

use crate::error::VerifyError;
use crate::schema::OutputSchema;

/// Text-generation backend used by the report service.
///
/// Implementations make exactly one remote call per `complete` and never retry.
/// Failures to reach the backend are [`VerifyError::Transport`]; a reply that
/// carries no content is [`VerifyError::Generation`].
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Provider name (e.g., "openrouter", "ollama").
    fn name(&self) -> &str;

    /// Send a completion request and return the raw response text.
    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse, VerifyError>;
}

/// Request to an LLM provider.
#[derive(Debug, Clone)]
pub struct LlmRequest {
    pub model: String,
    pub system_prompt: String,
    pub user_prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
    /// When set, the provider asks the backend for JSON matching this schema.
    pub output_schema: Option<OutputSchema>,
}

/// Response from an LLM provider.
#[derive(Debug, Clone)]
pub struct LlmResponse {
    pub content: String,
    pub provider: String,
    pub model: String,
    pub tokens_used: u64,
    pub latency_ms: u64,
}
