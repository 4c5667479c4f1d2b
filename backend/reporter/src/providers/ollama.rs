use std::time::Instant;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use medguard_core::{LlmProvider, LlmRequest, LlmResponse, VerifyError};

use super::read_json;

const PROVIDER: &str = "ollama";

/// Ollama local LLM provider.
pub struct OllamaProvider {
    client: Client,
    base_url: String,
}

impl OllamaProvider {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_url: "http://localhost:11434".to_string(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

impl Default for OllamaProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct OllamaChatRequest {
    model: String,
    messages: Vec<OllamaChatMessage>,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<Value>,
    options: OllamaOptions,
}

#[derive(Serialize)]
struct OllamaOptions {
    temperature: f32,
    num_predict: u32,
}

#[derive(Serialize, Deserialize)]
struct OllamaChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct OllamaChatResponse {
    message: Option<OllamaChatMessage>,
    eval_count: Option<u64>,
    prompt_eval_count: Option<u64>,
}

fn chat_request(request: &LlmRequest) -> OllamaChatRequest {
    let mut messages = Vec::new();
    if !request.system_prompt.is_empty() {
        messages.push(OllamaChatMessage {
            role: "system".to_string(),
            content: request.system_prompt.clone(),
        });
    }
    messages.push(OllamaChatMessage {
        role: "user".to_string(),
        content: request.user_prompt.clone(),
    });

    // Strip any provider prefix like "openai/"
    let model = request
        .model
        .rsplit('/')
        .next()
        .unwrap_or(&request.model)
        .to_string();

    OllamaChatRequest {
        model,
        messages,
        stream: false,
        format: request.output_schema.as_ref().map(|s| s.to_json_schema()),
        options: OllamaOptions {
            temperature: request.temperature,
            num_predict: request.max_tokens,
        },
    }
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse, VerifyError> {
        let start = Instant::now();
        let body = chat_request(request);
        let model = body.model.clone();

        debug!(model = %model, structured = body.format.is_some(), "Sending request to Ollama");

        let response = self
            .client
            .post(format!("{}/api/chat", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| VerifyError::transport(PROVIDER, format!("HTTP request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(VerifyError::transport(
                PROVIDER,
                format!("returned {status}: {error_body}"),
            ));
        }

        let chat_response: OllamaChatResponse = read_json(PROVIDER, response).await?;

        let content = chat_response
            .message
            .map(|m| m.content)
            .ok_or_else(|| VerifyError::Generation("Ollama returned no message".into()))?;

        let tokens_used = chat_response.eval_count.unwrap_or(0)
            + chat_response.prompt_eval_count.unwrap_or(0);

        let latency_ms = start.elapsed().as_millis() as u64;

        Ok(LlmResponse {
            content,
            provider: PROVIDER.to_string(),
            model,
            tokens_used,
            latency_ms,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::test_server::serve_once;
    use medguard_core::OutputSchema;

    fn request() -> LlmRequest {
        LlmRequest {
            model: "llama3.1".into(),
            system_prompt: String::new(),
            user_prompt: "Evidence".into(),
            max_tokens: 512,
            temperature: 0.1,
            output_schema: None,
        }
    }

    #[tokio::test]
    async fn reads_message_and_token_counts() {
        let url = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 84\r\n\r\n\
             {\"message\":{\"role\":\"assistant\",\"content\":\"{}\"},\"eval_count\":5,\"prompt_eval_count\":7}",
        )
        .await;
        let provider = OllamaProvider::new().with_base_url(url);
        let response = provider.complete(&request()).await.unwrap();
        assert_eq!(response.content, "{}");
        assert_eq!(response.tokens_used, 12);
    }

    #[tokio::test]
    async fn truncated_body_is_transport_error() {
        let url = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 200\r\n\r\n{\"mess",
        )
        .await;
        let provider = OllamaProvider::new().with_base_url(url);
        let err = provider.complete(&request()).await.unwrap_err();
        assert!(matches!(err, VerifyError::Transport { .. }), "got {err:?}");
    }

    #[test]
    fn body_uses_schema_as_format_and_strips_prefix() {
        let request = LlmRequest {
            model: "ollama/llama3.1".into(),
            system_prompt: "Be precise.".into(),
            user_prompt: "Evidence".into(),
            max_tokens: 512,
            temperature: 0.1,
            output_schema: Some(OutputSchema::single_string("r", "report", "d")),
        };
        let body = serde_json::to_value(chat_request(&request)).unwrap();

        assert_eq!(body["model"], "llama3.1");
        assert_eq!(body["stream"], false);
        assert_eq!(body["format"]["properties"]["report"]["type"], "string");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["options"]["num_predict"], 512);
    }
}
