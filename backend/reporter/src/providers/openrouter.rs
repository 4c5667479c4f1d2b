use std::time::Instant;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use medguard_core::{LlmProvider, LlmRequest, LlmResponse, VerifyError};

use super::read_json;

const PROVIDER: &str = "openrouter";

/// OpenRouter.ai LLM provider (OpenAI-compatible chat completions).
pub struct OpenRouterProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenRouterProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: "https://openrouter.ai/api/v1".to_string(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: Option<u32>,
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
    json_schema: JsonSchemaFormat,
}

#[derive(Serialize)]
struct JsonSchemaFormat {
    name: String,
    strict: bool,
    schema: Value,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct Usage {
    total_tokens: Option<u64>,
}

fn chat_request(request: &LlmRequest) -> ChatRequest {
    let mut messages = Vec::new();
    if !request.system_prompt.is_empty() {
        messages.push(ChatMessage {
            role: "system",
            content: request.system_prompt.clone(),
        });
    }
    messages.push(ChatMessage {
        role: "user",
        content: request.user_prompt.clone(),
    });

    let response_format = request.output_schema.as_ref().map(|schema| ResponseFormat {
        kind: "json_schema",
        json_schema: JsonSchemaFormat {
            name: schema.name().to_string(),
            strict: true,
            schema: schema.to_json_schema(),
        },
    });

    ChatRequest {
        model: request.model.clone(),
        messages,
        max_tokens: Some(request.max_tokens),
        temperature: Some(request.temperature),
        response_format,
    }
}

#[async_trait]
impl LlmProvider for OpenRouterProvider {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse, VerifyError> {
        let start = Instant::now();
        let body = chat_request(request);

        debug!(
            model = %request.model,
            structured = body.response_format.is_some(),
            "Sending request to OpenRouter"
        );

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
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

        let chat_response: ChatResponse = read_json(PROVIDER, response).await?;

        let content = chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| VerifyError::Generation("OpenRouter returned no choices".into()))?;

        let tokens_used = chat_response
            .usage
            .and_then(|u| u.total_tokens)
            .unwrap_or(0);

        let latency_ms = start.elapsed().as_millis() as u64;

        Ok(LlmResponse {
            content,
            provider: PROVIDER.to_string(),
            model: request.model.clone(),
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

    fn request(schema: Option<OutputSchema>) -> LlmRequest {
        LlmRequest {
            model: "google/gemini-2.0-flash-001".into(),
            system_prompt: String::new(),
            user_prompt: "Evidence goes here".into(),
            max_tokens: 2048,
            temperature: 0.2,
            output_schema: schema,
        }
    }

    #[test]
    fn body_carries_json_schema_response_format() {
        let schema = OutputSchema::single_string("verification_report", "report", "d");
        let body = serde_json::to_value(chat_request(&request(Some(schema)))).unwrap();

        assert_eq!(body["response_format"]["type"], "json_schema");
        assert_eq!(body["response_format"]["json_schema"]["name"], "verification_report");
        assert_eq!(body["response_format"]["json_schema"]["strict"], true);
        assert_eq!(
            body["response_format"]["json_schema"]["schema"]["required"][0],
            "report"
        );
    }

    #[test]
    fn body_skips_empty_system_prompt_and_format() {
        let body = serde_json::to_value(chat_request(&request(None))).unwrap();
        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0]["role"], "user");
        assert_eq!(messages[0]["content"], "Evidence goes here");
        assert!(body.get("response_format").is_none());
    }

    #[test]
    fn parses_null_content_as_missing() {
        let raw = r#"{"choices":[{"message":{"role":"assistant","content":null}}]}"#;
        let parsed: ChatResponse = serde_json::from_str(raw).unwrap();
        assert!(parsed.choices[0].message.content.is_none());
    }

    #[tokio::test]
    async fn truncated_body_is_transport_error() {
        let url = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 200\r\n\r\n{\"choi",
        )
        .await;
        let provider = OpenRouterProvider::new("sk-test").with_base_url(url);
        let err = provider.complete(&request(None)).await.unwrap_err();
        assert!(matches!(err, VerifyError::Transport { .. }), "got {err:?}");
    }

    #[tokio::test]
    async fn malformed_body_is_generation_error() {
        let url = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 8\r\n\r\nnot json",
        )
        .await;
        let provider = OpenRouterProvider::new("sk-test").with_base_url(url);
        let err = provider.complete(&request(None)).await.unwrap_err();
        assert!(matches!(err, VerifyError::Generation(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn reads_message_content() {
        let url = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 80\r\n\r\n\
             {\"choices\":[{\"message\":{\"content\":\"{}\"}}],\"usage\":{\"total_tokens\":42},\"id\":\"x1\"}",
        )
        .await;
        let provider = OpenRouterProvider::new("sk-test").with_base_url(url);
        let response = provider.complete(&request(None)).await.unwrap();
        assert_eq!(response.content, "{}");
        assert_eq!(response.tokens_used, 42);
    }

    #[tokio::test]
    async fn unreachable_backend_is_transport_error() {
        let provider = OpenRouterProvider::new("sk-test").with_base_url("http://127.0.0.1:9");
        let err = provider.complete(&request(None)).await.unwrap_err();
        assert!(matches!(err, VerifyError::Transport { .. }), "got {err:?}");
    }
}
