use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::json;

use medguard_core::{LlmProvider, LlmRequest, LlmResponse, VerifyError};

/// What a [`MockProvider`] does when called.
#[derive(Debug, Clone)]
enum Scripted {
    /// Echo a canned report in whatever shape the request's schema asks for.
    Default,
    /// Return this raw content unchanged.
    Content(String),
    /// Fail as if the backend were unreachable.
    Transport(String),
}

/// A mock LLM provider that returns canned responses and records its calls.
pub struct MockProvider {
    name: String,
    behavior: Scripted,
    calls: AtomicUsize,
    last_request: Mutex<Option<LlmRequest>>,
}

impl MockProvider {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            behavior: Scripted::Default,
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    pub fn with_response(mut self, response: impl Into<String>) -> Self {
        self.behavior = Scripted::Content(response.into());
        self
    }

    pub fn with_transport_error(mut self, message: impl Into<String>) -> Self {
        self.behavior = Scripted::Transport(message.into());
        self
    }

    /// Number of times `complete` has been invoked.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<LlmRequest> {
        self.last_request
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

const MOCK_REPORT: &str = "Mock verification report. No live model was consulted; \
                           review the evidence manually before relying on this result.";

#[async_trait]
impl LlmProvider for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(&self, req: &LlmRequest) -> Result<LlmResponse, VerifyError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_request.lock() {
            *last = Some(req.clone());
        }

        let content = match &self.behavior {
            Scripted::Default => match &req.output_schema {
                Some(schema) => json!({ schema.field(): MOCK_REPORT }).to_string(),
                None => MOCK_REPORT.to_string(),
            },
            Scripted::Content(content) => content.clone(),
            Scripted::Transport(message) => {
                return Err(VerifyError::transport(&self.name, message.clone()));
            }
        };

        Ok(LlmResponse {
            content,
            provider: self.name.clone(),
            model: "mock".to_string(),
            tokens_used: 0,
            latency_ms: 0,
        })
    }
}
