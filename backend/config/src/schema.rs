//! MedGuard configuration schema.
//!
//! Every field is optional on disk; [`crate::defaults`] fills the gaps after
//! env substitution, so code downstream of `load_and_prepare` can rely on the
//! accessor methods returning concrete values.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedGuardConfig {
    /// Text-generation backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<ProviderConfig>,

    /// Request orchestration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orchestrator: Option<OrchestratorConfig>,

    /// Logging configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingConfig>,

    /// Terminal presentation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presentation: Option<PresentationConfig>,

    /// HTTP server for `medguard serve`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server: Option<ServerConfig>,
}

// ---------------------------------------------------------------------------
// Provider
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    OpenRouter,
    Ollama,
    Mock,
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::OpenRouter => write!(f, "openrouter"),
            ProviderKind::Ollama => write!(f, "ollama"),
            ProviderKind::Mock => write!(f, "mock"),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ProviderKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Overrides the provider's default endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrchestratorConfig {
    /// Pause before each report request, in milliseconds. 0 disables it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay_ms: Option<u64>,
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>, // "trace" | "debug" | "info" | "warn" | "error"
    /// Directory for rolling NDJSON logs; console only when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
}

// ---------------------------------------------------------------------------
// Presentation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresentationConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_progress: Option<bool>,
}

// ---------------------------------------------------------------------------
// Server
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

// ---------------------------------------------------------------------------
// Resolved accessors
// ---------------------------------------------------------------------------

impl MedGuardConfig {
    pub fn provider_kind(&self) -> ProviderKind {
        self.provider
            .as_ref()
            .and_then(|p| p.kind)
            .unwrap_or(crate::defaults::DEFAULT_PROVIDER_KIND)
    }

    pub fn model(&self) -> &str {
        self.provider
            .as_ref()
            .and_then(|p| p.model.as_deref())
            .unwrap_or(crate::defaults::DEFAULT_MODEL)
    }

    pub fn api_key(&self) -> Option<&str> {
        self.provider
            .as_ref()
            .and_then(|p| p.api_key.as_deref())
            .filter(|k| !k.is_empty())
    }

    pub fn base_url(&self) -> Option<&str> {
        self.provider.as_ref().and_then(|p| p.base_url.as_deref())
    }

    pub fn max_tokens(&self) -> u32 {
        self.provider
            .as_ref()
            .and_then(|p| p.max_tokens)
            .unwrap_or(crate::defaults::DEFAULT_MAX_TOKENS)
    }

    pub fn temperature(&self) -> f32 {
        self.provider
            .as_ref()
            .and_then(|p| p.temperature)
            .unwrap_or(crate::defaults::DEFAULT_TEMPERATURE)
    }

    pub fn delay_ms(&self) -> u64 {
        self.orchestrator
            .as_ref()
            .and_then(|o| o.delay_ms)
            .unwrap_or(crate::defaults::DEFAULT_DELAY_MS)
    }

    pub fn log_level(&self) -> &str {
        self.logging
            .as_ref()
            .and_then(|l| l.level.as_deref())
            .unwrap_or(crate::defaults::DEFAULT_LOG_LEVEL)
    }

    pub fn log_dir(&self) -> Option<&str> {
        self.logging.as_ref().and_then(|l| l.dir.as_deref())
    }

    pub fn download_file_name(&self) -> &str {
        self.presentation
            .as_ref()
            .and_then(|p| p.download_file_name.as_deref())
            .unwrap_or(crate::defaults::DEFAULT_DOWNLOAD_FILE_NAME)
    }

    pub fn show_progress(&self) -> bool {
        self.presentation
            .as_ref()
            .and_then(|p| p.show_progress)
            .unwrap_or(true)
    }

    pub fn bind_address(&self) -> &str {
        self.server
            .as_ref()
            .and_then(|s| s.bind.as_deref())
            .unwrap_or(crate::defaults::DEFAULT_BIND)
    }

    pub fn port(&self) -> u16 {
        self.server
            .as_ref()
            .and_then(|s| s.port)
            .unwrap_or(crate::defaults::DEFAULT_PORT)
    }
}
