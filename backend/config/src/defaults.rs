//! Config defaults: fills unset fields after loading.

use std::collections::HashMap;

use crate::schema::{
    LoggingConfig, MedGuardConfig, OrchestratorConfig, PresentationConfig, ProviderConfig,
    ProviderKind,
};

pub const DEFAULT_PROVIDER_KIND: ProviderKind = ProviderKind::OpenRouter;

pub const DEFAULT_MODEL: &str = "google/gemini-2.0-flash-001";

pub const DEFAULT_MAX_TOKENS: u32 = 2048;

pub const DEFAULT_TEMPERATURE: f32 = 0.2;

/// Matches the scripted progress display, which runs for several seconds.
pub const DEFAULT_DELAY_MS: u64 = 2000;

pub const DEFAULT_LOG_LEVEL: &str = "info";

pub const DEFAULT_DOWNLOAD_FILE_NAME: &str = "MedGuard-Verification-Report.txt";

pub const DEFAULT_BIND: &str = "127.0.0.1";

pub const DEFAULT_PORT: u16 = 8080;

/// Apply all defaults to a freshly loaded config.
pub fn apply_all_defaults(config: MedGuardConfig) -> MedGuardConfig {
    let config = apply_provider_defaults(config);
    let config = apply_orchestrator_defaults(config);
    let config = apply_logging_defaults(config);
    apply_presentation_defaults(config)
}

fn apply_provider_defaults(mut config: MedGuardConfig) -> MedGuardConfig {
    let provider = config.provider.get_or_insert_with(ProviderConfig::default);
    provider.kind.get_or_insert(DEFAULT_PROVIDER_KIND);
    provider.model.get_or_insert_with(|| DEFAULT_MODEL.to_string());
    provider.max_tokens.get_or_insert(DEFAULT_MAX_TOKENS);
    provider.temperature.get_or_insert(DEFAULT_TEMPERATURE);
    config
}

fn apply_orchestrator_defaults(mut config: MedGuardConfig) -> MedGuardConfig {
    let orchestrator = config
        .orchestrator
        .get_or_insert_with(OrchestratorConfig::default);
    orchestrator.delay_ms.get_or_insert(DEFAULT_DELAY_MS);
    config
}

fn apply_logging_defaults(mut config: MedGuardConfig) -> MedGuardConfig {
    let logging = config.logging.get_or_insert_with(LoggingConfig::default);
    logging.level.get_or_insert_with(|| DEFAULT_LOG_LEVEL.to_string());
    config
}

fn apply_presentation_defaults(mut config: MedGuardConfig) -> MedGuardConfig {
    let presentation = config
        .presentation
        .get_or_insert_with(PresentationConfig::default);
    presentation
        .download_file_name
        .get_or_insert_with(|| DEFAULT_DOWNLOAD_FILE_NAME.to_string());
    presentation.show_progress.get_or_insert(true);
    config
}

/// Fill provider credentials and endpoints from well-known env vars when the
/// file leaves them unset. Values written in the file always win.
pub fn apply_env_fallbacks(
    mut config: MedGuardConfig,
    env: &HashMap<String, String>,
) -> MedGuardConfig {
    let lookup = |name: &str| env.get(name).filter(|v| !v.is_empty()).cloned();
    let provider = config.provider.get_or_insert_with(ProviderConfig::default);

    if provider.model.is_none() {
        provider.model = lookup("MEDGUARD_MODEL");
    }

    match provider.kind.unwrap_or(DEFAULT_PROVIDER_KIND) {
        ProviderKind::OpenRouter => {
            if provider.api_key.is_none() {
                provider.api_key = lookup("OPENROUTER_API_KEY");
            }
        }
        ProviderKind::Ollama => {
            if provider.base_url.is_none() {
                provider.base_url = lookup("OLLAMA_URL");
            }
        }
        ProviderKind::Mock => {}
    }

    config
}
