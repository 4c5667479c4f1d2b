//! Wiring from configuration to a ready [`RequestOrchestrator`].

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::info;

use medguard_config::{MedGuardConfig, ProviderKind};
use medguard_core::VerifyError;
use medguard_reporter::providers::mock::MockProvider;
use medguard_reporter::providers::ollama::OllamaProvider;
use medguard_reporter::providers::openrouter::OpenRouterProvider;
use medguard_reporter::providers::ProviderRegistry;
use medguard_reporter::{ReportService, ReportSettings, RequestOrchestrator};

/// Register every provider the config has enough information for.
pub fn build_registry(config: &MedGuardConfig) -> ProviderRegistry {
    let mut registry = ProviderRegistry::new();

    registry.register(
        ProviderKind::Mock.to_string(),
        Arc::new(MockProvider::new(ProviderKind::Mock.to_string())),
    );

    if let Some(api_key) = config.api_key() {
        let mut provider = OpenRouterProvider::new(api_key);
        if config.provider_kind() == ProviderKind::OpenRouter {
            if let Some(url) = config.base_url() {
                provider = provider.with_base_url(url);
            }
        }
        registry.register(ProviderKind::OpenRouter.to_string(), Arc::new(provider));
    }

    let mut ollama = OllamaProvider::new();
    if config.provider_kind() == ProviderKind::Ollama {
        if let Some(url) = config.base_url() {
            ollama = ollama.with_base_url(url);
        }
    }
    registry.register(ProviderKind::Ollama.to_string(), Arc::new(ollama));

    registry
}

pub fn build_orchestrator(config: &MedGuardConfig) -> Result<RequestOrchestrator> {
    let kind = config.provider_kind();
    let provider = build_registry(config).get(&kind.to_string()).ok_or_else(|| {
        VerifyError::Config(format!(
            "provider '{kind}' is not configured; is its API key set?"
        ))
    })?;

    let settings = ReportSettings {
        model: config.model().to_string(),
        max_tokens: config.max_tokens(),
        temperature: config.temperature(),
    };

    info!(
        provider = %kind,
        model = %settings.model,
        delay_ms = config.delay_ms(),
        "Report pipeline ready"
    );

    let service = ReportService::new(provider, settings);
    Ok(RequestOrchestrator::new(Arc::new(service))
        .with_delay(Duration::from_millis(config.delay_ms())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use medguard_config::schema::ProviderConfig;

    fn config(kind: ProviderKind, api_key: Option<&str>) -> MedGuardConfig {
        MedGuardConfig {
            provider: Some(ProviderConfig {
                kind: Some(kind),
                api_key: api_key.map(str::to_string),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn openrouter_registered_only_with_key() {
        let without = build_registry(&config(ProviderKind::OpenRouter, None));
        assert_eq!(without.list(), vec!["mock", "ollama"]);

        let with = build_registry(&config(ProviderKind::OpenRouter, Some("sk-or-x")));
        assert_eq!(with.list(), vec!["mock", "ollama", "openrouter"]);
    }

    #[test]
    fn missing_key_fails_to_build() {
        let Err(err) = build_orchestrator(&config(ProviderKind::OpenRouter, None)) else {
            panic!("openrouter without a key should not build");
        };
        assert!(err.to_string().contains("openrouter"));
    }

    #[test]
    fn builds_mock_pipeline() {
        let orchestrator = build_orchestrator(&config(ProviderKind::Mock, None)).unwrap();
        assert_eq!(orchestrator.service().provider_name(), "mock");
    }
}
