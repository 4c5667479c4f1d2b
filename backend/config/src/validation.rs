//! Config validation: checks with user-friendly error messages.

use crate::schema::{MedGuardConfig, ProviderKind};
use thiserror::Error;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A config validation error with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// A collection of validation errors found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

/// Validate the config and return a report of all errors and warnings.
pub fn validate(config: &MedGuardConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_provider(config, &mut report);
    validate_orchestrator(config, &mut report);
    validate_logging(config, &mut report);
    validate_presentation(config, &mut report);
    validate_server(config, &mut report);
    report
}

fn validate_provider(config: &MedGuardConfig, report: &mut ValidationReport) {
    if config.model().trim().is_empty() {
        report.error("provider.model", "Model id cannot be empty");
    }

    match config.provider_kind() {
        ProviderKind::OpenRouter if config.api_key().is_none() => {
            report.error(
                "provider.apiKey",
                "OpenRouter requires an API key; set provider.apiKey or OPENROUTER_API_KEY",
            );
        }
        ProviderKind::Mock => {
            report.warn("provider.kind", "Mock provider returns canned reports, not model output");
        }
        _ => {}
    }

    if let Some(url) = config.base_url() {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            report.error("provider.baseUrl", format!("'{url}' is not an http(s) URL"));
        }
    }

    if config.max_tokens() == 0 {
        report.error("provider.maxTokens", "maxTokens must be >= 1");
    }

    let temperature = config.temperature();
    if !(0.0..=2.0).contains(&temperature) {
        report.error(
            "provider.temperature",
            format!("temperature {temperature} is outside 0.0..=2.0"),
        );
    }
}

fn validate_orchestrator(config: &MedGuardConfig, report: &mut ValidationReport) {
    let delay = config.delay_ms();
    if delay > 30_000 {
        report.warn(
            "orchestrator.delayMs",
            format!("delayMs {delay} adds more than 30s to every request"),
        );
    }
}

fn validate_logging(config: &MedGuardConfig, report: &mut ValidationReport) {
    let level = config.log_level();
    if !LOG_LEVELS.contains(&level.to_ascii_lowercase().as_str()) {
        report.error(
            "logging.level",
            format!("Unknown log level '{level}'. Use one of {}", LOG_LEVELS.join(", ")),
        );
    }
}

fn validate_presentation(config: &MedGuardConfig, report: &mut ValidationReport) {
    let name = config.download_file_name();
    if name.trim().is_empty() {
        report.error("presentation.downloadFileName", "File name cannot be empty");
    } else if name.contains('/') || name.contains('\\') {
        report.error(
            "presentation.downloadFileName",
            "File name must not contain path separators; pass --output for another directory",
        );
    }
}

fn validate_server(config: &MedGuardConfig, report: &mut ValidationReport) {
    let Some(server) = &config.server else { return };
    if let Some(port) = server.port {
        if port < 1024 && port != 80 && port != 443 {
            report.warn(
                "server.port",
                format!("Port {port} requires elevated privileges; consider using a port >= 1024"),
            );
        }
    }
}
