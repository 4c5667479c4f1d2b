//! `medguard-config`: runtime configuration for MedGuard.
//!
//! Provides:
//! - Typed config schema (provider, orchestrator, logging, presentation, server)
//! - YAML loading from the config directory
//! - `${ENV_VAR}` substitution and env fallbacks for credentials
//! - Default value application
//! - Validation with errors and warnings

pub mod defaults;
pub mod env;
pub mod io;
pub mod schema;
pub mod validation;

pub use defaults::{apply_all_defaults, apply_env_fallbacks};
pub use env::{collect_referenced_vars, resolve_env_vars_with, MissingEnvVarError};
pub use io::{config_dir, config_file_path, load_raw_config};
pub use schema::{MedGuardConfig, ProviderKind};
pub use validation::{validate, ConfigValidationError, ValidationReport};

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::Path;

/// Load, substitute env vars, apply env fallbacks and defaults, then validate.
///
/// Validation problems are logged, not returned; callers that must refuse an
/// invalid config run [`validate`] themselves.
pub async fn load_and_prepare(path: &Path) -> Result<MedGuardConfig> {
    load_and_prepare_with(path, &std::env::vars().collect()).await
}

/// Same as [`load_and_prepare`] with an explicit environment (useful for testing).
pub async fn load_and_prepare_with(
    path: &Path,
    env: &HashMap<String, String>,
) -> Result<MedGuardConfig> {
    let raw = load_raw_config(path).await?;

    let value = resolve_env_vars_with(&raw, env).context("Failed to resolve env vars in config")?;

    let config: MedGuardConfig = serde_json::from_value(value)
        .with_context(|| format!("Invalid config structure in {}", path.display()))?;

    let config = apply_env_fallbacks(config, env);
    let config = apply_all_defaults(config);

    let report = validate(&config);
    for warning in &report.warnings {
        tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
    }
    for error in &report.errors {
        tracing::error!(path = %error.path, message = %error.message, "Config error");
    }

    Ok(config)
}
