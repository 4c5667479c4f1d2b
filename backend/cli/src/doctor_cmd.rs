//! `medguard doctor`: configuration and credential checks.

use std::env;
use std::path::Path;

use anyhow::Result;

use medguard_config::{
    collect_referenced_vars, load_raw_config, validate, MedGuardConfig, ProviderKind,
};

use crate::runtime::build_registry;

const ENV_VARS: [(&str, &str); 3] = [
    ("OPENROUTER_API_KEY", "OpenRouter API key"),
    ("OLLAMA_URL", "Ollama base URL"),
    ("MEDGUARD_MODEL", "model override"),
];

/// Executes the full doctor diagnosis. Returns whether every required check passed.
pub async fn run(config: &MedGuardConfig, config_path: &Path) -> Result<bool> {
    println!("\nRunning MedGuard doctor...\n");

    check_config_file(config_path);
    check_referenced_vars(config_path).await?;
    let config_ok = check_validation(config);
    check_env_vars();
    let provider_ok = check_provider(config);

    println!();
    let healthy = config_ok && provider_ok;
    if healthy {
        println!("All checks passed. MedGuard is ready to verify.");
    } else {
        println!("Some checks failed. Fix the errors above.");
    }
    Ok(healthy)
}

fn check_config_file(path: &Path) {
    println!("Config file:");
    if path.exists() {
        println!("  [ok]   {}", path.display());
    } else {
        println!("  [info] {} not found, using defaults", path.display());
    }
}

/// Variables the config file pulls in through `${VAR}`.
async fn check_referenced_vars(config_path: &Path) -> Result<Vec<String>> {
    let raw = load_raw_config(config_path).await?;
    let vars = collect_referenced_vars(&raw);
    if vars.is_empty() {
        return Ok(vars);
    }
    println!("Config references:");
    for var in &vars {
        match env::var(var) {
            Ok(val) if !val.is_empty() => println!("  [ok]   ${{{var}}} is set"),
            _ => println!("  [fail] ${{{var}}} is not set"),
        }
    }
    Ok(vars)
}

fn check_validation(config: &MedGuardConfig) -> bool {
    println!("Config validation:");
    let report = validate(config);
    for error in &report.errors {
        println!("  [fail] {}: {}", error.path, error.message);
    }
    for warning in &report.warnings {
        println!("  [warn] {}: {}", warning.path, warning.message);
    }
    if report.errors.is_empty() && report.warnings.is_empty() {
        println!("  [ok]   no problems found");
    }
    report.is_valid()
}

fn check_env_vars() {
    println!("Environment variables:");
    for (var, purpose) in ENV_VARS {
        match env::var(var) {
            Ok(val) if !val.is_empty() => println!("  [ok]   {var} is set ({purpose})"),
            _ => println!("  [info] {var} is not set ({purpose}, optional)"),
        }
    }
}

fn check_provider(config: &MedGuardConfig) -> bool {
    println!("Providers:");
    let registry = build_registry(config);
    let kind = config.provider_kind();
    for name in registry.list() {
        let marker = if name == kind.to_string() { " (selected)" } else { "" };
        println!("  [ok]   {name}{marker}");
    }
    if kind == ProviderKind::Mock {
        println!("  [warn] mock provider returns canned reports only");
    }
    registry.get(&kind.to_string()).is_some()
}
