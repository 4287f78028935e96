use thiserror::Error;

use crate::app_config::AppConfig;

/// Errors raised while loading configuration from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup — no `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let pim_api_url = require("PIM_API_URL")?;
    let pim_api_token = require("PIM_API_TOKEN")?;

    let log_level = or_default("VARIANTIZE_LOG_LEVEL", "info");
    let selection_path = PathBuf::from(or_default("VARIANTIZE_SELECTION_PATH", "./selection.yaml"));
    let request_timeout_secs = parse_u64("VARIANTIZE_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("VARIANTIZE_USER_AGENT", "variantize/0.1 (catalog-conversion)");
    let max_concurrent_fetches = parse_usize("VARIANTIZE_MAX_CONCURRENT_FETCHES", "4")?;
    let option_page_limit = parse_usize("VARIANTIZE_OPTION_PAGE_LIMIT", "100")?;

    Ok(AppConfig {
        pim_api_url,
        pim_api_token,
        log_level,
        selection_path,
        request_timeout_secs,
        user_agent,
        max_concurrent_fetches,
        option_page_limit,
    })
}
