use crate::app_config::AppConfig;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is set to an invalid value.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is set to an invalid value.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable is optional; unset variables fall back to
/// [`AppConfig::default`].
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let defaults = AppConfig::default();

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u64 = |var: &str, default: u64| -> Result<u64, ConfigError> {
        match lookup(var) {
            Ok(raw) => raw.trim().parse::<u64>().map_err(|e| invalid(var, e.to_string())),
            Err(_) => Ok(default),
        }
    };

    let parse_usize = |var: &str, default: usize| -> Result<usize, ConfigError> {
        match lookup(var) {
            Ok(raw) => raw
                .trim()
                .parse::<usize>()
                .map_err(|e| invalid(var, e.to_string())),
            Err(_) => Ok(default),
        }
    };

    let log_level = lookup("SHOPSCRAPE_LOG_LEVEL").unwrap_or(defaults.log_level);
    let user_agent = lookup("SHOPSCRAPE_USER_AGENT").unwrap_or(defaults.user_agent);
    let output_dir = lookup("SHOPSCRAPE_OUTPUT_DIR")
        .map(PathBuf::from)
        .unwrap_or(defaults.output_dir);

    let request_timeout_secs = parse_u64(
        "SHOPSCRAPE_REQUEST_TIMEOUT_SECS",
        defaults.request_timeout_secs,
    )?;
    if request_timeout_secs == 0 {
        return Err(invalid(
            "SHOPSCRAPE_REQUEST_TIMEOUT_SECS",
            "timeout must be at least 1 second".to_string(),
        ));
    }

    let rating_concurrency = parse_usize(
        "SHOPSCRAPE_RATING_CONCURRENCY",
        defaults.rating_concurrency,
    )?;
    if rating_concurrency == 0 {
        return Err(invalid(
            "SHOPSCRAPE_RATING_CONCURRENCY",
            "concurrency must be at least 1".to_string(),
        ));
    }

    Ok(AppConfig {
        log_level,
        request_timeout_secs,
        user_agent,
        output_dir,
        rating_concurrency,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
