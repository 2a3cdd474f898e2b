pub mod app_config;
pub mod config;
pub mod rows;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use rows::{Cell, ResultRow, ResultTable, FIXED_COLUMNS};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Rounds to two decimal places (half away from zero).
#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
