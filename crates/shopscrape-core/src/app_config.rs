use std::path::PathBuf;

/// Runtime settings shared by every scrape run.
///
/// Built from `SHOPSCRAPE_*` environment variables by
/// [`crate::config::load_app_config`]; CLI flags may override individual
/// fields afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Fallback `tracing` filter used when `RUST_LOG` is unset.
    pub log_level: String,
    /// Timeout applied to every HTTP request (probe, catalog pages, storefront pages).
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// Directory export files are written into.
    pub output_dir: PathBuf,
    /// Maximum number of storefront pages fetched at once during rating
    /// enrichment. `1` keeps enrichment strictly sequential.
    pub rating_concurrency: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            request_timeout_secs: 10,
            user_agent: "shopscrape/0.1 (catalog-export)".to_string(),
            output_dir: PathBuf::from("."),
            rating_concurrency: 1,
        }
    }
}
