use std::env::VarError;
use std::time::Duration;

use crate::data::loader::Source;
use crate::data::query::Route;
use crate::error::ConfigError;

pub const DEFAULT_SOURCE: &str = "data.xlsx";

/// Runtime settings for the directory viewer.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Spreadsheet location: a path or an http(s) URL.
    pub source: Source,
    /// Page shown on startup, e.g. a deep link into the listing.
    pub start_route: Route,
    pub http_timeout: Duration,
    /// Default `env_logger` filter when `RUST_LOG` is unset.
    pub log_filter: String,
}

/// Load configuration from the process environment, after reading `.env`.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    build_app_config(|key| std::env::var(key))
}

/// Parse configuration through `lookup`, so tests can feed a plain map.
pub fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let timeout_var = "SUPPLIERS_HTTP_TIMEOUT_SECS";
    let timeout_secs = or_default(timeout_var, "30")
        .parse::<u64>()
        .map_err(|e| ConfigError::InvalidEnvVar {
            var: timeout_var.to_string(),
            reason: e.to_string(),
        })?;
    if timeout_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: timeout_var.to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    let http_timeout = Duration::from_secs(timeout_secs);

    let source_var = "SUPPLIERS_SOURCE";
    let location = or_default(source_var, DEFAULT_SOURCE);
    if location.trim().is_empty() {
        return Err(ConfigError::InvalidEnvVar {
            var: source_var.to_string(),
            reason: "must not be empty".to_string(),
        });
    }

    Ok(AppConfig {
        source: Source::parse(location.trim(), http_timeout),
        start_route: Route::parse(&or_default("SUPPLIERS_START_ROUTE", "/")),
        http_timeout,
        log_filter: or_default("SUPPLIERS_LOG", "info"),
    })
}
