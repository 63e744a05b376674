use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

const DEFAULT_YELP_BASE_URL: &str = "https://api.yelp.com/v3/businesses";
const DEFAULT_DATABASE_URL: &str = "sqlite://foodster.db";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is invalid. A missing `YELP_API_KEY` is
/// not an error here; see [`AppConfig::require_yelp_api_key`].
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
/// Returns `ConfigError` if a value is invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Parsing is decoupled from the process environment so tests can drive it
/// with a plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let optional = |var: &str| -> Option<String> {
        lookup(var).ok().filter(|v| !v.trim().is_empty())
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let yelp_api_key = optional("YELP_API_KEY");
    let yelp_base_url = or_default("FOODSTER_YELP_BASE_URL", DEFAULT_YELP_BASE_URL);
    let database_url = or_default("FOODSTER_DATABASE_URL", DEFAULT_DATABASE_URL);
    let env = parse_environment(&or_default("FOODSTER_ENV", "development"))?;
    let log_level = or_default("FOODSTER_LOG_LEVEL", "info");

    let db_max_connections = parse_u32("FOODSTER_DB_MAX_CONNECTIONS", "4")?;
    if db_max_connections == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "FOODSTER_DB_MAX_CONNECTIONS".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    let db_acquire_timeout_secs = parse_u64("FOODSTER_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    Ok(AppConfig {
        yelp_api_key,
        yelp_base_url,
        database_url,
        env,
        log_level,
        db_max_connections,
        db_acquire_timeout_secs,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "FOODSTER_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
