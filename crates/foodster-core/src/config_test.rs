use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

/// Returns a map with all required env vars populated.
fn full_env<'a>() -> HashMap<&'a str, &'a str> {
    let mut m = HashMap::new();
    m.insert("YELP_API_KEY", "test-key");
    m
}

#[test]
fn parse_environment_development() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
}

#[test]
fn parse_environment_test() {
    assert_eq!(parse_environment("test").unwrap(), Environment::Test);
}

#[test]
fn parse_environment_production() {
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("staging").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "FOODSTER_ENV"));
}

#[test]
fn build_app_config_succeeds_without_api_key() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.yelp_api_key.is_none());
    assert_eq!(cfg.database_url, "sqlite://foodster.db");

    let err = cfg.require_yelp_api_key().unwrap_err();
    assert!(
        matches!(err, ConfigError::MissingEnvVar(ref v) if v == "YELP_API_KEY"),
        "expected MissingEnvVar(YELP_API_KEY), got: {err:?}"
    );
}

#[test]
fn build_app_config_treats_blank_api_key_as_missing() {
    let mut map = HashMap::new();
    map.insert("YELP_API_KEY", "   ");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.yelp_api_key.is_none());
    assert!(matches!(
        cfg.require_yelp_api_key(),
        Err(ConfigError::MissingEnvVar(_))
    ));
}

#[test]
fn build_app_config_applies_defaults() {
    let map = full_env();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.require_yelp_api_key().unwrap(), "test-key");
    assert_eq!(cfg.yelp_base_url, "https://api.yelp.com/v3/businesses");
    assert_eq!(cfg.database_url, "sqlite://foodster.db");
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.db_max_connections, 4);
    assert_eq!(cfg.db_acquire_timeout_secs, 10);
}

#[test]
fn build_app_config_reads_overrides() {
    let mut map = full_env();
    map.insert("FOODSTER_YELP_BASE_URL", "http://127.0.0.1:9999");
    map.insert("FOODSTER_DATABASE_URL", "sqlite::memory:");
    map.insert("FOODSTER_ENV", "production");
    map.insert("FOODSTER_DB_MAX_CONNECTIONS", "1");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.yelp_base_url, "http://127.0.0.1:9999");
    assert_eq!(cfg.database_url, "sqlite::memory:");
    assert_eq!(cfg.env, Environment::Production);
    assert_eq!(cfg.db_max_connections, 1);
}

#[test]
fn build_app_config_rejects_zero_connections() {
    let mut map = full_env();
    map.insert("FOODSTER_DB_MAX_CONNECTIONS", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "FOODSTER_DB_MAX_CONNECTIONS"),
        "expected InvalidEnvVar(FOODSTER_DB_MAX_CONNECTIONS), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_non_numeric_timeout() {
    let mut map = full_env();
    map.insert("FOODSTER_DB_ACQUIRE_TIMEOUT_SECS", "soon");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "FOODSTER_DB_ACQUIRE_TIMEOUT_SECS"),
        "expected InvalidEnvVar(FOODSTER_DB_ACQUIRE_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn debug_output_redacts_api_key() {
    let map = full_env();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("test-key"));
    assert!(rendered.contains("[redacted]"));
}
