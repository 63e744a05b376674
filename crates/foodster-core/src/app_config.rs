use crate::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    /// Unset for local-only use; see [`AppConfig::require_yelp_api_key`].
    pub yelp_api_key: Option<String>,
    pub yelp_base_url: String,
    pub database_url: String,
    pub env: Environment,
    pub log_level: String,
    pub db_max_connections: u32,
    pub db_acquire_timeout_secs: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field(
                "yelp_api_key",
                &self.yelp_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("yelp_base_url", &self.yelp_base_url)
            .field("database_url", &self.database_url)
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("db_max_connections", &self.db_max_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .finish()
    }
}

impl AppConfig {
    /// The Yelp credential, for commands that call the API.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] if `YELP_API_KEY` was unset or
    /// blank.
    pub fn require_yelp_api_key(&self) -> Result<&str, ConfigError> {
        self.yelp_api_key
            .as_deref()
            .ok_or_else(|| ConfigError::MissingEnvVar("YELP_API_KEY".to_string()))
    }
}
