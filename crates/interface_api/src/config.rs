//! API configuration

use serde::Deserialize;
use std::collections::HashMap;

use domain_ledger::LedgerConfig;

/// Where the ledger is stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// PostgreSQL at `database_url`
    Postgres,
    /// Process memory; everything is lost on restart
    Memory,
}

/// API configuration
///
/// Every field has a default, so a partial environment is enough.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// JWT secret for authentication
    pub jwt_secret: String,
    /// JWT expiration in seconds
    pub jwt_expiration_secs: u64,
    /// Storage backend
    pub storage: StorageBackend,
    /// Database URL
    pub database_url: String,
    /// Maximum pooled database connections
    pub database_max_connections: u32,
    /// Log level
    pub log_level: String,
    /// Emit logs as JSON lines
    pub log_json: bool,
    /// Ledger thresholds
    pub ledger: LedgerConfig,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            jwt_secret: "change-me-in-production".to_string(),
            jwt_expiration_secs: 3600,
            storage: StorageBackend::Postgres,
            database_url: "postgres://localhost/hearth".to_string(),
            database_max_connections: 10,
            log_level: "info".to_string(),
            log_json: false,
            ledger: LedgerConfig::default(),
        }
    }
}

impl ApiConfig {
    /// Loads configuration from `API_*` environment variables
    ///
    /// Nested ledger settings use a double underscore, for example
    /// `API_LEDGER__SETTLE_TOLERANCE=0.05`.
    ///
    /// # Errors
    ///
    /// Any variable that is set but cannot be parsed is an error; it never
    /// silently falls back to the default.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        Self::from_vars(None)
    }

    /// Like [`ApiConfig::from_env`], reading `vars` instead of the process
    /// environment when given
    pub fn from_vars(vars: Option<HashMap<String, String>>) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(
                config::Environment::with_prefix("API")
                    .prefix_separator("_")
                    .separator("__")
                    .source(vars),
            )
            .build()?
            .try_deserialize()
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_defaults() {
        let config = ApiConfig::default();
        assert_eq!(config.server_addr(), "0.0.0.0:8080");
        assert_eq!(config.storage, StorageBackend::Postgres);
        assert_eq!(config.ledger.settle_tolerance, dec!(0.01));
    }

    #[test]
    fn test_partial_source_keeps_defaults() {
        let config: ApiConfig = config::Config::builder()
            .set_override("port", 9090)
            .unwrap()
            .set_override("storage", "memory")
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.port, 9090);
        assert_eq!(config.storage, StorageBackend::Memory);
        assert_eq!(config.jwt_expiration_secs, 3600);
        assert_eq!(config.ledger, LedgerConfig::default());
    }

    fn vars(pairs: &[(&str, &str)]) -> Option<HashMap<String, String>> {
        Some(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn test_environment_overrides() {
        let config = ApiConfig::from_vars(vars(&[
            ("API_PORT", "9191"),
            ("API_JWT_SECRET", "household-secret"),
            ("API_LEDGER__SETTLE_TOLERANCE", "0.05"),
        ]))
        .unwrap();

        assert_eq!(config.port, 9191);
        assert_eq!(config.jwt_secret, "household-secret");
        assert_eq!(config.ledger.settle_tolerance, dec!(0.05));
    }

    #[test]
    fn test_unparseable_value_is_an_error() {
        let result = ApiConfig::from_vars(vars(&[
            ("API_PORT", "eighty"),
            ("API_JWT_SECRET", "household-secret"),
        ]));
        assert!(result.is_err());
    }
}
