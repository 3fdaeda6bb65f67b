//! Configuration schema types
//!
//! This module defines the configuration structure for cosmos-nosql.

use crate::config::SecretString;
use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NosqlConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Azure Cosmos DB configuration
    pub cosmosdb: CosmosDbConfig,

    /// Retry policy for transient failures
    #[serde(default)]
    pub retry: RetryConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl NosqlConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.cosmosdb.validate()?;
        self.retry.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Azure Cosmos DB configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CosmosDbConfig {
    /// Cosmos DB account endpoint URL
    pub endpoint: String,

    /// Cosmos DB account key
    /// Stored securely in memory and automatically zeroized on drop
    pub key: SecretString,

    /// Consistency level requested for create operations
    #[serde(default)]
    pub consistency_level: ConsistencyLevel,

    /// Throughput provisioned for newly created containers
    #[serde(default)]
    pub throughput: ThroughputConfig,

    /// Per-request timeout in seconds (0 disables the timeout)
    #[serde(default = "default_request_timeout_seconds")]
    pub request_timeout_seconds: u64,
}

impl CosmosDbConfig {
    fn validate(&self) -> Result<(), String> {
        use secrecy::ExposeSecret;

        if self.endpoint.is_empty() {
            return Err("cosmosdb.endpoint cannot be empty".to_string());
        }

        let url = url::Url::parse(&self.endpoint)
            .map_err(|e| format!("cosmosdb.endpoint is not a valid URL: {e}"))?;
        if url.scheme() != "https" {
            return Err("cosmosdb.endpoint must start with https://".to_string());
        }
        if url.host_str().is_none() {
            return Err("cosmosdb.endpoint must include a host".to_string());
        }

        let key: &str = self.key.expose_secret().as_ref();
        if key.trim().is_empty() {
            return Err("cosmosdb.key cannot be empty".to_string());
        }
        if general_purpose::STANDARD.decode(key.trim()).is_err() {
            return Err("cosmosdb.key is not valid base64".to_string());
        }

        self.throughput.validate()?;
        Ok(())
    }

    /// Per-request timeout, `None` when disabled
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_seconds > 0).then(|| Duration::from_secs(self.request_timeout_seconds))
    }
}

/// Consistency level for an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConsistencyLevel {
    /// Linearizable reads
    Strong,
    /// Reads lag writes by a bounded window
    BoundedStaleness,
    /// Read-your-writes within a session
    #[default]
    Session,
    /// Reads never see out-of-order writes
    ConsistentPrefix,
    /// No ordering guarantee
    Eventual,
}

impl ConsistencyLevel {
    /// Configuration spelling of the level
    pub fn as_str(&self) -> &'static str {
        match self {
            ConsistencyLevel::Strong => "strong",
            ConsistencyLevel::BoundedStaleness => "bounded_staleness",
            ConsistencyLevel::Session => "session",
            ConsistencyLevel::ConsistentPrefix => "consistent_prefix",
            ConsistencyLevel::Eventual => "eventual",
        }
    }
}

impl std::fmt::Display for ConsistencyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ConsistencyLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "strong" => Ok(ConsistencyLevel::Strong),
            "bounded_staleness" => Ok(ConsistencyLevel::BoundedStaleness),
            "session" => Ok(ConsistencyLevel::Session),
            "consistent_prefix" => Ok(ConsistencyLevel::ConsistentPrefix),
            "eventual" => Ok(ConsistencyLevel::Eventual),
            other => Err(format!(
                "Invalid consistency level '{other}'. Must be one of: strong, bounded_staleness, session, consistent_prefix, eventual"
            )),
        }
    }
}

/// Throughput provisioned for a new container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum ThroughputConfig {
    /// Dedicated manual throughput in request units per second
    Manual {
        #[serde(default = "default_request_units")]
        request_units: usize,
    },
    /// No container-level offer (serverless accounts, database-shared throughput)
    Shared,
}

impl ThroughputConfig {
    fn validate(&self) -> Result<(), String> {
        if let ThroughputConfig::Manual { request_units } = self {
            if !(MIN_REQUEST_UNITS..=MAX_REQUEST_UNITS).contains(request_units) {
                return Err(format!(
                    "cosmosdb.throughput.request_units must be between {MIN_REQUEST_UNITS} and {MAX_REQUEST_UNITS}, got {request_units}"
                ));
            }
            if request_units % 100 != 0 {
                return Err(format!(
                    "cosmosdb.throughput.request_units must be a multiple of 100, got {request_units}"
                ));
            }
        }
        Ok(())
    }

    /// Manual request units, `None` for shared throughput
    pub fn request_units(&self) -> Option<usize> {
        match self {
            ThroughputConfig::Manual { request_units } => Some(*request_units),
            ThroughputConfig::Shared => None,
        }
    }
}

impl Default for ThroughputConfig {
    fn default() -> Self {
        ThroughputConfig::Manual {
            request_units: default_request_units(),
        }
    }
}

const MIN_REQUEST_UNITS: usize = 400;
const MAX_REQUEST_UNITS: usize = 1_000_000;

/// Retry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of retry attempts
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,

    /// Initial delay in milliseconds
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,

    /// Maximum delay in milliseconds
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,

    /// Backoff multiplier
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,
}

impl RetryConfig {
    fn validate(&self) -> Result<(), String> {
        if self.max_retries > 10 {
            return Err(format!(
                "retry.max_retries must be <= 10, got {}",
                self.max_retries
            ));
        }
        if self.initial_delay_ms > self.max_delay_ms {
            return Err(format!(
                "retry.initial_delay_ms ({}) cannot exceed retry.max_delay_ms ({})",
                self.initial_delay_ms, self.max_delay_ms
            ));
        }
        if !(self.backoff_multiplier >= 1.0 && self.backoff_multiplier.is_finite()) {
            return Err(format!(
                "retry.backoff_multiplier must be >= 1.0, got {}",
                self.backoff_multiplier
            ));
        }
        Ok(())
    }

    /// A policy that never retries
    pub fn disabled() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            backoff_multiplier: default_backoff_multiplier(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local JSON file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy (daily, hourly, never)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local logging is enabled".to_string());
        }

        Ok(())
    }

    /// Console-only logging
    pub fn console_only() -> Self {
        Self {
            local_enabled: false,
            ..Self::default()
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_request_timeout_seconds() -> u64 {
    30
}

fn default_request_units() -> usize {
    400
}

fn default_max_retries() -> usize {
    3
}

fn default_initial_delay_ms() -> u64 {
    1000
}

fn default_max_delay_ms() -> u64 {
    30000
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

fn default_local_path() -> String {
    "./logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret_string;
    use test_case::test_case;

    const TEST_KEY: &str = "dGVzdC1rZXk=";

    fn cosmos_config() -> CosmosDbConfig {
        CosmosDbConfig {
            endpoint: "https://myaccount.documents.azure.com:443/".to_string(),
            key: secret_string(TEST_KEY.to_string()),
            consistency_level: ConsistencyLevel::Session,
            throughput: ThroughputConfig::default(),
            request_timeout_seconds: 30,
        }
    }

    #[test]
    fn test_application_config_validation() {
        let mut config = ApplicationConfig::default();
        assert!(config.validate().is_ok());

        config.log_level = "verbose".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_cosmosdb_config_validation() {
        assert!(cosmos_config().validate().is_ok());
    }

    #[test_case("" ; "empty")]
    #[test_case("http://myaccount.documents.azure.com" ; "plain http")]
    #[test_case("not a url" ; "garbage")]
    fn test_cosmosdb_endpoint_rejected(endpoint: &str) {
        let mut config = cosmos_config();
        config.endpoint = endpoint.to_string();
        assert!(config.validate().is_err());
    }

    #[test_case("this is !!! not base64" ; "punctuation")]
    #[test_case("dGVzdC1rZXk" ; "missing padding")]
    fn test_cosmosdb_malformed_key_rejected(key: &str) {
        let mut config = cosmos_config();
        config.key = secret_string(key.to_string());
        let err = config.validate().unwrap_err();
        assert_eq!(err, "cosmosdb.key is not valid base64");
    }

    #[test]
    fn test_cosmosdb_empty_key_rejected() {
        let mut config = cosmos_config();
        config.key = secret_string("   ".to_string());
        let err = config.validate().unwrap_err();
        assert!(err.contains("cosmosdb.key"));
    }

    #[test_case(400, true ; "minimum")]
    #[test_case(1000, true ; "round")]
    #[test_case(300, false ; "below minimum")]
    #[test_case(450, false ; "not a multiple of 100")]
    fn test_throughput_validation(request_units: usize, valid: bool) {
        let throughput = ThroughputConfig::Manual { request_units };
        assert_eq!(throughput.validate().is_ok(), valid);
    }

    #[test]
    fn test_throughput_default_is_manual_400() {
        assert_eq!(ThroughputConfig::default().request_units(), Some(400));
        assert_eq!(ThroughputConfig::Shared.request_units(), None);
        assert!(ThroughputConfig::Shared.validate().is_ok());
    }

    #[test]
    fn test_throughput_toml() {
        #[derive(Deserialize)]
        struct Wrapper {
            throughput: ThroughputConfig,
        }

        let w: Wrapper = toml::from_str("[throughput]\nmode = \"manual\"\nrequest_units = 1000").unwrap();
        assert_eq!(w.throughput.request_units(), Some(1000));

        let w: Wrapper = toml::from_str("[throughput]\nmode = \"manual\"").unwrap();
        assert_eq!(w.throughput.request_units(), Some(400));

        let w: Wrapper = toml::from_str("[throughput]\nmode = \"shared\"").unwrap();
        assert_eq!(w.throughput, ThroughputConfig::Shared);
    }

    #[test]
    fn test_consistency_level_parsing() {
        assert_eq!("session".parse::<ConsistencyLevel>().unwrap(), ConsistencyLevel::Session);
        assert_eq!(
            "Bounded-Staleness".parse::<ConsistencyLevel>().unwrap(),
            ConsistencyLevel::BoundedStaleness
        );
        assert!("linearizable".parse::<ConsistencyLevel>().is_err());
        assert_eq!(ConsistencyLevel::default(), ConsistencyLevel::Session);
    }

    #[test]
    fn test_request_timeout() {
        let mut config = cosmos_config();
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(30)));
        config.request_timeout_seconds = 0;
        assert_eq!(config.request_timeout(), None);
    }

    #[test]
    fn test_retry_config_validation() {
        let mut config = RetryConfig::default();
        assert!(config.validate().is_ok());

        config.max_retries = 11;
        assert!(config.validate().is_err());

        config = RetryConfig::default();
        config.backoff_multiplier = 0.5;
        assert!(config.validate().is_err());

        config = RetryConfig::default();
        config.initial_delay_ms = 60_000;
        assert!(config.validate().is_err());

        assert_eq!(RetryConfig::disabled().max_retries, 0);
    }

    #[test]
    fn test_logging_config_default() {
        let config = LoggingConfig::default();
        assert!(!config.local_enabled);
        assert_eq!(config.local_path, "./logs");
        assert_eq!(config.local_rotation, "daily");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_logging_config_invalid_rotation() {
        let config = LoggingConfig {
            local_rotation: "weekly".to_string(),
            ..LoggingConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_default_values() {
        assert_eq!(default_log_level(), "info");
        assert_eq!(default_request_timeout_seconds(), 30);
        assert_eq!(default_request_units(), 400);
        assert_eq!(default_max_retries(), 3);
        assert_eq!(default_initial_delay_ms(), 1000);
        assert_eq!(default_max_delay_ms(), 30000);
    }
}
