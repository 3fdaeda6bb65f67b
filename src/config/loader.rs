//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::{
    ApplicationConfig, ConsistencyLevel, CosmosDbConfig, LoggingConfig, NosqlConfig,
    RetryConfig, ThroughputConfig,
};
use super::secret::secret_string;
use crate::domain::errors::NosqlError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

/// Environment variable holding the account endpoint
pub const ENDPOINT_ENV: &str = "COSMOS_PATH";

/// Environment variable holding the account key
pub const KEY_ENV: &str = "COSMOS_KEY";

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into NosqlConfig
/// 4. Applies environment variable overrides
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - A referenced environment variable is not set
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use cosmos_nosql::config::loader::load_config;
///
/// let config = load_config("nosql.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<NosqlConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(NosqlError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        NosqlError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: NosqlConfig = toml::from_str(&contents)
        .map_err(|e| NosqlError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config)?;
    finish(config)
}

/// Builds configuration from defaults and the environment alone
///
/// `COSMOS_PATH` and `COSMOS_KEY` are required.
///
/// # Errors
///
/// Returns an error naming every missing variable, or if validation fails.
pub fn load_from_env() -> Result<NosqlConfig> {
    let endpoint = std::env::var(ENDPOINT_ENV).ok().filter(|v| !v.trim().is_empty());
    let key = std::env::var(KEY_ENV).ok().filter(|v| !v.trim().is_empty());

    let (endpoint, key) = match (endpoint, key) {
        (Some(endpoint), Some(key)) => (endpoint, key),
        (endpoint, key) => {
            let missing: Vec<&str> = [
                endpoint.is_none().then_some(ENDPOINT_ENV),
                key.is_none().then_some(KEY_ENV),
            ]
            .into_iter()
            .flatten()
            .collect();
            return Err(NosqlError::Configuration(format!(
                "Missing required environment variables: {}",
                missing.join(", ")
            )));
        }
    };

    let mut config = NosqlConfig {
        application: ApplicationConfig::default(),
        cosmosdb: CosmosDbConfig {
            endpoint,
            key: secret_string(key),
            consistency_level: ConsistencyLevel::default(),
            throughput: ThroughputConfig::default(),
            request_timeout_seconds: 30,
        },
        retry: RetryConfig::default(),
        logging: LoggingConfig::default(),
    };

    apply_env_overrides(&mut config)?;
    finish(config)
}

fn finish(config: NosqlConfig) -> Result<NosqlConfig> {
    config.validate().map_err(|e| {
        NosqlError::Configuration(format!("Configuration validation failed: {e}"))
    })?;
    Ok(config)
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("env var pattern is a valid regex")
    })
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched. Every missing variable is reported in a
/// single error.
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = env_var_pattern();
    let mut result = String::with_capacity(input.len());
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let processed_line = re.replace_all(line, |cap: &regex::Captures<'_>| {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => value,
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                    String::new()
                }
            }
        });
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(NosqlError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

fn parse_env<T: std::str::FromStr>(name: &str, value: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e| {
        NosqlError::Configuration(format!("Invalid value '{value}' for {name}: {e}"))
    })
}

/// Applies environment variable overrides
///
/// `COSMOS_PATH` / `COSMOS_KEY` override the connection; other settings use
/// the `NOSQL_<SECTION>_<KEY>` pattern.
fn apply_env_overrides(config: &mut NosqlConfig) -> Result<()> {
    if let Ok(val) = std::env::var(ENDPOINT_ENV) {
        if !val.trim().is_empty() {
            config.cosmosdb.endpoint = val;
        }
    }
    if let Ok(val) = std::env::var(KEY_ENV) {
        if !val.trim().is_empty() {
            config.cosmosdb.key = secret_string(val);
        }
    }

    if let Ok(val) = std::env::var("NOSQL_LOG_LEVEL") {
        config.application.log_level = val.to_lowercase();
    }

    if let Ok(val) = std::env::var("NOSQL_COSMOSDB_CONSISTENCY_LEVEL") {
        config.cosmosdb.consistency_level = parse_env("NOSQL_COSMOSDB_CONSISTENCY_LEVEL", &val)?;
    }
    if let Ok(val) = std::env::var("NOSQL_COSMOSDB_REQUEST_TIMEOUT_SECONDS") {
        config.cosmosdb.request_timeout_seconds =
            parse_env("NOSQL_COSMOSDB_REQUEST_TIMEOUT_SECONDS", &val)?;
    }
    if let Ok(val) = std::env::var("NOSQL_COSMOSDB_THROUGHPUT_REQUEST_UNITS") {
        config.cosmosdb.throughput = ThroughputConfig::Manual {
            request_units: parse_env("NOSQL_COSMOSDB_THROUGHPUT_REQUEST_UNITS", &val)?,
        };
    }

    if let Ok(val) = std::env::var("NOSQL_RETRY_MAX_RETRIES") {
        config.retry.max_retries = parse_env("NOSQL_RETRY_MAX_RETRIES", &val)?;
    }

    if let Ok(val) = std::env::var("NOSQL_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = parse_env("NOSQL_LOGGING_LOCAL_ENABLED", &val)?;
    }
    if let Ok(val) = std::env::var("NOSQL_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }

    Ok(())
}
