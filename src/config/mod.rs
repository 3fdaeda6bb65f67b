//! Configuration management.
//!
//! Configuration comes either from a TOML file or purely from the environment.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use cosmos_nosql::config::{load_config, load_from_env};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // From a file (supports ${VAR} substitution)
//! let config = load_config("nosql.toml")?;
//!
//! // Or from COSMOS_PATH / COSMOS_KEY alone
//! let config = load_from_env()?;
//! println!("Cosmos DB: {}", config.cosmosdb.endpoint);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Application settings (log level)
//! - [`CosmosDbConfig`] - Endpoint, key, consistency, throughput, timeout
//! - [`RetryConfig`] - Backoff for transient failures
//! - [`LoggingConfig`] - Local file logging
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [cosmosdb]
//! endpoint = "https://your-account.documents.azure.com:443/"
//! key = "${COSMOS_KEY}"
//! consistency_level = "session"
//! request_timeout_seconds = 30
//!
//! [cosmosdb.throughput]
//! mode = "manual"
//! request_units = 400
//!
//! [retry]
//! max_retries = 3
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::{load_config, load_from_env};
pub use schema::{
    ApplicationConfig, ConsistencyLevel, CosmosDbConfig, LoggingConfig, NosqlConfig,
    RetryConfig, ThroughputConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
