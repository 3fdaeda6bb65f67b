//! Validate config command implementation
//!
//! This module implements the `validate-config` command. Loading already
//! validates, so a successful load is a valid configuration.

use crate::cli::{resolve_config, EXIT_CONFIG, EXIT_OK};
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: Option<&str>) -> anyhow::Result<i32> {
        let source = config_path.unwrap_or("environment (COSMOS_PATH, COSMOS_KEY)");
        tracing::info!(source = %source, "Validating configuration");

        println!("🔍 Validating configuration from: {source}");
        println!();

        let config = match resolve_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                println!();
                return Ok(EXIT_CONFIG);
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Cosmos DB Endpoint: {}", config.cosmosdb.endpoint);
        println!("  Cosmos DB Key: ********");
        println!("  Consistency Level: {}", config.cosmosdb.consistency_level);
        match config.cosmosdb.throughput.request_units() {
            Some(ru) => println!("  Container Throughput: {ru} RU/s (manual)"),
            None => println!("  Container Throughput: shared"),
        }
        println!(
            "  Request Timeout: {}s",
            config.cosmosdb.request_timeout_seconds
        );
        println!("  Max Retries: {}", config.retry.max_retries);
        println!(
            "  File Logging: {}",
            if config.logging.local_enabled {
                config.logging.local_path.as_str()
            } else {
                "disabled"
            }
        );
        println!();
        Ok(EXIT_OK)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_validate_missing_file() {
        let code = ValidateArgs {}
            .execute(Some("/nonexistent/nosql.toml"))
            .await
            .unwrap();
        assert_eq!(code, EXIT_CONFIG);
    }
}
