//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for cosmos-nosql using clap.

pub mod commands;

use crate::config::{load_config, load_from_env, NosqlConfig};
use crate::domain::{NosqlError, Result};
use clap::{Parser, Subcommand};

/// Exit code for success
pub const EXIT_OK: i32 = 0;
/// Exit code for configuration and validation errors
pub const EXIT_CONFIG: i32 = 2;
/// Exit code for connection, authentication and timeout errors
pub const EXIT_CONNECTION: i32 = 4;
/// Exit code for everything else
pub const EXIT_FATAL: i32 = 5;

/// cosmos-nosql - Idempotent Azure Cosmos DB facade
#[derive(Parser, Debug)]
#[command(name = "cosmos-nosql")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file (defaults to COSMOS_PATH / COSMOS_KEY only)
    #[arg(short, long, env = "NOSQL_CONFIG")]
    pub config: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "NOSQL_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the create/read/replace sequence against a container
    Demo(commands::demo::DemoArgs),

    /// Validate configuration
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

/// Load configuration from `path`, or from the environment when absent
pub fn resolve_config(path: Option<&str>) -> Result<NosqlConfig> {
    match path {
        Some(path) => load_config(path),
        None => load_from_env(),
    }
}

/// Maps an error to the process exit code
pub fn exit_code_for(error: &NosqlError) -> i32 {
    match error {
        NosqlError::Configuration(_) | NosqlError::Validation(_) => EXIT_CONFIG,
        NosqlError::Connection(_) | NosqlError::Authentication(_) | NosqlError::Timeout(_) => {
            EXIT_CONNECTION
        }
        NosqlError::CosmosDb(e) => match e.code().map(|c| c.status()) {
            Some(401) | Some(403) => EXIT_CONNECTION,
            _ => EXIT_FATAL,
        },
        _ => EXIT_FATAL,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CosmosDbError;
    use test_case::test_case;

    #[test]
    fn test_cli_parse_demo() {
        let cli = Cli::parse_from(["cosmos-nosql", "demo"]);
        assert!(matches!(cli.command, Commands::Demo(_)));
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from(["cosmos-nosql", "--config", "custom.toml", "demo"]);
        assert_eq!(cli.config.as_deref(), Some("custom.toml"));
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["cosmos-nosql", "--log-level", "debug", "validate-config"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
        assert!(matches!(cli.command, Commands::ValidateConfig(_)));
    }

    #[test]
    fn test_cli_parse_init() {
        let cli = Cli::parse_from(["cosmos-nosql", "init"]);
        assert!(matches!(cli.command, Commands::Init(_)));
    }

    #[test_case(NosqlError::Configuration("x".into()), EXIT_CONFIG ; "configuration")]
    #[test_case(NosqlError::Validation("x".into()), EXIT_CONFIG ; "validation")]
    #[test_case(NosqlError::Connection("x".into()), EXIT_CONNECTION ; "connection")]
    #[test_case(NosqlError::Timeout("x".into()), EXIT_CONNECTION ; "timeout")]
    #[test_case(CosmosDbError::from_status(401, "x").into(), EXIT_CONNECTION ; "unauthorized")]
    #[test_case(CosmosDbError::from_status(500, "x").into(), EXIT_FATAL ; "server error")]
    #[test_case(NosqlError::Serialization("x".into()), EXIT_FATAL ; "serialization")]
    fn test_exit_code_for(error: NosqlError, expected: i32) {
        assert_eq!(exit_code_for(&error), expected);
    }
}
