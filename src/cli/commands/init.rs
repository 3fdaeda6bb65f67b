//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use crate::cli::{EXIT_CONFIG, EXIT_FATAL, EXIT_OK};
use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "nosql.toml")]
    pub output: String,

    /// Include every option with comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing cosmos-nosql configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(EXIT_CONFIG);
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your account endpoint", self.output);
                println!("  2. Put COSMOS_KEY in your environment or a .env file");
                println!(
                    "  3. Validate configuration: cosmos-nosql --config {} validate-config",
                    self.output
                );
                println!("  4. Run the demo: cosmos-nosql --config {} demo", self.output);
                println!();
                Ok(EXIT_OK)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(EXIT_FATAL)
            }
        }
    }

    fn generate_minimal_config() -> String {
        r#"# cosmos-nosql configuration

[application]
log_level = "info"

[cosmosdb]
endpoint = "https://your-account.documents.azure.com:443/"
key = "${COSMOS_KEY}"
consistency_level = "session"

[cosmosdb.throughput]
mode = "manual"
request_units = 400
"#
        .to_string()
    }

    fn generate_config_with_examples() -> String {
        r#"# cosmos-nosql configuration
#
# Values of the form ${NAME} are replaced with environment variables.
# COSMOS_PATH and COSMOS_KEY, when set, override the endpoint and key below.

[application]
# Log level: trace | debug | info | warn | error
log_level = "info"

[cosmosdb]
# Account endpoint
endpoint = "https://your-account.documents.azure.com:443/"

# Account key (keep it out of the file)
key = "${COSMOS_KEY}"

# Consistency level sent with item creates:
# strong | bounded_staleness | session | consistent_prefix | eventual
consistency_level = "session"

# Per-request timeout in seconds (0 disables it)
request_timeout_seconds = 30

[cosmosdb.throughput]
# manual: dedicated RU/s per container (400 - 1000000, multiples of 100)
# shared: no container offer (serverless or database-level throughput)
mode = "manual"
request_units = 400

[retry]
# Retries for throttling, timeouts and unavailability
max_retries = 3
initial_delay_ms = 1000
max_delay_ms = 30000
backoff_multiplier = 2.0

[logging]
# JSON log files in addition to the console
local_enabled = false
local_path = "./logs"

# Rotation: daily | hourly | never
local_rotation = "daily"
"#
        .to_string()
    }
}
