// cosmos-nosql - Idempotent Azure Cosmos DB facade
// Copyright (c) 2025 cosmos-nosql Contributors
// Licensed under the MIT License

use clap::Parser;
use cosmos_nosql::cli::{resolve_config, Cli, Commands, EXIT_FATAL};
use cosmos_nosql::config::LoggingConfig;
use cosmos_nosql::logging::{init_logging, LoggingGuard};
use std::process;
use tokio::sync::watch;

#[tokio::main]
async fn main() {
    // Optional; a missing .env is ignored
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let _guard = match setup_logging(&cli) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(EXIT_FATAL);
        }
    };

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "cosmos-nosql - Azure Cosmos DB facade"
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    tokio::spawn(async move {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};
            let mut sigterm = match signal(SignalKind::terminate()) {
                Ok(s) => s,
                Err(e) => {
                    tracing::error!(error = %e, "Failed to install SIGTERM handler");
                    return;
                }
            };

            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Received SIGINT (Ctrl+C), cancelling in-flight requests");
                }
                _ = sigterm.recv() => {
                    tracing::info!("Received SIGTERM, cancelling in-flight requests");
                }
            }
            let _ = shutdown_tx.send(true);
        }

        #[cfg(not(unix))]
        {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            } else {
                tracing::info!("Received SIGINT (Ctrl+C), cancelling in-flight requests");
                let _ = shutdown_tx.send(true);
            }
        }
    });

    let exit_code = match execute_command(&cli, shutdown_rx).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e}");
            EXIT_FATAL
        }
    };

    // process::exit skips destructors; flush file logs first
    drop(_guard);
    process::exit(exit_code);
}

/// File logging follows the config file when one loads; the CLI flag wins
/// over the configured level.
fn setup_logging(cli: &Cli) -> cosmos_nosql::domain::Result<LoggingGuard> {
    let config = resolve_config(cli.config.as_deref()).ok();

    let log_level = cli
        .log_level
        .clone()
        .or_else(|| config.as_ref().map(|c| c.application.log_level.clone()))
        .unwrap_or_else(|| "info".to_string());

    let logging = config
        .map(|c| c.logging)
        .unwrap_or_else(LoggingConfig::console_only);

    init_logging(&log_level, &logging)
}

async fn execute_command(cli: &Cli, shutdown_signal: watch::Receiver<bool>) -> anyhow::Result<i32> {
    let config_path = cli.config.as_deref();
    match &cli.command {
        Commands::Demo(args) => args.execute(config_path, shutdown_signal).await,
        Commands::ValidateConfig(args) => args.execute(config_path).await,
        Commands::Init(args) => args.execute().await,
    }
}
