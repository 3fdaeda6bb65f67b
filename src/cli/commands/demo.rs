//! Demo command implementation
//!
//! Runs the full facade sequence against one container: create database,
//! create container, create item, read it back raw and decoded, replace it,
//! read it again and optionally delete it.

use crate::adapters::memory::InMemoryBackend;
use crate::cli::{exit_code_for, resolve_config, EXIT_CONFIG, EXIT_OK};
use crate::config::NosqlConfig;
use crate::core::{ClientSettings, ContainerClient, DatabaseAdmin, RequestContext};
use crate::domain::{NosqlError, PartitionKeyPath, Result};
use clap::Args;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Arguments for the demo command
#[derive(Args, Debug)]
pub struct DemoArgs {
    /// Database to create or reuse
    #[arg(long, default_value = "testdb")]
    pub database: String,

    /// Container to create or reuse
    #[arg(long, default_value = "testcontainer")]
    pub container: String,

    /// Partition key path of the container
    #[arg(long, default_value = "/email")]
    pub partition_key: String,

    /// Partition key value of the demo item
    #[arg(long, default_value = "john@doe.com")]
    pub email: String,

    /// Delete the demo item at the end
    #[arg(long)]
    pub cleanup: bool,

    /// Run against an in-process store instead of Cosmos DB
    #[arg(long)]
    pub in_memory: bool,
}

/// Shape the stored item is decoded into
#[derive(Debug, Deserialize)]
struct DemoItem {
    id: String,
    name: String,
}

/// Builds per-call contexts sharing one timeout and cancellation signal
struct ContextFactory {
    timeout: Option<Duration>,
    shutdown: watch::Receiver<bool>,
}

impl ContextFactory {
    fn next(&self) -> RequestContext {
        let ctx = match self.timeout {
            Some(timeout) => RequestContext::with_timeout(timeout),
            None => RequestContext::background(),
        };
        ctx.with_cancellation(self.shutdown.clone())
    }
}

/// Client settings and timeout for the in-process store, taken from the
/// configuration file when one was given
fn in_memory_settings(config: Option<&NosqlConfig>) -> (ClientSettings, Option<Duration>) {
    match config {
        Some(config) => (ClientSettings::from(config), config.cosmosdb.request_timeout()),
        None => (ClientSettings::default(), Some(DEFAULT_TIMEOUT)),
    }
}

impl DemoArgs {
    /// Execute the demo command
    pub async fn execute(
        &self,
        config_path: Option<&str>,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        let (admin, timeout) = match self.connect(config_path) {
            Ok(connected) => connected,
            Err(e) => {
                tracing::error!(error = %e, "Failed to set up client");
                println!("❌ {e}");
                return Ok(exit_code_for(&e));
            }
        };

        let field = match self.partition_key_field() {
            Ok(field) => field,
            Err(e) => {
                println!("❌ {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        println!("🚀 Running demo against {}", admin.endpoint());
        println!();

        let contexts = ContextFactory {
            timeout,
            shutdown: shutdown_signal,
        };

        match self.run(&admin, &contexts, &field).await {
            Ok(()) => {
                println!();
                println!("✅ Demo completed");
                Ok(EXIT_OK)
            }
            Err(e) => {
                tracing::error!(error = %e, "Demo failed");
                println!("❌ Demo failed: {e}");
                Ok(exit_code_for(&e))
            }
        }
    }

    fn connect(&self, config_path: Option<&str>) -> Result<(DatabaseAdmin, Option<Duration>)> {
        if self.in_memory {
            let config = config_path.map(|path| resolve_config(Some(path))).transpose()?;
            let (settings, timeout) = in_memory_settings(config.as_ref());
            let admin = DatabaseAdmin::with_backend(Arc::new(InMemoryBackend::new()), settings);
            return Ok((admin, timeout));
        }

        let config = resolve_config(config_path)?;
        let admin = DatabaseAdmin::connect(&config)?;
        Ok((admin, config.cosmosdb.request_timeout()))
    }

    /// The demo item carries its partition key as a top-level field
    fn partition_key_field(&self) -> Result<String> {
        let path = PartitionKeyPath::new(self.partition_key.as_str())?;
        let field = path.field_name();
        if field.contains('/') {
            return Err(NosqlError::Validation(format!(
                "The demo only supports top-level partition key paths, got '{path}'"
            )));
        }
        Ok(field.to_string())
    }

    fn item(&self, field: &str, id: &str, name: &str) -> Value {
        let mut item = Map::new();
        item.insert("id".to_string(), json!(id));
        item.insert(field.to_string(), json!(self.email));
        item.insert("name".to_string(), json!(name));
        Value::Object(item)
    }

    async fn run(
        &self,
        admin: &DatabaseAdmin,
        contexts: &ContextFactory,
        field: &str,
    ) -> Result<()> {
        let outcome = admin.create_database(&contexts.next(), &self.database).await?;
        println!("  Database '{}': {}", self.database, describe(outcome.is_created()));

        let outcome = admin
            .create_container(
                &contexts.next(),
                &self.database,
                &self.container,
                &[self.partition_key.as_str()],
            )
            .await?;
        println!("  Container '{}': {}", self.container, describe(outcome.is_created()));

        let container = admin.container_client(&self.database, &self.container)?;
        let id = uuid::Uuid::new_v4().to_string();

        self.item_sequence(&container, contexts, field, &id).await
    }

    async fn item_sequence(
        &self,
        container: &ContainerClient,
        contexts: &ContextFactory,
        field: &str,
        id: &str,
    ) -> Result<()> {
        let item = self.item(field, id, "John Doe");
        let outcome = container
            .create_item(&contexts.next(), &item, self.email.as_str())
            .await?;
        println!("  Item '{id}': {}", describe(outcome.is_created()));

        let raw = container
            .read_item(&contexts.next(), self.email.as_str(), id)
            .await?;
        println!("  Item read: {}", Value::Object(raw));

        let decoded: DemoItem = container
            .read_item_as(&contexts.next(), self.email.as_str(), id)
            .await?;
        println!("  Item decoded: id={} name={}", decoded.id, decoded.name);

        let replacement = self.item(field, id, "Jane Doe");
        let diagnostics = container
            .replace_item(&contexts.next(), &replacement, self.email.as_str(), id)
            .await?;
        println!(
            "  Item replaced ({:.2} RU)",
            diagnostics.charge()
        );

        let reread: DemoItem = container
            .read_item_as(&contexts.next(), self.email.as_str(), id)
            .await?;
        println!("  Item after replace: name={}", reread.name);

        if self.cleanup {
            container
                .delete_item(&contexts.next(), self.email.as_str(), id)
                .await?;
            println!("  Item deleted");
        }

        Ok(())
    }
}

fn describe(created: bool) -> &'static str {
    if created {
        "created"
    } else {
        "already exists"
    }
}
