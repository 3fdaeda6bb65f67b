//! Backend factory
//!
//! This module provides a factory function to create a document backend based
//! on the selected target.

use crate::adapters::cosmosdb::CosmosBackend;
use crate::adapters::database::traits::DocumentBackend;
use crate::adapters::memory::InMemoryBackend;
use crate::config::CosmosDbConfig;
use crate::domain::{NosqlError, Result};
use std::sync::Arc;

/// Backend target selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendTarget {
    /// Azure Cosmos DB account
    CosmosDb,
    /// Process-local store, no network
    InMemory,
}

/// Create a document backend
///
/// # Arguments
///
/// * `target` - Which backend to build
/// * `config` - Cosmos DB configuration (required for [`BackendTarget::CosmosDb`])
///
/// # Errors
///
/// Returns an error if the Cosmos DB client cannot be created or the
/// configuration is missing.
pub fn create_backend(
    target: BackendTarget,
    config: Option<&CosmosDbConfig>,
) -> Result<Arc<dyn DocumentBackend>> {
    match target {
        BackendTarget::CosmosDb => {
            let config = config.ok_or_else(|| {
                NosqlError::Configuration(
                    "cosmosdb configuration is required for the Cosmos DB backend".to_string(),
                )
            })?;

            tracing::info!(endpoint = %config.endpoint, "Creating Cosmos DB backend");
            let backend = CosmosBackend::new(config)?;
            Ok(Arc::new(backend) as Arc<dyn DocumentBackend>)
        }
        BackendTarget::InMemory => {
            tracing::info!("Creating in-memory backend");
            Ok(Arc::new(InMemoryBackend::new()) as Arc<dyn DocumentBackend>)
        }
    }
}
