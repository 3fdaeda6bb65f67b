//! Cosmos DB backend implementation
//!
//! This module binds [`DocumentBackend`] to the Azure Cosmos DB SDK.

use crate::adapters::database::traits::{
    ContainerDefinition, ContainerRef, DocumentBackend, Operation, WriteOptions,
};
use crate::config::{ConsistencyLevel, CosmosDbConfig};
use crate::domain::ids::{DatabaseName, ItemId, PartitionKeyValue};
use crate::domain::{CosmosDbError, Document, NosqlError, ResponseDiagnostics, Result};
use async_trait::async_trait;
use azure_core::credentials::Secret;
use azure_core::error::ErrorKind;
use azure_core::http::headers::{HeaderName, Headers};
use azure_core::http::StatusCode;
use azure_data_cosmos::clients::ContainerClient;
use azure_data_cosmos::models::{
    ContainerProperties, IndexingPolicy, PartitionKeyDefinition, PartitionKeyKind,
    ThroughputProperties,
};
use azure_data_cosmos::{
    CosmosClient, CosmosClientOptions, CreateContainerOptions, ItemOptions, PartitionKey,
};
use std::borrow::Cow;

const ACTIVITY_ID: HeaderName = HeaderName::from_static("x-ms-activity-id");
const REQUEST_CHARGE: HeaderName = HeaderName::from_static("x-ms-request-charge");

/// Cosmos DB backend
///
/// Holds the SDK client built from the account endpoint and key. Database and
/// container clients are derived per call; they are cheap handles over the
/// same connection.
pub struct CosmosBackend {
    /// Cosmos DB client
    client: CosmosClient,

    /// Account endpoint
    endpoint: String,
}

impl CosmosBackend {
    /// Create a new Cosmos DB backend
    ///
    /// # Arguments
    ///
    /// * `config` - Cosmos DB configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the key is empty or the SDK client cannot be created.
    pub fn new(config: &CosmosDbConfig) -> Result<Self> {
        use secrecy::ExposeSecret;

        if config.key.expose_secret().is_blank() {
            return Err(NosqlError::Authentication(
                "Cosmos DB account key is empty".to_string(),
            ));
        }

        let key = Secret::new(config.key.expose_secret().as_ref().to_string());
        let options = Some(CosmosClientOptions::default());

        let client = CosmosClient::with_key(&config.endpoint, key, options).map_err(|e| {
            map_sdk_error("Failed to create Cosmos client".to_string(), e)
        })?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }

    fn container_client(&self, target: &ContainerRef) -> ContainerClient {
        self.client
            .database_client(target.database.as_str())
            .container_client(target.container.as_str())
    }
}

#[async_trait]
impl DocumentBackend for CosmosBackend {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn create_database(&self, database: &DatabaseName) -> Result<ResponseDiagnostics> {
        let response = self
            .client
            .create_database(database.as_str(), None)
            .await
            .map_err(|e| map_sdk_error(context(Operation::CreateDatabase, database), e))?;

        Ok(diagnostics(response.status(), response.headers()))
    }

    async fn create_container(
        &self,
        database: &DatabaseName,
        definition: &ContainerDefinition,
    ) -> Result<ResponseDiagnostics> {
        let paths: Vec<String> = definition
            .partition_key_paths
            .iter()
            .map(|p| p.as_str().to_string())
            .collect();

        // Hierarchical keys need the multi-hash kind and version 2
        let partition_key_def = if paths.len() > 1 {
            PartitionKeyDefinition {
                paths,
                kind: PartitionKeyKind::MultiHash,
                version: Some(2),
            }
        } else {
            PartitionKeyDefinition {
                paths,
                kind: PartitionKeyKind::Hash,
                version: None,
            }
        };

        let properties = ContainerProperties {
            id: Cow::Owned(definition.name.as_str().to_string()),
            partition_key: partition_key_def,
            indexing_policy: Some(IndexingPolicy::default()),
            ..Default::default()
        };

        let options = CreateContainerOptions {
            throughput: definition.request_units.map(ThroughputProperties::manual),
            ..Default::default()
        };

        let response = self
            .client
            .database_client(database.as_str())
            .create_container(properties, Some(options))
            .await
            .map_err(|e| {
                map_sdk_error(
                    context(
                        Operation::CreateContainer,
                        format_args!("{}/{}", database, definition.name),
                    ),
                    e,
                )
            })?;

        Ok(diagnostics(response.status(), response.headers()))
    }

    async fn create_item(
        &self,
        target: &ContainerRef,
        partition_key: &PartitionKeyValue,
        document: Document,
        options: WriteOptions,
    ) -> Result<ResponseDiagnostics> {
        let item_options = ItemOptions {
            consistency_level: options.consistency_level.map(sdk_consistency_level),
            ..Default::default()
        };

        let response = self
            .container_client(target)
            .create_item(
                PartitionKey::from(partition_key.as_str().to_string()),
                document,
                Some(item_options),
            )
            .await
            .map_err(|e| map_sdk_error(context(Operation::CreateItem, target), e))?;

        Ok(diagnostics(response.status(), response.headers()))
    }

    async fn read_item(
        &self,
        target: &ContainerRef,
        partition_key: &PartitionKeyValue,
        id: &ItemId,
    ) -> Result<(Document, ResponseDiagnostics)> {
        let response = self
            .container_client(target)
            .read_item::<Document>(
                PartitionKey::from(partition_key.as_str().to_string()),
                id.as_str(),
                None,
            )
            .await
            .map_err(|e| map_sdk_error(context(Operation::ReadItem, target), e))?;

        let diagnostics = diagnostics(response.status(), response.headers());
        let document = response.into_body().map_err(|e| {
            NosqlError::CosmosDb(CosmosDbError::DeserializationFailed(format!(
                "Failed to deserialize item {id}: {e}"
            )))
        })?;

        Ok((document, diagnostics))
    }

    async fn replace_item(
        &self,
        target: &ContainerRef,
        partition_key: &PartitionKeyValue,
        id: &ItemId,
        document: Document,
    ) -> Result<ResponseDiagnostics> {
        let response = self
            .container_client(target)
            .replace_item(
                PartitionKey::from(partition_key.as_str().to_string()),
                id.as_str(),
                document,
                None,
            )
            .await
            .map_err(|e| map_sdk_error(context(Operation::ReplaceItem, target), e))?;

        Ok(diagnostics(response.status(), response.headers()))
    }

    async fn delete_item(
        &self,
        target: &ContainerRef,
        partition_key: &PartitionKeyValue,
        id: &ItemId,
    ) -> Result<ResponseDiagnostics> {
        let response = self
            .container_client(target)
            .delete_item(
                PartitionKey::from(partition_key.as_str().to_string()),
                id.as_str(),
                None,
            )
            .await
            .map_err(|e| map_sdk_error(context(Operation::DeleteItem, target), e))?;

        Ok(diagnostics(response.status(), response.headers()))
    }
}

fn context(operation: Operation, resource: impl std::fmt::Display) -> String {
    format!("{operation} on {resource} failed")
}

fn diagnostics(status: StatusCode, headers: &Headers) -> ResponseDiagnostics {
    ResponseDiagnostics::new(
        u16::from(status),
        headers.get_optional_str(&ACTIVITY_ID),
        headers.get_optional_str(&REQUEST_CHARGE),
    )
}

/// Translates an SDK error into a domain error
///
/// Service responses are classified by their HTTP status; everything without
/// a status is a client-side failure.
fn map_sdk_error(context: String, error: azure_core::Error) -> NosqlError {
    if let Some(status) = error.http_status() {
        return CosmosDbError::from_status(u16::from(status), format!("{context}: {error}"))
            .into();
    }

    match error.kind() {
        ErrorKind::DataConversion => NosqlError::Serialization(format!("{context}: {error}")),
        ErrorKind::Credential => NosqlError::Authentication(format!("{context}: {error}")),
        _ => NosqlError::Connection(format!("{context}: {error}")),
    }
}

fn sdk_consistency_level(level: ConsistencyLevel) -> azure_data_cosmos::ConsistencyLevel {
    match level {
        ConsistencyLevel::Strong => azure_data_cosmos::ConsistencyLevel::Strong,
        ConsistencyLevel::BoundedStaleness => azure_data_cosmos::ConsistencyLevel::BoundedStaleness,
        ConsistencyLevel::Session => azure_data_cosmos::ConsistencyLevel::Session,
        ConsistencyLevel::ConsistentPrefix => azure_data_cosmos::ConsistencyLevel::ConsistentPrefix,
        ConsistencyLevel::Eventual => azure_data_cosmos::ConsistencyLevel::Eventual,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{secret_string, ThroughputConfig};

    fn config(key: &str) -> CosmosDbConfig {
        CosmosDbConfig {
            endpoint: "https://test.documents.azure.com:443/".to_string(),
            key: secret_string(key.to_string()),
            consistency_level: ConsistencyLevel::Session,
            throughput: ThroughputConfig::default(),
            request_timeout_seconds: 30,
        }
    }

    #[test]
    fn test_new_rejects_empty_key() {
        let result = CosmosBackend::new(&config(""));
        assert!(matches!(result, Err(NosqlError::Authentication(_))));
    }

    #[test]
    fn test_context_message() {
        let msg = context(Operation::ReadItem, "testdb/testcontainer");
        assert_eq!(msg, "read_item on testdb/testcontainer failed");
    }
}
