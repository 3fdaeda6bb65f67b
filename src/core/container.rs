//! Item operations scoped to one container

use crate::adapters::database::{ContainerRef, DocumentBackend, Operation, WriteOptions};
use crate::core::admin::ClientSettings;
use crate::core::context::RequestContext;
use crate::core::policy::{resolve_create, IdempotentCreatePolicy};
use crate::core::retry::with_retry;
use crate::domain::document::{document_id, from_document, to_document};
use crate::domain::ids::{ItemId, PartitionKeyValue};
use crate::domain::{CreateOutcome, Document, ResponseDiagnostics, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

/// Client bound to a (database, container) pair
///
/// Items are addressed by (partition key value, id). Obtained from
/// [`DatabaseAdmin::container_client`](crate::core::DatabaseAdmin::container_client).
#[derive(Clone)]
pub struct ContainerClient {
    backend: Arc<dyn DocumentBackend>,
    target: ContainerRef,
    settings: ClientSettings,
    policy: Arc<dyn IdempotentCreatePolicy>,
}

impl ContainerClient {
    pub(crate) fn new(
        backend: Arc<dyn DocumentBackend>,
        target: ContainerRef,
        settings: ClientSettings,
        policy: Arc<dyn IdempotentCreatePolicy>,
    ) -> Self {
        Self {
            backend,
            target,
            settings,
            policy,
        }
    }

    /// Name of the bound database
    pub fn database_name(&self) -> &str {
        self.target.database.as_str()
    }

    /// Name of the bound container
    pub fn container_name(&self) -> &str {
        self.target.container.as_str()
    }

    /// Create an item, treating "already exists" as success
    ///
    /// The item must serialize to a JSON object with a string `id` field;
    /// otherwise a serialization error is returned without contacting the
    /// service. The configured consistency level is sent with the request.
    pub async fn create_item<T>(
        &self,
        ctx: &RequestContext,
        item: &T,
        partition_key: impl Into<PartitionKeyValue>,
    ) -> Result<CreateOutcome>
    where
        T: Serialize + ?Sized,
    {
        let partition_key = partition_key.into();
        let document = to_document(item)?;
        let id = document_id(&document)?;
        let operation = Operation::CreateItem;
        let options = WriteOptions {
            consistency_level: Some(self.settings.consistency_level),
        };

        let result = ctx
            .run(
                operation.as_str(),
                with_retry(&self.settings.retry, operation, || {
                    self.backend
                        .create_item(&self.target, &partition_key, document.clone(), options)
                }),
            )
            .await;

        let resource = format!("{}/{id}", self.target);
        let outcome = resolve_create(self.policy.as_ref(), operation, &resource, result)?;
        if let Some(diagnostics) = outcome.diagnostics() {
            crate::log_operation!(operation, self.target, partition_key, id, diagnostics);
        }
        Ok(outcome)
    }

    /// Read an item as a raw document
    ///
    /// A missing item is returned as a NotFound error, as is an item read
    /// with the right id under a different partition key.
    pub async fn read_item(
        &self,
        ctx: &RequestContext,
        partition_key: impl Into<PartitionKeyValue>,
        id: &str,
    ) -> Result<Document> {
        let partition_key = partition_key.into();
        let id = ItemId::new(id)?;
        let operation = Operation::ReadItem;

        let (document, diagnostics) = ctx
            .run(
                operation.as_str(),
                with_retry(&self.settings.retry, operation, || {
                    self.backend.read_item(&self.target, &partition_key, &id)
                }),
            )
            .await?;

        crate::log_operation!(operation, self.target, partition_key, id, diagnostics);
        Ok(document)
    }

    /// Read an item and decode it into `T`
    pub async fn read_item_as<T: DeserializeOwned>(
        &self,
        ctx: &RequestContext,
        partition_key: impl Into<PartitionKeyValue>,
        id: &str,
    ) -> Result<T> {
        let document = self.read_item(ctx, partition_key, id).await?;
        from_document(document)
    }

    /// Overwrite an existing item
    ///
    /// The item's own `id` and partition key field are not compared with the
    /// addressing values.
    pub async fn replace_item<T>(
        &self,
        ctx: &RequestContext,
        item: &T,
        partition_key: impl Into<PartitionKeyValue>,
        id: &str,
    ) -> Result<ResponseDiagnostics>
    where
        T: Serialize + ?Sized,
    {
        let partition_key = partition_key.into();
        let id = ItemId::new(id)?;
        let document = to_document(item)?;
        let operation = Operation::ReplaceItem;

        let diagnostics = ctx
            .run(
                operation.as_str(),
                with_retry(&self.settings.retry, operation, || {
                    self.backend
                        .replace_item(&self.target, &partition_key, &id, document.clone())
                }),
            )
            .await?;

        crate::log_operation!(operation, self.target, partition_key, id, diagnostics);
        Ok(diagnostics)
    }

    /// Delete an item
    pub async fn delete_item(
        &self,
        ctx: &RequestContext,
        partition_key: impl Into<PartitionKeyValue>,
        id: &str,
    ) -> Result<ResponseDiagnostics> {
        let partition_key = partition_key.into();
        let id = ItemId::new(id)?;
        let operation = Operation::DeleteItem;

        let diagnostics = ctx
            .run(
                operation.as_str(),
                with_retry(&self.settings.retry, operation, || {
                    self.backend.delete_item(&self.target, &partition_key, &id)
                }),
            )
            .await?;

        crate::log_operation!(operation, self.target, partition_key, id, diagnostics);
        Ok(diagnostics)
    }
}

impl std::fmt::Debug for ContainerClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContainerClient")
            .field("target", &self.target)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
