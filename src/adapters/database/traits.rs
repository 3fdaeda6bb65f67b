//! Document store abstraction traits
//!
//! This module defines the trait that storage backends must implement to sit
//! behind [`DatabaseAdmin`](crate::core::DatabaseAdmin) and
//! [`ContainerClient`](crate::core::ContainerClient).
//!
//! Backends report service outcomes faithfully: an existing resource is a
//! `Conflict` error, a missing one is `NotFound`. Idempotency, retries and
//! deadlines are applied above this layer.

use crate::config::ConsistencyLevel;
use crate::domain::ids::{ContainerName, DatabaseName, ItemId, PartitionKeyPath, PartitionKeyValue};
use crate::domain::{Document, ResponseDiagnostics, Result};
use async_trait::async_trait;
use std::fmt;

/// Remote operation kinds, used for logging and fault injection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    CreateDatabase,
    CreateContainer,
    CreateItem,
    ReadItem,
    ReplaceItem,
    DeleteItem,
}

impl Operation {
    /// Stable name used in log records
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::CreateDatabase => "create_database",
            Operation::CreateContainer => "create_container",
            Operation::CreateItem => "create_item",
            Operation::ReadItem => "read_item",
            Operation::ReplaceItem => "replace_item",
            Operation::DeleteItem => "delete_item",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Address of a container: (database, container)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContainerRef {
    pub database: DatabaseName,
    pub container: ContainerName,
}

impl ContainerRef {
    pub fn new(database: DatabaseName, container: ContainerName) -> Self {
        Self {
            database,
            container,
        }
    }
}

impl fmt::Display for ContainerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.database, self.container)
    }
}

/// Definition of a container to create
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerDefinition {
    /// Container name
    pub name: ContainerName,

    /// Ordered partition key paths (non-empty)
    pub partition_key_paths: Vec<PartitionKeyPath>,

    /// Manual request units, `None` for shared/serverless throughput
    pub request_units: Option<usize>,
}

/// Per-request write options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteOptions {
    /// Consistency level override, `None` for the account default
    pub consistency_level: Option<ConsistencyLevel>,
}

/// Document store trait
///
/// Each method issues exactly one logical request and returns the service's
/// response metadata.
#[async_trait]
pub trait DocumentBackend: Send + Sync {
    /// Endpoint this backend talks to, for diagnostics
    fn endpoint(&self) -> &str;

    /// Create a database
    ///
    /// # Errors
    ///
    /// Returns `Conflict` if the database already exists.
    async fn create_database(&self, database: &DatabaseName) -> Result<ResponseDiagnostics>;

    /// Create a container inside an existing database
    ///
    /// # Errors
    ///
    /// Returns `Conflict` if the container already exists, `NotFound` if the
    /// database does not.
    async fn create_container(
        &self,
        database: &DatabaseName,
        definition: &ContainerDefinition,
    ) -> Result<ResponseDiagnostics>;

    /// Create an item
    ///
    /// # Errors
    ///
    /// Returns `Conflict` if an item with the same id exists in the partition.
    async fn create_item(
        &self,
        target: &ContainerRef,
        partition_key: &PartitionKeyValue,
        document: Document,
        options: WriteOptions,
    ) -> Result<ResponseDiagnostics>;

    /// Read an item by partition key and id
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no such item exists in the partition.
    async fn read_item(
        &self,
        target: &ContainerRef,
        partition_key: &PartitionKeyValue,
        id: &ItemId,
    ) -> Result<(Document, ResponseDiagnostics)>;

    /// Replace an item with a new full document
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no such item exists in the partition.
    async fn replace_item(
        &self,
        target: &ContainerRef,
        partition_key: &PartitionKeyValue,
        id: &ItemId,
        document: Document,
    ) -> Result<ResponseDiagnostics>;

    /// Delete an item
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no such item exists in the partition.
    async fn delete_item(
        &self,
        target: &ContainerRef,
        partition_key: &PartitionKeyValue,
        id: &ItemId,
    ) -> Result<ResponseDiagnostics>;
}
