//! Process-local document backend
//!
//! Mirrors the service's addressing rules: databases hold containers, and a
//! container stores documents keyed by (partition key value, id). The same id
//! may exist in different partitions. Faults and latency can be injected to
//! exercise error handling.

use crate::adapters::database::traits::{
    ContainerDefinition, ContainerRef, DocumentBackend, Operation, WriteOptions,
};
use crate::domain::document::document_id;
use crate::domain::ids::{DatabaseName, ItemId, PartitionKeyPath, PartitionKeyValue};
use crate::domain::{CosmosDbError, Document, NosqlError, ResponseDiagnostics, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;
use uuid::Uuid;

const READ_CHARGE: f64 = 1.0;
const WRITE_CHARGE: f64 = 5.71;
const ADMIN_CHARGE: f64 = 1.0;

/// Snapshot of a stored container, for assertions
#[derive(Debug, Clone, PartialEq)]
pub struct ContainerInfo {
    pub partition_key_paths: Vec<String>,
    pub request_units: Option<usize>,
    pub item_count: usize,
}

#[derive(Debug, Default)]
struct Store {
    databases: HashMap<String, DatabaseEntry>,
}

#[derive(Debug, Default)]
struct DatabaseEntry {
    containers: HashMap<String, ContainerEntry>,
}

#[derive(Debug)]
struct ContainerEntry {
    partition_key_paths: Vec<PartitionKeyPath>,
    request_units: Option<usize>,
    items: HashMap<(String, String), Document>,
}

impl Store {
    fn container(&self, target: &ContainerRef) -> Result<&ContainerEntry> {
        self.databases
            .get(target.database.as_str())
            .ok_or_else(|| not_found(format!("Database '{}' does not exist", target.database)))?
            .containers
            .get(target.container.as_str())
            .ok_or_else(|| not_found(format!("Container '{target}' does not exist")))
    }

    fn container_mut(&mut self, target: &ContainerRef) -> Result<&mut ContainerEntry> {
        self.databases
            .get_mut(target.database.as_str())
            .ok_or_else(|| not_found(format!("Database '{}' does not exist", target.database)))?
            .containers
            .get_mut(target.container.as_str())
            .ok_or_else(|| not_found(format!("Container '{target}' does not exist")))
    }
}

#[derive(Debug, Clone, Copy)]
struct Fault {
    operation: Operation,
    status: u16,
}

/// In-memory implementation of [`DocumentBackend`]
///
/// # Example
///
/// ```
/// use cosmos_nosql::adapters::database::{DocumentBackend, Operation};
/// use cosmos_nosql::adapters::memory::InMemoryBackend;
/// use cosmos_nosql::domain::DatabaseName;
///
/// # async fn example() -> cosmos_nosql::domain::Result<()> {
/// let backend = InMemoryBackend::new();
/// backend.fail_next(Operation::CreateDatabase, 503).await;
///
/// let db = DatabaseName::new("testdb")?;
/// assert!(backend.create_database(&db).await.is_err());
/// assert!(backend.create_database(&db).await.is_ok());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    store: Mutex<Store>,
    faults: Mutex<VecDeque<Fault>>,
    latency: Option<Duration>,
    requests: AtomicU64,
}

impl InMemoryBackend {
    /// Create an empty backend
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every request by `latency` before it is served
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Make the next request of `operation` fail with `status`
    pub async fn fail_next(&self, operation: Operation, status: u16) {
        self.fail_times(operation, status, 1).await;
    }

    /// Make the next `times` requests of `operation` fail with `status`
    pub async fn fail_times(&self, operation: Operation, status: u16, times: usize) {
        let mut faults = self.faults.lock().await;
        for _ in 0..times {
            faults.push_back(Fault { operation, status });
        }
    }

    /// Number of requests received, including failed ones
    pub fn request_count(&self) -> u64 {
        self.requests.load(Ordering::SeqCst)
    }

    /// Whether a database exists
    pub async fn has_database(&self, database: &str) -> bool {
        self.store.lock().await.databases.contains_key(database)
    }

    /// Snapshot of a container, `None` if it does not exist
    pub async fn container_info(&self, database: &str, container: &str) -> Option<ContainerInfo> {
        let store = self.store.lock().await;
        let entry = store.databases.get(database)?.containers.get(container)?;
        Some(ContainerInfo {
            partition_key_paths: entry
                .partition_key_paths
                .iter()
                .map(|p| p.as_str().to_string())
                .collect(),
            request_units: entry.request_units,
            item_count: entry.items.len(),
        })
    }

    /// Counts a request, waits the configured latency, then applies any
    /// queued fault for this operation
    async fn begin(&self, operation: Operation) -> Result<()> {
        self.requests.fetch_add(1, Ordering::SeqCst);

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        let mut faults = self.faults.lock().await;
        if let Some(pos) = faults.iter().position(|f| f.operation == operation) {
            if let Some(fault) = faults.remove(pos) {
                return Err(CosmosDbError::from_status(
                    fault.status,
                    format!("Injected failure for {operation}"),
                )
                .into());
            }
        }
        Ok(())
    }
}

fn not_found(message: String) -> NosqlError {
    CosmosDbError::NotFound(message).into()
}

fn conflict(message: String) -> NosqlError {
    CosmosDbError::Conflict(message).into()
}

fn response(status: u16, charge: f64) -> ResponseDiagnostics {
    ResponseDiagnostics {
        status,
        activity_id: Some(Uuid::new_v4().to_string()),
        request_charge: Some(charge),
    }
}

/// Resolves a partition key path against a document (`/a/b` -> `doc.a.b`)
fn extract_partition_key<'a>(document: &'a Document, path: &PartitionKeyPath) -> Option<&'a Value> {
    let mut segments = path.field_name().split('/');
    let first = segments.next()?;
    segments.try_fold(document.get(first)?, |value, segment| value.get(segment))
}

/// The partition key supplied with a write must match the document's own value
fn check_partition_key(
    entry: &ContainerEntry,
    document: &Document,
    partition_key: &PartitionKeyValue,
) -> Result<()> {
    let [path] = entry.partition_key_paths.as_slice() else {
        return Ok(());
    };

    match extract_partition_key(document, path) {
        Some(Value::String(value)) if value == partition_key.as_str() => Ok(()),
        _ => Err(CosmosDbError::BadRequest(format!(
            "Partition key '{partition_key}' does not match the document value at '{path}'"
        ))
        .into()),
    }
}

#[async_trait]
impl DocumentBackend for InMemoryBackend {
    fn endpoint(&self) -> &str {
        "memory://local"
    }

    async fn create_database(&self, database: &DatabaseName) -> Result<ResponseDiagnostics> {
        self.begin(Operation::CreateDatabase).await?;
        let mut store = self.store.lock().await;

        if store.databases.contains_key(database.as_str()) {
            return Err(conflict(format!("Database '{database}' already exists")));
        }

        store
            .databases
            .insert(database.as_str().to_string(), DatabaseEntry::default());
        Ok(response(201, ADMIN_CHARGE))
    }

    async fn create_container(
        &self,
        database: &DatabaseName,
        definition: &ContainerDefinition,
    ) -> Result<ResponseDiagnostics> {
        self.begin(Operation::CreateContainer).await?;
        let mut store = self.store.lock().await;

        let db = store
            .databases
            .get_mut(database.as_str())
            .ok_or_else(|| not_found(format!("Database '{database}' does not exist")))?;

        if db.containers.contains_key(definition.name.as_str()) {
            return Err(conflict(format!(
                "Container '{database}/{}' already exists",
                definition.name
            )));
        }

        if definition.partition_key_paths.is_empty() {
            return Err(CosmosDbError::BadRequest(
                "A container requires a partition key definition".to_string(),
            )
            .into());
        }

        db.containers.insert(
            definition.name.as_str().to_string(),
            ContainerEntry {
                partition_key_paths: definition.partition_key_paths.clone(),
                request_units: definition.request_units,
                items: HashMap::new(),
            },
        );
        Ok(response(201, ADMIN_CHARGE))
    }

    async fn create_item(
        &self,
        target: &ContainerRef,
        partition_key: &PartitionKeyValue,
        document: Document,
        _options: WriteOptions,
    ) -> Result<ResponseDiagnostics> {
        self.begin(Operation::CreateItem).await?;
        let mut store = self.store.lock().await;
        let entry = store.container_mut(target)?;

        let id = document_id(&document)
            .map_err(|e| NosqlError::CosmosDb(CosmosDbError::BadRequest(e.to_string())))?;
        check_partition_key(entry, &document, partition_key)?;

        let key = (partition_key.as_str().to_string(), id.into_inner());
        if entry.items.contains_key(&key) {
            return Err(conflict(format!(
                "Item '{}' already exists in partition '{partition_key}'",
                key.1
            )));
        }

        entry.items.insert(key, document);
        Ok(response(201, WRITE_CHARGE))
    }

    async fn read_item(
        &self,
        target: &ContainerRef,
        partition_key: &PartitionKeyValue,
        id: &ItemId,
    ) -> Result<(Document, ResponseDiagnostics)> {
        self.begin(Operation::ReadItem).await?;
        let store = self.store.lock().await;
        let entry = store.container(target)?;

        let key = (partition_key.as_str().to_string(), id.as_str().to_string());
        let document = entry.items.get(&key).cloned().ok_or_else(|| {
            not_found(format!("Item '{id}' not found in partition '{partition_key}'"))
        })?;

        Ok((document, response(200, READ_CHARGE)))
    }

    async fn replace_item(
        &self,
        target: &ContainerRef,
        partition_key: &PartitionKeyValue,
        id: &ItemId,
        document: Document,
    ) -> Result<ResponseDiagnostics> {
        self.begin(Operation::ReplaceItem).await?;
        let mut store = self.store.lock().await;
        let entry = store.container_mut(target)?;
        check_partition_key(entry, &document, partition_key)?;

        let key = (partition_key.as_str().to_string(), id.as_str().to_string());
        let slot = entry.items.get_mut(&key).ok_or_else(|| {
            not_found(format!("Item '{id}' not found in partition '{partition_key}'"))
        })?;

        *slot = document;
        Ok(response(200, WRITE_CHARGE))
    }

    async fn delete_item(
        &self,
        target: &ContainerRef,
        partition_key: &PartitionKeyValue,
        id: &ItemId,
    ) -> Result<ResponseDiagnostics> {
        self.begin(Operation::DeleteItem).await?;
        let mut store = self.store.lock().await;
        let entry = store.container_mut(target)?;

        let key = (partition_key.as_str().to_string(), id.as_str().to_string());
        entry.items.remove(&key).ok_or_else(|| {
            not_found(format!("Item '{id}' not found in partition '{partition_key}'"))
        })?;

        Ok(response(204, WRITE_CHARGE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ids::ContainerName;
    use crate::domain::ErrorCode;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    async fn setup() -> (InMemoryBackend, ContainerRef) {
        let backend = InMemoryBackend::new();
        let db = DatabaseName::new("testdb").unwrap();
        backend.create_database(&db).await.unwrap();
        backend
            .create_container(
                &db,
                &ContainerDefinition {
                    name: ContainerName::new("people").unwrap(),
                    partition_key_paths: vec![PartitionKeyPath::new("/email").unwrap()],
                    request_units: Some(400),
                },
            )
            .await
            .unwrap();
        let target = ContainerRef::new(db, ContainerName::new("people").unwrap());
        (backend, target)
    }

    #[tokio::test]
    async fn test_duplicate_database_conflicts() {
        let backend = InMemoryBackend::new();
        let db = DatabaseName::new("testdb").unwrap();

        let created = backend.create_database(&db).await.unwrap();
        assert_eq!(created.status, 201);
        assert!(created.activity_id.is_some());

        let err = backend.create_database(&db).await.unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::Conflict));
    }

    #[tokio::test]
    async fn test_container_requires_database() {
        let backend = InMemoryBackend::new();
        let err = backend
            .create_container(
                &DatabaseName::new("missing").unwrap(),
                &ContainerDefinition {
                    name: ContainerName::new("c").unwrap(),
                    partition_key_paths: vec![PartitionKeyPath::new("/pk").unwrap()],
                    request_units: None,
                },
            )
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_container_info_snapshot() {
        let (backend, _) = setup().await;
        let info = backend.container_info("testdb", "people").await.unwrap();
        assert_eq!(info.partition_key_paths, vec!["/email".to_string()]);
        assert_eq!(info.request_units, Some(400));
        assert_eq!(info.item_count, 0);
        assert!(backend.container_info("testdb", "other").await.is_none());
    }

    #[tokio::test]
    async fn test_same_id_in_different_partitions() {
        let (backend, target) = setup().await;
        let a = PartitionKeyValue::from("a@b.com");
        let b = PartitionKeyValue::from("c@d.com");

        backend
            .create_item(&target, &a, doc(json!({"id": "1", "email": "a@b.com"})), WriteOptions::default())
            .await
            .unwrap();
        backend
            .create_item(&target, &b, doc(json!({"id": "1", "email": "c@d.com"})), WriteOptions::default())
            .await
            .unwrap();

        let info = backend.container_info("testdb", "people").await.unwrap();
        assert_eq!(info.item_count, 2);
    }

    #[tokio::test]
    async fn test_partition_key_mismatch_is_bad_request() {
        let (backend, target) = setup().await;
        let err = backend
            .create_item(
                &target,
                &PartitionKeyValue::from("other@b.com"),
                doc(json!({"id": "1", "email": "a@b.com"})),
                WriteOptions::default(),
            )
            .await
            .unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::BadRequest));
    }

    #[test]
    fn test_nested_partition_key_path() {
        let document = doc(json!({"id": "1", "address": {"city": "Oslo"}}));
        let path = PartitionKeyPath::new("/address/city").unwrap();
        assert_eq!(extract_partition_key(&document, &path), Some(&json!("Oslo")));

        let path = PartitionKeyPath::new("/address/zip").unwrap();
        assert_eq!(extract_partition_key(&document, &path), None);
    }

    #[tokio::test]
    async fn test_injected_fault_targets_one_operation() {
        let (backend, target) = setup().await;
        backend.fail_next(Operation::ReadItem, 500).await;

        // Other operations are unaffected
        backend
            .create_item(
                &target,
                &PartitionKeyValue::from("a@b.com"),
                doc(json!({"id": "1", "email": "a@b.com"})),
                WriteOptions::default(),
            )
            .await
            .unwrap();

        let id = ItemId::new("1").unwrap();
        let pk = PartitionKeyValue::from("a@b.com");
        let err = backend.read_item(&target, &pk, &id).await.unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::InternalServerError));
        assert!(backend.read_item(&target, &pk, &id).await.is_ok());
    }

    #[tokio::test]
    async fn test_request_count() {
        let (backend, target) = setup().await;
        assert_eq!(backend.request_count(), 2);

        let _ = backend
            .delete_item(&target, &PartitionKeyValue::from("x"), &ItemId::new("x").unwrap())
            .await;
        assert_eq!(backend.request_count(), 3);
    }
}
