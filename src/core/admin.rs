//! Database and container administration

use crate::adapters::database::{
    create_backend, BackendTarget, ContainerDefinition, ContainerRef, DocumentBackend, Operation,
};
use crate::config::{ConsistencyLevel, NosqlConfig, RetryConfig, ThroughputConfig};
use crate::core::container::ContainerClient;
use crate::core::context::RequestContext;
use crate::core::policy::{resolve_create, ConflictAsSuccess, IdempotentCreatePolicy};
use crate::core::retry::with_retry;
use crate::domain::ids::{ContainerName, DatabaseName, PartitionKeyPath};
use crate::domain::{CreateOutcome, NosqlError, Result};
use std::sync::Arc;

/// Settings shared by the admin and every container client it derives
#[derive(Debug, Clone)]
pub struct ClientSettings {
    /// Throughput for new containers
    pub throughput: ThroughputConfig,

    /// Consistency level sent with item creates
    pub consistency_level: ConsistencyLevel,

    /// Backoff for transient failures
    pub retry: RetryConfig,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            throughput: ThroughputConfig::default(),
            consistency_level: ConsistencyLevel::Session,
            retry: RetryConfig::default(),
        }
    }
}

impl From<&NosqlConfig> for ClientSettings {
    fn from(config: &NosqlConfig) -> Self {
        Self {
            throughput: config.cosmosdb.throughput,
            consistency_level: config.cosmosdb.consistency_level,
            retry: config.retry.clone(),
        }
    }
}

/// Entry point of the facade
///
/// Creates databases and containers idempotently and hands out
/// [`ContainerClient`]s. Cloning is cheap; clones share the connection.
///
/// # Example
///
/// ```
/// use cosmos_nosql::adapters::memory::InMemoryBackend;
/// use cosmos_nosql::core::{ClientSettings, DatabaseAdmin, RequestContext};
/// use std::sync::Arc;
///
/// # async fn example() -> cosmos_nosql::domain::Result<()> {
/// let admin = DatabaseAdmin::with_backend(Arc::new(InMemoryBackend::new()), ClientSettings::default());
/// let ctx = RequestContext::background();
///
/// admin.create_database(&ctx, "testdb").await?;
/// admin.create_container(&ctx, "testdb", "testcontainer", &["/email"]).await?;
///
/// let container = admin.container_client("testdb", "testcontainer")?;
/// assert_eq!(container.container_name(), "testcontainer");
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct DatabaseAdmin {
    backend: Arc<dyn DocumentBackend>,
    settings: ClientSettings,
    policy: Arc<dyn IdempotentCreatePolicy>,
}

impl DatabaseAdmin {
    /// Connect to the Cosmos DB account described by `config`
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an invalid endpoint or empty key,
    /// and an authentication or connection error if the SDK client cannot be
    /// built.
    pub fn connect(config: &NosqlConfig) -> Result<Self> {
        config.validate().map_err(NosqlError::Configuration)?;

        let backend = create_backend(BackendTarget::CosmosDb, Some(&config.cosmosdb))?;

        tracing::info!(
            endpoint = %config.cosmosdb.endpoint,
            consistency_level = %config.cosmosdb.consistency_level,
            "Connected to Cosmos DB"
        );

        Ok(Self::with_backend(backend, ClientSettings::from(config)))
    }

    /// Wrap an existing backend
    pub fn with_backend(backend: Arc<dyn DocumentBackend>, settings: ClientSettings) -> Self {
        Self {
            backend,
            settings,
            policy: Arc::new(ConflictAsSuccess),
        }
    }

    /// Replace the idempotent-create policy
    pub fn with_policy(mut self, policy: Arc<dyn IdempotentCreatePolicy>) -> Self {
        self.policy = policy;
        self
    }

    /// Endpoint of the underlying backend
    pub fn endpoint(&self) -> &str {
        self.backend.endpoint()
    }

    /// Settings applied to new containers and item writes
    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    /// Create a database, treating "already exists" as success
    ///
    /// # Errors
    ///
    /// Returns a validation error for an invalid name; any service error not
    /// recovered by the policy is returned unmodified.
    pub async fn create_database(
        &self,
        ctx: &RequestContext,
        database: &str,
    ) -> Result<CreateOutcome> {
        let database = DatabaseName::new(database)?;
        let operation = Operation::CreateDatabase;

        let result = ctx
            .run(
                operation.as_str(),
                with_retry(&self.settings.retry, operation, || {
                    self.backend.create_database(&database)
                }),
            )
            .await;

        let outcome = resolve_create(self.policy.as_ref(), operation, &database, result)?;
        if let Some(diagnostics) = outcome.diagnostics() {
            crate::log_operation!(operation, database, diagnostics);
        }
        Ok(outcome)
    }

    /// Create a container, treating "already exists" as success
    ///
    /// Throughput comes from [`ClientSettings::throughput`].
    ///
    /// # Arguments
    ///
    /// * `database` - Parent database
    /// * `container` - Container name
    /// * `partition_key_paths` - Ordered partition key paths, e.g. `["/email"]`
    ///
    /// # Errors
    ///
    /// Returns a validation error for invalid names or paths; any service
    /// error not recovered by the policy is returned unmodified.
    pub async fn create_container<S: AsRef<str>>(
        &self,
        ctx: &RequestContext,
        database: &str,
        container: &str,
        partition_key_paths: &[S],
    ) -> Result<CreateOutcome> {
        let database = DatabaseName::new(database)?;
        let definition = ContainerDefinition {
            name: ContainerName::new(container)?,
            partition_key_paths: PartitionKeyPath::parse_all(partition_key_paths)?,
            request_units: self.settings.throughput.request_units(),
        };
        let target = ContainerRef::new(database.clone(), definition.name.clone());
        let operation = Operation::CreateContainer;

        let result = ctx
            .run(
                operation.as_str(),
                with_retry(&self.settings.retry, operation, || {
                    self.backend.create_container(&database, &definition)
                }),
            )
            .await;

        let outcome = resolve_create(self.policy.as_ref(), operation, &target, result)?;
        if let Some(diagnostics) = outcome.diagnostics() {
            crate::log_operation!(operation, target, diagnostics);
        }
        Ok(outcome)
    }

    /// Bind a client to an existing container
    ///
    /// Validates the names only; the container is not looked up remotely.
    pub fn container_client(&self, database: &str, container: &str) -> Result<ContainerClient> {
        let target = ContainerRef::new(DatabaseName::new(database)?, ContainerName::new(container)?);
        Ok(ContainerClient::new(
            Arc::clone(&self.backend),
            target,
            self.settings.clone(),
            Arc::clone(&self.policy),
        ))
    }
}

impl std::fmt::Debug for DatabaseAdmin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseAdmin")
            .field("endpoint", &self.backend.endpoint())
            .field("settings", &self.settings)
            .field("policy", &self.policy)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryBackend;
    use crate::config::{secret_string, ApplicationConfig, CosmosDbConfig, LoggingConfig};
    use crate::core::policy::StrictCreate;

    fn admin() -> (Arc<InMemoryBackend>, DatabaseAdmin) {
        let backend = Arc::new(InMemoryBackend::new());
        let admin = DatabaseAdmin::with_backend(backend.clone(), ClientSettings::default());
        (backend, admin)
    }

    #[tokio::test]
    async fn test_create_database_twice() {
        let (backend, admin) = admin();
        let ctx = RequestContext::background();

        assert!(admin.create_database(&ctx, "testdb").await.unwrap().is_created());
        assert_eq!(
            admin.create_database(&ctx, "testdb").await.unwrap(),
            CreateOutcome::AlreadyExists
        );
        assert!(backend.has_database("testdb").await);
    }

    #[tokio::test]
    async fn test_container_uses_configured_throughput() {
        let backend = Arc::new(InMemoryBackend::new());
        let settings = ClientSettings {
            throughput: ThroughputConfig::Manual { request_units: 1000 },
            ..ClientSettings::default()
        };
        let admin = DatabaseAdmin::with_backend(backend.clone(), settings);
        let ctx = RequestContext::background();

        admin.create_database(&ctx, "testdb").await.unwrap();
        admin
            .create_container(&ctx, "testdb", "people", &["/email"])
            .await
            .unwrap();

        let info = backend.container_info("testdb", "people").await.unwrap();
        assert_eq!(info.request_units, Some(1000));
    }

    #[tokio::test]
    async fn test_shared_throughput_sends_no_offer() {
        let backend = Arc::new(InMemoryBackend::new());
        let settings = ClientSettings {
            throughput: ThroughputConfig::Shared,
            ..ClientSettings::default()
        };
        let admin = DatabaseAdmin::with_backend(backend.clone(), settings);
        let ctx = RequestContext::background();

        admin.create_database(&ctx, "testdb").await.unwrap();
        admin
            .create_container(&ctx, "testdb", "people", &["/email"])
            .await
            .unwrap();

        let info = backend.container_info("testdb", "people").await.unwrap();
        assert_eq!(info.request_units, None);
    }

    #[tokio::test]
    async fn test_invalid_partition_key_path_is_local() {
        let (backend, admin) = admin();
        let ctx = RequestContext::background();

        let err = admin
            .create_container(&ctx, "testdb", "people", &["email"])
            .await
            .unwrap_err();
        assert!(matches!(err, NosqlError::Validation(_)));
        assert_eq!(backend.request_count(), 0);
    }

    #[tokio::test]
    async fn test_strict_policy_surfaces_conflict() {
        let (_, admin) = admin();
        let admin = admin.with_policy(Arc::new(StrictCreate));
        let ctx = RequestContext::background();

        admin.create_database(&ctx, "testdb").await.unwrap();
        let err = admin.create_database(&ctx, "testdb").await.unwrap_err();
        assert!(err.is_conflict());
    }

    #[test]
    fn test_container_client_validates_names() {
        let (_, admin) = admin();
        assert!(admin.container_client("testdb", "a#b").is_err());
        assert!(admin.container_client("", "c").is_err());
        assert!(admin.container_client("testdb", "c").is_ok());
    }

    fn connection_config(endpoint: &str, key: &str) -> NosqlConfig {
        NosqlConfig {
            application: ApplicationConfig::default(),
            cosmosdb: CosmosDbConfig {
                endpoint: endpoint.to_string(),
                key: secret_string(key.to_string()),
                consistency_level: ConsistencyLevel::Session,
                throughput: ThroughputConfig::default(),
                request_timeout_seconds: 30,
            },
            retry: RetryConfig::default(),
            logging: LoggingConfig::default(),
        }
    }

    #[test]
    fn test_connect_rejects_http_endpoint() {
        let config = connection_config("http://insecure.documents.azure.com", "a2V5");
        let err = DatabaseAdmin::connect(&config).unwrap_err();
        assert!(matches!(err, NosqlError::Configuration(_)));
    }

    #[test]
    fn test_connect_rejects_malformed_key() {
        let config = connection_config(
            "https://myaccount.documents.azure.com:443/",
            "this is !!! not base64",
        );
        let err = DatabaseAdmin::connect(&config).unwrap_err();
        match err {
            NosqlError::Configuration(message) => {
                assert!(message.contains("cosmosdb.key is not valid base64"))
            }
            other => panic!("expected a configuration error, got {other:?}"),
        }
    }
}
