//! Core facade for cosmos-nosql.
//!
//! # Modules
//!
//! - [`admin`] - [`DatabaseAdmin`]: idempotent database and container creation
//! - [`container`] - [`ContainerClient`]: item create/read/replace/delete
//! - [`policy`] - Which create failures count as "already exists"
//! - [`context`] - Per-call deadline and cancellation
//! - [`retry`] - Exponential backoff for transient failures
//!
//! # Workflow
//!
//! 1. **Connect**: build a [`DatabaseAdmin`] from configuration
//! 2. **Ensure database**: create it, or accept that it already exists
//! 3. **Ensure container**: same, with partition key and throughput
//! 4. **Bind**: derive a [`ContainerClient`] for the container
//! 5. **Items**: create, read, replace and delete by (partition key, id)
//!
//! # Example
//!
//! ```rust,no_run
//! use cosmos_nosql::config::load_from_env;
//! use cosmos_nosql::core::{DatabaseAdmin, RequestContext};
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_from_env()?;
//! let admin = DatabaseAdmin::connect(&config)?;
//! let ctx = RequestContext::background();
//!
//! admin.create_database(&ctx, "testdb").await?;
//! admin.create_container(&ctx, "testdb", "testcontainer", &["/email"]).await?;
//!
//! let container = admin.container_client("testdb", "testcontainer")?;
//! let item = json!({"id": "1", "email": "john@doe.com", "name": "John Doe"});
//! container.create_item(&ctx, &item, "john@doe.com").await?;
//!
//! let stored = container.read_item(&ctx, "john@doe.com", "1").await?;
//! println!("{}", stored["name"]);
//! # Ok(())
//! # }
//! ```

pub mod admin;
pub mod container;
pub mod context;
pub mod policy;
pub mod retry;

pub use admin::{ClientSettings, DatabaseAdmin};
pub use container::ContainerClient;
pub use context::RequestContext;
pub use policy::{ConflictAsSuccess, IdempotentCreatePolicy, StrictCreate};
