//! Storage backends for cosmos-nosql.
//!
//! This module provides the implementations behind the facade:
//!
//! - [`database`] - Backend abstraction layer (trait-based)
//! - [`cosmosdb`] - Azure Cosmos DB implementation
//! - [`memory`] - In-memory implementation for tests and offline runs
//!
//! # Design Pattern
//!
//! Adapters follow the **Adapter Pattern** to isolate the Azure SDK and enable
//! testing without an account. [`DatabaseAdmin`](crate::core::DatabaseAdmin)
//! only ever sees a [`database::DocumentBackend`] trait object.
//!
//! ```rust
//! use cosmos_nosql::adapters::database::{create_backend, BackendTarget};
//!
//! let backend = create_backend(BackendTarget::InMemory, None).unwrap();
//! assert_eq!(backend.endpoint(), "memory://local");
//! ```

pub mod cosmosdb;
pub mod database;
pub mod memory;
