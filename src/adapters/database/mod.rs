//! Document store abstraction layer
//!
//! This module provides a trait-based abstraction for the remote operations,
//! allowing the facade to run against Azure Cosmos DB or the in-memory backend.

pub mod factory;
pub mod traits;

pub use factory::{create_backend, BackendTarget};
pub use traits::{ContainerDefinition, ContainerRef, DocumentBackend, Operation, WriteOptions};
