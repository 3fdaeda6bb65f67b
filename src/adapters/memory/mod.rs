//! In-memory document store
//!
//! A process-local [`DocumentBackend`](crate::adapters::database::DocumentBackend)
//! for tests and offline runs.

pub mod backend;

pub use backend::{ContainerInfo, InMemoryBackend};
