//! Azure Cosmos DB integration
//!
//! This module provides the [`DocumentBackend`](crate::adapters::database::DocumentBackend)
//! implementation backed by the Azure Cosmos DB SDK.

pub mod client;

pub use client::CosmosBackend;
