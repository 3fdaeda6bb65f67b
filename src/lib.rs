// cosmos-nosql - Idempotent Azure Cosmos DB facade
// Copyright (c) 2025 cosmos-nosql Contributors
// Licensed under the MIT License

//! # cosmos-nosql
//!
//! A thin convenience layer over the Azure Cosmos DB SDK: create a database,
//! create a container, and create/read/replace/delete items. Authentication,
//! partition routing, consistency and transport stay in the SDK.
//!
//! ## Overview
//!
//! The layer owns one decision: creating something that already exists is
//! not an error. A 409 Conflict on database, container or item creation is
//! logged and reported as [`domain::CreateOutcome::AlreadyExists`]; every
//! other failure propagates unchanged.
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - The facade ([`core::DatabaseAdmin`], [`core::ContainerClient`])
//! - [`adapters`] - Backends (Cosmos DB, in-memory)
//! - [`domain`] - Identifiers, documents and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cosmos_nosql::config::load_from_env;
//! use cosmos_nosql::core::{DatabaseAdmin, RequestContext};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize)]
//! struct Person {
//!     id: String,
//!     email: String,
//!     name: String,
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // COSMOS_PATH and COSMOS_KEY
//!     let config = load_from_env()?;
//!     let admin = DatabaseAdmin::connect(&config)?;
//!     let ctx = RequestContext::background();
//!
//!     admin.create_database(&ctx, "testdb").await?;
//!     admin.create_container(&ctx, "testdb", "testcontainer", &["/email"]).await?;
//!
//!     let people = admin.container_client("testdb", "testcontainer")?;
//!     let person = Person {
//!         id: "1".into(),
//!         email: "john@doe.com".into(),
//!         name: "John Doe".into(),
//!     };
//!     people.create_item(&ctx, &person, &person.email).await?;
//!
//!     let stored: Person = people.read_item_as(&ctx, "john@doe.com", "1").await?;
//!     println!("{}", stored.name);
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! All fallible operations return [`domain::Result`]. Service errors carry an
//! [`domain::ErrorCode`], so callers match on codes rather than messages:
//!
//! ```rust
//! use cosmos_nosql::domain::{CosmosDbError, NosqlError};
//!
//! let err: NosqlError = CosmosDbError::from_status(404, "missing").into();
//! assert!(err.is_not_found());
//! assert!(!err.is_retryable());
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
