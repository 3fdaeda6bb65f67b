//! Domain types for cosmos-nosql.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`DatabaseName`], [`ContainerName`], [`ItemId`],
//!   [`PartitionKeyPath`], [`PartitionKeyValue`])
//! - **Document payloads** ([`Document`]) and response metadata ([`ResponseDiagnostics`])
//! - **Error types** ([`NosqlError`], [`CosmosDbError`], [`ErrorCode`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, NosqlError>`]. Service errors carry a
//! structured [`ErrorCode`] so callers never match on message text:
//!
//! ```rust
//! use cosmos_nosql::domain::{CosmosDbError, ErrorCode, NosqlError};
//!
//! let err: NosqlError = CosmosDbError::from_status(404, "missing").into();
//! assert_eq!(err.code(), Some(ErrorCode::NotFound));
//! ```

pub mod document;
pub mod errors;
pub mod ids;
pub mod result;

// Re-export commonly used types for convenience
pub use document::{CreateOutcome, Document, ResponseDiagnostics};
pub use errors::{CosmosDbError, ErrorCode, NosqlError};
pub use ids::{ContainerName, DatabaseName, ItemId, PartitionKeyPath, PartitionKeyValue};
pub use result::Result;
