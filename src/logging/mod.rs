//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Console output with configurable log levels
//! - Local JSON file logging with rotation
//! - One structured record per completed remote operation ([`log_operation!`])
//!
//! # Example
//!
//! ```no_run
//! use cosmos_nosql::logging::init_logging;
//! use cosmos_nosql::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

// Re-export commonly used items
pub use structured::{init_logging, LoggingGuard};

/// Log a completed remote operation with its response diagnostics
///
/// The three-argument form is for admin operations addressed by a resource
/// name; the five-argument form is for item operations addressed by
/// (container, partition key, id).
///
/// # Example
///
/// ```no_run
/// use cosmos_nosql::log_operation;
/// use cosmos_nosql::adapters::database::Operation;
/// use cosmos_nosql::domain::ResponseDiagnostics;
///
/// let diagnostics = ResponseDiagnostics::new(201, Some("a1b2"), Some("5.71"));
/// log_operation!(Operation::CreateDatabase, "testdb", &diagnostics);
/// log_operation!(Operation::CreateItem, "testdb/people", "john@doe.com", "1", &diagnostics);
/// ```
#[macro_export]
macro_rules! log_operation {
    ($operation:expr, $resource:expr, $diagnostics:expr) => {
        tracing::info!(
            operation = %$operation,
            resource = %$resource,
            status = $diagnostics.status,
            activity_id = %$diagnostics.activity(),
            request_charge = $diagnostics.charge(),
            "Operation completed"
        );
    };
    ($operation:expr, $container:expr, $partition_key:expr, $id:expr, $diagnostics:expr) => {
        tracing::info!(
            operation = %$operation,
            container = %$container,
            partition_key = %$partition_key,
            id = %$id,
            status = $diagnostics.status,
            activity_id = %$diagnostics.activity(),
            request_charge = $diagnostics.charge(),
            "Operation completed"
        );
    };
}

#[cfg(test)]
mod tests {
    use crate::adapters::database::Operation;
    use crate::domain::ResponseDiagnostics;

    #[test]
    fn test_log_operation_without_subscriber() {
        let diagnostics = ResponseDiagnostics::new(200, None, None);
        log_operation!(Operation::ReadItem, "db/c", "pk", "id", &diagnostics);
        log_operation!(Operation::CreateDatabase, "db", &diagnostics);
    }
}
