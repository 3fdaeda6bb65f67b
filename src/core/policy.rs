//! Idempotent-create policy
//!
//! Decides whether a failed create means "the resource is already there".
//! The decision is made on the structured [`ErrorCode`], never on message text.

use crate::adapters::database::Operation;
use crate::domain::{CreateOutcome, ErrorCode, NosqlError, ResponseDiagnostics, Result};
use std::fmt;

/// Policy applied to errors returned by create operations
pub trait IdempotentCreatePolicy: Send + Sync + fmt::Debug {
    /// Returns `true` if `error` should be reported as
    /// [`CreateOutcome::AlreadyExists`](crate::domain::CreateOutcome::AlreadyExists)
    fn already_exists(&self, error: &NosqlError) -> bool;
}

/// Treats a 409 Conflict as success (default)
#[derive(Debug, Clone, Copy, Default)]
pub struct ConflictAsSuccess;

impl IdempotentCreatePolicy for ConflictAsSuccess {
    fn already_exists(&self, error: &NosqlError) -> bool {
        error.code() == Some(ErrorCode::Conflict)
    }
}

/// Surfaces every create failure, including conflicts
#[derive(Debug, Clone, Copy, Default)]
pub struct StrictCreate;

impl IdempotentCreatePolicy for StrictCreate {
    fn already_exists(&self, _error: &NosqlError) -> bool {
        false
    }
}

/// Settles a create result against `policy`
///
/// Recovered errors are logged and reported as `AlreadyExists`; all others
/// propagate unmodified.
pub(crate) fn resolve_create(
    policy: &dyn IdempotentCreatePolicy,
    operation: Operation,
    resource: &dyn fmt::Display,
    result: Result<ResponseDiagnostics>,
) -> Result<CreateOutcome> {
    match result {
        Ok(diagnostics) => Ok(CreateOutcome::Created(diagnostics)),
        Err(e) if policy.already_exists(&e) => {
            tracing::info!(
                operation = %operation,
                resource = %resource,
                "Resource already exists, nothing to create"
            );
            Ok(CreateOutcome::AlreadyExists)
        }
        Err(e) => Err(e),
    }
}
