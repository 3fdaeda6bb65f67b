//! Domain error types
//!
//! This module defines the error hierarchy for cosmos-nosql.
//! All errors are domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main error type
///
/// This is the primary error type used throughout the crate.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum NosqlError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Cosmos DB-related errors
    #[error("Cosmos DB error: {0}")]
    CosmosDb(#[from] CosmosDbError),

    /// Validation errors (names, paths, identifiers)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Authentication errors
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Network/connection errors
    #[error("Connection error: {0}")]
    Connection(String),

    /// The request deadline elapsed before the service answered
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// The caller cancelled the request
    #[error("Request cancelled: {0}")]
    Cancelled(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Cosmos DB-specific errors
///
/// Each variant corresponds to a class of service response. The HTTP status
/// is kept so that [`ErrorCode`] can be recovered without parsing messages.
#[derive(Debug, Error)]
pub enum CosmosDbError {
    /// Conflict error (409)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Resource not found (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Throttling error (429)
    #[error("Request rate too large (429): {0}")]
    Throttled(String),

    /// Authentication failed (401/403)
    #[error("Authentication failed ({status}): {message}")]
    AuthenticationFailed { status: u16, message: String },

    /// Malformed request (400)
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Service-side request timeout (408)
    #[error("Request timeout (408): {0}")]
    RequestTimeout(String),

    /// Service temporarily unavailable (503)
    #[error("Service unavailable (503): {0}")]
    ServiceUnavailable(String),

    /// Other server error (5xx)
    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    /// Any other non-success status
    #[error("Request failed: {status} - {message}")]
    RequestFailed { status: u16, message: String },

    /// Failed to deserialize response
    #[error("Failed to deserialize response: {0}")]
    DeserializationFailed(String),
}

impl CosmosDbError {
    /// Classifies a service response status into an error variant
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match ErrorCode::from_status(status) {
            ErrorCode::Conflict => CosmosDbError::Conflict(message),
            ErrorCode::NotFound => CosmosDbError::NotFound(message),
            ErrorCode::Throttled => CosmosDbError::Throttled(message),
            ErrorCode::Unauthorized | ErrorCode::Forbidden => {
                CosmosDbError::AuthenticationFailed { status, message }
            }
            ErrorCode::BadRequest => CosmosDbError::BadRequest(message),
            ErrorCode::RequestTimeout => CosmosDbError::RequestTimeout(message),
            ErrorCode::ServiceUnavailable => CosmosDbError::ServiceUnavailable(message),
            ErrorCode::InternalServerError => CosmosDbError::ServerError { status, message },
            ErrorCode::Other(s) if (500..600).contains(&s) => {
                CosmosDbError::ServerError { status, message }
            }
            ErrorCode::Other(_) => CosmosDbError::RequestFailed { status, message },
        }
    }

    /// Structured code for this error, if it came from a service response
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            CosmosDbError::Conflict(_) => Some(ErrorCode::Conflict),
            CosmosDbError::NotFound(_) => Some(ErrorCode::NotFound),
            CosmosDbError::Throttled(_) => Some(ErrorCode::Throttled),
            CosmosDbError::AuthenticationFailed { status, .. }
            | CosmosDbError::ServerError { status, .. }
            | CosmosDbError::RequestFailed { status, .. } => Some(ErrorCode::from_status(*status)),
            CosmosDbError::BadRequest(_) => Some(ErrorCode::BadRequest),
            CosmosDbError::RequestTimeout(_) => Some(ErrorCode::RequestTimeout),
            CosmosDbError::ServiceUnavailable(_) => Some(ErrorCode::ServiceUnavailable),
            CosmosDbError::DeserializationFailed(_) => None,
        }
    }
}

/// Structured service error code
///
/// Decouples error handling policy from the numeric status literals of a
/// particular client library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    RequestTimeout,
    Conflict,
    Throttled,
    InternalServerError,
    ServiceUnavailable,
    Other(u16),
}

impl ErrorCode {
    /// Maps an HTTP status to a code
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => ErrorCode::BadRequest,
            401 => ErrorCode::Unauthorized,
            403 => ErrorCode::Forbidden,
            404 => ErrorCode::NotFound,
            408 => ErrorCode::RequestTimeout,
            409 => ErrorCode::Conflict,
            429 => ErrorCode::Throttled,
            500 => ErrorCode::InternalServerError,
            503 => ErrorCode::ServiceUnavailable,
            other => ErrorCode::Other(other),
        }
    }

    /// HTTP status carried by this code
    pub fn status(&self) -> u16 {
        match self {
            ErrorCode::BadRequest => 400,
            ErrorCode::Unauthorized => 401,
            ErrorCode::Forbidden => 403,
            ErrorCode::NotFound => 404,
            ErrorCode::RequestTimeout => 408,
            ErrorCode::Conflict => 409,
            ErrorCode::Throttled => 429,
            ErrorCode::InternalServerError => 500,
            ErrorCode::ServiceUnavailable => 503,
            ErrorCode::Other(status) => *status,
        }
    }
}

impl NosqlError {
    /// Structured code of the underlying service error, if any
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            NosqlError::CosmosDb(e) => e.code(),
            _ => None,
        }
    }

    /// Returns `true` for "resource already exists" responses
    pub fn is_conflict(&self) -> bool {
        self.code() == Some(ErrorCode::Conflict)
    }

    /// Returns `true` when the addressed resource does not exist
    pub fn is_not_found(&self) -> bool {
        self.code() == Some(ErrorCode::NotFound)
    }

    /// Whether retrying the same request may succeed
    ///
    /// Only transient conditions qualify: throttling, service-side timeouts,
    /// temporary unavailability and transport failures.
    pub fn is_retryable(&self) -> bool {
        match self {
            NosqlError::Connection(_) => true,
            NosqlError::CosmosDb(e) => matches!(
                e.code(),
                Some(ErrorCode::Throttled)
                    | Some(ErrorCode::RequestTimeout)
                    | Some(ErrorCode::ServiceUnavailable)
            ),
            _ => false,
        }
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for NosqlError {
    fn from(err: std::io::Error) -> Self {
        NosqlError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for NosqlError {
    fn from(err: serde_json::Error) -> Self {
        NosqlError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for NosqlError {
    fn from(err: toml::de::Error) -> Self {
        NosqlError::Configuration(format!("TOML parse error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_nosql_error_display() {
        let err = NosqlError::Configuration("Invalid config".to_string());
        assert_eq!(err.to_string(), "Configuration error: Invalid config");
    }

    #[test]
    fn test_cosmosdb_error_conversion() {
        let cosmos_err = CosmosDbError::Throttled("5 seconds".to_string());
        let err: NosqlError = cosmos_err.into();
        assert!(matches!(err, NosqlError::CosmosDb(_)));
    }

    #[test_case(409, ErrorCode::Conflict ; "conflict")]
    #[test_case(404, ErrorCode::NotFound ; "not found")]
    #[test_case(429, ErrorCode::Throttled ; "throttled")]
    #[test_case(503, ErrorCode::ServiceUnavailable ; "unavailable")]
    #[test_case(502, ErrorCode::Other(502) ; "bad gateway")]
    fn test_from_status_round_trips_code(status: u16, expected: ErrorCode) {
        let err = CosmosDbError::from_status(status, "boom");
        assert_eq!(err.code(), Some(expected));
        assert_eq!(expected.status(), status);
    }

    #[test]
    fn test_unknown_5xx_is_server_error() {
        let err = CosmosDbError::from_status(502, "bad gateway");
        assert!(matches!(err, CosmosDbError::ServerError { status: 502, .. }));
    }

    #[test]
    fn test_unknown_4xx_is_request_failed() {
        let err = CosmosDbError::from_status(413, "too large");
        assert!(matches!(err, CosmosDbError::RequestFailed { status: 413, .. }));
    }

    #[test]
    fn test_conflict_detection_uses_code() {
        let err: NosqlError = CosmosDbError::from_status(409, "exists").into();
        assert!(err.is_conflict());
        assert!(!err.is_not_found());

        // Message text mentioning a conflict is not a conflict
        let err = NosqlError::Other("409 Conflict".to_string());
        assert!(!err.is_conflict());
    }

    #[test_case(429, true ; "throttled is retryable")]
    #[test_case(408, true ; "request timeout is retryable")]
    #[test_case(503, true ; "unavailable is retryable")]
    #[test_case(500, false ; "internal error is permanent")]
    #[test_case(404, false ; "not found is permanent")]
    #[test_case(409, false ; "conflict is permanent")]
    fn test_is_retryable(status: u16, expected: bool) {
        let err: NosqlError = CosmosDbError::from_status(status, "x").into();
        assert_eq!(err.is_retryable(), expected);
    }

    #[test]
    fn test_connection_error_is_retryable() {
        assert!(NosqlError::Connection("reset".to_string()).is_retryable());
        assert!(!NosqlError::Serialization("bad".to_string()).is_retryable());
        assert!(!NosqlError::Timeout("late".to_string()).is_retryable());
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: NosqlError = json_err.into();
        assert!(matches!(err, NosqlError::Serialization(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let err: NosqlError = toml_err.into();
        assert!(matches!(err, NosqlError::Configuration(_)));
        assert!(err.to_string().contains("TOML parse error"));
    }

    #[test]
    fn test_nosql_error_implements_std_error() {
        let err = NosqlError::Validation("Test error".to_string());
        let _: &dyn std::error::Error = &err;
    }
}
