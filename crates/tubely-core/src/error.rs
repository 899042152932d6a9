//! Error types module
//!
//! All failures that can leave the upload pipeline are unified under
//! [`AppError`]. Each variant describes its own HTTP presentation through
//! [`ErrorMetadata`], so handlers never map status codes by hand.
//!
//! The `Database` variant carries a `sqlx::Error` when the `sqlx` feature is
//! enabled and a plain message otherwise.

use std::io;

#[cfg(feature = "sqlx")]
use sqlx::Error as SqlxError;

use crate::storage_ref::StorageRefError;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Expected errors like validation failures
    Debug,
    /// Recoverable issues
    Warn,
    /// Unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "PLACEMENT_FAILED")
    fn error_code(&self) -> &'static str;

    /// Whether this error is recoverable (can be retried by the client)
    fn is_recoverable(&self) -> bool;

    /// Suggested action for the client
    fn suggested_action(&self) -> Option<&'static str>;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details should be hidden in production
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    /// Covers a failing analysis tool, a file without a video stream and
    /// zero-sized geometry.
    #[error("Media introspection failed: {0}")]
    IntrospectionFailed(String),

    #[error("Fast-start transform failed: {0}")]
    TransformFailed(String),

    #[error("Object placement failed: {0}")]
    PlacementFailed(String),

    #[error("Failed to persist storage reference: {0}")]
    PersistFailed(String),

    #[error("Malformed storage reference: {0}")]
    MalformedReference(#[from] StorageRefError),

    #[cfg(feature = "sqlx")]
    #[error("Database error: {0}")]
    Database(#[source] SqlxError),

    #[cfg(not(feature = "sqlx"))]
    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

#[cfg(feature = "sqlx")]
impl From<SqlxError> for AppError {
    fn from(err: SqlxError) -> Self {
        AppError::Database(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Internal(format!("IO error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::BadRequest(format!("JSON parsing error: {}", err))
    }
}

impl From<uuid::Error> for AppError {
    fn from(err: uuid::Error) -> Self {
        AppError::BadRequest(format!("Invalid ID: {}", err))
    }
}

/// Static metadata for each variant: (http_status, error_code, recoverable, suggested_action, sensitive, log_level).
fn app_error_static_metadata(
    err: &AppError,
) -> (
    u16,
    &'static str,
    bool,
    Option<&'static str>,
    bool,
    LogLevel,
) {
    match err {
        AppError::BadRequest(_) => (
            400,
            "BAD_REQUEST",
            false,
            Some("Check request format and parameters"),
            false,
            LogLevel::Debug,
        ),
        AppError::Unauthorized(_) => (
            401,
            "UNAUTHORIZED",
            false,
            Some("Provide a valid bearer token"),
            false,
            LogLevel::Debug,
        ),
        AppError::Forbidden(_) => (
            403,
            "FORBIDDEN",
            false,
            Some("Only the owner of a video can modify it"),
            false,
            LogLevel::Debug,
        ),
        AppError::NotFound(_) => (
            404,
            "NOT_FOUND",
            false,
            Some("Verify the resource ID exists"),
            false,
            LogLevel::Debug,
        ),
        AppError::PayloadTooLarge(_) => (
            413,
            "PAYLOAD_TOO_LARGE",
            false,
            Some("Reduce file size"),
            false,
            LogLevel::Debug,
        ),
        AppError::IntrospectionFailed(_) => (
            500,
            "INTROSPECTION_FAILED",
            false,
            Some("Check that the file is a valid video"),
            false,
            LogLevel::Warn,
        ),
        AppError::TransformFailed(_) => (
            500,
            "TRANSFORM_FAILED",
            false,
            Some("Contact support if this error persists"),
            true,
            LogLevel::Error,
        ),
        AppError::PlacementFailed(_) => (
            500,
            "PLACEMENT_FAILED",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
        AppError::PersistFailed(_) => (
            500,
            "PERSIST_FAILED",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
        AppError::MalformedReference(_) => (
            500,
            "MALFORMED_REFERENCE",
            false,
            Some("Re-upload the video"),
            true,
            LogLevel::Error,
        ),
        AppError::Database(_) => (
            500,
            "DATABASE_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
        AppError::Internal(_) | AppError::InternalWithSource { .. } => (
            500,
            "INTERNAL_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
    }
}

impl AppError {
    /// Get the error type name for detailed error responses
    pub fn error_type(&self) -> &str {
        match self {
            AppError::BadRequest(_) => "BadRequest",
            AppError::Unauthorized(_) => "Unauthorized",
            AppError::Forbidden(_) => "Forbidden",
            AppError::NotFound(_) => "NotFound",
            AppError::PayloadTooLarge(_) => "PayloadTooLarge",
            AppError::IntrospectionFailed(_) => "IntrospectionFailed",
            AppError::TransformFailed(_) => "TransformFailed",
            AppError::PlacementFailed(_) => "PlacementFailed",
            AppError::PersistFailed(_) => "PersistFailed",
            AppError::MalformedReference(_) => "MalformedReference",
            AppError::Database(_) => "Database",
            AppError::Internal(_) => "Internal",
            AppError::InternalWithSource { .. } => "Internal",
        }
    }

    /// Get detailed error information including error chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn is_recoverable(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn suggested_action(&self) -> Option<&'static str> {
        app_error_static_metadata(self).3
    }

    fn is_sensitive(&self) -> bool {
        app_error_static_metadata(self).4
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).5
    }

    fn client_message(&self) -> String {
        match self {
            AppError::BadRequest(ref msg)
            | AppError::Unauthorized(ref msg)
            | AppError::Forbidden(ref msg)
            | AppError::NotFound(ref msg)
            | AppError::PayloadTooLarge(ref msg)
            | AppError::IntrospectionFailed(ref msg) => msg.clone(),
            AppError::TransformFailed(_) => "Failed to process video".to_string(),
            AppError::PlacementFailed(_) => "Failed to store video".to_string(),
            AppError::PersistFailed(_) => "Failed to update video record".to_string(),
            AppError::MalformedReference(_) => "Stored video reference is invalid".to_string(),
            AppError::Database(_) => "Failed to access database".to_string(),
            AppError::Internal(_) | AppError::InternalWithSource { .. } => {
                "Internal server error".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_metadata_forbidden() {
        let err = AppError::Forbidden("not the owner".to_string());
        assert_eq!(err.http_status_code(), 403);
        assert_eq!(err.error_code(), "FORBIDDEN");
        assert!(!err.is_sensitive());
        assert_eq!(err.client_message(), "not the owner");
    }

    #[test]
    fn test_pipeline_failures_are_server_errors() {
        let errors = [
            AppError::IntrospectionFailed("no video stream".into()),
            AppError::TransformFailed("ffmpeg exited 1".into()),
            AppError::PlacementFailed("connection reset".into()),
            AppError::PersistFailed("row missing".into()),
        ];
        for err in errors {
            assert_eq!(err.http_status_code(), 500, "{}", err.error_type());
        }
    }

    #[test]
    fn test_malformed_reference_hides_details() {
        let err = AppError::from(StorageRefError::MissingSeparator("justabucket".into()));
        assert_eq!(err.error_type(), "MalformedReference");
        assert!(err.is_sensitive());
        assert_eq!(err.client_message(), "Stored video reference is invalid");
    }

    #[test]
    fn test_detailed_message_includes_source_chain() {
        let source = anyhow::anyhow!("disk full").context("write staged upload");
        let err = AppError::from(source);
        let details = err.detailed_message();
        assert!(details.contains("Internal error with source"));
        assert!(details.contains("disk full"));
    }

    #[test]
    fn test_uuid_error_is_bad_request() {
        let err = AppError::from(uuid::Uuid::parse_str("nope").unwrap_err());
        assert_eq!(err.http_status_code(), 400);
    }
}
