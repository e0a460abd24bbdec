//! API error types and JSON response formatting.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::{debug, error};

use crate::archive::ArchiveError;

/// API error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

/// Error details in the response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// API error type that converts to HTTP responses.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    /// Create a new API error.
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Add details to the error.
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Internal server error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Log server errors at error level, client errors at debug level
        if self.status.is_server_error() {
            error!(
                status = %self.status.as_u16(),
                code = %self.code,
                message = %self.message,
                "server error response"
            );
        } else if self.status.is_client_error() {
            debug!(
                status = %self.status.as_u16(),
                code = %self.code,
                message = %self.message,
                "client error response"
            );
        }

        let body = ErrorResponse {
            error: ErrorBody {
                code: self.code,
                message: self.message,
                details: self.details,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<ArchiveError> for ApiError {
    fn from(err: ArchiveError) -> Self {
        let message = err.to_string();
        match err {
            ArchiveError::MalformedTimestamp(e) => {
                Self::new(StatusCode::BAD_REQUEST, "MALFORMED_TIMESTAMP", message)
                    .with_details(serde_json::json!({ "input": e.input() }))
            }
            ArchiveError::HostNotFound(host) => {
                Self::new(StatusCode::NOT_FOUND, "HOST_NOT_FOUND", message)
                    .with_details(serde_json::json!({ "host": host }))
            }
            ArchiveError::SnapshotNotFound { host, timestamp } => {
                Self::new(StatusCode::NOT_FOUND, "SNAPSHOT_NOT_FOUND", message).with_details(
                    serde_json::json!({ "host": host, "timestamp": timestamp.format() }),
                )
            }
            ArchiveError::NoSnapshots(host) => {
                Self::new(StatusCode::NOT_FOUND, "NO_SNAPSHOTS", message)
                    .with_details(serde_json::json!({ "host": host }))
            }
            ArchiveError::NoSnapshotBeforeDate { host, timestamp } => {
                Self::new(StatusCode::NOT_FOUND, "NO_SNAPSHOT_BEFORE_DATE", message).with_details(
                    serde_json::json!({ "host": host, "timestamp": timestamp.format() }),
                )
            }
            ArchiveError::DeadlineExceeded(host) => {
                Self::new(StatusCode::SERVICE_UNAVAILABLE, "DEADLINE_EXCEEDED", message)
                    .with_details(serde_json::json!({ "host": host }))
            }
            // Store errors carry paths and backend internals; keep them in the log.
            ArchiveError::StorageUnavailable(source) => {
                error!(error = %source, "snapshot store failure");
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORAGE_UNAVAILABLE",
                    "snapshot storage is unavailable",
                )
            }
        }
    }
}
