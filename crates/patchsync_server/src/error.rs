//! Error types for the HTTP server.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use patchsync_core::CoreError;
use patchsync_engine::SyncError;
use patchsync_protocol::PatchError;
use patchsync_storage::StorageError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

/// Errors that can occur while serving a request or starting the server.
#[derive(Error, Debug)]
pub enum ServerError {
    /// A resource operation failed.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A patch could not be applied.
    #[error(transparent)]
    Sync(#[from] SyncError),

    /// The request body is not a valid patch document.
    #[error(transparent)]
    Patch(#[from] PatchError),

    /// A store could not be opened.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// The request body could not be read as the expected JSON.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The request body has the wrong media type.
    #[error("unsupported media type {found:?}, expected {expected}")]
    UnsupportedMediaType {
        /// The `Content-Type` that was sent, if any.
        found: Option<String>,
        /// The media type the endpoint accepts.
        expected: &'static str,
    },

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),

    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ServerError {
    /// Returns the HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::Core(e) => core_status(e),
            ServerError::Sync(e) => sync_status(e),
            ServerError::Patch(_) | ServerError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::Storage(e) => storage_status(e),
            ServerError::UnsupportedMediaType { .. } => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ServerError::Internal(_) | ServerError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns true if this is a client error (4xx).
    pub fn is_client_error(&self) -> bool {
        self.status().is_client_error()
    }

    /// Returns true if this is a server error (5xx).
    pub fn is_server_error(&self) -> bool {
        self.status().is_server_error()
    }
}

fn storage_status(error: &StorageError) -> StatusCode {
    match error {
        StorageError::ConstraintViolation { .. } => StatusCode::CONFLICT,
        StorageError::IdOutOfRange { .. } => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn core_status(error: &CoreError) -> StatusCode {
    match error {
        CoreError::NotFound { .. } => StatusCode::NOT_FOUND,
        CoreError::Validation { .. } => StatusCode::BAD_REQUEST,
        CoreError::Storage(e) => storage_status(e),
    }
}

fn sync_status(error: &SyncError) -> StatusCode {
    match error {
        SyncError::Core(e) => core_status(e),
        e if e.is_test_failure() => StatusCode::UNPROCESSABLE_ENTITY,
        e if e.is_not_found() => StatusCode::NOT_FOUND,
        e if e.is_client_error() => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<JsonRejection> for ServerError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::MissingJsonContentType(_) => ServerError::UnsupportedMediaType {
                found: None,
                expected: "application/json",
            },
            other => ServerError::InvalidRequest(other.body_text()),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
