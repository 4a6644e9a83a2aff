//! Error types for the sync engine.

use patchsync_core::{CoreError, RecordId};
use patchsync_protocol::PatchError;
use thiserror::Error;

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that can occur while applying a patch to a resource.
#[derive(Error, Debug)]
pub enum SyncError {
    /// The bridge failed (missing entity or storage failure).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The patch could not be applied to the current state.
    #[error("patch rejected: {0}")]
    Patch(#[from] PatchError),

    /// No bridge is registered for the resource.
    #[error("unknown resource: {resource}")]
    UnknownResource {
        /// The requested resource name.
        resource: String,
    },

    /// Two bridges were registered for the same resource.
    #[error("resource registered twice: {resource}")]
    DuplicateResource {
        /// The resource name.
        resource: &'static str,
    },

    /// The patch has more operations than the engine accepts.
    #[error("patch has {count} operations, limit is {max}")]
    TooManyOperations {
        /// Operations in the patch.
        count: usize,
        /// Configured limit.
        max: usize,
    },

    /// The patched document is not an acceptable state.
    #[error("validation failed: {message}")]
    Validation {
        /// What was wrong.
        message: String,
    },

    /// Server-side state could not be converted to JSON.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SyncError {
    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Creates an unknown-resource error.
    pub fn unknown_resource(resource: impl Into<String>) -> Self {
        Self::UnknownResource {
            resource: resource.into(),
        }
    }

    /// Creates the error for a patch that changed an entity id.
    pub fn id_changed(id: RecordId) -> Self {
        Self::validation(format!("patch must not change the id of entity {}", id))
    }

    /// Returns true if the request addressed something that does not exist.
    pub fn is_not_found(&self) -> bool {
        match self {
            SyncError::Core(e) => e.is_not_found(),
            SyncError::UnknownResource { .. } => true,
            _ => false,
        }
    }

    /// Returns true if a `test` operation of the patch failed.
    pub fn is_test_failure(&self) -> bool {
        matches!(self, SyncError::Patch(e) if e.is_test_failure())
    }

    /// Returns true if the client sent something the engine refused.
    pub fn is_client_error(&self) -> bool {
        match self {
            SyncError::Patch(_)
            | SyncError::TooManyOperations { .. }
            | SyncError::Validation { .. } => true,
            SyncError::Core(e) => e.is_client_error(),
            _ => self.is_not_found(),
        }
    }
}
