//! Error types for patchsync core.

use patchsync_storage::{RecordId, StorageError};
use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in bridge and resource operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No entity with the requested id exists.
    #[error("{entity} {id} not found")]
    NotFound {
        /// Entity type name.
        entity: &'static str,
        /// The missing id.
        id: RecordId,
    },

    /// The storage layer failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// A request body or identifier was not acceptable.
    #[error("validation failed: {message}")]
    Validation {
        /// What was wrong.
        message: String,
    },
}

impl CoreError {
    /// Creates a not-found error.
    pub fn not_found(entity: &'static str, id: RecordId) -> Self {
        Self::NotFound { entity, id }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Returns true if this is a not-found error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, CoreError::NotFound { .. })
    }

    /// Returns true if the request itself was at fault, not the store.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            CoreError::NotFound { .. }
                | CoreError::Validation { .. }
                | CoreError::Storage(
                    StorageError::ConstraintViolation { .. } | StorageError::IdOutOfRange { .. }
                )
        )
    }
}
