//! Error types for storage operations.

use crate::record::RecordId;
use std::io;
use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A record could not be serialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The store file is corrupted.
    #[error("store corrupted: {0}")]
    Corrupted(String),

    /// A save would break a unique constraint.
    #[error("unique constraint violated: key {key:?} already used by record {existing_id}")]
    ConstraintViolation {
        /// The duplicated key.
        key: String,
        /// The record that already holds the key.
        existing_id: RecordId,
    },

    /// A record id leaves no room for the id counter.
    #[error("record id {id} is outside the usable id range")]
    IdOutOfRange {
        /// The offending id.
        id: RecordId,
    },
}

impl StorageError {
    /// Creates a corruption error.
    pub fn corrupted(message: impl Into<String>) -> Self {
        Self::Corrupted(message.into())
    }
}
