//! Error types for patch documents.

use thiserror::Error;

/// Result type for patch operations.
pub type PatchResult<T> = Result<T, PatchError>;

/// Errors raised while parsing or applying a patch document.
#[derive(Error, Debug)]
pub enum PatchError {
    /// The document is not valid JSON Patch.
    #[error("malformed patch document: {0}")]
    Malformed(#[from] serde_json::Error),

    /// A JSON Pointer could not be parsed.
    #[error("invalid JSON pointer {pointer:?}: {reason}")]
    InvalidPointer {
        /// The offending pointer text.
        pointer: String,
        /// What is wrong with it.
        reason: &'static str,
    },

    /// An operation addressed a location that does not exist.
    #[error("path not found: {path}")]
    PathNotFound {
        /// The missing location.
        path: String,
    },

    /// An operation addressed an array with an unusable index.
    #[error("invalid array index {token:?} at {path}")]
    InvalidIndex {
        /// The location whose last token is the index.
        path: String,
        /// The index token.
        token: String,
    },

    /// The parent of a target location is neither an object nor an array.
    #[error("cannot address a child of a scalar at {path}")]
    NotAContainer {
        /// The location of the scalar.
        path: String,
    },

    /// The document root cannot be removed.
    #[error("cannot remove the document root")]
    RemoveRoot,

    /// A move tried to put a value inside itself.
    #[error("cannot move {from} into its own child {path}")]
    MoveIntoChild {
        /// Source location.
        from: String,
        /// Target location.
        path: String,
    },

    /// A `test` operation found a different value.
    #[error("test failed at {path}")]
    TestFailed {
        /// The tested location.
        path: String,
    },

    /// An operation of a patch failed; the document was left unchanged.
    #[error("operation {index} ({op}) failed: {source}")]
    OperationFailed {
        /// Zero-based position of the operation in the document.
        index: usize,
        /// Operation name.
        op: &'static str,
        /// The underlying failure.
        #[source]
        source: Box<PatchError>,
    },
}

impl PatchError {
    /// Creates an invalid pointer error.
    pub fn invalid_pointer(pointer: impl Into<String>, reason: &'static str) -> Self {
        Self::InvalidPointer {
            pointer: pointer.into(),
            reason,
        }
    }

    /// Creates a path-not-found error.
    pub fn path_not_found(path: impl ToString) -> Self {
        Self::PathNotFound {
            path: path.to_string(),
        }
    }

    /// Returns true if this error (or the operation failure it wraps) is a
    /// failed `test` operation.
    pub fn is_test_failure(&self) -> bool {
        match self {
            PatchError::TestFailed { .. } => true,
            PatchError::OperationFailed { source, .. } => source.is_test_failure(),
            _ => false,
        }
    }
}
