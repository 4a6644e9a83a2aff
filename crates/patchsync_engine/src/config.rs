//! Configuration for the sync engine.

/// Default limit on operations in one patch document.
pub const DEFAULT_MAX_PATCH_OPERATIONS: usize = 1000;

/// Configuration for patch synchronization.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Maximum number of operations accepted in one patch.
    pub max_patch_operations: usize,
    /// Whether a patched collection may contain the same id twice.
    ///
    /// When false (the default) such a patch is rejected instead of letting
    /// the later entry silently overwrite the earlier one.
    pub allow_duplicate_ids: bool,
}

impl SyncConfig {
    /// Creates a configuration with default limits.
    pub fn new() -> Self {
        Self {
            max_patch_operations: DEFAULT_MAX_PATCH_OPERATIONS,
            allow_duplicate_ids: false,
        }
    }

    /// Sets the maximum number of operations per patch.
    pub fn with_max_patch_operations(mut self, max: usize) -> Self {
        self.max_patch_operations = max;
        self
    }

    /// Sets whether duplicate ids are accepted in a patched collection.
    pub fn with_allow_duplicate_ids(mut self, allow: bool) -> Self {
        self.allow_duplicate_ids = allow;
        self
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self::new()
    }
}
