//! The differential synchronization engine.

use crate::config::SyncConfig;
use crate::error::{SyncError, SyncResult};
use crate::registry::BridgeRegistry;
use crate::resource::SyncOutcome;
use parking_lot::RwLock;
use patchsync_core::{EntityType, RecordId};
use patchsync_protocol::Patch;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Statistics about applied patches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncStats {
    /// Patches applied successfully.
    pub patches_applied: u64,
    /// Entities handed to a bridge for saving.
    pub entities_saved: u64,
    /// Entities handed to a bridge for deletion.
    pub entities_deleted: u64,
    /// Patches refused because of the client's input.
    pub patches_rejected: u64,
}

/// Applies JSON Patch documents to registered resources.
///
/// The engine keeps no per-client state. Each patch is applied to the
/// current server state, the bridge persists the difference, and the
/// response patch takes the client's patched view to what was stored
/// (for example, ids assigned to new entities).
///
/// # Example
///
/// ```rust
/// use patchsync_core::{PersistenceBridge, StoreBridge, Todo};
/// use patchsync_engine::{BridgeRegistry, DiffSyncEngine, SyncConfig};
/// use patchsync_protocol::Patch;
/// use patchsync_storage::InMemoryStore;
/// use std::sync::Arc;
///
/// let bridge: StoreBridge<Todo, InMemoryStore<Todo>> =
///     StoreBridge::new(Arc::new(InMemoryStore::new()));
/// let bridge: Arc<dyn PersistenceBridge<Todo>> = Arc::new(bridge);
/// let registry = BridgeRegistry::builder().register(bridge).build().unwrap();
/// let engine = DiffSyncEngine::new(registry, SyncConfig::default());
///
/// let patch = Patch::from_slice(
///     br#"[{"op": "add", "path": "/-", "value": {"description": "a", "complete": false}}]"#,
/// )
/// .unwrap();
/// let reply = engine.patch_collection("todos", &patch).unwrap();
///
/// // The reply carries the assigned id back to the client.
/// assert_eq!(reply.len(), 1);
/// ```
pub struct DiffSyncEngine {
    registry: Arc<BridgeRegistry>,
    config: SyncConfig,
    stats: RwLock<SyncStats>,
}

impl DiffSyncEngine {
    /// Creates an engine over a frozen registry.
    pub fn new(registry: BridgeRegistry, config: SyncConfig) -> Self {
        Self {
            registry: Arc::new(registry),
            config,
            stats: RwLock::new(SyncStats::default()),
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Returns the registry.
    pub fn registry(&self) -> &Arc<BridgeRegistry> {
        &self.registry
    }

    /// Descriptors of every registered entity type.
    pub fn entity_types(&self) -> Vec<EntityType> {
        self.registry.entity_types()
    }

    /// Gets the current stats.
    pub fn stats(&self) -> SyncStats {
        self.stats.read().clone()
    }

    /// Returns the collection behind `resource` as a JSON array.
    pub fn snapshot(&self, resource: &str) -> SyncResult<Value> {
        self.registry.get(resource)?.snapshot()
    }

    /// Applies `patch` to the whole collection behind `resource`.
    ///
    /// The collection is viewed as a JSON array in ascending id order.
    /// Entities that are new or changed are saved; entities whose id no
    /// longer appears are deleted.
    ///
    /// Returns the patch that takes the patched array to the stored state.
    pub fn patch_collection(&self, resource: &str, patch: &Patch) -> SyncResult<Patch> {
        let result = self.check_size(patch).and_then(|()| {
            let target = self.registry.get(resource)?;
            target.patch_collection(patch, &self.config)
        });
        self.finish(resource, None, result)
    }

    /// Applies `patch` to the entity with the given id.
    ///
    /// The patch must leave the id unchanged.
    pub fn patch_entity(&self, resource: &str, id: RecordId, patch: &Patch) -> SyncResult<Patch> {
        let result = self.check_size(patch).and_then(|()| {
            let target = self.registry.get(resource)?;
            target.patch_entity(id, patch)
        });
        self.finish(resource, Some(id), result)
    }

    fn check_size(&self, patch: &Patch) -> SyncResult<()> {
        let max = self.config.max_patch_operations;
        if patch.len() > max {
            return Err(SyncError::TooManyOperations {
                count: patch.len(),
                max,
            });
        }
        Ok(())
    }

    fn finish(
        &self,
        resource: &str,
        id: Option<RecordId>,
        result: SyncResult<SyncOutcome>,
    ) -> SyncResult<Patch> {
        match result {
            Ok(outcome) => {
                let mut stats = self.stats.write();
                stats.patches_applied += 1;
                stats.entities_saved += outcome.saved as u64;
                stats.entities_deleted += outcome.deleted as u64;
                drop(stats);

                debug!(
                    resource,
                    ?id,
                    saved = outcome.saved,
                    deleted = outcome.deleted,
                    reply_operations = outcome.patch.len(),
                    "patch applied"
                );
                Ok(outcome.patch)
            }
            Err(e) if e.is_client_error() => {
                self.stats.write().patches_rejected += 1;
                warn!(resource, ?id, error = %e, "patch rejected");
                Err(e)
            }
            Err(e) => {
                error!(resource, ?id, error = %e, "patch failed");
                Err(e)
            }
        }
    }
}

impl std::fmt::Debug for DiffSyncEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiffSyncEngine")
            .field("registry", &self.registry)
            .field("config", &self.config)
            .finish()
    }
}
