//! Patch application for one entity type.

use crate::config::SyncConfig;
use crate::error::{SyncError, SyncResult};
use patchsync_core::{Entity, EntityType, PersistenceBridge, RecordId};
use patchsync_protocol::{diff, Patch};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::debug;

/// What a successful patch did.
#[derive(Debug, Clone, Default)]
pub struct SyncOutcome {
    /// Patch from the client's patched view to the stored state.
    pub patch: Patch,
    /// Entities handed to the bridge for saving.
    pub saved: usize,
    /// Entities handed to the bridge for deletion.
    pub deleted: usize,
}

/// Type-erased patch target, one per registered entity type.
pub trait ResourceSync: Send + Sync {
    /// Descriptor of the entity type behind this resource.
    fn entity_type(&self) -> EntityType;

    /// Returns the whole collection as a JSON array, ascending by id.
    fn snapshot(&self) -> SyncResult<Value>;

    /// Applies `patch` to the collection viewed as a JSON array.
    fn patch_collection(&self, patch: &Patch, config: &SyncConfig) -> SyncResult<SyncOutcome>;

    /// Applies `patch` to the single entity with the given id.
    fn patch_entity(&self, id: RecordId, patch: &Patch) -> SyncResult<SyncOutcome>;
}

/// [`ResourceSync`] over a typed [`PersistenceBridge`].
pub struct EntitySync<T: Entity> {
    bridge: Arc<dyn PersistenceBridge<T>>,
}

impl<T: Entity> EntitySync<T> {
    /// Wraps a bridge.
    pub fn new(bridge: Arc<dyn PersistenceBridge<T>>) -> Self {
        Self { bridge }
    }

    fn decode_list(value: Value) -> SyncResult<Vec<T>> {
        serde_json::from_value(value).map_err(|e| {
            SyncError::validation(format!(
                "patched {} list is not valid: {}",
                T::ENTITY_TYPE.name(),
                e
            ))
        })
    }

    fn decode_one(value: Value) -> SyncResult<T> {
        serde_json::from_value(value).map_err(|e| {
            SyncError::validation(format!(
                "patched {} is not valid: {}",
                T::ENTITY_TYPE.name(),
                e
            ))
        })
    }
}

impl<T: Entity> ResourceSync for EntitySync<T> {
    fn entity_type(&self) -> EntityType {
        self.bridge.entity_type()
    }

    fn snapshot(&self) -> SyncResult<Value> {
        Ok(serde_json::to_value(self.bridge.find_all()?)?)
    }

    fn patch_collection(&self, patch: &Patch, config: &SyncConfig) -> SyncResult<SyncOutcome> {
        let current = self.bridge.find_all()?;
        let before = serde_json::to_value(&current)?;
        let patched = patch.apply(&before)?;
        let items = Self::decode_list(patched.clone())?;

        let mut seen = BTreeSet::new();
        for id in items.iter().filter_map(|item| item.id()) {
            if !seen.insert(id) && !config.allow_duplicate_ids {
                return Err(SyncError::validation(format!(
                    "patched {} list contains id {} more than once",
                    T::ENTITY_TYPE.name(),
                    id
                )));
            }
        }

        let mut existing: BTreeMap<RecordId, T> = current
            .into_iter()
            .filter_map(|item| item.id().map(|id| (id, item)))
            .collect();

        let to_save: Vec<T> = items
            .into_iter()
            .filter(|item| match item.id().and_then(|id| existing.get(&id)) {
                Some(stored) => stored != item,
                None => true,
            })
            .collect();
        existing.retain(|id, _| !seen.contains(id));
        let to_delete: Vec<T> = existing.into_values().collect();

        let saved = to_save.len();
        let deleted = to_delete.len();
        debug!(
            entity = T::ENTITY_TYPE.name(),
            operations = patch.len(),
            saved,
            deleted,
            "applying collection patch"
        );
        if saved > 0 || deleted > 0 {
            self.bridge.persist_batch(to_save, to_delete)?;
        }

        let after = serde_json::to_value(self.bridge.find_all()?)?;
        Ok(SyncOutcome {
            patch: diff(&patched, &after),
            saved,
            deleted,
        })
    }

    fn patch_entity(&self, id: RecordId, patch: &Patch) -> SyncResult<SyncOutcome> {
        let current = self.bridge.find_one(id)?;
        let before = serde_json::to_value(&current)?;
        let patched = patch.apply(&before)?;
        let item = Self::decode_one(patched.clone())?;

        if item.id() != Some(id) {
            return Err(SyncError::id_changed(id));
        }

        let changed = item != current;
        let stored = if changed {
            self.bridge.persist_one(item)?
        } else {
            current
        };
        debug!(
            entity = T::ENTITY_TYPE.name(),
            id,
            operations = patch.len(),
            changed,
            "applied entity patch"
        );

        let after = serde_json::to_value(&stored)?;
        Ok(SyncOutcome {
            patch: diff(&patched, &after),
            saved: usize::from(changed),
            deleted: 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use patchsync_core::{StoreBridge, Todo};
    use patchsync_protocol::PatchOperation;
    use patchsync_storage::{EntityStore, InMemoryStore};
    use serde_json::json;

    fn seeded() -> (EntitySync<Todo>, Arc<InMemoryStore<Todo>>) {
        let store = Arc::new(InMemoryStore::new());
        let bridge: StoreBridge<Todo, InMemoryStore<Todo>> = StoreBridge::new(Arc::clone(&store));
        bridge
            .persist_batch(
                vec![
                    Todo::new(1, "a", false),
                    Todo::new(2, "b", false),
                    Todo::new(3, "c", false),
                ],
                vec![],
            )
            .unwrap();
        (EntitySync::new(Arc::new(bridge)), store)
    }

    fn patch(value: Value) -> Patch {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn replace_saves_only_the_changed_entity() {
        let (sync, _) = seeded();
        let outcome = sync
            .patch_collection(
                &patch(json!([{ "op": "replace", "path": "/1/complete", "value": true }])),
                &SyncConfig::default(),
            )
            .unwrap();

        assert_eq!(outcome.saved, 1);
        assert_eq!(outcome.deleted, 0);
        assert!(outcome.patch.is_empty());
        assert_eq!(
            sync.snapshot().unwrap(),
            json!([
                { "id": 1, "description": "a", "complete": false },
                { "id": 2, "description": "b", "complete": true },
                { "id": 3, "description": "c", "complete": false },
            ])
        );
    }

    #[test]
    fn remove_deletes_missing_ids() {
        let (sync, store) = seeded();
        let outcome = sync
            .patch_collection(
                &patch(json!([{ "op": "remove", "path": "/0" }])),
                &SyncConfig::default(),
            )
            .unwrap();

        assert_eq!(outcome.deleted, 1);
        assert!(outcome.patch.is_empty());
        assert!(!store.exists(1).unwrap());
        assert_eq!(store.count().unwrap(), 2);
    }

    #[test]
    fn added_entity_gets_its_id_back() {
        let (sync, _) = seeded();
        let outcome = sync
            .patch_collection(
                &patch(json!([{
                    "op": "add",
                    "path": "/-",
                    "value": { "description": "d", "complete": false }
                }])),
                &SyncConfig::default(),
            )
            .unwrap();

        assert_eq!(outcome.saved, 1);
        let ops = outcome.patch.operations();
        assert_eq!(ops.len(), 1);
        assert_eq!(
            ops[0],
            PatchOperation::Add {
                path: "/3/id".parse().unwrap(),
                value: json!(4),
            }
        );
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let (sync, store) = seeded();
        let err = sync
            .patch_collection(
                &patch(json!([{ "op": "replace", "path": "/1/id", "value": 1 }])),
                &SyncConfig::default(),
            )
            .unwrap_err();

        assert!(matches!(err, SyncError::Validation { .. }));
        assert_eq!(store.count().unwrap(), 3);
    }

    #[test]
    fn non_array_result_is_rejected() {
        let (sync, _) = seeded();
        let err = sync
            .patch_collection(
                &patch(json!([{ "op": "replace", "path": "", "value": { "x": 1 } }])),
                &SyncConfig::default(),
            )
            .unwrap_err();
        assert!(matches!(err, SyncError::Validation { .. }));
    }

    #[test]
    fn failed_test_changes_nothing() {
        let (sync, _) = seeded();
        let before = sync.snapshot().unwrap();
        let err = sync
            .patch_collection(
                &patch(json!([
                    { "op": "remove", "path": "/0" },
                    { "op": "test", "path": "/0/description", "value": "zzz" },
                ])),
                &SyncConfig::default(),
            )
            .unwrap_err();

        assert!(err.is_test_failure());
        assert_eq!(sync.snapshot().unwrap(), before);
    }

    #[test]
    fn entity_patch_updates_one() {
        let (sync, _) = seeded();
        let outcome = sync
            .patch_entity(
                2,
                &patch(json!([{ "op": "replace", "path": "/description", "value": "bb" }])),
            )
            .unwrap();

        assert_eq!(outcome.saved, 1);
        assert!(outcome.patch.is_empty());
        assert_eq!(sync.snapshot().unwrap()[1]["description"], json!("bb"));
    }

    #[test]
    fn entity_patch_cannot_change_id() {
        let (sync, _) = seeded();
        let err = sync
            .patch_entity(
                2,
                &patch(json!([{ "op": "replace", "path": "/id", "value": 9 }])),
            )
            .unwrap_err();
        assert!(matches!(err, SyncError::Validation { .. }));
    }

    #[test]
    fn entity_patch_on_missing_id() {
        let (sync, _) = seeded();
        let err = sync.patch_entity(42, &Patch::new()).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn noop_entity_patch_saves_nothing() {
        let (sync, _) = seeded();
        let outcome = sync
            .patch_entity(
                1,
                &patch(json!([{ "op": "test", "path": "/description", "value": "a" }])),
            )
            .unwrap();
        assert_eq!(outcome.saved, 0);
    }
}
