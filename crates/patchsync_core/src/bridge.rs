//! Persistence bridge between a store and the sync engine.

use crate::entity::{Entity, EntityType};
use crate::error::{CoreError, CoreResult};
use patchsync_storage::{EntityStore, RecordId, StorageError};
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::debug;

/// The operations a synchronization engine needs from a collection.
///
/// A bridge is the sole writer of its collection: the engine computes the
/// desired end state and hands the bridge what to save and what to delete.
///
/// Implementations hold no state of their own besides the storage handle,
/// so every method may be called concurrently. Storage failures surface
/// unchanged as [`CoreError::Storage`]; bridges never retry.
pub trait PersistenceBridge<T: Entity>: Send + Sync {
    /// Returns every entity, ordered by ascending id.
    ///
    /// An empty collection yields an empty vector.
    fn find_all(&self) -> CoreResult<Vec<T>>;

    /// Returns the entity with the given id.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NotFound`] if no such entity exists. Callers
    /// should read this as "the entity no longer exists".
    fn find_one(&self, id: RecordId) -> CoreResult<T>;

    /// Inserts or overwrites a single entity and commits immediately.
    ///
    /// Returns the stored entity, with its id filled in if it was new.
    fn persist_one(&self, item: T) -> CoreResult<T>;

    /// Saves every entity in `to_save` and deletes every entity in
    /// `to_delete` before returning.
    ///
    /// Saves are applied first. The two lists are not applied atomically
    /// together, but nothing is dropped silently.
    fn persist_batch(&self, to_save: Vec<T>, to_delete: Vec<T>) -> CoreResult<()>;

    /// Deletes `stale` and saves `item` in one step.
    ///
    /// If the save fails, `stale` is still stored. The delete runs first, so
    /// `item` may take over a unique key that `stale` held.
    fn persist_replacing(&self, stale: T, item: T) -> CoreResult<T>;

    /// Returns the descriptor of the bridged entity type.
    fn entity_type(&self) -> EntityType {
        T::ENTITY_TYPE
    }
}

/// A [`PersistenceBridge`] over an [`EntityStore`].
///
/// # Example
///
/// ```rust
/// use patchsync_core::{PersistenceBridge, StoreBridge, Todo};
/// use patchsync_storage::InMemoryStore;
/// use std::sync::Arc;
///
/// let bridge: StoreBridge<Todo, InMemoryStore<Todo>> =
///     StoreBridge::new(Arc::new(InMemoryStore::new()));
/// bridge.persist_one(Todo::new(1, "a", false)).unwrap();
///
/// let all = bridge.find_all().unwrap();
/// assert_eq!(all, vec![Todo::new(1, "a", false)]);
/// ```
pub struct StoreBridge<T: Entity, S: EntityStore<T>> {
    store: Arc<S>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Entity, S: EntityStore<T>> StoreBridge<T, S> {
    /// Wraps a store.
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            _marker: PhantomData,
        }
    }

    /// Returns the wrapped store.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }
}

impl<T: Entity, S: EntityStore<T>> Clone for StoreBridge<T, S> {
    fn clone(&self) -> Self {
        Self::new(Arc::clone(&self.store))
    }
}

impl<T: Entity, S: EntityStore<T>> PersistenceBridge<T> for StoreBridge<T, S> {
    fn find_all(&self) -> CoreResult<Vec<T>> {
        Ok(self.store.find_all_sorted()?)
    }

    fn find_one(&self, id: RecordId) -> CoreResult<T> {
        self.store
            .find_by_id(id)?
            .ok_or_else(|| CoreError::not_found(T::ENTITY_TYPE.name(), id))
    }

    fn persist_one(&self, item: T) -> CoreResult<T> {
        let saved = self.store.save(item)?;
        debug!(entity = T::ENTITY_TYPE.name(), id = ?saved.id(), "persisted entity");
        Ok(saved)
    }

    fn persist_batch(&self, to_save: Vec<T>, to_delete: Vec<T>) -> CoreResult<()> {
        let saved = to_save.len();
        if !to_save.is_empty() {
            self.store.save_all(to_save)?;
        }

        // Entities without an id were never stored, so there is nothing to delete.
        let ids: Vec<RecordId> = to_delete.iter().filter_map(|item| item.id()).collect();
        if !ids.is_empty() {
            self.store.delete_all_by_ids(&ids)?;
        }

        debug!(
            entity = T::ENTITY_TYPE.name(),
            saved,
            deleted = ids.len(),
            "persisted batch"
        );
        Ok(())
    }

    fn persist_replacing(&self, stale: T, item: T) -> CoreResult<T> {
        let ids: Vec<RecordId> = stale.id().into_iter().collect();
        let saved = self
            .store
            .delete_then_save(&ids, vec![item])?
            .pop()
            .ok_or_else(|| StorageError::corrupted("store saved no replacement record"))?;
        debug!(
            entity = T::ENTITY_TYPE.name(),
            stale = ?stale.id(),
            id = ?saved.id(),
            "persisted replacement"
        );
        Ok(saved)
    }
}
