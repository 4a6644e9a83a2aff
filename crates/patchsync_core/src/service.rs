//! CRUD over a persistence bridge, as exposed by REST handlers.

use crate::bridge::PersistenceBridge;
use crate::entity::Entity;
use crate::error::{CoreError, CoreResult};
use patchsync_storage::RecordId;
use std::sync::Arc;
use tracing::{debug, info};

/// Plain create/read/update/delete over a bridge.
///
/// All writes go through the bridge, so REST handlers and the sync engine
/// share one writer per collection.
pub struct ResourceService<T: Entity> {
    bridge: Arc<dyn PersistenceBridge<T>>,
}

impl<T: Entity> Clone for ResourceService<T> {
    fn clone(&self) -> Self {
        Self {
            bridge: Arc::clone(&self.bridge),
        }
    }
}

impl<T: Entity> ResourceService<T> {
    /// Creates a service over the given bridge.
    pub fn new(bridge: Arc<dyn PersistenceBridge<T>>) -> Self {
        Self { bridge }
    }

    /// Returns the underlying bridge.
    pub fn bridge(&self) -> &Arc<dyn PersistenceBridge<T>> {
        &self.bridge
    }

    /// Lists every entity in ascending id order.
    pub fn list(&self) -> CoreResult<Vec<T>> {
        self.bridge.find_all()
    }

    /// Lists the entities matching `predicate`, in ascending id order.
    pub fn find_where(&self, predicate: impl Fn(&T) -> bool) -> CoreResult<Vec<T>> {
        Ok(self
            .bridge
            .find_all()?
            .into_iter()
            .filter(|item| predicate(item))
            .collect())
    }

    /// Returns the entity with the given id.
    pub fn get(&self, id: RecordId) -> CoreResult<T> {
        self.bridge.find_one(id)
    }

    /// Saves the request body as is and returns the stored entity.
    ///
    /// A body without an id gets one assigned; a body with an id overwrites
    /// whatever is stored under it.
    pub fn create(&self, item: T) -> CoreResult<T> {
        let saved = self.bridge.persist_one(item)?;
        info!(entity = T::ENTITY_TYPE.name(), id = ?saved.id(), "created");
        Ok(saved)
    }

    /// Stores `item` as the entity addressed by `path_id`.
    ///
    /// - A body without an id takes the path id.
    /// - A body whose id matches the path id overwrites that entity.
    /// - A body whose id differs from the path id deletes the entity stored
    ///   under the path id (if any) and saves the body under its own id.
    ///   The two ids stay separate records; nothing is merged.
    pub fn replace(&self, path_id: RecordId, mut item: T) -> CoreResult<T> {
        let body_id = match item.id() {
            Some(id) => id,
            None => {
                item.set_id(path_id);
                path_id
            }
        };

        if body_id == path_id {
            return self.bridge.persist_one(item);
        }

        let stale = match self.bridge.find_one(path_id) {
            Ok(existing) => Some(existing),
            Err(CoreError::NotFound { .. }) => None,
            Err(e) => return Err(e),
        };
        debug!(
            entity = T::ENTITY_TYPE.name(),
            path_id,
            body_id,
            removes_path_record = stale.is_some(),
            "replace with mismatched id"
        );
        match stale {
            Some(stale) => self.bridge.persist_replacing(stale, item),
            None => self.bridge.persist_one(item),
        }
    }

    /// Deletes the entity with the given id.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NotFound`] if there is no such entity.
    pub fn delete(&self, id: RecordId) -> CoreResult<()> {
        let existing = self.bridge.find_one(id)?;
        self.bridge.persist_batch(Vec::new(), vec![existing])?;
        info!(entity = T::ENTITY_TYPE.name(), id, "deleted");
        Ok(())
    }
}
