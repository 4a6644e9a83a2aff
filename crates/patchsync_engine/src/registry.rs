//! Registry of synchronizable resources.

use crate::error::{SyncError, SyncResult};
use crate::resource::{EntitySync, ResourceSync};
use patchsync_core::{Entity, EntityType, PersistenceBridge};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Bridges keyed by resource name, frozen once built.
#[derive(Clone, Default)]
pub struct BridgeRegistry {
    resources: BTreeMap<&'static str, Arc<dyn ResourceSync>>,
}

impl BridgeRegistry {
    /// Starts building a registry.
    pub fn builder() -> BridgeRegistryBuilder {
        BridgeRegistryBuilder::default()
    }

    /// Returns the target registered for `resource`.
    pub fn get(&self, resource: &str) -> SyncResult<&Arc<dyn ResourceSync>> {
        self.resources
            .get(resource)
            .ok_or_else(|| SyncError::unknown_resource(resource))
    }

    /// Returns true if `resource` is registered.
    pub fn contains(&self, resource: &str) -> bool {
        self.resources.contains_key(resource)
    }

    /// Descriptors of every registered entity type, by resource name.
    pub fn entity_types(&self) -> Vec<EntityType> {
        self.resources.values().map(|r| r.entity_type()).collect()
    }

    /// Number of registered resources.
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

impl std::fmt::Debug for BridgeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BridgeRegistry")
            .field("resources", &self.resources.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Collects bridges before the registry is frozen.
#[derive(Default)]
pub struct BridgeRegistryBuilder {
    resources: Vec<Arc<dyn ResourceSync>>,
}

impl BridgeRegistryBuilder {
    /// Registers a bridge under its entity type's resource name.
    pub fn register<T: Entity>(mut self, bridge: Arc<dyn PersistenceBridge<T>>) -> Self {
        self.resources.push(Arc::new(EntitySync::new(bridge)));
        self
    }

    /// Registers an already type-erased target.
    pub fn register_resource(mut self, resource: Arc<dyn ResourceSync>) -> Self {
        self.resources.push(resource);
        self
    }

    /// Freezes the registry.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::DuplicateResource`] if two registrations share
    /// a resource name.
    pub fn build(self) -> SyncResult<BridgeRegistry> {
        let mut resources = BTreeMap::new();
        for target in self.resources {
            let resource = target.entity_type().resource();
            if resources.insert(resource, target).is_some() {
                return Err(SyncError::DuplicateResource { resource });
            }
        }
        Ok(BridgeRegistry { resources })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use patchsync_core::{Person, StoreBridge, Todo};
    use patchsync_storage::InMemoryStore;

    fn todos() -> Arc<dyn PersistenceBridge<Todo>> {
        let bridge: StoreBridge<Todo, InMemoryStore<Todo>> =
            StoreBridge::new(Arc::new(InMemoryStore::new()));
        Arc::new(bridge)
    }

    fn people() -> Arc<dyn PersistenceBridge<Person>> {
        let bridge: StoreBridge<Person, InMemoryStore<Person>> =
            StoreBridge::new(Arc::new(InMemoryStore::new()));
        Arc::new(bridge)
    }

    #[test]
    fn dispatch_by_resource() {
        let registry = BridgeRegistry::builder()
            .register(todos())
            .register(people())
            .build()
            .unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get("todos").unwrap().entity_type().name(), "todo");
        assert_eq!(registry.get("people").unwrap().entity_type().name(), "person");
        let missing = registry.get("widgets").err();
        assert!(missing.is_some_and(|e| e.is_not_found()));
    }

    #[test]
    fn duplicate_registration_fails() {
        let err = BridgeRegistry::builder()
            .register(todos())
            .register(todos())
            .build()
            .unwrap_err();
        assert!(matches!(err, SyncError::DuplicateResource { resource: "todos" }));
    }

    #[test]
    fn empty_registry() {
        let registry = BridgeRegistry::builder().build().unwrap();
        assert!(registry.is_empty());
        assert!(!registry.contains("todos"));
    }
}
