//! Shared request state and the composition of stores, bridges and engine.

use crate::config::ServerConfig;
use crate::error::ServerResult;
use patchsync_core::{Entity, PersistenceBridge, Person, ResourceService, StoreBridge, Todo};
use patchsync_engine::{BridgeRegistry, DiffSyncEngine};
use patchsync_storage::{FileStore, InMemoryStore};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// State shared by every handler.
///
/// REST handlers and the sync engine go through the same bridges, so each
/// collection has exactly one writer.
#[derive(Clone)]
pub struct AppState {
    todos: ResourceService<Todo>,
    people: ResourceService<Person>,
    engine: Arc<DiffSyncEngine>,
    config: Arc<ServerConfig>,
}

impl AppState {
    /// Wires the given bridges into services and a frozen engine registry.
    pub fn new(
        config: ServerConfig,
        todos: Arc<dyn PersistenceBridge<Todo>>,
        people: Arc<dyn PersistenceBridge<Person>>,
    ) -> ServerResult<Self> {
        let registry = BridgeRegistry::builder()
            .register(Arc::clone(&todos))
            .register(Arc::clone(&people))
            .build()?;
        let engine = DiffSyncEngine::new(registry, config.sync.clone());

        Ok(Self {
            todos: ResourceService::new(todos),
            people: ResourceService::new(people),
            engine: Arc::new(engine),
            config: Arc::new(config),
        })
    }

    /// Builds state over in-memory stores.
    pub fn in_memory(config: ServerConfig) -> ServerResult<Self> {
        Self::new(config, memory_bridge::<Todo>(), memory_bridge::<Person>())
    }

    /// Builds state over the stores `config` asks for: JSON files under
    /// `data_dir` when set, memory otherwise.
    pub fn from_config(config: ServerConfig) -> ServerResult<Self> {
        match config.data_dir.clone() {
            Some(dir) => {
                let todos = file_bridge::<Todo>(&dir)?;
                let people = file_bridge::<Person>(&dir)?;
                info!(data_dir = %dir.display(), "using file-backed stores");
                Self::new(config, todos, people)
            }
            None => {
                info!("using in-memory stores");
                Self::in_memory(config)
            }
        }
    }

    /// Todo resource.
    pub fn todos(&self) -> &ResourceService<Todo> {
        &self.todos
    }

    /// People resource.
    pub fn people(&self) -> &ResourceService<Person> {
        &self.people
    }

    /// The sync engine.
    pub fn engine(&self) -> &Arc<DiffSyncEngine> {
        &self.engine
    }

    /// The server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}

fn memory_bridge<T: Entity>() -> Arc<dyn PersistenceBridge<T>> {
    Arc::new(StoreBridge::<T, InMemoryStore<T>>::new(Arc::new(
        InMemoryStore::new(),
    )))
}

fn file_bridge<T: Entity>(dir: &Path) -> ServerResult<Arc<dyn PersistenceBridge<T>>> {
    let path = dir.join(format!("{}.json", T::ENTITY_TYPE.resource()));
    let store = FileStore::open_with_create_dirs(&path)?;
    Ok(Arc::new(StoreBridge::<T, FileStore<T>>::new(Arc::new(
        store,
    ))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registers_both_resources() {
        let state = AppState::in_memory(ServerConfig::default()).unwrap();
        let registry = state.engine().registry();
        assert!(registry.contains("todos"));
        assert!(registry.contains("people"));
    }

    #[test]
    fn file_backed_state_shares_bridges() {
        let dir = tempfile::tempdir().unwrap();
        let config = ServerConfig::default().with_data_dir(dir.path());
        let state = AppState::from_config(config).unwrap();

        state.todos().create(Todo::draft("a")).unwrap();
        let snapshot = state.engine().snapshot("todos").unwrap();
        assert_eq!(snapshot.as_array().map(Vec::len), Some(1));
        assert!(dir.path().join("todos.json").exists());
        assert!(dir.path().join("people.json").exists());
    }
}
