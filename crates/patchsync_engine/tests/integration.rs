//! Integration tests: a client replica synchronizing through the engine.

use patchsync_core::{PersistenceBridge, StoreBridge, Todo};
use patchsync_engine::{BridgeRegistry, DiffSyncEngine, SyncConfig};
use patchsync_protocol::{diff, Patch};
use patchsync_storage::{EntityStore, FileStore, InMemoryStore};
use proptest::prelude::*;
use serde_json::{json, Value};
use std::sync::Arc;

fn engine_over<S: EntityStore<Todo> + 'static>(store: Arc<S>) -> DiffSyncEngine {
    let bridge: Arc<dyn PersistenceBridge<Todo>> = Arc::new(StoreBridge::<Todo, S>::new(store));
    let registry = BridgeRegistry::builder().register(bridge).build().unwrap();
    DiffSyncEngine::new(registry, SyncConfig::default())
}

fn seeded_engine(count: i64) -> DiffSyncEngine {
    let todos = (1..=count)
        .map(|id| Todo::new(id, format!("todo {}", id), false))
        .collect();
    engine_over(Arc::new(InMemoryStore::with_records(todos).unwrap()))
}

/// Sends the client's local edit and folds the reply into its view.
fn sync(engine: &DiffSyncEngine, shadow: &Value, edited: &Value) -> Value {
    let patch = diff(shadow, edited);
    let reply = engine.patch_collection("todos", &patch).unwrap();
    reply.apply(edited).unwrap()
}

#[derive(Debug, Clone)]
enum Edit {
    Keep,
    Toggle,
    Rename(String),
    Drop,
}

fn arb_edit() -> impl Strategy<Value = Edit> {
    prop_oneof![
        Just(Edit::Keep),
        Just(Edit::Toggle),
        "[a-z ]{0,8}".prop_map(Edit::Rename),
        Just(Edit::Drop),
    ]
}

proptest! {
    #[test]
    fn client_converges_with_server(
        count in 0i64..8,
        edits in proptest::collection::vec(arb_edit(), 8),
        added in proptest::collection::vec("[a-z]{1,6}", 0..4),
    ) {
        let engine = seeded_engine(count);
        let shadow = engine.snapshot("todos").unwrap();

        let mut local: Vec<Todo> = serde_json::from_value(shadow.clone()).unwrap();
        let mut kept = Vec::new();
        for (mut todo, edit) in local.drain(..).zip(edits.iter().cloned()) {
            match edit {
                Edit::Keep => kept.push(todo),
                Edit::Toggle => {
                    todo.complete = !todo.complete;
                    kept.push(todo);
                }
                Edit::Rename(text) => {
                    todo.description = text;
                    kept.push(todo);
                }
                Edit::Drop => {}
            }
        }
        kept.extend(added.iter().map(|text| Todo::draft(text.clone())));
        let edited = serde_json::to_value(&kept).unwrap();

        let converged = sync(&engine, &shadow, &edited);

        prop_assert_eq!(&converged, &engine.snapshot("todos").unwrap());
        prop_assert_eq!(converged.as_array().map(Vec::len), Some(kept.len()));
    }
}

#[test]
fn two_clients_interleave() {
    let engine = seeded_engine(3);
    let shadow = engine.snapshot("todos").unwrap();

    // Client A completes the first todo.
    let mut a = shadow.clone();
    a[0]["complete"] = json!(true);
    sync(&engine, &shadow, &a);

    // Client B, still on the old shadow, removes the last todo. Its patch
    // only touches the last slot, so A's change survives.
    let mut b = shadow.clone();
    b.as_array_mut().unwrap().pop();
    let reply = engine
        .patch_collection("todos", &diff(&shadow, &b))
        .unwrap();
    assert!(reply.is_empty());

    let server = engine.snapshot("todos").unwrap();
    assert_eq!(
        server,
        json!([
            { "id": 1, "description": "todo 1", "complete": true },
            { "id": 2, "description": "todo 2", "complete": false },
        ])
    );
}

#[test]
fn engine_over_file_store_persists() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("todos.json");

    {
        let engine = engine_over(Arc::new(FileStore::<Todo>::open(&path).unwrap()));
        let patch = Patch::from_slice(
            br#"[
                {"op": "add", "path": "/-", "value": {"description": "a", "complete": false}},
                {"op": "add", "path": "/-", "value": {"description": "b", "complete": true}}
            ]"#,
        )
        .unwrap();
        let reply = engine.patch_collection("todos", &patch).unwrap();
        assert_eq!(reply.len(), 2);
    }

    let store = FileStore::<Todo>::open(&path).unwrap();
    assert_eq!(
        store.find_all_sorted().unwrap(),
        vec![Todo::new(1, "a", false), Todo::new(2, "b", true)]
    );
}

#[test]
fn concurrent_entity_patches() {
    let engine = Arc::new(seeded_engine(16));
    let handles: Vec<_> = (1..=16)
        .map(|id| {
            let engine = Arc::clone(&engine);
            std::thread::spawn(move || {
                let patch: Patch = serde_json::from_value(json!([
                    { "op": "replace", "path": "/complete", "value": true }
                ]))
                .unwrap();
                engine.patch_entity("todos", id, &patch).unwrap();
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let all: Vec<Todo> = serde_json::from_value(engine.snapshot("todos").unwrap()).unwrap();
    assert_eq!(all.len(), 16);
    assert!(all.iter().all(|t| t.complete));
    assert_eq!(engine.stats().patches_applied, 16);
}
