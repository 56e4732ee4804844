//! Tests for the JSON helpers over key/value stores.

use crate::storage::{
    KeyValueStore, StorageError,
    adapters::InMemoryKeyValueStore,
    json::{load_lenient, read_json, save_best_effort, write_json},
};
use rstest::{fixture, rstest};
use std::collections::BTreeMap;

#[fixture]
fn store() -> InMemoryKeyValueStore {
    InMemoryKeyValueStore::new()
}

#[rstest]
fn written_values_decode_back(store: InMemoryKeyValueStore) {
    let limits = BTreeMap::from([("PCP".to_owned(), 3_u32)]);
    write_json(&store, "kanban-wip-v1", &limits).expect("write succeeds");

    let loaded: Option<BTreeMap<String, u32>> =
        read_json(&store, "kanban-wip-v1").expect("read succeeds");
    assert_eq!(loaded, Some(limits));
}

#[rstest]
fn corrupt_records_are_decode_errors(store: InMemoryKeyValueStore) {
    store.set("kanban-wip-v1", "{not json").expect("write succeeds");

    let result: Result<Option<BTreeMap<String, u32>>, _> = read_json(&store, "kanban-wip-v1");
    assert!(matches!(result, Err(StorageError::Decode { ref key, .. }) if key == "kanban-wip-v1"));
}

#[rstest]
fn lenient_load_treats_corruption_as_absence(store: InMemoryKeyValueStore) {
    store.set("kanban-wip-v1", "[1, 2").expect("write succeeds");

    let loaded: Option<BTreeMap<String, u32>> = load_lenient(&store, "kanban-wip-v1");
    assert_eq!(loaded, None);
}

#[rstest]
fn best_effort_save_swallows_failures(store: InMemoryKeyValueStore) {
    store.reject_writes(true);

    save_best_effort(&store, "kanban-ui-v1", &vec![1, 2, 3]);

    assert_eq!(store.get("kanban-ui-v1").expect("read"), None);
}
