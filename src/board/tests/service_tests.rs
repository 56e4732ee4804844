//! Tests for the board service over local, remote and failing backends.

use super::{id, item_in};
use crate::access::domain::{AccessDenied, Action, Role};
use crate::board::{
    adapters::{LocalBoardPersistence, RemoteBoardPersistence},
    domain::{BoardId, Column, DropTarget, Stage, WorkItem, WorkItemDetails, WorkItemId},
    ports::{BoardPersistence, PersistenceError, PersistenceMode, PersistenceResult},
    services::{BoardService, BoardServiceError, SaveWorkItemRequest},
};
use crate::docstore::{CollectionPath, DocumentStore, adapters::InMemoryDocumentStore};
use crate::storage::{KeyValueStore, adapters::InMemoryKeyValueStore, keys};
use async_trait::async_trait;
use mockable::{Clock, DefaultClock};
use mockall::mock;
use rstest::{fixture, rstest};
use serde_json::{Value, json};
use std::sync::Arc;

mock! {
    Persistence {}

    #[async_trait]
    impl BoardPersistence for Persistence {
        fn mode(&self) -> PersistenceMode;
        async fn commit(&self, updated: &WorkItem, snapshot: &[WorkItem]) -> PersistenceResult<()>;
        async fn remove(&self, id: &WorkItemId, snapshot: &[WorkItem]) -> PersistenceResult<()>;
    }
}

type LocalService = BoardService<LocalBoardPersistence<InMemoryKeyValueStore>, DefaultClock>;

fn offline() -> PersistenceError {
    PersistenceError::persistence(std::io::Error::other("backend unreachable"))
}

fn sewing_board() -> Vec<WorkItem> {
    vec![
        item_in("a", Column::Sewing, 1.0, 10),
        item_in("b", Column::Sewing, 2.0, 10),
        item_in("c", Column::Planning, 1.0, 10),
    ]
}

fn details(number: &str, quantity: u32) -> WorkItemDetails {
    WorkItemDetails::new(number, quantity, DefaultClock.utc().date_naive())
}

#[fixture]
fn store() -> Arc<InMemoryKeyValueStore> {
    Arc::new(InMemoryKeyValueStore::new())
}

fn local_service(store: &Arc<InMemoryKeyValueStore>, role: Option<Role>) -> LocalService {
    BoardService::new(
        Arc::new(LocalBoardPersistence::new(Arc::clone(store))),
        Arc::new(DefaultClock),
        role,
    )
    .with_items(sewing_board())
}

fn failing_service(role: Option<Role>) -> BoardService<MockPersistence, DefaultClock> {
    let mut persistence = MockPersistence::new();
    persistence.expect_mode().return_const(PersistenceMode::Remote);
    persistence.expect_commit().returning(|_, _| Err(offline()));
    persistence.expect_remove().returning(|_, _| Err(offline()));
    BoardService::new(Arc::new(persistence), Arc::new(DefaultClock), role)
        .with_items(sewing_board())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn viewers_cannot_save_or_delete(store: Arc<InMemoryKeyValueStore>) {
    let mut service = local_service(&store, Some(Role::Viewer));
    let before = service.state().clone();

    let saved = service
        .save(SaveWorkItemRequest::new(details("900", 5), Column::January))
        .await;
    let deleted = service.delete(&id("a")).await;

    let expected = AccessDenied::InsufficientRole {
        role: Role::Viewer,
        action: Action::EditItems,
    };
    assert!(matches!(saved, Err(BoardServiceError::Forbidden(ref err)) if *err == expected));
    assert!(matches!(deleted, Err(BoardServiceError::Forbidden(_))));
    let message = saved.expect_err("save refused").to_string();
    assert!(message.starts_with("permission denied"), "message: {message}");
    assert_eq!(service.state(), &before);
    assert_eq!(store.get(keys::CARDS).expect("read"), None);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn signed_out_users_cannot_move_items(store: Arc<InMemoryKeyValueStore>) {
    let mut service = local_service(&store, None);

    let moved = service
        .move_item(&id("c"), &DropTarget::ColumnTop(Column::Sewing))
        .await;

    assert!(matches!(
        moved,
        Err(BoardServiceError::Forbidden(AccessDenied::NotAuthorized(
            Action::EditItems
        )))
    ));
    assert_eq!(
        service.state().get(&id("c")).map(WorkItem::column),
        Some(Column::Planning)
    );
}

fn stored_ids(store: &InMemoryKeyValueStore) -> Vec<String> {
    let raw = store.get(keys::CARDS).expect("read").expect("snapshot stored");
    let entries: Vec<Value> = serde_json::from_str(&raw).expect("snapshot is a list");
    entries
        .iter()
        .filter_map(|entry| entry.get("id").and_then(Value::as_str))
        .map(str::to_owned)
        .collect()
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn saving_keeps_stored_items_with_blank_dates_or_unknown_columns(
    store: Arc<InMemoryKeyValueStore>,
) {
    let stored = json!([
        { "id": "a", "numero": "1", "emissao": "2025-01-10", "entrega": "2025-02-01", "column": "PCP" },
        { "id": "b", "numero": "2", "emissao": "2025-01-10", "entrega": "", "column": "PCP" },
        { "id": "c", "numero": "3", "emissao": "2025-01-10", "entrega": "2025-02-01", "column": "BACKLOG" }
    ]);
    store
        .set(keys::CARDS, &stored.to_string())
        .expect("seed snapshot");
    let today = DefaultClock.utc().date_naive();
    let persistence = Arc::new(LocalBoardPersistence::new(Arc::clone(&store)));
    let mut service = BoardService::open_local(persistence, Arc::new(DefaultClock));

    let undated = service.state().get(&id("b")).expect("blank-dated item loaded");
    assert_eq!(undated.details().issue_date.to_string(), "2025-01-10");
    assert!(undated.details().delivery_date >= today);
    assert!(service.state().get(&id("c")).is_none());

    let created = service
        .save(SaveWorkItemRequest::new(details("900", 5), Column::January))
        .await
        .expect("create");

    let ids = stored_ids(&store);
    assert_eq!(ids.len(), 4);
    for expected in ["a", "b", "c", created.id().as_str()] {
        assert!(ids.iter().any(|stored_id| stored_id == expected), "missing {expected}");
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn cold_start_seeds_and_persists_demo_items(store: Arc<InMemoryKeyValueStore>) {
    let persistence = Arc::new(LocalBoardPersistence::new(Arc::clone(&store)));

    let service = BoardService::open_local(Arc::clone(&persistence), Arc::new(DefaultClock));

    assert_eq!(service.role(), Some(Role::Admin));
    assert_eq!(service.mode(), PersistenceMode::Local);
    assert!(!service.state().is_empty());
    let persisted = persistence.load(&DefaultClock).expect("snapshot stored");
    assert_eq!(persisted.len(), service.state().len());
    for item in service.state().items() {
        if item.column().is_done() {
            assert_eq!(item.remaining(), 0, "item {}", item.id());
        }
    }

    let reopened = BoardService::open_local(persistence, Arc::new(DefaultClock));
    assert_eq!(reopened.state().items(), service.state().items());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn new_items_go_first_and_edits_keep_their_history(store: Arc<InMemoryKeyValueStore>) {
    let mut service = local_service(&store, Some(Role::Editor));
    service
        .record_completion(&id("a"), 4, None)
        .await
        .expect("record completion");

    let created = service
        .save(SaveWorkItemRequest::new(details("900", 5), Column::January))
        .await
        .expect("create");
    let edited = service
        .save(SaveWorkItemRequest::new(details("OP-a", 8), Column::Painting).with_id(id("a")))
        .await
        .expect("edit");

    assert_eq!(
        service.state().items().first().map(WorkItem::id),
        Some(created.id())
    );
    assert_eq!(created.stage(), Stage::Calendar);
    assert!(created.order() > 0.0);
    assert_eq!(edited.column(), Column::Painting);
    assert_eq!(edited.quantity_completed(), 4);
    assert_eq!(edited.completions().len(), 1);
    assert!(edited.order().total_cmp(&1.0).is_eq());

    let persisted = LocalBoardPersistence::new(Arc::clone(&store))
        .load(&DefaultClock)
        .expect("snapshot stored");
    assert_eq!(persisted.len(), 4);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleting_removes_the_item_from_the_snapshot(store: Arc<InMemoryKeyValueStore>) {
    let mut service = local_service(&store, Some(Role::Admin));

    let removed = service.delete(&id("b")).await.expect("delete");

    assert_eq!(removed.id(), &id("b"));
    assert!(service.state().get(&id("b")).is_none());
    let persisted = LocalBoardPersistence::new(Arc::clone(&store))
        .load(&DefaultClock)
        .expect("snapshot stored");
    assert!(persisted.iter().all(|item| item.id() != &id("b")));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn undo_reverts_the_latest_increment(store: Arc<InMemoryKeyValueStore>) {
    let mut service = local_service(&store, Some(Role::Editor));
    service
        .record_completion(&id("a"), 3, None)
        .await
        .expect("first increment");
    service
        .record_completion(&id("a"), 2, Some("segunda leva".to_owned()))
        .await
        .expect("second increment");

    let undone = service
        .undo_last_completion(&id("a"))
        .await
        .expect("undo");

    assert_eq!(undone.amount(), 2);
    assert_eq!(undone.note(), Some("segunda leva"));
    let item = service.state().get(&id("a")).expect("item");
    assert_eq!(item.quantity_completed(), 3);

    let empty = service.undo_last_completion(&id("b")).await;
    assert!(matches!(empty, Err(BoardServiceError::Domain(_))));
}

#[tokio::test(flavor = "multi_thread")]
async fn failed_saves_leave_the_board_unchanged() {
    let mut service = failing_service(Some(Role::Admin));
    let before = service.state().clone();

    let saved = service
        .save(SaveWorkItemRequest::new(details("900", 5), Column::January))
        .await;
    let deleted = service.delete(&id("a")).await;

    assert!(matches!(saved, Err(BoardServiceError::Persistence(_))));
    assert!(matches!(deleted, Err(BoardServiceError::Persistence(_))));
    assert_eq!(service.state(), &before);
}

#[tokio::test(flavor = "multi_thread")]
async fn failed_moves_stay_applied() {
    let mut service = failing_service(Some(Role::Editor));

    let moved = service
        .move_item(&id("c"), &DropTarget::Before(id("b")))
        .await;

    assert!(matches!(moved, Err(BoardServiceError::Persistence(_))));
    let item = service.state().get(&id("c")).expect("item");
    assert_eq!(item.column(), Column::Sewing);
    assert!(item.order().total_cmp(&1.5).is_eq());
}

#[tokio::test(flavor = "multi_thread")]
async fn dropping_onto_itself_commits_nothing() {
    let mut persistence = MockPersistence::new();
    persistence.expect_commit().never();
    let mut service = BoardService::new(
        Arc::new(persistence),
        Arc::new(DefaultClock),
        Some(Role::Editor),
    )
    .with_items(sewing_board());

    let moved = service
        .move_item(&id("a"), &DropTarget::Before(id("a")))
        .await
        .expect("no-op move");

    assert_eq!(moved, None);
}

#[tokio::test(flavor = "multi_thread")]
async fn viewer_density_changes_stay_local() {
    let mut persistence = MockPersistence::new();
    persistence.expect_commit().never();
    let mut service = BoardService::new(
        Arc::new(persistence),
        Arc::new(DefaultClock),
        Some(Role::Viewer),
    )
    .with_items(sewing_board());

    service
        .set_density(&id("a"), Some(true))
        .await
        .expect("density set");
    let compact = service
        .toggle_column_density(Column::Sewing)
        .await
        .expect("column toggled");

    assert!(compact);
    assert!(service.state().column_all_compact(Column::Sewing));
}

#[tokio::test(flavor = "multi_thread")]
async fn toggling_a_compact_column_expands_every_item() {
    let mut persistence = MockPersistence::new();
    persistence.expect_commit().times(4).returning(|_, _| Ok(()));
    let mut service = BoardService::new(
        Arc::new(persistence),
        Arc::new(DefaultClock),
        Some(Role::Editor),
    )
    .with_items(sewing_board());

    let first = service
        .toggle_column_density(Column::Sewing)
        .await
        .expect("compact");
    let second = service
        .toggle_column_density(Column::Sewing)
        .await
        .expect("expand");

    assert!(first);
    assert!(!second);
    let densities: Vec<Option<bool>> = service
        .state()
        .column_items(Column::Sewing)
        .into_iter()
        .map(WorkItem::density)
        .collect();
    assert_eq!(densities, vec![Some(false), Some(false)]);
}

#[tokio::test(flavor = "multi_thread")]
async fn remote_boards_start_empty_and_follow_snapshots() {
    let documents = Arc::new(InMemoryDocumentStore::new());
    let local = InMemoryKeyValueStore::new();
    local.set(keys::CARDS, "[]").expect("stale snapshot");
    let persistence = Arc::new(RemoteBoardPersistence::new(
        Arc::clone(&documents),
        BoardId::default(),
        Arc::new(DefaultClock),
    ));

    let mut service = BoardService::open_remote(persistence, &local, Arc::new(DefaultClock));
    assert!(service.state().is_empty());
    assert_eq!(service.role(), None);
    assert_eq!(local.get(keys::CARDS).expect("read"), None);

    let mut snapshots = service.subscribe();
    let initial = snapshots.next().await.expect("initial").expect("snapshot");
    assert!(initial.is_empty());

    service.set_role(Some(Role::Editor));
    let created = service
        .save(SaveWorkItemRequest::new(details("900", 5), Column::Planning))
        .await
        .expect("create");

    let changed = snapshots.next().await.expect("change").expect("snapshot");
    assert_eq!(changed.iter().map(WorkItem::id).collect::<Vec<_>>(), vec![created.id()]);
    service.replace_with_snapshot(changed);
    assert_eq!(service.state().len(), 1);

    let stored = documents
        .list(&CollectionPath::new("boards/default", "cards"))
        .await
        .expect("list");
    assert_eq!(stored.len(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn local_boards_are_imported_only_into_empty_remote_boards() {
    let documents = Arc::new(InMemoryDocumentStore::new());
    let persistence = RemoteBoardPersistence::new(
        Arc::clone(&documents),
        BoardId::default(),
        Arc::new(DefaultClock),
    );

    let first = persistence
        .import_local_if_empty(&sewing_board())
        .await
        .expect("import");
    let second = persistence
        .import_local_if_empty(&[item_in("z", Column::January, 1.0, 1)])
        .await
        .expect("second import");

    assert_eq!(first, 3);
    assert_eq!(second, 0);
    let listed = persistence.list().await.expect("list");
    assert_eq!(listed.len(), 3);
}
