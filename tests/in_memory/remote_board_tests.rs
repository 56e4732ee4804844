//! In-memory integration tests for boards shared through the document store.

use super::helpers::{clock, details, item_id};
use mockable::DefaultClock;
use prodboard::access::domain::Role;
use prodboard::board::{
    adapters::{LocalBoardPersistence, RemoteBoardPersistence},
    domain::{BoardId, Column, DropTarget, WorkItem, demo_items},
    services::{BoardService, BoardServiceError, SaveWorkItemRequest},
};
use prodboard::docstore::adapters::InMemoryDocumentStore;
use prodboard::storage::{KeyValueStore, adapters::InMemoryKeyValueStore, keys};
use rstest::rstest;
use std::sync::Arc;

type RemoteBoard = BoardService<RemoteBoardPersistence<InMemoryDocumentStore>, DefaultClock>;

fn open(
    documents: &Arc<InMemoryDocumentStore>,
    clock: &Arc<DefaultClock>,
    role: Role,
) -> RemoteBoard {
    let persistence = Arc::new(RemoteBoardPersistence::new(
        Arc::clone(documents),
        BoardId::default(),
        Arc::clone(clock),
    ));
    let mut board =
        BoardService::open_remote(persistence, &InMemoryKeyValueStore::new(), Arc::clone(clock));
    board.set_role(Some(role));
    board
}

async fn next_snapshot(
    subscription: &mut prodboard::realtime::Subscription<Vec<WorkItem>>,
) -> Vec<WorkItem> {
    subscription
        .next()
        .await
        .expect("subscription open")
        .expect("snapshot")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn edits_reach_other_browsers(clock: Arc<DefaultClock>) {
    let documents = Arc::new(InMemoryDocumentStore::new());
    let mut editor = open(&documents, &clock, Role::Editor);
    let mut viewer = open(&documents, &clock, Role::Viewer);
    let mut feed = viewer.subscribe();
    assert!(next_snapshot(&mut feed).await.is_empty());

    let created = editor
        .save(SaveWorkItemRequest::new(details("4001", 30), Column::AwaitingMaterial))
        .await
        .expect("create");
    viewer.replace_with_snapshot(next_snapshot(&mut feed).await);
    assert_eq!(viewer.state().len(), 1);

    editor
        .move_item(created.id(), &DropTarget::ColumnTop(Column::Distribution))
        .await
        .expect("move");
    viewer.replace_with_snapshot(next_snapshot(&mut feed).await);

    let seen = viewer.state().get(created.id()).expect("item visible");
    assert_eq!(seen.column(), Column::Distribution);

    let refused = viewer.delete(created.id()).await;
    assert!(matches!(refused, Err(BoardServiceError::Forbidden(_))));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn offline_moves_are_kept_until_the_next_snapshot(clock: Arc<DefaultClock>) {
    let documents = Arc::new(InMemoryDocumentStore::new());
    let mut board = open(&documents, &clock, Role::Admin);
    let mut feed = board.subscribe();
    next_snapshot(&mut feed).await;
    let created = board
        .save(SaveWorkItemRequest::new(details("5001", 8), Column::Planning).with_id(item_id("op-5001")))
        .await
        .expect("create");
    board.replace_with_snapshot(next_snapshot(&mut feed).await);

    documents.reject_writes(true).expect("go offline");
    let moved = board
        .move_item(created.id(), &DropTarget::ColumnTop(Column::Shipping))
        .await;

    assert!(matches!(moved, Err(BoardServiceError::Persistence(_))));
    assert_eq!(
        board.state().get(created.id()).map(WorkItem::column),
        Some(Column::Shipping)
    );

    documents.reject_writes(false).expect("back online");
    board
        .record_completion(created.id(), 1, None)
        .await
        .expect("record completion");
    board.replace_with_snapshot(next_snapshot(&mut feed).await);
    let synced = board.state().get(created.id()).expect("item");
    assert_eq!(synced.column(), Column::Shipping);
    assert_eq!(synced.quantity_completed(), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn local_boards_migrate_into_an_empty_remote_board(clock: Arc<DefaultClock>) {
    let local = Arc::new(InMemoryKeyValueStore::new());
    let local_board = LocalBoardPersistence::new(Arc::clone(&local));
    let items = local_board.load_or_seed(&*clock);
    let documents = Arc::new(InMemoryDocumentStore::new());
    let remote = Arc::new(RemoteBoardPersistence::new(
        Arc::clone(&documents),
        BoardId::default(),
        Arc::clone(&clock),
    ));

    let imported = remote
        .import_local_if_empty(&items)
        .await
        .expect("import");
    let board = BoardService::open_remote(Arc::clone(&remote), local.as_ref(), Arc::clone(&clock));

    assert_eq!(imported, demo_items(&*clock).len());
    assert!(board.state().is_empty());
    assert_eq!(local.get(keys::CARDS).expect("read"), None);
    let listed = remote.list().await.expect("list");
    assert_eq!(listed.len(), items.len());
}
