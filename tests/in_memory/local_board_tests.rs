//! In-memory integration tests for local-mode boards.

use super::helpers::{clock, details};
use mockable::DefaultClock;
use prodboard::access::domain::{AccessState, Role, Route, RouteDecision};
use prodboard::board::{
    adapters::LocalBoardPersistence,
    domain::{BoardId, Column, DropTarget, Stage, column_totals, demo_items},
    services::{BoardService, SaveWorkItemRequest},
};
use prodboard::bootstrap::{BoardBackend, open_backend};
use prodboard::config::BoardConfig;
use prodboard::preferences::{PreferenceStore, WipStatus};
use prodboard::storage::adapters::DirectoryStore;
use rstest::rstest;
use std::sync::Arc;

type LocalBoard = BoardService<LocalBoardPersistence<DirectoryStore>, DefaultClock>;

fn directory(dir: &tempfile::TempDir) -> Arc<DirectoryStore> {
    let path = dir.path().to_str().expect("utf-8 path");
    Arc::new(DirectoryStore::open(path).expect("open store"))
}

fn open(dir: &tempfile::TempDir, clock: &Arc<DefaultClock>) -> LocalBoard {
    BoardService::open_local(
        Arc::new(LocalBoardPersistence::new(directory(dir))),
        Arc::clone(clock),
    )
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn local_changes_survive_a_restart(clock: Arc<DefaultClock>) {
    let dir = tempfile::tempdir().expect("temp dir");
    let mut board = open(&dir, &clock);
    let seeded = board.state().len();

    let created = board
        .save(SaveWorkItemRequest::new(details("2001", 50), Column::Planning))
        .await
        .expect("create");
    board
        .move_item(created.id(), &DropTarget::ColumnTop(Column::Sewing))
        .await
        .expect("move");
    board
        .record_completion(created.id(), 20, Some("primeiro turno".to_owned()))
        .await
        .expect("record completion");

    let reopened = open(&dir, &clock);
    assert_eq!(reopened.state().len(), seeded + 1);
    let item = reopened.state().get(created.id()).expect("item persisted");
    assert_eq!(item.column(), Column::Sewing);
    assert_eq!(item.stage(), Stage::Production);
    assert_eq!(item.quantity_completed(), 20);
    assert_eq!(
        item.completions().first().and_then(|entry| entry.note()),
        Some("primeiro turno")
    );
    assert_eq!(
        reopened.state().column_items(Column::Sewing).first().map(|first| first.id()),
        Some(created.id())
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn wip_limits_apply_to_column_counts(clock: Arc<DefaultClock>) {
    let dir = tempfile::tempdir().expect("temp dir");
    let mut board = open(&dir, &clock);
    let preferences = PreferenceStore::new(directory(&dir));
    let mut limits = preferences.wip_limits();
    limits.set(Column::Painting, Some(2));
    preferences.save_wip_limits(&limits);

    for number in ["3001", "3002"] {
        board
            .save(SaveWorkItemRequest::new(details(number, 10), Column::Painting))
            .await
            .expect("create");
    }

    let count = board.state().column_items(Column::Painting).len();
    let totals = column_totals(board.state().items(), Column::Painting);
    assert_eq!(count, 2);
    assert_eq!(totals.pieces, 20);
    assert_eq!(
        preferences.wip_limits().status(Column::Painting, count),
        WipStatus::AtLimit
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn bootstrap_opens_a_seeded_local_board(clock: Arc<DefaultClock>) {
    let dir = tempfile::tempdir().expect("temp dir");
    let data_dir = dir.path().join("board");
    let config = BoardConfig::local(
        BoardId::default(),
        data_dir.to_str().expect("utf-8 path"),
    );

    let backend = open_backend(&config).await.expect("open backend");

    let BoardBackend::Local(local) = backend else {
        panic!("expected the local backend");
    };
    assert_eq!(local.board.state().len(), demo_items(&*clock).len());
    assert_eq!(local.workspace.guard.state(), &AccessState::Authorized(Role::Admin));
    assert_eq!(local.workspace.guard.resolve(Route::AdminMembers), RouteDecision::Render);
    assert!(data_dir.is_dir());
}
