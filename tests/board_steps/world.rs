//! Shared world state for board placement BDD scenarios.

use std::sync::Arc;

use mockable::DefaultClock;
use prodboard::board::{
    adapters::LocalBoardPersistence,
    domain::{WorkItem, WorkItemId},
    services::{BoardService, BoardServiceError},
};
use prodboard::storage::adapters::InMemoryKeyValueStore;
use rstest::fixture;

/// Service type used by the BDD world.
pub type TestBoardService = BoardService<LocalBoardPersistence<InMemoryKeyValueStore>, DefaultClock>;

/// Scenario world for board placement behaviour tests.
pub struct BoardWorld {
    pub store: Arc<InMemoryKeyValueStore>,
    pub clock: Arc<DefaultClock>,
    pub board: Option<TestBoardService>,
    pub last_move: Option<Result<Option<WorkItem>, BoardServiceError>>,
}

impl BoardWorld {
    /// Creates a world over empty local storage.
    #[must_use]
    pub fn new() -> Self {
        Self {
            store: Arc::new(InMemoryKeyValueStore::new()),
            clock: Arc::new(DefaultClock),
            board: None,
            last_move: None,
        }
    }

    /// Returns the open board.
    pub fn board(&self) -> Result<&TestBoardService, eyre::Report> {
        self.board
            .as_ref()
            .ok_or_else(|| eyre::eyre!("no board opened in scenario world"))
    }

    /// Returns the open board for mutation.
    pub fn board_mut(&mut self) -> Result<&mut TestBoardService, eyre::Report> {
        self.board
            .as_mut()
            .ok_or_else(|| eyre::eyre!("no board opened in scenario world"))
    }
}

impl Default for BoardWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Parses a scenario item name into an identifier.
pub fn item_id(name: &str) -> Result<WorkItemId, eyre::Report> {
    WorkItemId::parse(name).map_err(|err| eyre::eyre!("invalid item name '{name}': {err}"))
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> BoardWorld {
    BoardWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
