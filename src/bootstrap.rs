//! Composition of a configured board backend.
//!
//! [`open_backend`] turns a [`BoardConfig`] into ready-to-use services: the
//! board, the access guard and the layout preferences, plus membership
//! administration in remote mode.

use crate::access::{
    adapters::{DocumentMembershipDirectory, DocumentSessionStore},
    domain::AccessGuard,
    ports::IdentityProvider,
    services::{MembershipService, SingleSessionService},
};
use crate::board::{
    adapters::{LocalBoardPersistence, RemoteBoardPersistence},
    services::BoardService,
};
use crate::config::{BackendConfig, BoardConfig};
use crate::docstore::{DocumentStoreError, adapters::PostgresDocumentStore};
use crate::preferences::{PreferenceStore, RailStore};
use crate::storage::{StorageError, adapters::DirectoryStore};
use mockable::DefaultClock;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Errors raised while opening a backend.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// The local data directory could not be opened.
    #[error("failed to open local storage: {0}")]
    Storage(#[from] StorageError),

    /// The remote document store could not be reached or prepared.
    #[error("failed to open document store: {0}")]
    Documents(#[from] DocumentStoreError),
}

/// Services shared by both modes.
pub struct Workspace {
    /// Access state machine.
    pub guard: AccessGuard,
    /// WIP limits, stage widths and collapse flags.
    pub preferences: PreferenceStore<DirectoryStore>,
    /// Column rail flags.
    pub rails: RailStore<DirectoryStore>,
    /// Local key/value records.
    pub local: Arc<DirectoryStore>,
}

/// Board backed by local snapshots.
pub struct LocalBackend {
    /// Board service; the user acts as administrator.
    pub board: BoardService<LocalBoardPersistence<DirectoryStore>, DefaultClock>,
    /// Shared services.
    pub workspace: Workspace,
}

/// Board backed by the remote document store.
pub struct RemoteBackend {
    /// Board service, empty until the first snapshot arrives.
    pub board: BoardService<RemoteBoardPersistence<PostgresDocumentStore>, DefaultClock>,
    /// Member and join-request administration.
    pub memberships:
        MembershipService<DocumentMembershipDirectory<PostgresDocumentStore>, DefaultClock>,
    /// Shared services.
    pub workspace: Workspace,
    documents: Arc<PostgresDocumentStore>,
    clock: Arc<DefaultClock>,
}

impl RemoteBackend {
    /// Builds the single-session sign-in flow for `identity`.
    #[must_use]
    pub fn sessions<I: IdentityProvider>(
        &self,
        identity: Arc<I>,
    ) -> SingleSessionService<I, DocumentSessionStore<PostgresDocumentStore>, DirectoryStore, DefaultClock>
    {
        SingleSessionService::new(
            identity,
            Arc::new(DocumentSessionStore::new(Arc::clone(&self.documents))),
            Arc::clone(&self.workspace.local),
            Arc::clone(&self.clock),
        )
    }
}

/// Backend selected by configuration.
pub enum BoardBackend {
    /// Local mode.
    Local(Box<LocalBackend>),
    /// Remote mode.
    Remote(Box<RemoteBackend>),
}

/// Opens the backend described by `config`.
///
/// Local mode loads or seeds the board immediately. Remote mode connects to
/// `PostgreSQL`, creates the document table when missing and discards any
/// local board snapshot.
///
/// # Errors
///
/// Returns [`BootstrapError`] when local storage or the document store
/// cannot be opened.
pub async fn open_backend(config: &BoardConfig) -> Result<BoardBackend, BootstrapError> {
    let local = Arc::new(DirectoryStore::open(config.data_dir())?);
    let clock = Arc::new(DefaultClock);

    match config.backend() {
        BackendConfig::Local => {
            let persistence = Arc::new(LocalBoardPersistence::new(Arc::clone(&local)));
            let board = BoardService::open_local(persistence, Arc::clone(&clock));
            info!(data_dir = config.data_dir(), "local backend ready");
            Ok(BoardBackend::Local(Box::new(LocalBackend {
                board,
                workspace: workspace(AccessGuard::local(), local),
            })))
        }
        BackendConfig::Remote {
            database_url,
            poll_interval,
        } => {
            let documents = Arc::new(PostgresDocumentStore::connect(database_url, *poll_interval)?);
            documents.ensure_schema().await?;
            let persistence = Arc::new(RemoteBoardPersistence::new(
                Arc::clone(&documents),
                config.board_id().clone(),
                Arc::clone(&clock),
            ));
            let board = BoardService::open_remote(persistence, local.as_ref(), Arc::clone(&clock));
            let memberships = MembershipService::new(
                Arc::new(DocumentMembershipDirectory::new(
                    Arc::clone(&documents),
                    config.board_id(),
                )),
                Arc::clone(&clock),
            );
            info!(board = %config.board_id(), "remote backend ready");
            Ok(BoardBackend::Remote(Box::new(RemoteBackend {
                board,
                memberships,
                workspace: workspace(AccessGuard::remote(), local),
                documents,
                clock,
            })))
        }
    }
}

fn workspace(guard: AccessGuard, local: Arc<DirectoryStore>) -> Workspace {
    Workspace {
        guard,
        preferences: PreferenceStore::new(Arc::clone(&local)),
        rails: RailStore::load(Arc::clone(&local)),
        local,
    }
}
