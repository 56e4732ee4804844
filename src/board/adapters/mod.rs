//! Board persistence implementations.
//!
//! - [`local`] keeps whole-board snapshots in a [`KeyValueStore`]
//! - [`remote`] keeps one document per item in a [`DocumentStore`]
//! - [`record`] defines the stored JSON layout both share
//!
//! [`KeyValueStore`]: crate::storage::KeyValueStore
//! [`DocumentStore`]: crate::docstore::DocumentStore

pub mod local;
pub mod record;
pub mod remote;

pub use local::LocalBoardPersistence;
pub use record::{
    LOCAL_FALLBACK_ORDER, REMOTE_FALLBACK_ORDER, RecordError, RecordFallback, SnapshotContents,
    WorkItemRecord, decode_snapshot, encode_snapshot,
};
pub use remote::RemoteBoardPersistence;
