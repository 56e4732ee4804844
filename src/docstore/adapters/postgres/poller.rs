//! Polling watcher with fingerprint-based change detection.

use crate::docstore::{Document, DocumentStoreResult};
use crate::realtime::{SUBSCRIPTION_BUFFER, Subscription, SubscriptionEvent};
use sha2::{Digest, Sha256};
use std::future::Future;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::debug;

/// SHA-256 digest of a snapshot.
pub(super) type Fingerprint = Vec<u8>;

/// Fingerprints a collection snapshot ordered by document identifier.
pub(super) fn fingerprint_documents(documents: &[Document]) -> Fingerprint {
    let mut hasher = Sha256::new();
    for document in documents {
        absorb(&mut hasher, document);
    }
    hasher.finalize().to_vec()
}

/// Fingerprints a single-document snapshot; absence hashes differently from
/// an empty body.
pub(super) fn fingerprint_document(document: Option<&Document>) -> Fingerprint {
    let mut hasher = Sha256::new();
    match document {
        Some(present) => {
            hasher.update([1_u8]);
            absorb(&mut hasher, present);
        }
        None => hasher.update([0_u8]),
    }
    hasher.finalize().to_vec()
}

fn absorb(hasher: &mut Sha256, document: &Document) {
    hasher.update(document.id().as_bytes());
    hasher.update([0_u8]);
    hasher.update(document.body().to_string().as_bytes());
    hasher.update([0x1e_u8]);
}

/// Spawns a task that runs `fetch` every `interval` and forwards snapshots
/// whose fingerprint differs from the last one sent.
///
/// The first successful fetch is always forwarded. A failed fetch is
/// forwarded as an error and ends the watch.
pub(super) fn spawn_poller<T, F, Fut, H>(
    interval: Duration,
    fetch: F,
    fingerprint: H,
) -> Subscription<T>
where
    T: Send + 'static,
    F: Fn() -> Fut + Send + 'static,
    Fut: Future<Output = DocumentStoreResult<T>> + Send + 'static,
    H: Fn(&T) -> Fingerprint + Send + 'static,
{
    let (sender, receiver) = mpsc::channel::<SubscriptionEvent<T>>(SUBSCRIPTION_BUFFER);
    let producer = tokio::spawn(async move {
        let mut last: Option<Fingerprint> = None;
        loop {
            match fetch().await {
                Ok(snapshot) => {
                    let current = fingerprint(&snapshot);
                    if last.as_ref() != Some(&current) {
                        debug!("snapshot fingerprint changed");
                        last = Some(current);
                        if sender.send(Ok(snapshot)).await.is_err() {
                            break;
                        }
                    }
                }
                Err(err) => {
                    drop(sender.send(Err(err.to_subscription_error())).await);
                    break;
                }
            }
            tokio::time::sleep(interval).await;
        }
    });
    Subscription::new(receiver, producer)
}
