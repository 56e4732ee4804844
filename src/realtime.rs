//! Long-lived realtime subscription handles.
//!
//! A [`Subscription`] owns the background task that produces its events.
//! Dropping the handle aborts that task, which tears the listener down.

use std::fmt;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Capacity of the channel between a subscription producer and its handle.
pub const SUBSCRIPTION_BUFFER: usize = 16;

/// Classification of subscription failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubscriptionErrorKind {
    /// The backing store refused access to the watched data.
    PermissionDenied,
    /// A document could not be decoded into the expected shape.
    Decode,
    /// The backing store failed.
    Backend,
}

impl SubscriptionErrorKind {
    /// Returns a stable code for display and logging.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PermissionDenied => "permission-denied",
            Self::Decode => "decode",
            Self::Backend => "backend",
        }
    }
}

impl fmt::Display for SubscriptionErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error delivered through a subscription instead of a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct SubscriptionError {
    kind: SubscriptionErrorKind,
    message: String,
}

impl SubscriptionError {
    /// Creates a subscription error.
    #[must_use]
    pub fn new(kind: SubscriptionErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Returns the error classification.
    #[must_use]
    pub const fn kind(&self) -> SubscriptionErrorKind {
        self.kind
    }

    /// Returns the raw error text.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// A single subscription notification.
pub type SubscriptionEvent<T> = Result<T, SubscriptionError>;

/// Handle to a live realtime subscription.
///
/// Each event is a complete snapshot of the watched data; consumers replace
/// their local copy wholesale on every notification.
#[derive(Debug)]
pub struct Subscription<T> {
    events: mpsc::Receiver<SubscriptionEvent<T>>,
    producer: Option<JoinHandle<()>>,
}

impl<T> Subscription<T> {
    /// Wraps a receiver and the task feeding it.
    #[must_use]
    pub const fn new(
        events: mpsc::Receiver<SubscriptionEvent<T>>,
        producer: JoinHandle<()>,
    ) -> Self {
        Self {
            events,
            producer: Some(producer),
        }
    }

    /// Waits for the next notification.
    ///
    /// Returns `None` once the producer has stopped.
    pub async fn next(&mut self) -> Option<SubscriptionEvent<T>> {
        self.events.recv().await
    }

    /// Returns a notification if one is already queued.
    pub fn try_next(&mut self) -> Option<SubscriptionEvent<T>> {
        self.events.try_recv().ok()
    }
}

impl<T: Send + 'static> Subscription<T> {
    /// Transforms every snapshot with `transform`.
    ///
    /// The returned handle owns the original subscription, so dropping it
    /// tears down the whole chain. Must be called within a Tokio runtime.
    #[must_use]
    pub fn map<U, F>(mut self, transform: F) -> Subscription<U>
    where
        U: Send + 'static,
        F: Fn(T) -> SubscriptionEvent<U> + Send + 'static,
    {
        let (sender, receiver) = mpsc::channel(SUBSCRIPTION_BUFFER);
        let forwarder = tokio::spawn(async move {
            while let Some(event) = self.next().await {
                let mapped = event.and_then(&transform);
                if sender.send(mapped).await.is_err() {
                    break;
                }
            }
        });
        Subscription::new(receiver, forwarder)
    }
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        if let Some(producer) = self.producer.take() {
            producer.abort();
        }
    }
}
