//! Driven ports for the hosted document store: report writes and live
//! collection snapshots.

use async_trait::async_trait;
use tokio::sync::watch;

use crate::domain::{NewReport, Project, Report};

/// Write failures raised by the document store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReportStoreError {
    #[error("document store unavailable: {message}")]
    Unavailable { message: String },
    #[error("document write failed: {message}")]
    Write { message: String },
}

impl ReportStoreError {
    /// Build the unavailable variant.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Build the write-failure variant.
    pub fn write(message: impl Into<String>) -> Self {
        Self::Write {
            message: message.into(),
        }
    }
}

/// Driven port persisting citizen reports.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReportStore: Send + Sync {
    /// Append a report document; the store assigns and returns its id.
    async fn add_report(&self, report: &NewReport) -> Result<String, ReportStoreError>;
}

/// Releases one live-collection subscription.
///
/// Subscriptions must be released when the reporting view is torn down to
/// avoid leaking backend connections. Dropping the handle releases it as a
/// backstop; [`SubscriptionHandle::release`] makes the teardown explicit.
pub struct SubscriptionHandle {
    on_release: Option<Box<dyn FnOnce() + Send>>,
}

impl SubscriptionHandle {
    /// Wrap an adapter-supplied release callback.
    pub fn new(on_release: impl FnOnce() + Send + 'static) -> Self {
        Self {
            on_release: Some(Box::new(on_release)),
        }
    }

    /// A handle with nothing to release, for adapters without connections.
    pub fn noop() -> Self {
        Self { on_release: None }
    }

    /// Release the backend subscription.
    pub fn release(mut self) {
        if let Some(on_release) = self.on_release.take() {
            on_release();
        }
    }
}

impl Drop for SubscriptionHandle {
    fn drop(&mut self) {
        if let Some(on_release) = self.on_release.take() {
            on_release();
        }
    }
}

impl std::fmt::Debug for SubscriptionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubscriptionHandle")
            .field("released", &self.on_release.is_none())
            .finish()
    }
}

/// One live-collection subscription yielding full authoritative snapshots.
///
/// Backed by a watch channel: if several snapshots arrive while the consumer
/// is busy, only the latest is observed (last-write-wins at the subscription
/// boundary, matching the collaborator's lack of ordering guarantees).
pub struct LiveSubscription<T> {
    receiver: watch::Receiver<Vec<T>>,
    handle: SubscriptionHandle,
}

impl<T: Clone> LiveSubscription<T> {
    /// Pair a snapshot receiver with its release handle.
    pub fn new(receiver: watch::Receiver<Vec<T>>, handle: SubscriptionHandle) -> Self {
        Self { receiver, handle }
    }

    /// The latest authoritative snapshot.
    pub fn snapshot(&self) -> Vec<T> {
        self.receiver.borrow().clone()
    }

    /// Wait for the next snapshot. Returns `Err` once the publisher is gone.
    pub async fn changed(&mut self) -> Result<(), watch::error::RecvError> {
        self.receiver.changed().await
    }

    /// Release the subscription explicitly.
    pub fn release(self) {
        self.handle.release();
    }
}

/// Driven port exposing the store's continuously synchronized collections.
pub trait LiveCollections: Send + Sync {
    /// Subscribe to the `projects` collection.
    fn subscribe_projects(&self) -> LiveSubscription<Project>;

    /// Subscribe to the `reports` collection.
    fn subscribe_reports(&self) -> LiveSubscription<Report>;
}
