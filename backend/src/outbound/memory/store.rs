//! In-memory document store with watch-backed live collections.
//!
//! Stands in for the hosted document database at the port boundary: report
//! writes append to the reports collection and every subscriber observes the
//! new authoritative snapshot. Subscription handles decrement a counter so
//! tests can assert that teardown releases backend connections.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::watch;
use uuid::Uuid;

use crate::domain::ports::{
    LiveCollections, LiveSubscription, ReportStore, ReportStoreError, SubscriptionHandle,
};
use crate::domain::{NewReport, Project, Report};

/// Watch-channel document store for development and tests.
pub struct MemoryDocumentStore {
    projects_tx: watch::Sender<Vec<Project>>,
    reports_tx: watch::Sender<Vec<Report>>,
    active_subscriptions: Arc<AtomicUsize>,
}

impl Default for MemoryDocumentStore {
    fn default() -> Self {
        let (projects_tx, _) = watch::channel(Vec::new());
        let (reports_tx, _) = watch::channel(Vec::new());
        Self {
            projects_tx,
            reports_tx,
            active_subscriptions: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl MemoryDocumentStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish an authoritative projects snapshot, as the municipality's
    /// tooling would.
    ///
    /// `send_replace` stores the value even while nobody subscribes, so
    /// snapshots published before the first subscriber are not lost.
    pub fn publish_projects(&self, snapshot: Vec<Project>) {
        self.projects_tx.send_replace(snapshot);
    }

    /// Publish an authoritative reports snapshot, replacing local writes.
    pub fn publish_reports(&self, snapshot: Vec<Report>) {
        self.reports_tx.send_replace(snapshot);
    }

    /// Current reports snapshot, for assertions.
    pub fn reports(&self) -> Vec<Report> {
        self.reports_tx.borrow().clone()
    }

    /// Number of unreleased live subscriptions.
    pub fn active_subscriptions(&self) -> usize {
        self.active_subscriptions.load(Ordering::SeqCst)
    }

    fn tracked_handle(&self) -> SubscriptionHandle {
        self.active_subscriptions.fetch_add(1, Ordering::SeqCst);
        let counter = Arc::clone(&self.active_subscriptions);
        SubscriptionHandle::new(move || {
            counter.fetch_sub(1, Ordering::SeqCst);
        })
    }
}

#[async_trait]
impl ReportStore for MemoryDocumentStore {
    async fn add_report(&self, report: &NewReport) -> Result<String, ReportStoreError> {
        let id = Uuid::new_v4().to_string();
        let stored = Report::from_new(id.clone(), report.clone());
        self.reports_tx.send_modify(|reports| reports.push(stored));
        Ok(id)
    }
}

impl LiveCollections for MemoryDocumentStore {
    fn subscribe_projects(&self) -> LiveSubscription<Project> {
        LiveSubscription::new(self.projects_tx.subscribe(), self.tracked_handle())
    }

    fn subscribe_reports(&self) -> LiveSubscription<Report> {
        LiveSubscription::new(self.reports_tx.subscribe(), self.tracked_handle())
    }
}
