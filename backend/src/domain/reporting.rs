//! Live reporting view-model: synchronized projects and reports, the
//! citizen's geolocation, dismissible notifications, and report submission.
//!
//! The view-model itself is synchronous state with pure transitions; the
//! [`ReportingService`] wraps it with the driven ports and async operations.

use std::sync::Arc;

use mockable::Clock;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::domain::markers::{markers_view, MarkersView};
use crate::domain::ports::{
    GeolocationProvider, LiveCollections, MapHandle, ReportStore, FOCUS_ZOOM,
};
use crate::domain::{
    GeolocationSample, LocationError, LocationRequest, NewReport, Notification, NotificationId,
    Project, Report, ReportForm, ReportStatus, SubmissionError, CITIZEN_REPORTER,
};

/// Synchronous view-model state.
///
/// Each live-collection update fully replaces the corresponding set: the
/// collaborator offers no ordering guarantee, so every snapshot is treated as
/// authoritative and never diffed against its predecessor.
#[derive(Debug, Default)]
pub struct ReportingViewModel {
    projects: Vec<Project>,
    reports: Vec<Report>,
    location: Option<GeolocationSample>,
    location_error: Option<LocationError>,
    notifications: Vec<Notification>,
    draft: ReportForm,
    is_submitting: bool,
}

impl ReportingViewModel {
    /// Replace the project set with the latest authoritative snapshot.
    pub fn apply_projects_snapshot(&mut self, snapshot: Vec<Project>) {
        self.projects = snapshot;
    }

    /// Replace the report set with the latest authoritative snapshot.
    pub fn apply_reports_snapshot(&mut self, snapshot: Vec<Report>) {
        self.reports = snapshot;
    }

    /// Record a resolved location, clearing any previous failure.
    pub fn record_location(&mut self, sample: GeolocationSample) {
        self.location = Some(sample);
        self.location_error = None;
    }

    /// Record a geolocation failure without discarding an older fix.
    pub fn record_location_error(&mut self, error: LocationError) {
        self.location_error = Some(error);
    }

    /// The resolved location, if any.
    pub fn location(&self) -> Option<GeolocationSample> {
        self.location
    }

    /// The most recent geolocation failure, if any.
    pub fn location_error(&self) -> Option<LocationError> {
        self.location_error
    }

    /// Current projects snapshot.
    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    /// Current reports snapshot.
    pub fn reports(&self) -> &[Report] {
        &self.reports
    }

    /// Current notifications, oldest first.
    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    /// The submission form as last left by the citizen.
    pub fn draft(&self) -> &ReportForm {
        &self.draft
    }

    /// Whether a submission is currently in flight.
    pub fn is_submitting(&self) -> bool {
        self.is_submitting
    }

    /// Append a notification.
    pub fn push_notification(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }

    /// Remove exactly the notification with `id`, preserving the order of
    /// the rest. Returns `false` when no such entry exists.
    pub fn dismiss_notification(&mut self, id: NotificationId) -> bool {
        let before = self.notifications.len();
        self.notifications.retain(|n| n.id != id);
        self.notifications.len() != before
    }

    /// Project the current snapshots onto the map.
    pub fn markers(&self) -> MarkersView {
        markers_view(&self.projects, &self.reports, self.location)
    }
}

/// Notification copy for submission outcomes.
const SUBMITTED_TITLE: &str = "Report Submitted";
const SUBMITTED_MESSAGE: &str =
    "Your issue has been reported successfully using your current location!";
const SUBMISSION_ERROR_TITLE: &str = "Submission Error";

/// Async facade over the view-model and its driven ports.
pub struct ReportingService {
    state: RwLock<ReportingViewModel>,
    store: Arc<dyn ReportStore>,
    locator: Arc<dyn GeolocationProvider>,
    map: Arc<dyn MapHandle>,
    clock: Arc<dyn Clock>,
}

impl ReportingService {
    /// Wire the service to its ports.
    pub fn new(
        store: Arc<dyn ReportStore>,
        locator: Arc<dyn GeolocationProvider>,
        map: Arc<dyn MapHandle>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            state: RwLock::new(ReportingViewModel::default()),
            store,
            locator,
            map,
            clock,
        }
    }

    /// Request a fresh geolocation fix.
    ///
    /// On success the sample is recorded and the map recentres on it; on
    /// failure the error is recorded as view-model state. Nothing is thrown:
    /// callers observe the outcome through [`Self::location_status`].
    pub async fn resolve_location(&self) {
        match self.locator.locate(&LocationRequest::default()).await {
            Ok(sample) => {
                if let Ok(position) = sample.position() {
                    self.map.set_view(position, FOCUS_ZOOM);
                }
                self.state.write().await.record_location(sample);
            }
            Err(err) => {
                info!(error = %err, "geolocation unavailable");
                self.state.write().await.record_location_error(err);
            }
        }
    }

    /// The current location sample and most recent failure, if any.
    pub async fn location_status(&self) -> (Option<GeolocationSample>, Option<LocationError>) {
        let state = self.state.read().await;
        (state.location(), state.location_error())
    }

    /// Submit a citizen report.
    ///
    /// Requires a resolved location. On success the report is persisted with
    /// status `reported` and the clock's timestamp, a success notification is
    /// appended, and the draft form resets. On failure an error notification
    /// carries the failure's message and the draft is left intact for retry.
    pub async fn submit_report(&self, form: ReportForm) -> Result<Report, SubmissionError> {
        let (position, notification_id) = {
            let mut state = self.state.write().await;
            if state.is_submitting {
                return Err(SubmissionError::AlreadyInFlight);
            }
            let id = NotificationId(self.clock.utc().timestamp_millis());
            let Some(sample) = state.location() else {
                let err = SubmissionError::MissingLocation;
                state.draft = form;
                state.push_notification(Notification::error(
                    id,
                    SUBMISSION_ERROR_TITLE,
                    err.to_string(),
                ));
                return Err(err);
            };
            let position = sample.position().map_err(|err| SubmissionError::Backend {
                message: err.to_string(),
            })?;
            state.is_submitting = true;
            state.draft = form.clone();
            (position, id)
        };

        let new_report = NewReport {
            kind: form.kind,
            description: form.description,
            position,
            status: ReportStatus::Reported,
            timestamp: self.clock.utc(),
            reported_by: CITIZEN_REPORTER.to_owned(),
        };

        let outcome = self.store.add_report(&new_report).await;
        let mut state = self.state.write().await;
        state.is_submitting = false;
        match outcome {
            Ok(id) => {
                state.draft = ReportForm::default();
                state.push_notification(Notification::success(
                    notification_id,
                    SUBMITTED_TITLE,
                    SUBMITTED_MESSAGE,
                ));
                info!(report = %id, "report persisted");
                Ok(Report::from_new(id, new_report))
            }
            Err(err) => {
                error!(error = %err, "report submission failed");
                state.push_notification(Notification::error(
                    notification_id,
                    SUBMISSION_ERROR_TITLE,
                    err.to_string(),
                ));
                Err(SubmissionError::Backend {
                    message: err.to_string(),
                })
            }
        }
    }

    /// Current notifications, oldest first.
    pub async fn notifications(&self) -> Vec<Notification> {
        self.state.read().await.notifications().to_vec()
    }

    /// Dismiss a notification by id.
    pub async fn dismiss_notification(&self, id: NotificationId) -> bool {
        self.state.write().await.dismiss_notification(id)
    }

    /// Current projects snapshot.
    pub async fn projects(&self) -> Vec<Project> {
        self.state.read().await.projects().to_vec()
    }

    /// Current reports snapshot.
    pub async fn reports(&self) -> Vec<Report> {
        self.state.read().await.reports().to_vec()
    }

    /// The map projection of the current snapshots.
    pub async fn markers(&self) -> MarkersView {
        self.state.read().await.markers()
    }

    /// The submission draft as last left by the citizen.
    pub async fn draft(&self) -> ReportForm {
        self.state.read().await.draft().clone()
    }
}

/// Running live-collection subscriptions for one reporting view.
///
/// Releasing the handle stops both sync tasks and releases the underlying
/// subscriptions, mirroring the teardown contract of the live view.
pub struct LiveSyncHandle {
    tasks: Vec<JoinHandle<()>>,
}

impl LiveSyncHandle {
    /// Stop the sync tasks and release their subscriptions.
    pub fn release(self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}

/// Start the two independent snapshot subscriptions.
///
/// Each task applies the current snapshot, then waits for the next; the
/// watch-backed subscription guarantees that a consumer busy during several
/// updates observes only the latest one.
pub fn run_live_sync(
    service: Arc<ReportingService>,
    collections: &dyn LiveCollections,
) -> LiveSyncHandle {
    let mut projects = collections.subscribe_projects();
    let projects_service = Arc::clone(&service);
    let projects_task = tokio::spawn(async move {
        loop {
            let snapshot = projects.snapshot();
            projects_service
                .state
                .write()
                .await
                .apply_projects_snapshot(snapshot);
            if projects.changed().await.is_err() {
                break;
            }
        }
    });

    let mut reports = collections.subscribe_reports();
    let reports_task = tokio::spawn(async move {
        loop {
            let snapshot = reports.snapshot();
            service.state.write().await.apply_reports_snapshot(snapshot);
            if reports.changed().await.is_err() {
                break;
            }
        }
    });

    LiveSyncHandle {
        tasks: vec![projects_task, reports_task],
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ports::{
        MockGeolocationProvider, MockReportStore, NullMapHandle, ReportStoreError,
    };
    use crate::domain::{Position, ReportKind, Severity};
    use chrono::{TimeZone, Utc};
    use mockable::MockClock;
    use rstest::rstest;

    fn fixed_clock() -> Arc<MockClock> {
        let mut clock = MockClock::new();
        let instant = Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).single();
        let instant = instant.expect("valid fixture instant");
        clock.expect_utc().return_const(instant);
        Arc::new(clock)
    }

    fn sample() -> GeolocationSample {
        GeolocationSample {
            latitude: 12.97,
            longitude: 77.59,
        }
    }

    fn service_with(
        store: MockReportStore,
        locator: MockGeolocationProvider,
    ) -> ReportingService {
        ReportingService::new(
            Arc::new(store),
            Arc::new(locator),
            Arc::new(NullMapHandle),
            fixed_clock(),
        )
    }

    #[rstest]
    fn snapshots_fully_replace_previous_state() {
        let mut vm = ReportingViewModel::default();
        let first: Vec<Report> = serde_json::from_value(serde_json::json!([{
            "id": "r1", "type": "hazard", "description": "pothole",
            "position": [1.0, 2.0], "status": "reported",
            "timestamp": "2024-05-01T08:30:00Z", "reportedBy": "citizen",
        }]))
        .expect("valid snapshot");
        vm.apply_reports_snapshot(first);
        assert_eq!(vm.reports().len(), 1);

        // The later snapshot wins outright, even when smaller.
        vm.apply_reports_snapshot(Vec::new());
        assert!(vm.reports().is_empty());
    }

    #[rstest]
    fn dismissal_removes_exactly_one_entry_in_order() {
        let mut vm = ReportingViewModel::default();
        for i in 1..=3 {
            vm.push_notification(Notification::success(
                NotificationId(i),
                format!("t{i}"),
                "m",
            ));
        }
        assert!(vm.dismiss_notification(NotificationId(2)));
        let ids: Vec<i64> = vm.notifications().iter().map(|n| n.id.0).collect();
        assert_eq!(ids, vec![1, 3]);
        assert!(!vm.dismiss_notification(NotificationId(2)));
    }

    #[tokio::test]
    async fn submission_without_a_location_fails_and_notifies() {
        let mut store = MockReportStore::new();
        store.expect_add_report().never();
        let service = service_with(store, MockGeolocationProvider::new());

        let err = service
            .submit_report(ReportForm {
                kind: ReportKind::Hazard,
                description: "pothole".to_owned(),
            })
            .await
            .expect_err("must fail without a location");

        assert_eq!(err, SubmissionError::MissingLocation);
        let notices = service.notifications().await;
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].severity, Severity::Error);
        // The draft stays intact for retry.
        assert_eq!(service.draft().await.description, "pothole");
    }

    #[tokio::test]
    async fn an_in_flight_submission_latches_out_a_second_one() {
        let mut store = MockReportStore::new();
        store.expect_add_report().never();
        let service = service_with(store, MockGeolocationProvider::new());
        {
            let mut state = service.state.write().await;
            state.record_location(sample());
            state.is_submitting = true;
        }

        let err = service
            .submit_report(ReportForm {
                kind: ReportKind::Hazard,
                description: "pothole".to_owned(),
            })
            .await
            .expect_err("latched while submitting");
        assert_eq!(err, SubmissionError::AlreadyInFlight);
    }

    #[tokio::test]
    async fn successful_submission_persists_and_resets_the_draft() {
        let mut store = MockReportStore::new();
        store.expect_add_report().times(1).returning(|report| {
            assert_eq!(report.status, ReportStatus::Reported);
            assert_eq!(report.reported_by, CITIZEN_REPORTER);
            Ok("doc-1".to_owned())
        });
        let service = service_with(store, MockGeolocationProvider::new());
        service.state.write().await.record_location(sample());

        let report = service
            .submit_report(ReportForm {
                kind: ReportKind::Hazard,
                description: "pothole".to_owned(),
            })
            .await
            .expect("submission succeeds");

        assert_eq!(report.id, "doc-1");
        assert_eq!(
            report.timestamp,
            Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0)
                .single()
                .expect("fixture instant")
        );
        let notices = service.notifications().await;
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].severity, Severity::Success);
        assert_eq!(service.draft().await, ReportForm::default());
    }

    #[tokio::test]
    async fn failed_persistence_notifies_with_the_backend_message() {
        let mut store = MockReportStore::new();
        store
            .expect_add_report()
            .returning(|_| Err(ReportStoreError::unavailable("quota exceeded")));
        let service = service_with(store, MockGeolocationProvider::new());
        service.state.write().await.record_location(sample());

        let form = ReportForm {
            kind: ReportKind::Outage,
            description: "street lights".to_owned(),
        };
        let err = service
            .submit_report(form.clone())
            .await
            .expect_err("store failure propagates");

        assert!(matches!(err, SubmissionError::Backend { .. }));
        let notices = service.notifications().await;
        assert!(notices[0].message.contains("quota exceeded"));
        assert_eq!(service.draft().await, form);
    }

    #[tokio::test]
    async fn denied_permission_is_recorded_not_thrown() {
        let mut locator = MockGeolocationProvider::new();
        locator
            .expect_locate()
            .returning(|_| Err(LocationError::PermissionDenied));
        let service = service_with(MockReportStore::new(), locator);

        service.resolve_location().await;

        let (location, error) = service.location_status().await;
        assert!(location.is_none());
        assert_eq!(error, Some(LocationError::PermissionDenied));
    }

    #[tokio::test]
    async fn resolved_location_recenters_the_injected_map() {
        use std::sync::Mutex;

        #[derive(Default)]
        struct RecordingMapHandle {
            views: Mutex<Vec<(Position, u8)>>,
        }

        impl MapHandle for RecordingMapHandle {
            fn set_view(&self, position: Position, zoom: u8) {
                self.views
                    .lock()
                    .expect("recording mutex")
                    .push((position, zoom));
            }
        }

        let mut locator = MockGeolocationProvider::new();
        locator.expect_locate().returning(|_| Ok(sample()));
        let map = Arc::new(RecordingMapHandle::default());
        let service = ReportingService::new(
            Arc::new(MockReportStore::new()),
            Arc::new(locator),
            Arc::clone(&map) as Arc<dyn MapHandle>,
            fixed_clock(),
        );

        service.resolve_location().await;

        let views = map.views.lock().expect("recording mutex");
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].1, FOCUS_ZOOM);
        let (location, error) = service.location_status().await;
        assert_eq!(location, Some(sample()));
        assert!(error.is_none());
    }
}
