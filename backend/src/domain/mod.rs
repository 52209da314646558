//! Domain primitives, services, and ports.
//!
//! Purpose: define the strongly typed entities and the two core services
//! (session gate, live reporting view-model) independently of any transport.
//! Inbound adapters map these onto HTTP; outbound adapters implement the
//! ports in [`ports`].

pub mod auth;
pub mod error;
pub mod geo;
pub mod identity;
pub mod markers;
pub mod notification;
pub mod ports;
pub mod project;
pub mod report;
pub mod reporting;
pub mod session_gate;

pub use self::auth::{
    AuthError, Credentials, CredentialsValidationError, EmailAddress, SignUpForm,
    SignUpValidationError, MIN_PASSWORD_LENGTH,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::geo::{
    GeolocationSample, LocationError, LocationRequest, Position, PositionValidationError,
};
pub use self::identity::Identity;
pub use self::markers::{Marker, MarkerColor, MarkerSource, MarkersView};
pub use self::notification::{Notification, NotificationId, Severity};
pub use self::project::{Project, ProjectStatus, ProjectValidationError};
pub use self::report::{
    NewReport, Report, ReportForm, ReportKind, ReportStatus, SubmissionError, CITIZEN_REPORTER,
};
pub use self::reporting::{run_live_sync, LiveSyncHandle, ReportingService, ReportingViewModel};
pub use self::session_gate::{
    run_auth_observer, ActiveView, SessionGate, SessionState, SignUpError,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use citypulse::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
