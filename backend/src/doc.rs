//! OpenAPI documentation configuration.
//!
//! Defines [`ApiDoc`], the generated specification for the REST surface:
//! session and account operations, the live map snapshots, citizen reporting,
//! and the health probes. The session cookie security scheme is attached so
//! generated clients know how the dashboard is gated.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{
    EmailAddress, Error, ErrorCode, GeolocationSample, Identity, LocationError, Marker,
    MarkerColor, MarkerSource, MarkersView, Notification, NotificationId, Position, Project,
    ProjectStatus, Report, ReportForm, ReportKind, ReportStatus, Severity,
};
use crate::inbound::http::reporting::LocationStatus;
use crate::inbound::http::sessions::{
    AccountCreated, DashboardView, SignInRequest, SignUpRequest,
};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/session.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "CityPulse backend API",
        description = "Live municipal issue reporting: public map snapshots, \
                       citizen report submission, and the officials' dashboard."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::sessions::sign_in,
        crate::inbound::http::sessions::sign_out,
        crate::inbound::http::sessions::sign_up,
        crate::inbound::http::sessions::dashboard,
        crate::inbound::http::map::list_projects,
        crate::inbound::http::map::list_markers,
        crate::inbound::http::reporting::list_reports,
        crate::inbound::http::reporting::submit_report,
        crate::inbound::http::reporting::list_notifications,
        crate::inbound::http::reporting::dismiss_notification,
        crate::inbound::http::reporting::resolve_location,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        AccountCreated,
        DashboardView,
        EmailAddress,
        Error,
        ErrorCode,
        GeolocationSample,
        Identity,
        LocationError,
        LocationStatus,
        Marker,
        MarkerColor,
        MarkerSource,
        MarkersView,
        Notification,
        NotificationId,
        Position,
        Project,
        ProjectStatus,
        Report,
        ReportForm,
        ReportKind,
        ReportStatus,
        Severity,
        SignInRequest,
        SignUpRequest,
    )),
    tags(
        (name = "session", description = "Sign-in, registration, and the officials' dashboard"),
        (name = "map", description = "Live map snapshots and marker projection"),
        (name = "reporting", description = "Citizen reports, notifications, and geolocation"),
        (name = "health", description = "Liveness and readiness probes")
    )
)]
pub struct ApiDoc;
