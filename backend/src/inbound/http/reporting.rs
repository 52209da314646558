//! Citizen reporting handlers: submissions, notifications, and geolocation.

use actix_web::{delete, get, post, web, HttpResponse};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{
    Error, GeolocationSample, LocationError, Notification, NotificationId, Report, ReportForm,
};
use crate::inbound::http::error::ApiResult;
use crate::inbound::http::state::AppState;

/// Outcome of the most recent geolocation request.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LocationStatus {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<GeolocationSample>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<LocationError>,
}

/// Current citizen reports, newest snapshot wins.
#[utoipa::path(
    get,
    path = "/api/v1/reports",
    tags = ["reporting"],
    responses(
        (status = 200, description = "Current reports snapshot", body = [Report]),
    ),
    operation_id = "listReports"
)]
#[get("/reports")]
pub async fn list_reports(state: web::Data<AppState>) -> ApiResult<web::Json<Vec<Report>>> {
    Ok(web::Json(state.reporting.reports().await))
}

/// Submit a citizen report at the current location.
///
/// Fails with `400` when no location has been resolved; the draft is kept so
/// the citizen can retry after enabling location services.
#[utoipa::path(
    post,
    path = "/api/v1/reports",
    tags = ["reporting"],
    request_body = ReportForm,
    responses(
        (status = 201, description = "Report persisted", body = Report),
        (status = 400, description = "No resolved location"),
        (status = 409, description = "A submission is already in progress"),
        (status = 503, description = "Document store rejected the write"),
    ),
    operation_id = "submitReport"
)]
#[post("/reports")]
pub async fn submit_report(
    state: web::Data<AppState>,
    payload: web::Json<ReportForm>,
) -> ApiResult<HttpResponse> {
    let report = state
        .reporting
        .submit_report(payload.into_inner())
        .await
        .map_err(Error::from)?;
    Ok(HttpResponse::Created().json(report))
}

/// Pending notifications, oldest first.
#[utoipa::path(
    get,
    path = "/api/v1/notifications",
    tags = ["reporting"],
    responses(
        (status = 200, description = "Pending notifications", body = [Notification]),
    ),
    operation_id = "listNotifications"
)]
#[get("/notifications")]
pub async fn list_notifications(
    state: web::Data<AppState>,
) -> ApiResult<web::Json<Vec<Notification>>> {
    Ok(web::Json(state.reporting.notifications().await))
}

/// Dismiss one notification by id.
#[utoipa::path(
    delete,
    path = "/api/v1/notifications/{id}",
    tags = ["reporting"],
    params(
        ("id" = i64, Path, description = "Notification identifier"),
    ),
    responses(
        (status = 204, description = "Notification dismissed"),
        (status = 404, description = "No such notification"),
    ),
    operation_id = "dismissNotification"
)]
#[delete("/notifications/{id}")]
pub async fn dismiss_notification(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let id = NotificationId(path.into_inner());
    if state.reporting.dismiss_notification(id).await {
        Ok(HttpResponse::NoContent().finish())
    } else {
        Err(Error::not_found("no such notification"))
    }
}

/// Request a fresh geolocation fix.
///
/// Always `200`: failures are part of the reported status, not transport
/// errors, so the client can render the platform's message inline.
#[utoipa::path(
    post,
    path = "/api/v1/location",
    tags = ["reporting"],
    responses(
        (status = 200, description = "Location outcome", body = LocationStatus),
    ),
    operation_id = "resolveLocation"
)]
#[post("/location")]
pub async fn resolve_location(state: web::Data<AppState>) -> ApiResult<web::Json<LocationStatus>> {
    state.reporting.resolve_location().await;
    let (location, error) = state.reporting.location_status().await;
    Ok(web::Json(LocationStatus { location, error }))
}
