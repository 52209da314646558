//! Map handlers: project snapshots and the marker projection.

use actix_web::{get, web};

use crate::domain::{MarkersView, Project};
use crate::inbound::http::error::ApiResult;
use crate::inbound::http::state::AppState;

/// Current municipal projects.
#[utoipa::path(
    get,
    path = "/api/v1/projects",
    tags = ["map"],
    responses(
        (status = 200, description = "Current projects snapshot", body = [Project]),
    ),
    operation_id = "listProjects"
)]
#[get("/projects")]
pub async fn list_projects(state: web::Data<AppState>) -> ApiResult<web::Json<Vec<Project>>> {
    Ok(web::Json(state.reporting.projects().await))
}

/// Marker projection of the current snapshots, plus the citizen's own
/// location when one is resolved.
#[utoipa::path(
    get,
    path = "/api/v1/markers",
    tags = ["map"],
    responses(
        (status = 200, description = "Renderable markers", body = MarkersView),
    ),
    operation_id = "listMarkers"
)]
#[get("/markers")]
pub async fn list_markers(state: web::Data<AppState>) -> ApiResult<web::Json<MarkersView>> {
    Ok(web::Json(state.reporting.markers().await))
}
