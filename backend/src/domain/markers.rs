//! Pure projection of projects and reports onto map markers.
//!
//! Fully derived from the reporting view-model's current snapshot; nothing
//! here is persisted or cached.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{GeolocationSample, Position, Project, ProjectStatus, Report, ReportStatus};

/// Marker colour derived from an entity's status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MarkerColor {
    /// Completed projects and resolved reports.
    Green,
    /// Ongoing projects and confirmed reports.
    Orange,
    /// Planned projects.
    Blue,
    /// Everything else, including fresh reports.
    Red,
}

impl MarkerColor {
    /// Colour rule for project statuses.
    pub fn for_project(status: ProjectStatus) -> Self {
        match status {
            ProjectStatus::Completed => Self::Green,
            ProjectStatus::Ongoing => Self::Orange,
            ProjectStatus::Planned => Self::Blue,
            ProjectStatus::Other => Self::Red,
        }
    }

    /// Colour rule for report statuses.
    pub fn for_report(status: ReportStatus) -> Self {
        match status {
            ReportStatus::Resolved => Self::Green,
            ReportStatus::Confirmed => Self::Orange,
            ReportStatus::Reported | ReportStatus::Other => Self::Red,
        }
    }
}

/// Which entity a marker represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MarkerSource {
    Project,
    Report,
}

/// One renderable map marker with its detail-popup content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Marker {
    pub id: String,
    pub source: MarkerSource,
    pub position: Position,
    pub color: MarkerColor,
    /// First character of the entity's type, uppercased.
    pub label: String,
    pub title: String,
    pub description: String,
}

/// The full projection handed to the map renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MarkersView {
    pub markers: Vec<Marker>,
    /// The citizen's own location, rendered as a distinct dot.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_location: Option<GeolocationSample>,
}

fn label_for(kind: &str) -> String {
    kind.chars()
        .next()
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_default()
}

/// Project a single municipal project.
pub fn project_marker(project: &Project) -> Marker {
    Marker {
        id: format!("project-{}", project.id),
        source: MarkerSource::Project,
        position: project.position,
        color: MarkerColor::for_project(project.status),
        label: label_for(&project.kind),
        title: project.name.clone(),
        description: project.description.clone(),
    }
}

/// Project a single citizen report.
pub fn report_marker(report: &Report) -> Marker {
    Marker {
        id: format!("report-{}", report.id),
        source: MarkerSource::Report,
        position: report.position,
        color: MarkerColor::for_report(report.status),
        label: label_for(report.kind.as_str()),
        title: format!("Report #{}", report.id),
        description: report.description.clone(),
    }
}

/// Project the current snapshots into one renderable view.
pub fn markers_view(
    projects: &[Project],
    reports: &[Report],
    current_location: Option<GeolocationSample>,
) -> MarkersView {
    let markers = projects
        .iter()
        .map(project_marker)
        .chain(reports.iter().map(report_marker))
        .collect();
    MarkersView {
        markers,
        current_location,
    }
}
