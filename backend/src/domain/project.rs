//! Infrastructure projects published by the municipality.
//!
//! Projects are read-only from this service's perspective: they arrive as
//! full snapshots of a live collection and are never written back.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Position, PositionValidationError};

/// Lifecycle status of a municipal project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    Planned,
    Ongoing,
    Completed,
    /// Statuses this client does not recognise are preserved as `other`.
    #[serde(other)]
    Other,
}

/// A municipal infrastructure project shown on the live map.
///
/// Wire forms may carry the position either as a `[lat, lng]` pair or as
/// separate `latitude`/`longitude` fields; both deserialize to [`Position`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[serde(try_from = "ProjectDto")]
pub struct Project {
    pub id: String,
    pub position: Position,
    /// Free-form project category, e.g. `road` or `metro`.
    #[serde(rename = "type")]
    pub kind: String,
    pub status: ProjectStatus,
    pub name: String,
    pub description: String,
}

/// Deserialization failures for project documents.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProjectValidationError {
    #[error("project document carries no position")]
    MissingPosition,
    #[error(transparent)]
    Position(#[from] PositionValidationError),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProjectDto {
    id: String,
    #[serde(default)]
    position: Option<Position>,
    #[serde(default)]
    latitude: Option<f64>,
    #[serde(default)]
    longitude: Option<f64>,
    #[serde(rename = "type")]
    kind: String,
    status: ProjectStatus,
    #[serde(default)]
    name: String,
    #[serde(default)]
    description: String,
}

impl TryFrom<ProjectDto> for Project {
    type Error = ProjectValidationError;

    fn try_from(value: ProjectDto) -> Result<Self, Self::Error> {
        let position = resolve_position(value.position, value.latitude, value.longitude)?;
        Ok(Self {
            id: value.id,
            position,
            kind: value.kind,
            status: value.status,
            name: value.name,
            description: value.description,
        })
    }
}

/// Prefer an explicit pair; otherwise fall back to split fields.
pub(crate) fn resolve_position(
    pair: Option<Position>,
    latitude: Option<f64>,
    longitude: Option<f64>,
) -> Result<Position, ProjectValidationError> {
    if let Some(position) = pair {
        return Ok(position);
    }
    match (latitude, longitude) {
        (Some(lat), Some(lng)) => Ok(Position::new(lat, lng)?),
        _ => Err(ProjectValidationError::MissingPosition),
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn deserializes_pair_position_form() {
        let project: Project = serde_json::from_value(json!({
            "id": "p1",
            "position": [12.97, 77.59],
            "type": "metro",
            "status": "ongoing",
            "name": "Purple Line Extension",
            "description": "New stations east of the river",
        }))
        .expect("pair form");
        assert_eq!(project.position.latitude(), 12.97);
        assert_eq!(project.status, ProjectStatus::Ongoing);
    }

    #[rstest]
    fn deserializes_split_position_form() {
        let project: Project = serde_json::from_value(json!({
            "id": "p2",
            "latitude": 28.61,
            "longitude": 77.20,
            "type": "road",
            "status": "planned",
            "name": "Ring Road Resurfacing",
            "description": "",
        }))
        .expect("split form");
        assert_eq!(project.position.longitude(), 77.20);
    }

    #[rstest]
    fn rejects_documents_without_a_position() {
        let result: Result<Project, _> = serde_json::from_value(json!({
            "id": "p3",
            "type": "road",
            "status": "planned",
            "name": "Orphan",
            "description": "",
        }));
        assert!(result.is_err());
    }

    #[rstest]
    fn unknown_statuses_collapse_to_other() {
        let status: ProjectStatus = serde_json::from_value(json!("paused")).expect("other bucket");
        assert_eq!(status, ProjectStatus::Other);
    }
}
