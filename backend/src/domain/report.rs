//! Citizen issue reports and the submission form.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::project::{resolve_position, ProjectValidationError};
use crate::domain::{Error, Position};

/// Reporter recorded on citizen submissions.
pub const CITIZEN_REPORTER: &str = "citizen";

/// Issue category selected by the reporting citizen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    #[default]
    Congestion,
    Hazard,
    Outage,
    Sewage,
    Other,
}

impl ReportKind {
    /// Stable lowercase name, matching the wire form.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Congestion => "congestion",
            Self::Hazard => "hazard",
            Self::Outage => "outage",
            Self::Sewage => "sewage",
            Self::Other => "other",
        }
    }
}

/// Triage status of a report. New submissions always start as `reported`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    #[default]
    Reported,
    Confirmed,
    Resolved,
    /// Statuses this client does not recognise are preserved as `other`.
    #[serde(other)]
    Other,
}

/// The citizen-facing submission form.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportForm {
    #[serde(rename = "type")]
    pub kind: ReportKind,
    pub description: String,
}

/// A report ready to persist; the store assigns the document id.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewReport {
    #[serde(rename = "type")]
    pub kind: ReportKind,
    pub description: String,
    pub position: Position,
    pub status: ReportStatus,
    pub timestamp: DateTime<Utc>,
    pub reported_by: String,
}

/// A persisted citizen report, as read back from the live collection.
///
/// Never updated or deleted by this service; officials act on reports
/// through other tooling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[serde(try_from = "ReportDto")]
pub struct Report {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ReportKind,
    pub description: String,
    pub position: Position,
    pub status: ReportStatus,
    pub timestamp: DateTime<Utc>,
    pub reported_by: String,
}

impl Report {
    /// Attach the store-assigned id to a persisted draft.
    pub fn from_new(id: impl Into<String>, new: NewReport) -> Self {
        Self {
            id: id.into(),
            kind: new.kind,
            description: new.description,
            position: new.position,
            status: new.status,
            timestamp: new.timestamp,
            reported_by: new.reported_by,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReportDto {
    id: String,
    #[serde(rename = "type")]
    kind: ReportKind,
    #[serde(default)]
    description: String,
    #[serde(default)]
    position: Option<Position>,
    #[serde(default)]
    latitude: Option<f64>,
    #[serde(default)]
    longitude: Option<f64>,
    #[serde(default)]
    status: ReportStatus,
    timestamp: DateTime<Utc>,
    #[serde(default)]
    reported_by: String,
}

impl TryFrom<ReportDto> for Report {
    type Error = ProjectValidationError;

    fn try_from(value: ReportDto) -> Result<Self, Self::Error> {
        let position = resolve_position(value.position, value.latitude, value.longitude)?;
        Ok(Self {
            id: value.id,
            kind: value.kind,
            description: value.description,
            position,
            status: value.status,
            timestamp: value.timestamp,
            reported_by: value.reported_by,
        })
    }
}

/// Failures raised by the submit-report operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmissionError {
    #[error("Unable to get your location. Please enable location services.")]
    MissingLocation,
    #[error("A submission is already in progress.")]
    AlreadyInFlight,
    #[error("{message}")]
    Backend { message: String },
}

impl From<SubmissionError> for Error {
    fn from(value: SubmissionError) -> Self {
        match value {
            SubmissionError::MissingLocation => Self::invalid_request(value.to_string()),
            SubmissionError::AlreadyInFlight => Self::conflict(value.to_string()),
            SubmissionError::Backend { message } => Self::service_unavailable(message),
        }
    }
}
