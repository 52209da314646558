//! Transient, dismissible notifications for submission outcomes.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// How a notification should be rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Error,
}

/// Time-based notification identifier (milliseconds since the Unix epoch).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
pub struct NotificationId(pub i64);

/// A client-local notification. Never expires on its own; removed only by
/// explicit dismissal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: NotificationId,
    pub title: String,
    pub message: String,
    pub severity: Severity,
}

impl Notification {
    /// A success notice, e.g. after a report was persisted.
    pub fn success(
        id: NotificationId,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            message: message.into(),
            severity: Severity::Success,
        }
    }

    /// An error notice carrying the failure's message.
    pub fn error(id: NotificationId, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            message: message.into(),
            severity: Severity::Error,
        }
    }
}
