//! Authenticated identity and privilege derivation.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::AuthorizationPolicy;
use crate::domain::EmailAddress;

/// The signed-in identity as seen by the rest of the application.
///
/// `is_privileged` is derived from the [`AuthorizationPolicy`] at the moment
/// the identity is built; it is never cached across policy changes, so every
/// sign-in and auth-state change re-evaluates membership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub email: EmailAddress,
    pub is_privileged: bool,
}

impl Identity {
    /// Derive an identity for `email` under the given policy.
    pub fn derive(email: EmailAddress, policy: &dyn AuthorizationPolicy) -> Self {
        let is_privileged = policy.is_authorized(&email);
        Self {
            email,
            is_privileged,
        }
    }
}
