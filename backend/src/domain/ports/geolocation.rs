//! Driven port for one-shot geolocation fixes.

use async_trait::async_trait;

use crate::domain::{GeolocationSample, LocationError, LocationRequest};

/// Platform geolocation capability.
///
/// Failures are returned, never thrown past the caller: the reporting
/// view-model records them as user-visible state.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GeolocationProvider: Send + Sync {
    /// Request one position fix under the given accuracy/timeout window.
    async fn locate(&self, request: &LocationRequest)
        -> Result<GeolocationSample, LocationError>;
}
