//! Scriptable geolocation provider for development and tests.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::ports::GeolocationProvider;
use crate::domain::{GeolocationSample, LocationError, LocationRequest};

/// Returns a preconfigured outcome for every fix request.
pub struct FixedGeolocationProvider {
    outcome: Mutex<Result<GeolocationSample, LocationError>>,
}

impl FixedGeolocationProvider {
    /// Always resolve to `sample`.
    pub fn resolving(sample: GeolocationSample) -> Self {
        Self {
            outcome: Mutex::new(Ok(sample)),
        }
    }

    /// Always fail with `error`.
    pub fn failing(error: LocationError) -> Self {
        Self {
            outcome: Mutex::new(Err(error)),
        }
    }

    /// Change the scripted outcome mid-test.
    pub fn set_outcome(&self, outcome: Result<GeolocationSample, LocationError>) {
        if let Ok(mut slot) = self.outcome.lock() {
            *slot = outcome;
        }
    }
}

#[async_trait]
impl GeolocationProvider for FixedGeolocationProvider {
    async fn locate(
        &self,
        _request: &LocationRequest,
    ) -> Result<GeolocationSample, LocationError> {
        self.outcome
            .lock()
            .map_or(Err(LocationError::Unknown), |outcome| *outcome)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;

    #[tokio::test]
    async fn outcome_can_change_between_requests() {
        let provider = FixedGeolocationProvider::failing(LocationError::PermissionDenied);
        let request = LocationRequest::default();
        assert_eq!(
            provider.locate(&request).await,
            Err(LocationError::PermissionDenied)
        );

        let sample = GeolocationSample {
            latitude: 12.9,
            longitude: 77.5,
        };
        provider.set_outcome(Ok(sample));
        assert_eq!(provider.locate(&request).await, Ok(sample));
    }
}
