//! Domain ports and supporting types for the hexagonal boundary.

mod auth_backend;
mod authorization_policy;
mod document_store;
mod geolocation;
mod map_handle;

#[cfg(test)]
pub use auth_backend::MockAuthBackend;
pub use auth_backend::{AuthBackend, AuthBackendError, AuthStateReceiver, AuthenticatedUser};
pub use authorization_policy::{AuthorizationPolicy, StaticAllowList};
#[cfg(test)]
pub use document_store::MockReportStore;
pub use document_store::{
    LiveCollections, LiveSubscription, ReportStore, ReportStoreError, SubscriptionHandle,
};
#[cfg(test)]
pub use geolocation::MockGeolocationProvider;
pub use geolocation::GeolocationProvider;
pub use map_handle::{MapHandle, NullMapHandle, FOCUS_ZOOM};
