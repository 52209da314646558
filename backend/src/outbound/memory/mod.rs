//! In-process adapters standing in for the hosted collaborators.
//!
//! These keep the binary runnable and the integration tests deterministic
//! without reimplementing the backend-as-a-service itself; real SDK-backed
//! adapters would replace them file-for-file at the same ports.

mod auth;
mod geolocation;
mod store;

pub use auth::FixtureAuthBackend;
pub use geolocation::FixedGeolocationProvider;
pub use store::MemoryDocumentStore;
