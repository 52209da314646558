//! HTTP adapter: REST handlers, session plumbing, and error mapping.

pub mod error;
pub mod health;
pub mod map;
pub mod reporting;
pub mod session;
pub mod session_config;
pub mod sessions;
pub mod state;
#[cfg(test)]
pub mod test_utils;

pub use error::ApiResult;
pub use health::HealthState;
pub use session::SessionContext;
pub use state::AppState;
