//! Shared HTTP adapter state.
//!
//! Handlers depend on the domain services (use-cases) instead of constructing
//! them inline, which keeps the adapter testable with deterministic doubles.

use std::sync::Arc;

use crate::domain::{ReportingService, SessionGate};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub gate: Arc<SessionGate>,
    pub reporting: Arc<ReportingService>,
}

impl AppState {
    /// Construct state from explicit service instances.
    pub fn new(gate: Arc<SessionGate>, reporting: Arc<ReportingService>) -> Self {
        Self { gate, reporting }
    }
}
