//! Injected handle onto the rendered map surface.
//!
//! Replaces the original's module-level global map reference: whichever logic
//! needs to recenter the viewport receives this handle explicitly.

use crate::domain::Position;

/// Zoom level used when centring on the citizen's own location.
pub const FOCUS_ZOOM: u8 = 15;

/// Minimal control surface over the map renderer.
pub trait MapHandle: Send + Sync {
    /// Centre the viewport on `position` at `zoom`.
    fn set_view(&self, position: Position, zoom: u8);
}

/// Map handle that ignores view changes, for headless deployments and tests
/// that do not assert on the viewport.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullMapHandle;

impl MapHandle for NullMapHandle {
    fn set_view(&self, _position: Position, _zoom: u8) {}
}
