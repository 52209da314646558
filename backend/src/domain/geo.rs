//! Geographic primitives shared by projects, reports, and geolocation.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use utoipa::{PartialSchema, ToSchema};

/// A latitude/longitude pair, serialized as a two-element `[lat, lng]` array
/// to match the document store's wire form.
///
/// ## Invariants
/// - Latitude lies in `[-90, 90]`, longitude in `[-180, 180]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(into = "[f64; 2]", try_from = "[f64; 2]")]
pub struct Position {
    latitude: f64,
    longitude: f64,
}

// The wire form is a numeric array, so the schema delegates to `Vec<f64>`
// rather than deriving an object schema from the struct fields.
impl PartialSchema for Position {
    fn schema() -> utoipa::openapi::RefOr<utoipa::openapi::schema::Schema> {
        <Vec<f64> as PartialSchema>::schema()
    }
}

impl ToSchema for Position {
    fn name() -> std::borrow::Cow<'static, str> {
        std::borrow::Cow::Borrowed("Position")
    }
}

/// Validation failures for [`Position`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PositionValidationError {
    #[error("latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),
    #[error("longitude {0} is outside [-180, 180]")]
    LongitudeOutOfRange(f64),
}

impl Position {
    /// Construct a validated position.
    ///
    /// # Examples
    /// ```
    /// use citypulse::domain::Position;
    ///
    /// let position = Position::new(20.5937, 78.9629).unwrap();
    /// assert_eq!(position.latitude(), 20.5937);
    /// ```
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, PositionValidationError> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(PositionValidationError::LatitudeOutOfRange(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(PositionValidationError::LongitudeOutOfRange(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Latitude component in degrees.
    pub fn latitude(self) -> f64 {
        self.latitude
    }

    /// Longitude component in degrees.
    pub fn longitude(self) -> f64 {
        self.longitude
    }
}

impl From<Position> for [f64; 2] {
    fn from(value: Position) -> Self {
        [value.latitude, value.longitude]
    }
}

impl TryFrom<[f64; 2]> for Position {
    type Error = PositionValidationError;

    fn try_from(value: [f64; 2]) -> Result<Self, Self::Error> {
        let [latitude, longitude] = value;
        Self::new(latitude, longitude)
    }
}

/// One resolved geolocation fix; refreshed on demand and never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GeolocationSample {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeolocationSample {
    /// The sample as a map position.
    pub fn position(self) -> Result<Position, PositionValidationError> {
        Position::new(self.latitude, self.longitude)
    }
}

/// Options passed to the geolocation provider for a one-shot fix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocationRequest {
    /// Ask the platform for its most accurate source.
    pub high_accuracy: bool,
    /// How long to wait for a fix before giving up.
    pub timeout: Duration,
    /// Accept a cached fix no older than this.
    pub maximum_age: Duration,
}

impl Default for LocationRequest {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout: Duration::from_secs(10),
            maximum_age: Duration::from_secs(60),
        }
    }
}

/// Geolocation failures, recorded as user-visible state rather than thrown.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, thiserror::Error,
)]
#[serde(rename_all = "snake_case")]
pub enum LocationError {
    #[error("Geolocation is not supported on this platform.")]
    Unsupported,
    #[error("User denied the request for geolocation.")]
    PermissionDenied,
    #[error("Location information is unavailable.")]
    Unavailable,
    #[error("The request to get user location timed out.")]
    TimedOut,
    #[error("An unknown error occurred.")]
    Unknown,
}
