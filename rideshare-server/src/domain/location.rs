//! Geographic value types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when a latitude/longitude pair is out of range.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid coordinates ({lat}, {lng}): {reason}")]
pub struct InvalidCoordinates {
    lat: f64,
    lng: f64,
    reason: &'static str,
}

/// A WGS84 position.
///
/// Latitude is always within `[-90, 90]` and longitude within `[-180, 180]`.
/// Any `Coordinates` value is valid by construction.
///
/// # Examples
///
/// ```
/// use rideshare_server::domain::Coordinates;
///
/// let sp = Coordinates::new(-23.5505, -46.6333).unwrap();
/// assert_eq!(sp.lat(), -23.5505);
///
/// assert!(Coordinates::new(91.0, 0.0).is_err());
/// assert!(Coordinates::new(0.0, f64::NAN).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinates", into = "RawCoordinates")]
pub struct Coordinates {
    lat: f64,
    lng: f64,
}

impl Coordinates {
    /// Geographic centre of Brazil, used as the map's starting point.
    pub const BRAZIL_CENTRE: Coordinates = Coordinates {
        lat: -14.235,
        lng: -51.925,
    };

    /// Validate and build a coordinate pair.
    pub fn new(lat: f64, lng: f64) -> Result<Self, InvalidCoordinates> {
        if !lat.is_finite() || !lng.is_finite() {
            return Err(InvalidCoordinates {
                lat,
                lng,
                reason: "must be finite numbers",
            });
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(InvalidCoordinates {
                lat,
                lng,
                reason: "latitude must be within [-90, 90]",
            });
        }
        if !(-180.0..=180.0).contains(&lng) {
            return Err(InvalidCoordinates {
                lat,
                lng,
                reason: "longitude must be within [-180, 180]",
            });
        }
        Ok(Self { lat, lng })
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lng(&self) -> f64 {
        self.lng
    }

    /// Squared planar distance in degrees. Only meaningful for comparing
    /// nearby points against each other.
    pub fn rough_distance_sq(&self, other: &Coordinates) -> f64 {
        let dlat = self.lat - other.lat;
        let dlng = self.lng - other.lng;
        dlat * dlat + dlng * dlng
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.5}, {:.5}", self.lat, self.lng)
    }
}

#[derive(Serialize, Deserialize)]
struct RawCoordinates {
    lat: f64,
    lng: f64,
}

impl TryFrom<RawCoordinates> for Coordinates {
    type Error = InvalidCoordinates;

    fn try_from(raw: RawCoordinates) -> Result<Self, Self::Error> {
        Coordinates::new(raw.lat, raw.lng)
    }
}

impl From<Coordinates> for RawCoordinates {
    fn from(c: Coordinates) -> Self {
        RawCoordinates {
            lat: c.lat,
            lng: c.lng,
        }
    }
}

/// Error returned when building a [`Location`] or [`PlaceName`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvalidLocation {
    #[error("location name must not be empty")]
    EmptyName,

    #[error(transparent)]
    Coordinates(#[from] InvalidCoordinates),
}

/// A human-readable place name returned by reverse resolution.
///
/// Never empty (whitespace-only names are rejected too).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PlaceName(String);

impl PlaceName {
    pub fn new(name: impl Into<String>) -> Result<Self, InvalidLocation> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(InvalidLocation::EmptyName);
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for PlaceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A resolved place: a display name plus its coordinates.
///
/// Immutable value type with structural equality. Serialized as
/// `{ "name", "lat", "lng" }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawLocation", into = "RawLocation")]
pub struct Location {
    name: PlaceName,
    coordinates: Coordinates,
}

impl Location {
    /// Build a location from a name and a validated position.
    pub fn new(name: PlaceName, coordinates: Coordinates) -> Self {
        Self { name, coordinates }
    }

    /// Build a location from raw parts, validating all of them.
    pub fn parse(name: impl Into<String>, lat: f64, lng: f64) -> Result<Self, InvalidLocation> {
        Ok(Self {
            name: PlaceName::new(name)?,
            coordinates: Coordinates::new(lat, lng)?,
        })
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn place_name(&self) -> &PlaceName {
        &self.name
    }

    pub fn coordinates(&self) -> Coordinates {
        self.coordinates
    }

    pub fn lat(&self) -> f64 {
        self.coordinates.lat
    }

    pub fn lng(&self) -> f64 {
        self.coordinates.lng
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.coordinates)
    }
}

#[derive(Serialize, Deserialize)]
struct RawLocation {
    name: String,
    lat: f64,
    lng: f64,
}

impl TryFrom<RawLocation> for Location {
    type Error = InvalidLocation;

    fn try_from(raw: RawLocation) -> Result<Self, Self::Error> {
        Location::parse(raw.name, raw.lat, raw.lng)
    }
}

impl From<Location> for RawLocation {
    fn from(loc: Location) -> Self {
        RawLocation {
            name: loc.name.into_string(),
            lat: loc.coordinates.lat,
            lng: loc.coordinates.lng,
        }
    }
}
