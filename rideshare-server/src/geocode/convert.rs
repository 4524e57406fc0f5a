//! Conversion from Nominatim DTOs to domain types.

use serde::Serialize;

use crate::domain::{Coordinates, Location, PlaceName};

use super::types::{ReverseResponse, SearchHit};

/// Error during DTO to domain conversion.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConversionError {
    /// Latitude/longitude string is not a number
    #[error("invalid coordinate {0:?}")]
    InvalidNumber(String),

    /// Parsed coordinates are out of range
    #[error("{0}")]
    OutOfRange(String),

    /// Name is missing or blank
    #[error("missing display name for place {0}")]
    MissingName(i64),
}

/// A ranked place returned by forward resolution.
///
/// Lives only inside one suggestion list; selecting it turns it into a
/// [`Location`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaceCandidate {
    pub external_id: i64,
    pub display_name: String,
    #[serde(flatten)]
    pub coordinates: Coordinates,
    /// Provider relevance, higher is better.
    pub rank: f64,
}

impl PlaceCandidate {
    /// Turn the candidate into the location a field adopts on selection.
    pub fn to_location(&self) -> Option<Location> {
        let name = PlaceName::new(self.display_name.clone()).ok()?;
        Some(Location::new(name, self.coordinates))
    }
}

fn parse_coordinate(s: &str) -> Result<f64, ConversionError> {
    s.trim()
        .parse::<f64>()
        .map_err(|_| ConversionError::InvalidNumber(s.to_string()))
}

fn parse_coordinates(lat: &str, lon: &str) -> Result<Coordinates, ConversionError> {
    let lat = parse_coordinate(lat)?;
    let lng = parse_coordinate(lon)?;
    Coordinates::new(lat, lng).map_err(|e| ConversionError::OutOfRange(e.to_string()))
}

/// Convert one search hit.
pub fn convert_search_hit(hit: &SearchHit) -> Result<PlaceCandidate, ConversionError> {
    if hit.display_name.trim().is_empty() {
        return Err(ConversionError::MissingName(hit.place_id));
    }
    Ok(PlaceCandidate {
        external_id: hit.place_id,
        display_name: hit.display_name.clone(),
        coordinates: parse_coordinates(&hit.lat, &hit.lon)?,
        rank: hit.importance.unwrap_or(0.0),
    })
}

/// Convert a whole search response, keeping provider order.
///
/// A single malformed hit rejects the whole response.
pub fn convert_search_hits(hits: &[SearchHit]) -> Result<Vec<PlaceCandidate>, ConversionError> {
    hits.iter().map(convert_search_hit).collect()
}

/// Extract the place name from a reverse response.
///
/// Returns `None` when the provider found nothing (blank or missing name,
/// or an `error` payload).
pub fn convert_reverse(response: &ReverseResponse) -> Option<PlaceName> {
    if response.error.is_some() {
        return None;
    }
    response
        .display_name
        .as_ref()
        .and_then(|name| PlaceName::new(name.clone()).ok())
}
