//! Data transfer objects for web requests and responses.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::domain::{Location, SearchCriteria, Trip, parse_date};
use crate::geocode::PlaceCandidate;

/// Request to search places by name.
#[derive(Debug, Deserialize)]
pub struct PlaceSearchRequest {
    /// Free-text query
    pub q: String,

    /// Maximum number of places (defaults to the session limit)
    pub limit: Option<usize>,
}

/// Places matching a query, in provider order.
#[derive(Debug, Serialize)]
pub struct PlaceSearchResponse {
    pub places: Vec<PlaceCandidate>,
}

/// Request to name a position.
#[derive(Debug, Deserialize)]
pub struct ReverseQuery {
    pub lat: f64,
    pub lng: f64,
}

/// Outcome of a reverse lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupStatus {
    Resolved,
    Unavailable,
}

/// Name of a position, or `null` when unavailable.
#[derive(Debug, Serialize)]
pub struct PlaceNameResponse {
    pub name: Option<String>,
    pub status: LookupStatus,
}

/// A location as submitted by a form.
///
/// Every field is optional so that half-filled forms deserialize; use
/// [`LocationInput::to_location`] to get a validated [`Location`].
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LocationInput {
    pub name: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

impl LocationInput {
    /// The validated location, if every field is present and in range.
    pub fn to_location(&self) -> Option<Location> {
        Location::parse(self.name.clone()?, self.lat?, self.lng?).ok()
    }
}

/// Request to search published trips.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TripSearchRequest {
    pub origin: Option<LocationInput>,
    pub destination: Option<LocationInput>,

    /// Travel date in YYYY-MM-DD format; empty or absent means any date
    pub date: Option<String>,
}

impl TripSearchRequest {
    /// Convert into matcher criteria.
    ///
    /// Invalid locations become missing endpoints, which match nothing.
    /// Returns `None` if a date was given but is not a valid date.
    pub fn to_criteria(&self) -> Option<SearchCriteria> {
        let date = match self.date.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(s) => Some(parse_date(s).ok()?),
        };

        Some(SearchCriteria {
            origin: self.origin.as_ref().and_then(LocationInput::to_location),
            destination: self.destination.as_ref().and_then(LocationInput::to_location),
            date,
        })
    }
}

/// Request to publish a trip.
#[derive(Debug, Deserialize)]
pub struct OfferTripRequest {
    #[serde(default)]
    pub origin: Option<LocationInput>,

    #[serde(default)]
    pub destination: Option<LocationInput>,

    /// Departure date in YYYY-MM-DD format
    #[serde(default)]
    pub date: Option<String>,

    /// Departure time in HH:MM format
    #[serde(default)]
    pub time: Option<String>,

    /// Price per passenger; 0 means free
    #[serde(default)]
    pub price: u32,

    /// Seats offered
    #[serde(default = "default_seats")]
    pub seats: u8,
}

fn default_seats() -> u8 {
    1
}

/// A list of trips.
#[derive(Debug, Serialize)]
pub struct TripListResponse {
    pub trips: Vec<Arc<Trip>>,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
