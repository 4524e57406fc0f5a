//! Trip offers and the drivers who publish them.

use std::fmt;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::Location;

/// Maximum seats a single offer may advertise.
pub const MAX_SEATS: u8 = 6;

/// Date format used on the wire and for display (`YYYY-MM-DD`).
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Departure time format (`HH:MM`).
pub const TIME_FORMAT: &str = "%H:%M";

/// Validation failures when building trips and drivers.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvalidTrip {
    #[error("seats must be between 1 and {MAX_SEATS}, got {0}")]
    Seats(u8),

    #[error("driver rating must be within [0, 5], got {0}")]
    Rating(f32),

    #[error("invalid date {0:?}: expected YYYY-MM-DD")]
    Date(String),

    #[error("invalid time {0:?}: expected HH:MM")]
    Time(String),
}

/// A driver profile. Shared between trips via `Arc`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Driver {
    pub id: String,
    pub name: String,
    pub avatar_url: String,
    rating: f32,
}

impl Driver {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        avatar_url: impl Into<String>,
        rating: f32,
    ) -> Result<Self, InvalidTrip> {
        if !(0.0..=5.0).contains(&rating) {
            return Err(InvalidTrip::Rating(rating));
        }
        Ok(Self {
            id: id.into(),
            name: name.into(),
            avatar_url: avatar_url.into(),
            rating,
        })
    }

    pub fn rating(&self) -> f32 {
        self.rating
    }
}

/// Opaque trip identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TripId(String);

impl TripId {
    /// Wrap an existing identifier (seed data, lookups).
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh, unique identifier.
    pub fn generate() -> Self {
        Self(format!("trip-{}", uuid::Uuid::new_v4()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TripId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parse a `YYYY-MM-DD` date, rejecting anything not in canonical form.
pub fn parse_date(s: &str) -> Result<NaiveDate, InvalidTrip> {
    let date =
        NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|_| InvalidTrip::Date(s.to_string()))?;
    // chrono accepts "2024-6-1"; only the zero-padded spelling is canonical
    if date.format(DATE_FORMAT).to_string() != s {
        return Err(InvalidTrip::Date(s.to_string()));
    }
    Ok(date)
}

/// Parse an `HH:MM` departure time.
pub fn parse_time(s: &str) -> Result<NaiveTime, InvalidTrip> {
    let time =
        NaiveTime::parse_from_str(s, TIME_FORMAT).map_err(|_| InvalidTrip::Time(s.to_string()))?;
    if time.format(TIME_FORMAT).to_string() != s {
        return Err(InvalidTrip::Time(s.to_string()));
    }
    Ok(time)
}

/// The publishable part of a trip, as entered in the offer form.
///
/// Everything except the identifier and the driver, which the board assigns.
#[derive(Debug, Clone, PartialEq)]
pub struct TripOffer {
    pub origin: Location,
    pub destination: Location,
    pub date: NaiveDate,
    pub time: NaiveTime,
    /// Price per passenger in whole currency units; 0 means free.
    pub price: u32,
    seats: u8,
}

impl TripOffer {
    /// Build an offer, checking the seat count.
    ///
    /// Origin and destination may be the same place; dates in the past
    /// are accepted.
    pub fn new(
        origin: Location,
        destination: Location,
        date: NaiveDate,
        time: NaiveTime,
        price: u32,
        seats: u8,
    ) -> Result<Self, InvalidTrip> {
        if seats == 0 || seats > MAX_SEATS {
            return Err(InvalidTrip::Seats(seats));
        }
        Ok(Self {
            origin,
            destination,
            date,
            time,
            price,
            seats,
        })
    }

    pub fn seats(&self) -> u8 {
        self.seats
    }
}

/// A published ride offer. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trip {
    pub id: TripId,
    pub origin: Location,
    pub destination: Location,
    #[serde(serialize_with = "serialize_date")]
    pub date: NaiveDate,
    #[serde(serialize_with = "serialize_time")]
    pub time: NaiveTime,
    pub price: u32,
    pub seats: u8,
    pub driver: Arc<Driver>,
}

impl Trip {
    /// Publish an offer under the given id and driver.
    pub fn from_offer(id: TripId, offer: TripOffer, driver: Arc<Driver>) -> Self {
        Self {
            id,
            origin: offer.origin,
            destination: offer.destination,
            date: offer.date,
            time: offer.time,
            price: offer.price,
            seats: offer.seats,
            driver,
        }
    }

    /// Whether the ride is offered for free.
    pub fn is_free(&self) -> bool {
        self.price == 0
    }
}

fn serialize_date<S: serde::Serializer>(date: &NaiveDate, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(&date.format(DATE_FORMAT))
}

fn serialize_time<S: serde::Serializer>(time: &NaiveTime, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(&time.format(TIME_FORMAT))
}
