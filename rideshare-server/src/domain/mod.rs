//! Domain types for the ride-share listing.
//!
//! This module contains the core value types: places, trips, drivers and
//! search criteria. All types enforce their invariants at construction
//! time, so code that receives these types can trust their validity.

mod criteria;
mod location;
mod trip;

pub use criteria::SearchCriteria;
pub use location::{Coordinates, InvalidCoordinates, InvalidLocation, Location, PlaceName};
pub use trip::{
    DATE_FORMAT, Driver, InvalidTrip, MAX_SEATS, TIME_FORMAT, Trip, TripId, TripOffer, parse_date,
    parse_time,
};
