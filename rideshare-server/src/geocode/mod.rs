//! Location resolution through an external geocoding provider.
//!
//! This module provides an HTTP client for OpenStreetMap Nominatim and the
//! resolution policy layered on top of it.
//!
//! Key characteristics:
//! - Forward lookups turn free text into ranked [`PlaceCandidate`]s;
//!   reverse lookups turn coordinates into a [`PlaceName`](crate::domain::PlaceName)
//! - Queries shorter than three characters never reach the provider
//! - Coordinates arrive as decimal strings and are validated on conversion
//! - The transport sits behind the [`Geocoder`] trait, so sessions can run
//!   against [`MockGeocoder`]

mod client;
mod convert;
mod error;
mod mock;
mod resolver;
mod types;

pub use client::{NominatimClient, NominatimConfig};
pub use convert::{ConversionError, PlaceCandidate};
pub use error::{ResolutionError, ResolutionErrorKind};
pub use mock::MockGeocoder;
pub use resolver::{DEFAULT_MIN_QUERY_CHARS, ForwardRequest, Geocoder, LocationResolver, ReverseRequest};
pub use types::{ReverseResponse, SearchHit};
