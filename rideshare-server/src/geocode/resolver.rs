//! Location resolution policy on top of a geocoding transport.

use std::future::Future;

use tracing::debug;

use crate::domain::{Coordinates, PlaceName};

use super::convert::PlaceCandidate;
use super::error::ResolutionError;

/// Queries shorter than this never reach the provider.
pub const DEFAULT_MIN_QUERY_CHARS: usize = 3;

/// A forward (text → places) lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ForwardRequest {
    pub query: String,
    pub limit: usize,
    /// `accept-language` hint, e.g. "pt-BR".
    pub language: String,
    /// Comma-separated ISO country codes; empty means worldwide.
    pub country: String,
}

/// A reverse (coordinates → name) lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct ReverseRequest {
    pub coordinates: Coordinates,
    pub language: String,
}

/// Trait for geocoding transports.
///
/// This abstraction allows sessions and routes to be tested with a
/// fake provider.
pub trait Geocoder: Send + Sync + 'static {
    /// Look up places matching a text query, in provider relevance order.
    fn search(
        &self,
        request: &ForwardRequest,
    ) -> impl Future<Output = Result<Vec<PlaceCandidate>, ResolutionError>> + Send;

    /// Look up the best-matching place name at a position.
    fn reverse(
        &self,
        request: &ReverseRequest,
    ) -> impl Future<Output = Result<PlaceName, ResolutionError>> + Send;
}

/// Resolves user input into places.
///
/// Enforces the lookup policy (minimum query length, result cap) so that
/// every transport behaves the same.
#[derive(Debug, Clone)]
pub struct LocationResolver<G> {
    geocoder: G,
    min_query_chars: usize,
}

impl<G: Geocoder> LocationResolver<G> {
    pub fn new(geocoder: G) -> Self {
        Self {
            geocoder,
            min_query_chars: DEFAULT_MIN_QUERY_CHARS,
        }
    }

    /// Set the minimum query length (in characters).
    pub fn with_min_query_chars(mut self, n: usize) -> Self {
        self.min_query_chars = n;
        self
    }

    pub fn geocoder(&self) -> &G {
        &self.geocoder
    }

    /// Forward resolution.
    ///
    /// Queries shorter than the minimum return an empty list without any
    /// network call. Results keep the provider's order and are capped at
    /// `limit`.
    pub async fn forward_search(
        &self,
        query: &str,
        limit: usize,
        language: &str,
        country: &str,
    ) -> Result<Vec<PlaceCandidate>, ResolutionError> {
        if query.chars().count() < self.min_query_chars || limit == 0 {
            debug!(query, "query below minimum length, skipping lookup");
            return Ok(Vec::new());
        }

        let request = ForwardRequest {
            query: query.to_string(),
            limit,
            language: language.to_string(),
            country: country.to_string(),
        };

        let mut places = self.geocoder.search(&request).await?;
        places.truncate(limit);
        debug!(query, count = places.len(), "forward lookup complete");
        Ok(places)
    }

    /// Reverse resolution.
    pub async fn reverse_resolve(
        &self,
        coordinates: Coordinates,
        language: &str,
    ) -> Result<PlaceName, ResolutionError> {
        let request = ReverseRequest {
            coordinates,
            language: language.to_string(),
        };
        let name = self.geocoder.reverse(&request).await?;
        debug!(%coordinates, name = name.as_str(), "reverse lookup complete");
        Ok(name)
    }
}
