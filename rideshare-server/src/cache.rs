//! Caching layer for geocoding responses.
//!
//! Suggestion fields re-issue the same queries constantly (focus, retyping
//! after a typo), and the public provider is rate limited. Successful
//! responses are cached; failures never are, so a transient outage does
//! not stick.
//!
//! Reverse lookups are keyed by coordinates rounded to 1e-5 degrees
//! (about a metre), which bounds cache cardinality for marker drags.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;
use tracing::trace;

use crate::domain::PlaceName;
use crate::geocode::{ForwardRequest, Geocoder, PlaceCandidate, ResolutionError, ReverseRequest};

/// Cache key for reverse lookups: (lat e5, lng e5, language).
type ReverseKey = (i64, i64, String);

/// Cached forward lookup entry.
type ForwardEntry = Arc<Vec<PlaceCandidate>>;

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries per lookup kind.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(10 * 60),
            max_capacity: 1000,
        }
    }
}

/// Round coordinates to the reverse cache grid.
fn reverse_key(request: &ReverseRequest) -> ReverseKey {
    let grid = |v: f64| (v * 1e5).round() as i64;
    (
        grid(request.coordinates.lat()),
        grid(request.coordinates.lng()),
        request.language.clone(),
    )
}

/// Geocoder with caching.
///
/// Wraps any [`Geocoder`] and caches its successful responses.
pub struct CachedGeocoder<G> {
    inner: G,
    forward: MokaCache<ForwardRequest, ForwardEntry>,
    reverse: MokaCache<ReverseKey, PlaceName>,
}

impl<G: Geocoder> CachedGeocoder<G> {
    /// Create a new cached geocoder.
    pub fn new(inner: G, config: &CacheConfig) -> Self {
        let forward = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();
        let reverse = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self {
            inner,
            forward,
            reverse,
        }
    }

    /// Number of cached entries (forward, reverse).
    ///
    /// Flushes moka's pending maintenance first so the counts are exact.
    pub async fn entry_counts(&self) -> (u64, u64) {
        self.forward.run_pending_tasks().await;
        self.reverse.run_pending_tasks().await;
        (self.forward.entry_count(), self.reverse.entry_count())
    }

    /// Invalidate all cached entries.
    pub fn invalidate_all(&self) {
        self.forward.invalidate_all();
        self.reverse.invalidate_all();
    }
}

impl<G: Geocoder> Geocoder for CachedGeocoder<G> {
    async fn search(
        &self,
        request: &ForwardRequest,
    ) -> Result<Vec<PlaceCandidate>, ResolutionError> {
        // Try cache first
        if let Some(cached) = self.forward.get(request).await {
            trace!(query = request.query.as_str(), "forward cache hit");
            return Ok(cached.as_ref().clone());
        }

        let places = self.inner.search(request).await?;

        self.forward
            .insert(request.clone(), Arc::new(places.clone()))
            .await;

        Ok(places)
    }

    async fn reverse(&self, request: &ReverseRequest) -> Result<PlaceName, ResolutionError> {
        let key = reverse_key(request);

        if let Some(cached) = self.reverse.get(&key).await {
            trace!(coordinates = %request.coordinates, "reverse cache hit");
            return Ok(cached);
        }

        let name = self.inner.reverse(request).await?;
        self.reverse.insert(key, name.clone()).await;
        Ok(name)
    }
}
