//! Mock geocoder for testing and offline development.
//!
//! Serves an in-memory gazetteer as if it were a live provider: forward
//! lookups are case-insensitive substring matches, reverse lookups return
//! the nearest known place.

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use serde::Deserialize;

use crate::domain::{Coordinates, PlaceName};

use super::convert::PlaceCandidate;
use super::error::ResolutionError;
use super::resolver::{ForwardRequest, Geocoder, ReverseRequest};

/// A gazetteer entry as stored in fixture files.
#[derive(Debug, Deserialize)]
struct PlaceFixture {
    name: String,
    lat: f64,
    lng: f64,
    #[serde(default)]
    rank: Option<f64>,
}

#[derive(Debug, Default)]
struct Counters {
    search: AtomicUsize,
    reverse: AtomicUsize,
}

/// Mock geocoder that serves places from memory.
///
/// Clones share call counters, so a test can keep a handle while the
/// resolver owns another.
#[derive(Debug, Clone, Default)]
pub struct MockGeocoder {
    places: Arc<Vec<PlaceCandidate>>,
    latency: Duration,
    fail: bool,
    counters: Arc<Counters>,
}

impl MockGeocoder {
    /// Create an empty mock.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load places from a JSON file containing `[{name, lat, lng, rank?}]`.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ResolutionError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| ResolutionError::Api {
            status: 0,
            message: format!("Failed to read {:?}: {}", path, e),
        })?;

        let fixtures: Vec<PlaceFixture> =
            serde_json::from_str(&json).map_err(|e| ResolutionError::decode(e, &json))?;

        let mut mock = Self::new();
        for fixture in fixtures {
            let coordinates = Coordinates::new(fixture.lat, fixture.lng).map_err(|e| {
                ResolutionError::Json {
                    message: format!("{} in {:?}", e, path),
                    body: None,
                }
            })?;
            mock = mock.with_named_place(&fixture.name, coordinates, fixture.rank.unwrap_or(0.5));
        }
        Ok(mock)
    }

    /// Add a place.
    pub fn with_place(mut self, place: PlaceCandidate) -> Self {
        Arc::make_mut(&mut self.places).push(place);
        self
    }

    /// Add a place by name and position, assigning the next id.
    pub fn with_named_place(self, name: &str, coordinates: Coordinates, rank: f64) -> Self {
        let external_id = self.places.len() as i64 + 1;
        self.with_place(PlaceCandidate {
            external_id,
            display_name: name.to_string(),
            coordinates,
            rank,
        })
    }

    /// Delay every response.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Make every call fail with a 503.
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    /// Number of forward lookups served.
    pub fn search_calls(&self) -> usize {
        self.counters.search.load(Ordering::SeqCst)
    }

    /// Number of reverse lookups served.
    pub fn reverse_calls(&self) -> usize {
        self.counters.reverse.load(Ordering::SeqCst)
    }

    /// Known places, in insertion order.
    pub fn places(&self) -> &[PlaceCandidate] {
        &self.places
    }

    async fn simulate(&self) -> Result<(), ResolutionError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        if self.fail {
            return Err(ResolutionError::Api {
                status: 503,
                message: "mock geocoder unavailable".to_string(),
            });
        }
        Ok(())
    }
}

impl Geocoder for MockGeocoder {
    async fn search(
        &self,
        request: &ForwardRequest,
    ) -> Result<Vec<PlaceCandidate>, ResolutionError> {
        self.counters.search.fetch_add(1, Ordering::SeqCst);
        self.simulate().await?;

        // Ignores the limit; capping is the resolver's job.
        let needle = request.query.to_lowercase();
        Ok(self
            .places
            .iter()
            .filter(|p| p.display_name.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn reverse(&self, request: &ReverseRequest) -> Result<PlaceName, ResolutionError> {
        self.counters.reverse.fetch_add(1, Ordering::SeqCst);
        self.simulate().await?;

        let nearest = self.places.iter().min_by(|a, b| {
            let da = a.coordinates.rough_distance_sq(&request.coordinates);
            let db = b.coordinates.rough_distance_sq(&request.coordinates);
            da.total_cmp(&db)
        });

        nearest
            .and_then(|p| PlaceName::new(p.display_name.clone()).ok())
            .ok_or(ResolutionError::NoMatch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn coords(lat: f64, lng: f64) -> Coordinates {
        Coordinates::new(lat, lng).unwrap()
    }

    fn forward(query: &str) -> ForwardRequest {
        ForwardRequest {
            query: query.to_string(),
            limit: 5,
            language: "pt-BR".into(),
            country: "br".into(),
        }
    }

    #[tokio::test]
    async fn substring_search_is_case_insensitive() {
        let mock = MockGeocoder::new()
            .with_named_place("Belo Horizonte, MG, Brasil", coords(-19.9167, -43.9345), 0.7)
            .with_named_place("Vitória, ES, Brasil", coords(-20.3155, -40.3378), 0.6);

        let hits = mock.search(&forward("VITÓRIA")).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].display_name, "Vitória, ES, Brasil");
        assert_eq!(hits[0].external_id, 2);
        assert_eq!(mock.search_calls(), 1);
    }

    #[tokio::test]
    async fn clones_share_counters() {
        let mock = MockGeocoder::new();
        let handle = mock.clone();
        let _ = mock.search(&forward("abc")).await;
        assert_eq!(handle.search_calls(), 1);
    }

    #[tokio::test]
    async fn failing_mock_returns_network_error() {
        let mock = MockGeocoder::new().failing();
        let err = mock.search(&forward("abc")).await.unwrap_err();
        assert!(matches!(err, ResolutionError::Api { status: 503, .. }));
        assert_eq!(mock.search_calls(), 1);
    }

    #[tokio::test]
    async fn reverse_picks_nearest() {
        let mock = MockGeocoder::new()
            .with_named_place("São Paulo, SP, Brasil", coords(-23.5505, -46.6333), 0.9)
            .with_named_place("Campinas, SP, Brasil", coords(-22.9099, -47.0626), 0.6);

        let request = ReverseRequest {
            coordinates: coords(-22.95, -47.0),
            language: "pt-BR".into(),
        };
        let name = mock.reverse(&request).await.unwrap();
        assert_eq!(name.as_str(), "Campinas, SP, Brasil");
        assert_eq!(mock.reverse_calls(), 1);
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[
                {{"name": "Curitiba, PR, Brasil", "lat": -25.4284, "lng": -49.2733}},
                {{"name": "Florianópolis, SC, Brasil", "lat": -27.5954, "lng": -48.548, "rank": 0.8}}
            ]"#
        )
        .unwrap();

        let mock = MockGeocoder::from_file(file.path()).unwrap();
        assert_eq!(mock.places().len(), 2);
        assert_eq!(mock.places()[1].rank, 0.8);
        assert_eq!(mock.places()[0].rank, 0.5);
    }

    #[test]
    fn load_rejects_invalid_coordinates() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"name": "Nowhere", "lat": 200.0, "lng": 0.0}}]"#).unwrap();
        assert!(MockGeocoder::from_file(file.path()).is_err());
    }

    #[test]
    fn missing_file_is_error() {
        assert!(MockGeocoder::from_file("/nonexistent/places.json").is_err());
    }
}
