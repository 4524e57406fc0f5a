//! Nominatim response DTOs.
//!
//! These map directly to the provider's JSON. Only the fields we consume
//! are declared; everything else in the payload is ignored.

use serde::Deserialize;

/// One hit from `GET /search?format=json`.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchHit {
    /// Provider-internal place identifier.
    pub place_id: i64,

    /// Full human-readable name, e.g. "Curitiba, Paraná, Região Sul, Brasil".
    pub display_name: String,

    /// Latitude as a decimal string.
    pub lat: String,

    /// Longitude as a decimal string.
    pub lon: String,

    /// Relevance score; absent for some result classes.
    pub importance: Option<f64>,
}

/// Response from `GET /reverse?format=json`.
///
/// On a miss Nominatim answers 200 with `{"error": "Unable to geocode"}`
/// instead of a place.
#[derive(Debug, Clone, Deserialize)]
pub struct ReverseResponse {
    pub display_name: Option<String>,
    pub error: Option<String>,
}
