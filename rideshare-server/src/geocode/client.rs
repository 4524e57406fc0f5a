//! Nominatim HTTP client.
//!
//! Provides async forward and reverse lookups against an OpenStreetMap
//! Nominatim instance. Handles the required identification header,
//! concurrency limiting, and conversion to domain types.

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use tokio::sync::Semaphore;
use tracing::warn;

use crate::domain::PlaceName;

use super::convert::{PlaceCandidate, convert_reverse, convert_search_hits};
use super::error::ResolutionError;
use super::resolver::{ForwardRequest, Geocoder, ReverseRequest};
use super::types::{ReverseResponse, SearchHit};

/// Default base URL for the public Nominatim instance.
const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org";

/// Nominatim's usage policy rejects requests without an identifying agent.
const DEFAULT_USER_AGENT: &str = concat!("rideshare-server/", env!("CARGO_PKG_VERSION"));

/// The public instance allows roughly one request per second.
const DEFAULT_MAX_CONCURRENT: usize = 1;

/// Configuration for the Nominatim client.
#[derive(Debug, Clone)]
pub struct NominatimConfig {
    /// Base URL for the API (defaults to the public instance)
    pub base_url: String,
    /// Value of the User-Agent header
    pub user_agent: String,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl NominatimConfig {
    /// Create a config pointing at the public instance.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: 10,
        }
    }

    /// Set a custom base URL (self-hosted instance or testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the User-Agent header.
    pub fn with_user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Nominatim API client.
///
/// Uses a semaphore to limit concurrent requests and stay within the
/// provider's rate limits.
#[derive(Debug, Clone)]
pub struct NominatimClient {
    http: reqwest::Client,
    base_url: String,
    semaphore: Arc<Semaphore>,
}

impl NominatimClient {
    /// Create a new client with the given configuration.
    pub fn new(config: NominatimConfig) -> Result<Self, ResolutionError> {
        let mut headers = HeaderMap::new();

        let agent =
            HeaderValue::from_str(&config.user_agent).map_err(|_| ResolutionError::Api {
                status: 0,
                message: "Invalid User-Agent format".to_string(),
            })?;
        headers.insert(USER_AGENT, agent);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent.max(1))),
        })
    }

    /// Issue a GET and return the body of a successful response.
    async fn get_body(&self, path: &str, query: &[(&str, String)]) -> Result<String, ResolutionError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| ResolutionError::Api {
                status: 0,
                message: "Semaphore closed".to_string(),
            })?;

        let url = format!("{}/{}", self.base_url, path);

        let response = self.http.get(&url).query(query).send().await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ResolutionError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ResolutionError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(response.text().await?)
    }

    /// Search for places matching a free-text query.
    pub async fn search_places(
        &self,
        request: &ForwardRequest,
    ) -> Result<Vec<PlaceCandidate>, ResolutionError> {
        let body = self
            .get_body("search", &forward_params(request))
            .await?;

        let hits: Vec<SearchHit> =
            serde_json::from_str(&body).map_err(|e| ResolutionError::decode(e, &body))?;

        convert_search_hits(&hits).map_err(|e| {
            warn!(query = request.query.as_str(), error = %e, "malformed search hit");
            ResolutionError::Json {
                message: e.to_string(),
                body: None,
            }
        })
    }

    /// Find the name of the place at a position.
    pub async fn reverse_place(&self, request: &ReverseRequest) -> Result<PlaceName, ResolutionError> {
        let body = self
            .get_body("reverse", &reverse_params(request))
            .await?;

        let response: ReverseResponse =
            serde_json::from_str(&body).map_err(|e| ResolutionError::decode(e, &body))?;

        convert_reverse(&response).ok_or(ResolutionError::NoMatch)
    }
}

impl Geocoder for NominatimClient {
    async fn search(
        &self,
        request: &ForwardRequest,
    ) -> Result<Vec<PlaceCandidate>, ResolutionError> {
        self.search_places(request).await
    }

    async fn reverse(&self, request: &ReverseRequest) -> Result<PlaceName, ResolutionError> {
        self.reverse_place(request).await
    }
}

/// Query parameters for `/search`.
fn forward_params(request: &ForwardRequest) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("format", "json".to_string()),
        ("q", request.query.clone()),
        ("limit", request.limit.to_string()),
    ];
    if !request.language.is_empty() {
        params.push(("accept-language", request.language.clone()));
    }
    if !request.country.is_empty() {
        params.push(("countrycodes", request.country.clone()));
    }
    params
}

/// Query parameters for `/reverse`.
fn reverse_params(request: &ReverseRequest) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("format", "json".to_string()),
        ("lat", request.coordinates.lat().to_string()),
        ("lon", request.coordinates.lng().to_string()),
    ];
    if !request.language.is_empty() {
        params.push(("accept-language", request.language.clone()));
    }
    params
}
