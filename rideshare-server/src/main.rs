use std::net::SocketAddr;

use chrono::Local;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use rideshare_server::board::TripBoard;
use rideshare_server::cache::{CacheConfig, CachedGeocoder};
use rideshare_server::geocode::{Geocoder, LocationResolver, MockGeocoder, NominatimClient, NominatimConfig};
use rideshare_server::seed::{guest_driver, sample_geocoder, sample_trips};
use rideshare_server::session::SessionConfig;
use rideshare_server::web::{AppState, create_router};

const DEFAULT_FILTER: &str = "rideshare_server=info,tower_http=info";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
        )
        .init();

    let addr: SocketAddr = std::env::var("BIND_ADDR")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| SocketAddr::from(([127, 0, 0, 1], 3000)));

    // GEOCODER=mock serves a fixed gazetteer instead of calling Nominatim
    let use_mock = std::env::var("GEOCODER").is_ok_and(|v| v.eq_ignore_ascii_case("mock"));

    if use_mock {
        let mock = match std::env::var("MOCK_PLACES") {
            Ok(path) => MockGeocoder::from_file(&path).expect("Failed to load mock places"),
            Err(_) => sample_geocoder().expect("Sample gazetteer is invalid"),
        };
        info!(places = mock.places().len(), "using mock geocoder");
        serve(mock, addr).await;
    } else {
        let mut config = NominatimConfig::new();
        if let Ok(url) = std::env::var("NOMINATIM_URL") {
            config = config.with_base_url(url);
        }
        match std::env::var("NOMINATIM_USER_AGENT") {
            Ok(agent) => config = config.with_user_agent(agent),
            Err(_) => warn!(
                agent = config.user_agent.as_str(),
                "NOMINATIM_USER_AGENT not set; public instances may reject the default"
            ),
        }
        info!(base_url = config.base_url.as_str(), "using Nominatim geocoder");

        let client = NominatimClient::new(config).expect("Failed to create Nominatim client");
        serve(CachedGeocoder::new(client, &CacheConfig::default()), addr).await;
    }
}

async fn serve<G: Geocoder>(geocoder: G, addr: SocketAddr) {
    let trips = sample_trips(Local::now().date_naive()).expect("Sample trips are invalid");
    let guest = guest_driver().expect("Guest driver is invalid");
    let board = TripBoard::new(trips);
    info!(trips = board.len().await, "loaded sample trips");

    let state = AppState::new(
        LocationResolver::new(geocoder),
        board,
        guest,
        SessionConfig::default(),
    );
    let app = create_router(state);

    info!(%addr, "ride-share server listening");
    info!("  GET  /health                - Health check");
    info!("  GET  /api/places/search     - Search places by name");
    info!("  GET  /api/places/reverse    - Name a position");
    info!("  GET  /api/trips             - List trips");
    info!("  POST /api/trips             - Offer a trip");
    info!("  POST /api/trips/search      - Search trips");
    info!("  GET  /api/trips/:id         - Get a trip");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    axum::serve(listener, app).await.expect("Server error");
}
