//! Application state for the web layer.

use std::sync::Arc;

use crate::board::TripBoard;
use crate::domain::Driver;
use crate::geocode::LocationResolver;
use crate::session::SessionConfig;

/// Shared application state.
///
/// Contains all the services needed to handle requests. Generic over the
/// geocoding transport so routes can be exercised against a mock.
pub struct AppState<G> {
    /// Place lookups
    pub resolver: Arc<LocationResolver<G>>,

    /// Published trips
    pub board: TripBoard,

    /// Driver attached to trips offered through the API
    pub guest: Arc<Driver>,

    /// Lookup limits and locale hints
    pub config: Arc<SessionConfig>,
}

impl<G> AppState<G> {
    /// Create a new app state.
    pub fn new(
        resolver: LocationResolver<G>,
        board: TripBoard,
        guest: Driver,
        config: SessionConfig,
    ) -> Self {
        Self {
            resolver: Arc::new(resolver),
            board,
            guest: Arc::new(guest),
            config: Arc::new(config),
        }
    }
}

// Manual impl: a derive would require `G: Clone`.
impl<G> Clone for AppState<G> {
    fn clone(&self) -> Self {
        Self {
            resolver: Arc::clone(&self.resolver),
            board: self.board.clone(),
            guest: Arc::clone(&self.guest),
            config: Arc::clone(&self.config),
        }
    }
}
