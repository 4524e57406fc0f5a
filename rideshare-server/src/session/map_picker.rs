//! Map-based place picking.
//!
//! The session holds a single pin position. Each move triggers one reverse
//! lookup; until it answers the session is `Resolving` and cannot be
//! confirmed. A newer move supersedes the older lookup by generation, the
//! same way suggestion lookups are superseded.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::domain::{Coordinates, Location, PlaceName};
use crate::geocode::{Geocoder, LocationResolver};

use super::config::SessionConfig;
use super::generation::{Generation, GenerationCounter};

/// Label shown while a lookup is outstanding.
pub const RESOLVING_LABEL: &str = "Buscando endereço...";

/// Label shown when the position could not be named.
pub const ADDRESS_UNAVAILABLE: &str = "Não foi possível obter o endereço.";

/// Naming state of the current pin position.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "name", rename_all = "snake_case")]
pub enum MapState {
    Resolving,
    Resolved(PlaceName),
    /// The lookup failed or found nothing.
    Failed,
}

impl MapState {
    /// Text to show under the map.
    pub fn label(&self) -> &str {
        match self {
            MapState::Resolving => RESOLVING_LABEL,
            MapState::Resolved(name) => name.as_str(),
            MapState::Failed => ADDRESS_UNAVAILABLE,
        }
    }
}

#[derive(Debug)]
struct Inner {
    position: Coordinates,
    state: MapState,
    closed: bool,
    generations: GenerationCounter,
    task: Option<JoinHandle<()>>,
}

impl Inner {
    fn cancel(&mut self) -> Generation {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.generations.advance()
    }
}

fn lock(inner: &Mutex<Inner>) -> MutexGuard<'_, Inner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Controller for one open map picker.
pub struct MapSelectionSession<G> {
    resolver: Arc<LocationResolver<G>>,
    language: String,
    inner: Arc<Mutex<Inner>>,
}

impl<G: Geocoder> MapSelectionSession<G> {
    /// Open a picker.
    ///
    /// With an initial location the pin starts there, already named. Without
    /// one it starts at the configured anchor, which is resolved right away.
    pub fn open(
        resolver: Arc<LocationResolver<G>>,
        initial: Option<Location>,
        config: &SessionConfig,
    ) -> Self {
        let (position, state) = match &initial {
            Some(location) => (
                location.coordinates(),
                MapState::Resolved(location.place_name().clone()),
            ),
            None => (config.default_anchor, MapState::Resolving),
        };

        let session = Self {
            resolver,
            language: config.language.clone(),
            inner: Arc::new(Mutex::new(Inner {
                position,
                state,
                closed: false,
                generations: GenerationCounter::new(),
                task: None,
            })),
        };

        if initial.is_none() {
            let mut inner = lock(&session.inner);
            let generation = inner.generations.advance();
            inner.task = Some(session.spawn_reverse(generation, position));
        }

        session
    }

    /// Move the pin (map click or marker drag) and look up its name.
    pub fn move_to(&self, position: Coordinates) {
        let mut inner = lock(&self.inner);
        if inner.closed {
            return;
        }

        let generation = inner.cancel();
        inner.position = position;
        inner.state = MapState::Resolving;
        debug!(%generation, %position, "map pin moved");
        inner.task = Some(self.spawn_reverse(generation, position));
    }

    /// Finalise the pick.
    ///
    /// Only succeeds once the current position has a name; while resolving,
    /// after a failure, or after close it returns `None` and changes nothing.
    pub fn confirm(&self) -> Option<Location> {
        let inner = lock(&self.inner);
        if inner.closed {
            return None;
        }
        match &inner.state {
            MapState::Resolved(name) => Some(Location::new(name.clone(), inner.position)),
            MapState::Resolving | MapState::Failed => None,
        }
    }

    /// Dismiss the picker, dropping any outstanding lookup.
    pub fn close(&self) {
        let mut inner = lock(&self.inner);
        inner.cancel();
        inner.closed = true;
    }

    pub fn position(&self) -> Coordinates {
        lock(&self.inner).position
    }

    pub fn state(&self) -> MapState {
        lock(&self.inner).state.clone()
    }

    pub fn is_closed(&self) -> bool {
        lock(&self.inner).closed
    }

    fn spawn_reverse(&self, generation: Generation, position: Coordinates) -> JoinHandle<()> {
        let resolver = Arc::clone(&self.resolver);
        let language = self.language.clone();
        let shared = Arc::clone(&self.inner);

        tokio::spawn(async move {
            let result = resolver.reverse_resolve(position, &language).await;

            let mut inner = lock(&shared);
            if !inner.generations.is_current(generation) {
                debug!(%generation, %position, "discarding superseded address");
                return;
            }

            inner.state = match result {
                Ok(name) => MapState::Resolved(name),
                Err(e) => {
                    warn!(%position, kind = %e.kind(), error = %e, "reverse lookup failed");
                    MapState::Failed
                }
            };
            inner.task = None;
        })
    }
}

impl<G> Drop for MapSelectionSession<G> {
    fn drop(&mut self) {
        if let Some(task) = lock(&self.inner).task.take() {
            task.abort();
        }
    }
}
