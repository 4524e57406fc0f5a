//! Debounced place suggestions for one text field.
//!
//! Every text change advances the session generation and (re)schedules a
//! lookup after the debounce delay. A lookup may only commit its results if
//! its generation is still current when it completes, so a slow response to
//! an old query can never overwrite the suggestions for newer text.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::domain::Location;
use crate::geocode::{Geocoder, LocationResolver, PlaceCandidate};

use super::config::SessionConfig;
use super::generation::{Generation, GenerationCounter};

/// Where the current lookup stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchState {
    /// Nothing in flight; waiting for input or the debounce delay.
    Idle,
    /// A lookup has been issued and not yet answered.
    Pending,
    /// The last lookup returned at least one candidate.
    Populated,
    /// The last lookup returned nothing.
    Empty,
    /// The last lookup failed. Displayed like `Empty`.
    Failed,
}

/// Point-in-time view of a session, for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuggestionSnapshot {
    pub text: String,
    pub state: FetchState,
    pub candidates: Vec<PlaceCandidate>,
    pub selection: Option<Location>,
    pub panel_open: bool,
}

impl SuggestionSnapshot {
    /// Whether the candidate panel should be drawn at all.
    pub fn panel_visible(&self) -> bool {
        self.panel_open && !self.text.is_empty()
    }
}

#[derive(Debug)]
struct Inner {
    text: String,
    state: FetchState,
    candidates: Vec<PlaceCandidate>,
    selection: Option<Location>,
    panel_open: bool,
    closed: bool,
    fetches: GenerationCounter,
    blurs: GenerationCounter,
    fetch_task: Option<JoinHandle<()>>,
    blur_task: Option<JoinHandle<()>>,
}

impl Inner {
    fn new() -> Self {
        Self {
            text: String::new(),
            state: FetchState::Idle,
            candidates: Vec::new(),
            selection: None,
            panel_open: false,
            closed: false,
            fetches: GenerationCounter::new(),
            blurs: GenerationCounter::new(),
            fetch_task: None,
            blur_task: None,
        }
    }

    /// Abort any scheduled or in-flight lookup and invalidate its generation.
    fn cancel_fetch(&mut self) -> Generation {
        if let Some(task) = self.fetch_task.take() {
            task.abort();
        }
        self.fetches.advance()
    }

    fn cancel_blur(&mut self) {
        if let Some(task) = self.blur_task.take() {
            task.abort();
        }
        self.blurs.advance();
    }
}

fn lock(inner: &Mutex<Inner>) -> MutexGuard<'_, Inner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Controller for one location text field.
///
/// Must be used from within a tokio runtime; lookups and the blur grace
/// timer run as spawned tasks.
pub struct SuggestionSession<G> {
    resolver: Arc<LocationResolver<G>>,
    config: Arc<SessionConfig>,
    inner: Arc<Mutex<Inner>>,
}

impl<G: Geocoder> SuggestionSession<G> {
    pub fn new(resolver: Arc<LocationResolver<G>>, config: SessionConfig) -> Self {
        Self {
            resolver,
            config: Arc::new(config),
            inner: Arc::new(Mutex::new(Inner::new())),
        }
    }

    /// The user edited the text.
    ///
    /// Any prior selection is invalidated. Empty text clears the candidates
    /// and schedules nothing; otherwise a lookup is scheduled after the
    /// debounce delay.
    pub fn input(&self, text: impl Into<String>) {
        let text = text.into();
        let mut inner = lock(&self.inner);
        if inner.closed {
            return;
        }

        let generation = inner.cancel_fetch();
        inner.text = text;
        inner.selection = None;
        inner.state = FetchState::Idle;
        inner.panel_open = true;

        if inner.text.is_empty() {
            inner.candidates.clear();
            return;
        }

        debug!(%generation, query = inner.text.as_str(), "scheduling suggestion lookup");
        let task = self.spawn_fetch(generation, inner.text.clone(), self.config.debounce);
        inner.fetch_task = Some(task);
    }

    /// The field gained focus.
    ///
    /// Reopens the panel and, if there is unresolved text, looks it up
    /// immediately without waiting for the debounce delay.
    pub fn focus(&self) {
        let mut inner = lock(&self.inner);
        if inner.closed {
            return;
        }

        inner.cancel_blur();
        inner.panel_open = true;

        if inner.text.is_empty() || inner.selection.is_some() {
            return;
        }

        let generation = inner.cancel_fetch();
        inner.state = FetchState::Idle;
        debug!(%generation, query = inner.text.as_str(), "refreshing suggestions on focus");
        let task = self.spawn_fetch(generation, inner.text.clone(), Duration::ZERO);
        inner.fetch_task = Some(task);
    }

    /// The field lost focus. The panel closes after the grace delay unless
    /// the field is focused again or a candidate is selected first.
    pub fn blur(&self) {
        let mut inner = lock(&self.inner);
        if inner.closed {
            return;
        }

        inner.cancel_blur();
        let token = inner.blurs.current();
        let grace = self.config.blur_grace;
        let shared = Arc::clone(&self.inner);

        inner.blur_task = Some(tokio::spawn(async move {
            tokio::time::sleep(grace).await;
            let mut inner = lock(&shared);
            if inner.blurs.is_current(token) {
                inner.panel_open = false;
                inner.blur_task = None;
            }
        }));
    }

    /// Pick the candidate at `index`.
    ///
    /// Returns the adopted location, or `None` if there is no such candidate.
    pub fn select(&self, index: usize) -> Option<Location> {
        let mut inner = lock(&self.inner);
        if inner.closed {
            return None;
        }

        let location = inner.candidates.get(index)?.to_location()?;

        inner.cancel_fetch();
        inner.cancel_blur();
        inner.text = location.name().to_string();
        inner.selection = Some(location.clone());
        inner.candidates.clear();
        inner.state = FetchState::Idle;
        inner.panel_open = false;

        debug!(name = location.name(), "suggestion selected");
        Some(location)
    }

    /// Fill the field with an already-resolved location, e.g. from the
    /// device position or the map picker.
    pub fn preset(&self, location: Location) {
        let mut inner = lock(&self.inner);
        if inner.closed {
            return;
        }

        inner.cancel_fetch();
        inner.text = location.name().to_string();
        inner.selection = Some(location);
        inner.candidates.clear();
        inner.state = FetchState::Idle;
    }

    /// Tear the session down. In-flight work is discarded and later calls
    /// are ignored.
    pub fn close(&self) {
        let mut inner = lock(&self.inner);
        inner.cancel_fetch();
        inner.cancel_blur();
        inner.closed = true;
        inner.panel_open = false;
        if inner.state == FetchState::Pending {
            inner.state = FetchState::Idle;
        }
    }

    pub fn snapshot(&self) -> SuggestionSnapshot {
        let inner = lock(&self.inner);
        SuggestionSnapshot {
            text: inner.text.clone(),
            state: inner.state,
            candidates: inner.candidates.clone(),
            selection: inner.selection.clone(),
            panel_open: inner.panel_open,
        }
    }

    pub fn state(&self) -> FetchState {
        lock(&self.inner).state
    }

    pub fn selection(&self) -> Option<Location> {
        lock(&self.inner).selection.clone()
    }

    pub fn candidates(&self) -> Vec<PlaceCandidate> {
        lock(&self.inner).candidates.clone()
    }

    pub fn generation(&self) -> Generation {
        lock(&self.inner).fetches.current()
    }

    pub fn is_closed(&self) -> bool {
        lock(&self.inner).closed
    }

    fn spawn_fetch(&self, generation: Generation, query: String, delay: Duration) -> JoinHandle<()> {
        let resolver = Arc::clone(&self.resolver);
        let config = Arc::clone(&self.config);
        let shared = Arc::clone(&self.inner);

        tokio::spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            {
                let mut inner = lock(&shared);
                if !inner.fetches.is_current(generation) {
                    return;
                }
                inner.state = FetchState::Pending;
            }

            let result = resolver
                .forward_search(&query, config.result_limit, &config.language, &config.country)
                .await;

            let mut inner = lock(&shared);
            if !inner.fetches.is_current(generation) {
                debug!(%generation, query, "discarding superseded suggestions");
                return;
            }

            match result {
                Ok(places) if places.is_empty() => {
                    inner.candidates.clear();
                    inner.state = FetchState::Empty;
                }
                Ok(places) => {
                    inner.candidates = places;
                    inner.state = FetchState::Populated;
                }
                Err(e) => {
                    warn!(query, kind = %e.kind(), error = %e, "suggestion lookup failed");
                    inner.candidates.clear();
                    inner.state = FetchState::Failed;
                }
            }
            inner.fetch_task = None;
        })
    }
}

impl<G> Drop for SuggestionSession<G> {
    fn drop(&mut self) {
        let mut inner = lock(&self.inner);
        if let Some(task) = inner.fetch_task.take() {
            task.abort();
        }
        if let Some(task) = inner.blur_task.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Coordinates;
    use crate::geocode::MockGeocoder;

    fn coords(lat: f64, lng: f64) -> Coordinates {
        Coordinates::new(lat, lng).unwrap()
    }

    fn gazetteer() -> MockGeocoder {
        MockGeocoder::new()
            .with_named_place("São Paulo, SP, Brasil", coords(-23.5505, -46.6333), 0.9)
            .with_named_place("Curitiba, PR, Brasil", coords(-25.4284, -49.2733), 0.8)
            .with_named_place("São José dos Pinhais, PR, Brasil", coords(-25.5302, -49.2061), 0.5)
    }

    fn session(mock: MockGeocoder) -> SuggestionSession<MockGeocoder> {
        SuggestionSession::new(Arc::new(LocationResolver::new(mock)), SessionConfig::default())
    }

    async fn wait(ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn lookup_waits_for_quiet_period() {
        let mock = gazetteer();
        let session = session(mock.clone());

        session.input("Curitiba");
        assert_eq!(session.state(), FetchState::Idle);

        wait(399).await;
        assert_eq!(mock.search_calls(), 0);

        wait(2).await;
        assert_eq!(mock.search_calls(), 1);
        assert_eq!(session.state(), FetchState::Populated);
        assert_eq!(session.candidates()[0].display_name, "Curitiba, PR, Brasil");
    }

    #[tokio::test(start_paused = true)]
    async fn rapid_typing_issues_one_lookup() {
        let mock = gazetteer();
        let session = session(mock.clone());

        for text in ["S", "Sã", "São", "São ", "São P"] {
            session.input(text);
            wait(100).await;
        }
        wait(500).await;

        assert_eq!(mock.search_calls(), 1);
        let names: Vec<String> = session
            .candidates()
            .into_iter()
            .map(|c| c.display_name)
            .collect();
        assert_eq!(names, vec!["São Paulo, SP, Brasil"]);
    }

    #[tokio::test(start_paused = true)]
    async fn superseded_lookup_never_commits() {
        let mock = gazetteer().with_latency(Duration::from_millis(1000));
        let session = session(mock.clone());

        session.input("São");
        wait(450).await;
        assert_eq!(session.state(), FetchState::Pending);
        let stale = session.generation();

        session.input("Curitiba");
        assert!(session.generation() > stale);

        // The first response would have landed at 1400ms.
        wait(1000).await;
        assert!(session.candidates().is_empty());

        wait(500).await;
        let snapshot = session.snapshot();
        assert_eq!(snapshot.state, FetchState::Populated);
        assert_eq!(snapshot.candidates.len(), 1);
        assert_eq!(snapshot.candidates[0].display_name, "Curitiba, PR, Brasil");
        assert_eq!(mock.search_calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn stale_generation_is_dropped_at_commit() {
        let mock = gazetteer().with_latency(Duration::from_millis(1000));
        let session = session(mock.clone());

        session.input("Curitiba");
        wait(450).await;
        assert_eq!(session.state(), FetchState::Pending);

        // Supersede the lookup while leaving its task running, as when a
        // completion races the abort.
        let stale = lock(&session.inner).fetches.advance();
        assert!(lock(&session.inner).fetch_task.is_some());

        wait(1500).await;
        assert_eq!(mock.search_calls(), 1);
        let snapshot = session.snapshot();
        assert!(snapshot.candidates.is_empty());
        assert_eq!(snapshot.state, FetchState::Pending);
        assert_eq!(session.generation(), stale);
    }

    #[tokio::test(start_paused = true)]
    async fn close_discards_in_flight_lookup() {
        let mock = gazetteer().with_latency(Duration::from_millis(500));
        let session = session(mock.clone());

        session.input("Curitiba");
        wait(450).await;
        assert_eq!(session.state(), FetchState::Pending);

        session.close();
        wait(1000).await;

        assert!(session.is_closed());
        assert_eq!(session.state(), FetchState::Idle);
        assert!(session.candidates().is_empty());

        session.input("São Paulo");
        wait(1000).await;
        assert_eq!(session.snapshot().text, "Curitiba");
        assert_eq!(mock.search_calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn no_results_is_empty() {
        let session = session(gazetteer());
        session.input("Manaus");
        wait(500).await;
        assert_eq!(session.state(), FetchState::Empty);
        assert!(session.candidates().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn short_query_never_reaches_transport() {
        let mock = gazetteer();
        let session = session(mock.clone());
        session.input("Sã");
        wait(500).await;
        assert_eq!(session.state(), FetchState::Empty);
        assert_eq!(mock.search_calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn failure_is_shown_as_empty() {
        let session = session(MockGeocoder::new().failing());
        session.input("Curitiba");
        wait(500).await;
        assert_eq!(session.state(), FetchState::Failed);
        assert!(session.candidates().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn select_adopts_candidate() {
        let session = session(gazetteer());
        session.input("São");
        wait(500).await;
        assert_eq!(session.candidates().len(), 2);

        let picked = session.select(1).unwrap();
        assert_eq!(picked.name(), "São José dos Pinhais, PR, Brasil");
        assert_eq!(picked.lat(), -25.5302);

        let snapshot = session.snapshot();
        assert_eq!(snapshot.text, "São José dos Pinhais, PR, Brasil");
        assert_eq!(snapshot.selection, Some(picked));
        assert!(snapshot.candidates.is_empty());
        assert_eq!(snapshot.state, FetchState::Idle);
        assert!(!snapshot.panel_open);
    }

    #[tokio::test(start_paused = true)]
    async fn select_out_of_range_is_none() {
        let session = session(gazetteer());
        assert!(session.select(0).is_none());
        session.input("Curitiba");
        wait(500).await;
        assert!(session.select(5).is_none());
        assert!(session.selection().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn editing_invalidates_selection() {
        let session = session(gazetteer());
        session.input("Curitiba");
        wait(500).await;
        session.select(0).unwrap();

        session.input("Curitiba, PR");
        assert!(session.selection().is_none());
        assert_eq!(session.state(), FetchState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn clearing_text_clears_everything() {
        let mock = gazetteer();
        let session = session(mock.clone());
        session.input("Curitiba");
        wait(500).await;
        assert!(!session.candidates().is_empty());

        session.input("");
        wait(500).await;
        let snapshot = session.snapshot();
        assert!(snapshot.candidates.is_empty());
        assert!(snapshot.selection.is_none());
        assert!(!snapshot.panel_visible());
        assert_eq!(mock.search_calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn blur_closes_after_grace() {
        let session = session(gazetteer());
        session.input("Curitiba");
        wait(500).await;
        assert!(session.snapshot().panel_visible());

        session.blur();
        wait(150).await;
        assert!(session.snapshot().panel_open);

        wait(100).await;
        assert!(!session.snapshot().panel_open);
    }

    #[tokio::test(start_paused = true)]
    async fn refocus_within_grace_keeps_panel_open() {
        let session = session(gazetteer());
        session.input("Curitiba");
        wait(500).await;

        session.blur();
        wait(100).await;
        session.focus();
        wait(500).await;
        assert!(session.snapshot().panel_open);
    }

    #[tokio::test(start_paused = true)]
    async fn focus_looks_up_immediately() {
        let mock = gazetteer();
        let session = session(mock.clone());
        session.input("Curitiba");
        wait(500).await;
        assert_eq!(mock.search_calls(), 1);

        session.blur();
        wait(300).await;
        session.focus();
        wait(1).await;
        assert_eq!(mock.search_calls(), 2);
        assert_eq!(session.state(), FetchState::Populated);
    }

    #[tokio::test(start_paused = true)]
    async fn focus_after_selection_does_not_look_up() {
        let mock = gazetteer();
        let session = session(mock.clone());
        session.input("Curitiba");
        wait(500).await;
        session.select(0).unwrap();

        session.focus();
        wait(500).await;
        assert_eq!(mock.search_calls(), 1);
        assert!(session.selection().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn preset_fills_field() {
        let mock = gazetteer();
        let session = session(mock.clone());
        let here = Location::parse("Curitiba, PR, Brasil", -25.4284, -49.2733).unwrap();

        session.preset(here.clone());
        wait(500).await;

        let snapshot = session.snapshot();
        assert_eq!(snapshot.text, "Curitiba, PR, Brasil");
        assert_eq!(snapshot.selection, Some(here));
        assert_eq!(mock.search_calls(), 0);
    }
}
