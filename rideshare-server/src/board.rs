//! The published trip collection.

use std::collections::VecDeque;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::info;

use crate::domain::{Driver, SearchCriteria, Trip, TripId, TripOffer};
use crate::matcher::match_trips;

/// Thread-safe, newest-first list of published trips.
///
/// This is the only place trips are added. Readers get snapshots of shared
/// handles; trips themselves are never mutated.
#[derive(Clone, Default)]
pub struct TripBoard {
    inner: Arc<RwLock<VecDeque<Arc<Trip>>>>,
}

impl TripBoard {
    /// Create a board holding `trips` in the given order.
    pub fn new(trips: impl IntoIterator<Item = Trip>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(trips.into_iter().map(Arc::new).collect())),
        }
    }

    /// Publish an offer under a freshly generated id, at the front of the
    /// list.
    pub async fn add(&self, offer: TripOffer, driver: Arc<Driver>) -> Arc<Trip> {
        let trip = Arc::new(Trip::from_offer(TripId::generate(), offer, driver));

        let mut guard = self.inner.write().await;
        guard.push_front(Arc::clone(&trip));
        info!(
            id = trip.id.as_str(),
            origin = trip.origin.name(),
            destination = trip.destination.name(),
            total = guard.len(),
            "trip published"
        );

        trip
    }

    /// Trips matching `criteria`, newest first.
    pub async fn search(&self, criteria: &SearchCriteria) -> Vec<Arc<Trip>> {
        let guard = self.inner.read().await;
        let (front, back) = guard.as_slices();
        let mut found = match_trips(front, criteria);
        found.extend(match_trips(back, criteria));
        found
    }

    /// Every trip, newest first.
    pub async fn all(&self) -> Vec<Arc<Trip>> {
        let guard = self.inner.read().await;
        guard.iter().cloned().collect()
    }

    /// Look up a trip by id.
    pub async fn get(&self, id: &TripId) -> Option<Arc<Trip>> {
        let guard = self.inner.read().await;
        guard.iter().find(|t| &t.id == id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}
