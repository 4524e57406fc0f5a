//! Trip filtering against search criteria.
//!
//! Matching is deliberately simple: a trip matches when its origin and
//! destination names contain the searched names (case-insensitively) and,
//! if a date was given, it runs on exactly that date. There is no distance
//! or radius matching.

use std::borrow::Borrow;

use crate::domain::{SearchCriteria, Trip};

/// Lowercased search terms, computed once per search.
struct Needles {
    origin: String,
    destination: String,
}

impl Needles {
    fn from_criteria(criteria: &SearchCriteria) -> Option<Self> {
        Some(Self {
            origin: criteria.origin.as_ref()?.name().to_lowercase(),
            destination: criteria.destination.as_ref()?.name().to_lowercase(),
        })
    }

    fn matches(&self, trip: &Trip, criteria: &SearchCriteria) -> bool {
        trip.origin.name().to_lowercase().contains(&self.origin)
            && trip.destination.name().to_lowercase().contains(&self.destination)
            && criteria.date.is_none_or(|date| date == trip.date)
    }
}

/// Whether a single trip satisfies the criteria.
///
/// Criteria missing either endpoint match nothing.
pub fn trip_matches(trip: &Trip, criteria: &SearchCriteria) -> bool {
    Needles::from_criteria(criteria).is_some_and(|needles| needles.matches(trip, criteria))
}

/// Select the trips matching `criteria`, preserving their order.
///
/// Never fails and never modifies `trips`. Works over owned trips or shared
/// handles (`Arc<Trip>`).
pub fn match_trips<T>(trips: &[T], criteria: &SearchCriteria) -> Vec<T>
where
    T: Borrow<Trip> + Clone,
{
    let Some(needles) = Needles::from_criteria(criteria) else {
        return Vec::new();
    };

    trips
        .iter()
        .filter(|trip| needles.matches(<T as Borrow<Trip>>::borrow(trip), criteria))
        .cloned()
        .collect()
}
