//! Search criteria submitted from the search form.

use chrono::NaiveDate;

use super::Location;

/// What the user is looking for.
///
/// Both endpoints are optional here because the form may be submitted
/// half-filled; the matcher treats a missing endpoint as "nothing matches".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchCriteria {
    pub origin: Option<Location>,
    pub destination: Option<Location>,
    /// `None` matches any date.
    pub date: Option<NaiveDate>,
}

impl SearchCriteria {
    /// Criteria for a route on any date.
    pub fn route(origin: Location, destination: Location) -> Self {
        Self {
            origin: Some(origin),
            destination: Some(destination),
            date: None,
        }
    }

    /// Restrict to a single travel date.
    pub fn on(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// Whether both endpoints are present.
    pub fn is_complete(&self) -> bool {
        self.origin.is_some() && self.destination.is_some()
    }
}
