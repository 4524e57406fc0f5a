//! Interactive controllers that sit between user input and the resolver.
//!
//! - [`SuggestionSession`] drives a text field with debounced forward lookups
//! - [`MapSelectionSession`] drives a map pin with reverse lookups
//!
//! Both tag each dispatched lookup with a [`Generation`] and drop results
//! whose generation is no longer current. Resolver failures never escape a
//! session; they become visible states instead.

mod config;
mod generation;
mod map_picker;
mod suggestion;

pub use config::SessionConfig;
pub use generation::{Generation, GenerationCounter};
pub use map_picker::{ADDRESS_UNAVAILABLE, MapSelectionSession, MapState, RESOLVING_LABEL};
pub use suggestion::{FetchState, SuggestionSession, SuggestionSnapshot};
