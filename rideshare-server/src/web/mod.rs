//! Web layer for the ride-share listing.
//!
//! Provides JSON endpoints for place lookup, trip search and trip offers.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
