//! Ride-share listing server.
//!
//! Turns typed or map-picked input into places with coordinates, and
//! matches published trips against a route and date.

pub mod board;
pub mod cache;
pub mod domain;
pub mod geocode;
pub mod geolocation;
pub mod matcher;
pub mod seed;
pub mod session;
pub mod web;
