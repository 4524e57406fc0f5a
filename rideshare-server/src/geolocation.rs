//! Device position as a starting origin.
//!
//! The position capability belongs to the client (browser, phone). The core
//! only needs a fix to reverse resolve into an initial origin, and treats
//! every failure as "leave the field empty".

use std::future::Future;

use tracing::{debug, warn};

use crate::domain::{Coordinates, Location};
use crate::geocode::{Geocoder, LocationResolver};

/// A position fix from the device.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPosition {
    pub latitude: f64,
    pub longitude: f64,
}

/// Why no position could be obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GeolocationError {
    #[error("permission to read the device position was denied")]
    PermissionDenied,

    #[error("the device position is unavailable")]
    PositionUnavailable,

    #[error("timed out waiting for the device position")]
    Timeout,

    #[error("the device has no position capability")]
    Unsupported,
}

/// Source of device position fixes.
pub trait PositionSource: Send + Sync {
    fn current_position(&self) -> impl Future<Output = Result<GeoPosition, GeolocationError>> + Send;
}

/// Resolve the device position into a named origin.
///
/// Returns `None` if the position is unavailable, out of range, or cannot
/// be named.
pub async fn initial_origin<P, G>(
    source: &P,
    resolver: &LocationResolver<G>,
    language: &str,
) -> Option<Location>
where
    P: PositionSource,
    G: Geocoder,
{
    let fix = match source.current_position().await {
        Ok(fix) => fix,
        Err(e) => {
            debug!(error = %e, "no device position, leaving origin empty");
            return None;
        }
    };

    let coordinates = match Coordinates::new(fix.latitude, fix.longitude) {
        Ok(c) => c,
        Err(e) => {
            warn!(error = %e, "device reported an invalid position");
            return None;
        }
    };

    match resolver.reverse_resolve(coordinates, language).await {
        Ok(name) => Some(Location::new(name, coordinates)),
        Err(e) => {
            warn!(%coordinates, kind = %e.kind(), error = %e, "could not name device position");
            None
        }
    }
}
