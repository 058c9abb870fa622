//! Great-circle distance and human-readable distance labels.

use serde::{Deserialize, Serialize};

/// Mean Earth radius used by [`distance`].
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Default coordinate used whenever no real location is available
/// (Gangnam Station, Seoul).
pub const FALLBACK_COORDINATE: Coordinate = Coordinate::new(37.497_9, 127.027_6);

/// A WGS84 point in decimal degrees.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Returns this point shifted by the given offsets in degrees.
    #[must_use]
    pub fn offset(self, d_lat: f64, d_lng: f64) -> Self {
        Self::new(self.latitude + d_lat, self.longitude + d_lng)
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.6}, {:.6}", self.latitude, self.longitude)
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((latitude, longitude): (f64, f64)) -> Self {
        Self::new(latitude, longitude)
    }
}

/// Haversine great-circle distance between `a` and `b`, in meters.
#[must_use]
pub fn distance(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lng = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_METERS * c
}

/// Formats the distance between `a` and `b` for display.
///
/// See [`format_meters`] for the rules.
#[must_use]
pub fn format_distance(a: Coordinate, b: Coordinate) -> String {
    format_meters(distance(a, b))
}

/// Formats a distance in meters: whole meters (truncated) below 1 km,
/// otherwise kilometers with one decimal place.
#[must_use]
pub fn format_meters(meters: f64) -> String {
    if meters < 1000.0 {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let whole = meters.max(0.0).trunc() as u64;
        format!("{whole}m")
    } else {
        format!("{:.1}km", meters / 1000.0)
    }
}
