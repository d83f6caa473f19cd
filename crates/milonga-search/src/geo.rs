//! Great-circle distance on a spherical Earth.
//!
//! Distances are in kilometres. The haversine formula is accurate to well
//! under a percent at the radii proximity search deals with.

use serde::{Deserialize, Serialize};

/// Mean Earth radius in kilometres, the value Elasticsearch uses for arc distance.
pub const EARTH_RADIUS_KM: f64 = 6371.0088;

/// Slack applied at the radius edge so points exactly on it stay inside
/// despite float rounding.
pub const EDGE_TOLERANCE_KM: f64 = 1e-6;

/// A point in the index's native `{ "lat": .., "lon": .. }` shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    #[must_use]
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// ## Summary
    /// Haversine distance to another point in kilometres.
    #[must_use]
    pub fn distance_km(self, other: Self) -> f64 {
        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();
        let d_lat = (other.lat - self.lat).to_radians();
        let d_lon = (other.lon - self.lon).to_radians();

        let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_RADIUS_KM * c
    }
}
