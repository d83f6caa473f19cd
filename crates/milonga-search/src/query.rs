//! Translation of proximity requests into the index's geo-distance query.
//!
//! The radius travels as kilometres with exactly two decimals (`"12.30km"`).
//! [`GeoRadius`] stores the radius already rounded to that precision so the
//! in-memory index and Elasticsearch agree on the effective radius.

use milonga_core::model::event::{validate_latitude, validate_longitude};
use serde_json::{Value, json};

use crate::document::GEO_FIELD;
use crate::error::{SearchError, SearchResult};
use crate::geo::{EDGE_TOLERANCE_KM, GeoPoint};

/// Order of proximity results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResultOrder {
    /// Whatever order the index returns; only "within radius" is guaranteed.
    #[default]
    Unordered,
    /// Ascending distance from the query centre.
    NearestFirst,
}

impl ResultOrder {
    #[must_use]
    pub const fn from_nearest_first(nearest_first: bool) -> Self {
        if nearest_first {
            Self::NearestFirst
        } else {
            Self::Unordered
        }
    }
}

/// A validated bounded-radius request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoRadius {
    center: GeoPoint,
    radius_km: f64,
}

impl GeoRadius {
    /// ## Summary
    /// Validates a proximity request and rounds its radius to 0.01 km.
    ///
    /// ## Errors
    /// Returns `SearchError::InvalidQuery` if a coordinate is out of range or
    /// the radius is not a positive finite number of at least 0.01 km.
    pub fn new(lat: f64, lon: f64, radius_km: f64) -> SearchResult<Self> {
        validate_latitude(lat).map_err(|e| SearchError::InvalidQuery(e.to_string()))?;
        validate_longitude(lon).map_err(|e| SearchError::InvalidQuery(e.to_string()))?;

        if !radius_km.is_finite() || radius_km <= 0.0 {
            return Err(SearchError::InvalidQuery(format!(
                "radius must be a positive number of kilometres, got {radius_km}"
            )));
        }

        let rounded: f64 = format!("{radius_km:.2}")
            .parse()
            .map_err(|_err| SearchError::InvalidQuery(format!("unusable radius {radius_km}")))?;
        if rounded <= 0.0 {
            return Err(SearchError::InvalidQuery(format!(
                "radius {radius_km} rounds to zero at 0.01 km precision"
            )));
        }

        Ok(Self {
            center: GeoPoint::new(lat, lon),
            radius_km: rounded,
        })
    }

    #[must_use]
    pub const fn center(&self) -> GeoPoint {
        self.center
    }

    /// Radius in kilometres, rounded to two decimals.
    #[must_use]
    pub const fn radius_km(&self) -> f64 {
        self.radius_km
    }

    /// ## Summary
    /// The radius in the index's distance syntax, e.g. `"5.00km"`.
    #[must_use]
    pub fn distance_param(&self) -> String {
        format!("{:.2}km", self.radius_km)
    }

    /// ## Summary
    /// Whether a point lies inside the radius. Points on the edge are inside.
    #[must_use]
    pub fn contains(&self, point: GeoPoint) -> bool {
        self.center.distance_km(point) <= self.radius_km + EDGE_TOLERANCE_KM
    }
}

/// ## Summary
/// Builds the native geo-distance filter for a radius.
#[must_use]
pub fn geo_distance_filter(radius: &GeoRadius) -> Value {
    json!({
        "geo_distance": {
            "distance": radius.distance_param(),
            GEO_FIELD: {
                "lat": radius.center.lat,
                "lon": radius.center.lon,
            }
        }
    })
}

/// ## Summary
/// Builds a full `_search` request body for one page of proximity hits.
///
/// The filter runs in filter context, so no relevance scoring happens. A
/// distance sort is added only for [`ResultOrder::NearestFirst`].
#[must_use]
pub fn radius_search_body(radius: &GeoRadius, page_size: u32, order: ResultOrder) -> Value {
    let mut body = json!({
        "size": page_size,
        "track_total_hits": true,
        "query": {
            "bool": {
                "filter": [geo_distance_filter(radius)]
            }
        }
    });

    if order == ResultOrder::NearestFirst {
        body["sort"] = json!([{
            "_geo_distance": {
                GEO_FIELD: {
                    "lat": radius.center.lat,
                    "lon": radius.center.lon,
                },
                "order": "asc",
                "unit": "km"
            }
        }]);
    }

    body
}
