//! The search mirror document and its index mapping.

use chrono::{DateTime, Utc};
use milonga_core::model::event::Event;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::geo::GeoPoint;

/// Name of the geo-point field proximity queries run against.
pub const GEO_FIELD: &str = "locationGeo";

/// Denormalized copy of an event held in the search index.
///
/// The document id in the index is always `id`, the primary store's key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDocument {
    pub id: i64,
    pub group_id: i64,
    pub name: String,
    pub time: DateTime<Utc>,
    pub location: String,
    pub location_geo: GeoPoint,
    pub dance_styles: Vec<String>,
    #[serde(rename = "type")]
    pub event_type: String,
    pub levels: Vec<String>,
    pub version: i64,
}

impl From<&Event> for EventDocument {
    fn from(event: &Event) -> Self {
        Self {
            id: event.id,
            group_id: event.group_id,
            name: event.name.clone(),
            time: event.time,
            location: event.location.clone(),
            location_geo: GeoPoint::new(event.latitude, event.longitude),
            dance_styles: event.dance_styles.clone(),
            event_type: event.event_type.clone(),
            levels: event.levels.clone(),
            version: event.version,
        }
    }
}

impl From<EventDocument> for Event {
    fn from(doc: EventDocument) -> Self {
        Self {
            id: doc.id,
            group_id: doc.group_id,
            name: doc.name,
            time: doc.time,
            location: doc.location,
            latitude: doc.location_geo.lat,
            longitude: doc.location_geo.lon,
            dance_styles: doc.dance_styles,
            event_type: doc.event_type,
            levels: doc.levels,
            version: doc.version,
        }
    }
}

/// ## Summary
/// Field mappings for the events index.
#[must_use]
pub fn index_mappings() -> Value {
    json!({
        "properties": {
            "id": { "type": "long" },
            "groupId": { "type": "long" },
            "name": { "type": "text" },
            "time": { "type": "date" },
            "location": { "type": "keyword" },
            GEO_FIELD: { "type": "geo_point" },
            "danceStyles": { "type": "keyword" },
            "type": { "type": "keyword" },
            "levels": { "type": "keyword" },
            "version": { "type": "long" }
        }
    })
}
