//! Caller-facing event shapes.

use chrono::{DateTime, Utc};
use milonga_core::model::event::{Event, EventDraft, EventId, GroupId};
use milonga_search::index::RadiusPage;
use serde::{Deserialize, Serialize};

use crate::error::{ServiceError, ServiceResult};

/// Body of an event create request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    pub name: String,
    /// Optional when the group is already given by the request path.
    #[serde(default)]
    pub group_id: Option<GroupId>,
    pub time: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub dance_styles: Vec<String>,
    #[serde(rename = "type", default)]
    pub event_type: String,
    #[serde(default)]
    pub levels: Vec<String>,
}

/// Body of an event update request. The event id comes from the path.
pub type UpdateEventRequest = CreateEventRequest;

impl CreateEventRequest {
    /// ## Summary
    /// Converts the request into a draft for the store.
    ///
    /// `path_group` wins over the body's `groupId` when both are present.
    ///
    /// ## Errors
    /// Returns `ServiceError::ValidationError` if no group id is known.
    pub fn into_draft(self, path_group: Option<GroupId>) -> ServiceResult<EventDraft> {
        let group_id = path_group.or(self.group_id).ok_or_else(|| {
            ServiceError::ValidationError("groupId is required".to_string())
        })?;

        Ok(EventDraft {
            group_id,
            name: self.name,
            time: self.time,
            location: self.location,
            latitude: self.latitude,
            longitude: self.longitude,
            dance_styles: self.dance_styles,
            event_type: self.event_type,
            levels: self.levels,
        })
    }
}

/// An event as returned to callers: the request fields plus `id` and `version`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    pub id: EventId,
    pub name: String,
    pub group_id: GroupId,
    pub time: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
    pub location: String,
    pub dance_styles: Vec<String>,
    #[serde(rename = "type")]
    pub event_type: String,
    pub levels: Vec<String>,
    pub version: i64,
}

impl From<Event> for EventResponse {
    fn from(event: Event) -> Self {
        Self {
            id: event.id,
            name: event.name,
            group_id: event.group_id,
            time: event.time,
            latitude: event.latitude,
            longitude: event.longitude,
            location: event.location,
            dance_styles: event.dance_styles,
            event_type: event.event_type,
            levels: event.levels,
            version: event.version,
        }
    }
}

/// Result of a proximity search.
#[derive(Debug, Clone, PartialEq)]
pub struct NearbyEvents {
    pub events: Vec<EventResponse>,
    pub total_hits: u64,
    /// `false` when more events matched than the index returns in one page.
    pub complete: bool,
}

impl From<RadiusPage> for NearbyEvents {
    fn from(page: RadiusPage) -> Self {
        Self {
            events: page.events.into_iter().map(EventResponse::from).collect(),
            total_hits: page.total_hits,
            complete: page.complete,
        }
    }
}
