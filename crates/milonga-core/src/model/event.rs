//! Canonical event model shared by the primary store, the search mirror and
//! the service layer.

use chrono::{DateTime, Utc};

use crate::error::{CoreError, CoreResult};

pub type EventId = i64;
pub type GroupId = i64;

/// An event as stored in the primary store.
///
/// `id` and `version` are assigned by the primary store and never by callers.
/// `version` starts at 1 and grows by one with every update; the search
/// mirror uses it to drop writes that arrive out of order.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub id: EventId,
    pub group_id: GroupId,
    pub name: String,
    pub time: DateTime<Utc>,
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
    pub dance_styles: Vec<String>,
    pub event_type: String,
    pub levels: Vec<String>,
    pub version: i64,
}

/// The caller-controlled fields of an event, used for both create and update.
#[derive(Debug, Clone, PartialEq)]
pub struct EventDraft {
    pub group_id: GroupId,
    pub name: String,
    pub time: DateTime<Utc>,
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
    pub dance_styles: Vec<String>,
    pub event_type: String,
    pub levels: Vec<String>,
}

impl EventDraft {
    /// ## Summary
    /// Checks the draft before it is handed to any store.
    ///
    /// ## Errors
    /// Returns `CoreError::ValidationError` if the name is blank or the
    /// coordinates are not finite or out of range.
    pub fn validate(&self) -> CoreResult<()> {
        if self.name.trim().is_empty() {
            return Err(CoreError::ValidationError(
                "event name must not be empty".to_string(),
            ));
        }
        validate_latitude(self.latitude)?;
        validate_longitude(self.longitude)?;
        Ok(())
    }
}

impl Event {
    /// ## Summary
    /// Returns the caller-controlled part of a stored event.
    #[must_use]
    pub fn draft(&self) -> EventDraft {
        EventDraft {
            group_id: self.group_id,
            name: self.name.clone(),
            time: self.time,
            location: self.location.clone(),
            latitude: self.latitude,
            longitude: self.longitude,
            dance_styles: self.dance_styles.clone(),
            event_type: self.event_type.clone(),
            levels: self.levels.clone(),
        }
    }
}

/// ## Summary
/// Validates a latitude in degrees.
///
/// ## Errors
/// Returns `CoreError::ValidationError` unless the value is finite and within [-90, 90].
pub fn validate_latitude(latitude: f64) -> CoreResult<()> {
    if latitude.is_finite() && (-90.0..=90.0).contains(&latitude) {
        Ok(())
    } else {
        Err(CoreError::ValidationError(format!(
            "latitude must be between -90 and 90, got {latitude}"
        )))
    }
}

/// ## Summary
/// Validates a longitude in degrees.
///
/// ## Errors
/// Returns `CoreError::ValidationError` unless the value is finite and within [-180, 180].
pub fn validate_longitude(longitude: f64) -> CoreResult<()> {
    if longitude.is_finite() && (-180.0..=180.0).contains(&longitude) {
        Ok(())
    } else {
        Err(CoreError::ValidationError(format!(
            "longitude must be between -180 and 180, got {longitude}"
        )))
    }
}
