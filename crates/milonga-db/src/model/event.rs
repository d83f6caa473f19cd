use diesel::{pg::Pg, prelude::*};
use milonga_core::model::event::{Event, EventDraft};

use crate::db::schema;

/// Row of the `events` table.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Identifiable)]
#[diesel(table_name = schema::events)]
#[diesel(check_for_backend(Pg))]
pub struct EventRow {
    pub id: i64,
    pub group_id: i64,
    pub name: String,
    pub time: chrono::DateTime<chrono::Utc>,
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
    pub dance_styles: Vec<String>,
    pub event_type: String,
    pub levels: Vec<String>,
    pub version: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Insert struct for creating new events. `id` and `version` come from the database.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = schema::events)]
pub struct NewEventRow<'a> {
    pub group_id: i64,
    pub name: &'a str,
    pub time: chrono::DateTime<chrono::Utc>,
    pub location: &'a str,
    pub latitude: f64,
    pub longitude: f64,
    pub dance_styles: &'a [String],
    pub event_type: &'a str,
    pub levels: &'a [String],
}

/// Full-row replacement for updates. Every caller-controlled column is written.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = schema::events)]
pub struct EventChangeset<'a> {
    pub group_id: i64,
    pub name: &'a str,
    pub time: chrono::DateTime<chrono::Utc>,
    pub location: &'a str,
    pub latitude: f64,
    pub longitude: f64,
    pub dance_styles: &'a [String],
    pub event_type: &'a str,
    pub levels: &'a [String],
}

impl<'a> From<&'a EventDraft> for NewEventRow<'a> {
    fn from(draft: &'a EventDraft) -> Self {
        Self {
            group_id: draft.group_id,
            name: &draft.name,
            time: draft.time,
            location: &draft.location,
            latitude: draft.latitude,
            longitude: draft.longitude,
            dance_styles: &draft.dance_styles,
            event_type: &draft.event_type,
            levels: &draft.levels,
        }
    }
}

impl<'a> From<&'a EventDraft> for EventChangeset<'a> {
    fn from(draft: &'a EventDraft) -> Self {
        Self {
            group_id: draft.group_id,
            name: &draft.name,
            time: draft.time,
            location: &draft.location,
            latitude: draft.latitude,
            longitude: draft.longitude,
            dance_styles: &draft.dance_styles,
            event_type: &draft.event_type,
            levels: &draft.levels,
        }
    }
}

impl From<EventRow> for Event {
    fn from(row: EventRow) -> Self {
        Self {
            id: row.id,
            group_id: row.group_id,
            name: row.name,
            time: row.time,
            location: row.location,
            latitude: row.latitude,
            longitude: row.longitude,
            dance_styles: row.dance_styles,
            event_type: row.event_type,
            levels: row.levels,
            version: row.version,
        }
    }
}
