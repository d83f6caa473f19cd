//! In-process adapters for tests.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use milonga_core::model::event::{Event, EventDraft, EventId, GroupId};
use milonga_db::error::{DbError, DbResult};
use milonga_db::store::EventStore;
use milonga_search::error::{SearchError, SearchResult};
use milonga_search::index::{IndexStatus, RadiusPage, SearchIndex, UpsertOutcome};
use milonga_search::query::GeoRadius;

#[derive(Debug, Default)]
struct Rows {
    events: BTreeMap<EventId, Event>,
    last_id: EventId,
}

/// Primary store kept in memory, with the same id and version rules as Postgres.
#[derive(Debug, Default)]
pub struct MemoryEventStore {
    rows: Mutex<Rows>,
}

impl MemoryEventStore {
    fn rows(&self) -> MutexGuard<'_, Rows> {
        match self.rows.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                self.rows.clear_poison();
                poisoned.into_inner()
            }
        }
    }

    /// ## Summary
    /// Returns the stored row for an id, bypassing the service.
    #[must_use]
    pub fn row(&self, id: EventId) -> Option<Event> {
        self.rows().events.get(&id).cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows().events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn stored(id: EventId, version: i64, draft: &EventDraft) -> Event {
    Event {
        id,
        group_id: draft.group_id,
        name: draft.name.clone(),
        time: draft.time,
        location: draft.location.clone(),
        latitude: draft.latitude,
        longitude: draft.longitude,
        dance_styles: draft.dance_styles.clone(),
        event_type: draft.event_type.clone(),
        levels: draft.levels.clone(),
        version,
    }
}

#[async_trait]
impl EventStore for MemoryEventStore {
    async fn create(&self, draft: &EventDraft) -> DbResult<Event> {
        let mut rows = self.rows();
        rows.last_id += 1;
        let event = stored(rows.last_id, 1, draft);
        rows.events.insert(event.id, event.clone());
        Ok(event)
    }

    async fn update(&self, id: EventId, draft: &EventDraft) -> DbResult<Event> {
        let mut rows = self.rows();
        let version = rows
            .events
            .get(&id)
            .map(|current| current.version + 1)
            .ok_or(DbError::EventNotFound(id))?;
        let event = stored(id, version, draft);
        rows.events.insert(id, event.clone());
        Ok(event)
    }

    async fn get(&self, id: EventId) -> DbResult<Event> {
        self.row(id).ok_or(DbError::EventNotFound(id))
    }

    async fn list_by_group(&self, group_id: GroupId) -> DbResult<Vec<Event>> {
        Ok(self
            .rows()
            .events
            .values()
            .filter(|event| event.group_id == group_id)
            .cloned()
            .collect())
    }

    async fn delete(&self, id: EventId) -> DbResult<Event> {
        self.rows()
            .events
            .remove(&id)
            .ok_or(DbError::EventNotFound(id))
    }
}

/// Search index that fails every call with a 503, counting the attempts.
#[derive(Debug, Default)]
pub struct FailingIndex {
    calls: AtomicUsize,
}

impl FailingIndex {
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn fail(&self) -> SearchError {
        self.calls.fetch_add(1, Ordering::SeqCst);
        SearchError::UnexpectedStatus {
            status: 503,
            body: r#"{"error":{"type":"cluster_block_exception"}}"#.to_string(),
        }
    }
}

#[async_trait]
impl SearchIndex for FailingIndex {
    async fn ensure_index(&self) -> SearchResult<IndexStatus> {
        Err(self.fail())
    }

    async fn upsert(&self, _event: &Event) -> SearchResult<UpsertOutcome> {
        Err(self.fail())
    }

    async fn delete(&self, _event: &Event) -> SearchResult<()> {
        Err(self.fail())
    }

    async fn query_by_radius(&self, _radius: &GeoRadius) -> SearchResult<RadiusPage> {
        Err(self.fail())
    }
}

/// ## Summary
/// A valid draft for a salsa social in central Berlin.
#[must_use]
pub fn salsa_night(group_id: GroupId) -> EventDraft {
    EventDraft {
        group_id,
        name: "Salsa Night".to_string(),
        time: DateTime::<Utc>::from_timestamp(1_777_665_600, 0).unwrap_or_default(),
        location: "Berlin".to_string(),
        latitude: 52.52,
        longitude: 13.40,
        dance_styles: vec!["salsa".to_string(), "bachata".to_string()],
        event_type: "social".to_string(),
        levels: vec!["beginner".to_string()],
    }
}
