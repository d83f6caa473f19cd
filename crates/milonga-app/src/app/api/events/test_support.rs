//! Fakes shared by the event route tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use milonga_core::error::CoreError;
use milonga_core::model::event::{Event, EventDraft, EventId, GroupId};
use milonga_db::error::{DbError, DbResult};
use milonga_db::store::EventStore;
use milonga_search::error::{SearchError, SearchResult};
use milonga_search::index::{IndexStatus, RadiusPage, SearchIndex, UpsertOutcome};
use milonga_search::query::GeoRadius;
use milonga_service::EventService;
use salvo::Router;

use crate::service_handler::EventServiceHandler;

/// Primary store whose every call fails, so a test can tell whether it was reached.
pub struct UnreachableStore;

fn unreachable() -> DbError {
    DbError::CoreError(CoreError::InvariantViolation("primary store is unreachable"))
}

#[async_trait]
impl EventStore for UnreachableStore {
    async fn create(&self, _draft: &EventDraft) -> DbResult<Event> {
        Err(unreachable())
    }

    async fn update(&self, _id: EventId, _draft: &EventDraft) -> DbResult<Event> {
        Err(unreachable())
    }

    async fn get(&self, _id: EventId) -> DbResult<Event> {
        Err(unreachable())
    }

    async fn list_by_group(&self, _group_id: GroupId) -> DbResult<Vec<Event>> {
        Err(unreachable())
    }

    async fn delete(&self, _id: EventId) -> DbResult<Event> {
        Err(unreachable())
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

pub fn event(id: EventId, latitude: f64, longitude: f64) -> Event {
    Event {
        id,
        group_id: 1,
        name: format!("Event {id}"),
        time: DateTime::parse_from_rfc3339("2026-05-01T20:00:00Z")
            .unwrap()
            .with_timezone(&Utc),
        location: "Berlin".to_string(),
        latitude,
        longitude,
        dance_styles: vec!["salsa".to_string()],
        event_type: "social".to_string(),
        levels: Vec::new(),
        version: 1,
    }
}

pub fn router(service: EventService) -> Router {
    Router::new()
        .hoop(EventServiceHandler {
            service: Arc::new(service),
        })
        .push(crate::app::api::routes())
}
