//! Event writes against the primary store, mirrored into the search index.
//!
//! Every write runs in two steps. The primary store write decides the outcome
//! of the operation. The mirror write that follows is best-effort: its failure
//! is logged and counted, and the caller still receives the stored event.
//! Nothing is rolled back or retried.

use std::sync::Arc;

use milonga_core::model::event::{Event, EventDraft, EventId, GroupId};
use milonga_db::store::EventStore;
use milonga_search::index::{SearchIndex, UpsertOutcome};
use milonga_search::query::GeoRadius;

use crate::error::ServiceResult;
use crate::event::request::NearbyEvents;
use crate::event::stats::{MirrorStats, MirrorStatsSnapshot};

/// The only component that talks to both the primary store and the mirror.
#[derive(Clone)]
pub struct EventService {
    store: Arc<dyn EventStore>,
    index: Arc<dyn SearchIndex>,
    stats: Arc<MirrorStats>,
}

impl std::fmt::Debug for EventService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventService")
            .field("stats", &self.stats.snapshot())
            .finish_non_exhaustive()
    }
}

impl EventService {
    #[must_use]
    pub fn new(store: Arc<dyn EventStore>, index: Arc<dyn SearchIndex>) -> Self {
        Self {
            store,
            index,
            stats: Arc::new(MirrorStats::default()),
        }
    }

    /// ## Summary
    /// Stores a new event and mirrors it under its store-assigned id.
    ///
    /// ## Errors
    /// Returns `ValidationError` for an invalid draft (no store is touched),
    /// or the primary store's error. Mirror failures are never returned.
    #[tracing::instrument(skip(self, draft), fields(group_id = draft.group_id))]
    pub async fn create_event(&self, draft: EventDraft) -> ServiceResult<Event> {
        draft.validate()?;

        let event = self.store.create(&draft).await?;
        tracing::debug!(event_id = event.id, "Event stored");

        self.mirror_upsert(&event).await;
        Ok(event)
    }

    /// ## Summary
    /// Replaces an existing event and mirrors the stored result.
    ///
    /// ## Errors
    /// Returns `ValidationError` for an invalid draft, `NotFound` if no event
    /// has this id, or the primary store's error.
    #[tracing::instrument(skip(self, draft), fields(group_id = draft.group_id))]
    pub async fn update_event(&self, id: EventId, draft: EventDraft) -> ServiceResult<Event> {
        draft.validate()?;

        let event = self.store.update(id, &draft).await?;
        tracing::debug!(version = event.version, "Event updated");

        self.mirror_upsert(&event).await;
        Ok(event)
    }

    /// ## Errors
    /// Returns `NotFound` if no event has this id.
    #[tracing::instrument(skip(self))]
    pub async fn get_event(&self, id: EventId) -> ServiceResult<Event> {
        Ok(self.store.get(id).await?)
    }

    /// ## Summary
    /// Lists a group's events from the primary store.
    ///
    /// ## Errors
    /// Returns the primary store's error.
    #[tracing::instrument(skip(self))]
    pub async fn list_events(&self, group_id: GroupId) -> ServiceResult<Vec<Event>> {
        Ok(self.store.list_by_group(group_id).await?)
    }

    /// ## Summary
    /// Deletes an event, then removes its mirror document.
    ///
    /// ## Errors
    /// Returns `NotFound` if no event has this id, or the primary store's error.
    #[tracing::instrument(skip(self))]
    pub async fn delete_event(&self, id: EventId) -> ServiceResult<Event> {
        let event = self.store.delete(id).await?;

        match self.index.delete(&event).await {
            Ok(()) => self.stats.record_mirrored(),
            Err(e) => {
                tracing::error!(event_id = event.id, error = %e, "Failed to remove event from search index");
                self.stats.record_failed();
            }
        }
        Ok(event)
    }

    /// ## Summary
    /// Finds events within `distance_km` of a point, served from the mirror.
    ///
    /// Results reflect the mirror and may lag behind the primary store.
    ///
    /// ## Errors
    /// Returns `InvalidQuery` for bad coordinates or radius before the index
    /// is contacted, or the index's error if the query fails.
    #[tracing::instrument(skip(self))]
    pub async fn nearby_events(
        &self,
        latitude: f64,
        longitude: f64,
        distance_km: f64,
    ) -> ServiceResult<NearbyEvents> {
        let radius = GeoRadius::new(latitude, longitude, distance_km)?;
        let page = self.index.query_by_radius(&radius).await?;

        if !page.complete {
            tracing::debug!(
                total_hits = page.total_hits,
                returned = page.events.len(),
                "Proximity result truncated to one page"
            );
        }
        Ok(page.into())
    }

    #[must_use]
    pub fn mirror_stats(&self) -> MirrorStatsSnapshot {
        self.stats.snapshot()
    }

    async fn mirror_upsert(&self, event: &Event) {
        match self.index.upsert(event).await {
            Ok(UpsertOutcome::Applied) => self.stats.record_mirrored(),
            Ok(UpsertOutcome::Superseded) => {
                tracing::debug!(
                    event_id = event.id,
                    version = event.version,
                    "Search index already holds a newer version"
                );
                self.stats.record_superseded();
            }
            Err(e) => {
                tracing::error!(event_id = event.id, error = %e, "Failed to mirror event to search index");
                self.stats.record_failed();
            }
        }
    }
}
