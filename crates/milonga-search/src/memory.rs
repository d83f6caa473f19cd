//! In-process search index.
//!
//! Applies the same versioning and radius rules as the Elasticsearch adapter.
//! Used when `search.backend = "memory"` and by tests.
//!
//! Delete tombstones are kept for [`TOMBSTONE_RETENTION`], the default
//! `index.gc_deletes` of Elasticsearch, and pruned on later writes.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use milonga_core::model::event::{Event, EventId};

use crate::document::EventDocument;
use crate::error::SearchResult;
use crate::index::{IndexStatus, RadiusPage, SearchIndex, UpsertOutcome, tombstone_version};
use crate::query::{GeoRadius, ResultOrder};

/// How long a delete keeps blocking stale upserts of the same id.
pub const TOMBSTONE_RETENTION: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
enum Slot {
    Live(EventDocument),
    Deleted { version: i64, at: Instant },
}

impl Slot {
    const fn version(&self) -> i64 {
        match self {
            Self::Live(doc) => doc.version,
            Self::Deleted { version, .. } => *version,
        }
    }
}

/// Search index kept in a process-local map.
#[derive(Debug)]
pub struct MemoryIndex {
    slots: RwLock<HashMap<EventId, Slot>>,
    page_size: usize,
    order: ResultOrder,
    tombstone_retention: Duration,
}

impl Default for MemoryIndex {
    fn default() -> Self {
        Self::new(10, ResultOrder::Unordered)
    }
}

impl MemoryIndex {
    #[must_use]
    pub fn new(page_size: usize, order: ResultOrder) -> Self {
        Self {
            slots: RwLock::new(HashMap::new()),
            page_size,
            order,
            tombstone_retention: TOMBSTONE_RETENTION,
        }
    }

    #[must_use]
    pub fn with_tombstone_retention(mut self, retention: Duration) -> Self {
        self.tombstone_retention = retention;
        self
    }

    fn prune_tombstones(&self, slots: &mut HashMap<EventId, Slot>) {
        slots.retain(|_, slot| match slot {
            Slot::Live(_) => true,
            Slot::Deleted { at, .. } => at.elapsed() < self.tombstone_retention,
        });
    }

    /// Recovers the guard if a previous holder panicked; the map is never left half-written.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<EventId, Slot>> {
        match self.slots.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<EventId, Slot>> {
        match self.slots.write() {
            Ok(guard) => guard,
            Err(poisoned) => {
                self.slots.clear_poison();
                poisoned.into_inner()
            }
        }
    }

    /// ## Summary
    /// Returns the live document for an id, if any.
    #[must_use]
    pub fn document(&self, id: EventId) -> Option<EventDocument> {
        match self.read().get(&id) {
            Some(Slot::Live(doc)) => Some(doc.clone()),
            _ => None,
        }
    }

    /// ## Summary
    /// Number of live documents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read()
            .values()
            .filter(|slot| matches!(slot, Slot::Live(_)))
            .count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// ## Summary
    /// Number of deletes still remembered.
    #[must_use]
    pub fn tombstones(&self) -> usize {
        self.read()
            .values()
            .filter(|slot| matches!(slot, Slot::Deleted { .. }))
            .count()
    }
}

#[async_trait]
impl SearchIndex for MemoryIndex {
    async fn ensure_index(&self) -> SearchResult<IndexStatus> {
        Ok(IndexStatus::Existing)
    }

    #[tracing::instrument(skip(self, event), fields(event_id = event.id, version = event.version))]
    async fn upsert(&self, event: &Event) -> SearchResult<UpsertOutcome> {
        let mut slots = self.write();
        self.prune_tombstones(&mut slots);

        if let Some(existing) = slots.get(&event.id)
            && existing.version() > event.version
        {
            tracing::debug!(
                stored_version = existing.version(),
                "Dropping mirror write older than stored document"
            );
            return Ok(UpsertOutcome::Superseded);
        }

        slots.insert(event.id, Slot::Live(EventDocument::from(event)));
        Ok(UpsertOutcome::Applied)
    }

    #[tracing::instrument(skip(self, event), fields(event_id = event.id))]
    async fn delete(&self, event: &Event) -> SearchResult<()> {
        let version = tombstone_version(event);
        let mut slots = self.write();
        self.prune_tombstones(&mut slots);

        let newer_exists = slots
            .get(&event.id)
            .is_some_and(|existing| existing.version() > version);
        if !newer_exists {
            slots.insert(
                event.id,
                Slot::Deleted {
                    version,
                    at: Instant::now(),
                },
            );
        }
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(distance = %radius.distance_param()))]
    async fn query_by_radius(&self, radius: &GeoRadius) -> SearchResult<RadiusPage> {
        let slots = self.read();

        let mut hits: Vec<(f64, &EventDocument)> = slots
            .values()
            .filter_map(|slot| match slot {
                Slot::Live(doc) if radius.contains(doc.location_geo) => {
                    Some((radius.center().distance_km(doc.location_geo), doc))
                }
                _ => None,
            })
            .collect();

        match self.order {
            ResultOrder::NearestFirst => hits.sort_by(|a, b| a.0.total_cmp(&b.0)),
            ResultOrder::Unordered => hits.sort_by_key(|(_, doc)| doc.id),
        }

        let total_hits = hits.len() as u64;
        let events = hits
            .into_iter()
            .take(self.page_size)
            .map(|(_, doc)| Event::from(doc.clone()))
            .collect();

        Ok(RadiusPage::new(events, total_hits))
    }
}
