//! The search mirror contract.

use async_trait::async_trait;
use milonga_core::model::event::Event;

use crate::error::SearchResult;
use crate::query::GeoRadius;

/// Result of a mirror upsert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// The document now reflects the given event.
    Applied,
    /// The index already holds a newer version of this id; the write was dropped.
    Superseded,
}

/// Result of [`SearchIndex::ensure_index`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexStatus {
    Created,
    Existing,
}

/// One page of proximity hits.
#[derive(Debug, Clone, PartialEq)]
pub struct RadiusPage {
    pub events: Vec<Event>,
    /// Number of documents inside the radius, including ones beyond this page.
    pub total_hits: u64,
    /// `false` when more documents matched than fit on the page.
    pub complete: bool,
}

impl RadiusPage {
    #[must_use]
    pub fn new(events: Vec<Event>, total_hits: u64) -> Self {
        let complete = events.len() as u64 >= total_hits;
        Self {
            events,
            total_hits,
            complete,
        }
    }
}

/// Denormalized, geo-searchable mirror of the primary event store.
///
/// Every write is keyed by the primary store's event id. Writes carry the
/// event's `version`; an upsert older than the stored document is dropped, so
/// mirror writes racing each other converge on the newest primary state.
#[async_trait]
pub trait SearchIndex: Send + Sync {
    /// Creates the index and its geo-point mapping when missing. Idempotent.
    async fn ensure_index(&self) -> SearchResult<IndexStatus>;

    /// Inserts or replaces the document with id `event.id`.
    async fn upsert(&self, event: &Event) -> SearchResult<UpsertOutcome>;

    /// Removes the document for a deleted event. Missing documents are not an error.
    async fn delete(&self, event: &Event) -> SearchResult<()>;

    /// Returns the first page of documents inside `radius`.
    async fn query_by_radius(&self, radius: &GeoRadius) -> SearchResult<RadiusPage>;
}

/// Version recorded for a deleted document, above any version the row ever had.
#[must_use]
pub const fn tombstone_version(event: &Event) -> i64 {
    event.version + 1
}
