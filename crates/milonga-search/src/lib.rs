//! Geo-searchable mirror of the Milonga event store.
//!
//! - [`query`]: translation of `(lat, lon, radius)` into the index's geo-distance query
//! - [`index`]: the [`SearchIndex`] contract every mirror backend implements
//! - [`elastic`]: Elasticsearch over its REST API
//! - [`memory`]: in-process index for development and tests
//!
//! Proximity results come from the mirror only. The mirror may lag behind or
//! miss writes that failed to reach it, and a query returns at most one page.

pub mod document;
pub mod elastic;
pub mod error;
pub mod geo;
pub mod index;
pub mod memory;
pub mod query;

use std::sync::Arc;

use milonga_core::config::{SearchBackend, SearchConfig};

pub use error::{SearchError, SearchResult};
pub use index::{IndexStatus, RadiusPage, SearchIndex, UpsertOutcome};
pub use query::{GeoRadius, ResultOrder};

/// ## Summary
/// Builds the configured search backend. Does not contact the index.
///
/// ## Errors
/// Returns an error if the Elasticsearch client cannot be configured.
pub fn from_settings(config: &SearchConfig) -> SearchResult<Arc<dyn SearchIndex>> {
    match config.backend {
        SearchBackend::Elasticsearch => Ok(Arc::new(elastic::ElasticIndex::from_settings(config)?)),
        SearchBackend::Memory => Ok(Arc::new(memory::MemoryIndex::new(
            usize::try_from(config.page_size).unwrap_or(usize::MAX),
            ResultOrder::from_nearest_first(config.nearest_first),
        ))),
    }
}
