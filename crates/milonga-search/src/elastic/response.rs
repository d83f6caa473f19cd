//! Response bodies returned by Elasticsearch.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

use crate::document::EventDocument;

#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    pub hits: Hits,
}

#[derive(Debug, Deserialize)]
pub struct Hits {
    pub total: Option<TotalHits>,
    pub hits: Vec<Hit>,
}

#[derive(Debug, Deserialize)]
pub struct TotalHits {
    pub value: u64,
    pub relation: TotalRelation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TotalRelation {
    Eq,
    Gte,
}

#[derive(Debug, Deserialize)]
pub struct Hit {
    #[serde(rename = "_source")]
    pub source: EventDocument,
}

/// Body of `GET /{index}/_mapping`, keyed by concrete index name.
pub type MappingResponse = HashMap<String, IndexMapping>;

#[derive(Debug, Deserialize)]
pub struct IndexMapping {
    pub mappings: Mappings,
}

#[derive(Debug, Default, Deserialize)]
pub struct Mappings {
    #[serde(default)]
    pub properties: HashMap<String, Value>,
}

impl Mappings {
    /// ## Summary
    /// Returns the declared type of a top-level field.
    #[must_use]
    pub fn field_type(&self, field: &str) -> Option<&str> {
        self.properties.get(field)?.get("type")?.as_str()
    }
}

#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorCause,
}

#[derive(Debug, Deserialize)]
pub struct ErrorCause {
    #[serde(rename = "type")]
    pub kind: String,
}

impl ErrorResponse {
    /// ## Summary
    /// Extracts the error type from a raw error body, if it has one.
    #[must_use]
    pub fn kind_of(body: &str) -> Option<String> {
        serde_json::from_str::<Self>(body).ok().map(|e| e.error.kind)
    }
}
