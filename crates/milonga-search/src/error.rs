use thiserror::Error;

/// Search index errors
#[derive(Error, Debug)]
pub enum SearchError {
    /// The proximity request could not be translated into an index query.
    #[error("Invalid geo query: {0}")]
    InvalidQuery(String),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Search index responded with status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("Index mapping mismatch: {0}")]
    MappingMismatch(String),

    #[error("Failed to decode search index response: {0}")]
    DecodeError(#[from] serde_json::Error),

    #[error("Invalid search index URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error(transparent)]
    CoreError(#[from] milonga_core::error::CoreError),
}

pub type SearchResult<T> = std::result::Result<T, SearchError>;
