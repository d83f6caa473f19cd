use milonga_core::error::CoreError;
use milonga_db::error::DbError;
use milonga_search::error::SearchError;
use thiserror::Error;

/// Service layer errors
///
/// Conversions from the lower layers sort failures by kind, so a missing row
/// stays `NotFound` and a rejected draft stays `ValidationError` no matter
/// which crate reported it.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid geo query: {0}")]
    InvalidQuery(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    DatabaseError(DbError),

    #[error(transparent)]
    SearchError(SearchError),

    #[error(transparent)]
    CoreError(CoreError),
}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;

impl From<CoreError> for ServiceError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ValidationError(msg) => Self::ValidationError(msg),
            CoreError::NotFound(what) => Self::NotFound(what),
            other => Self::CoreError(other),
        }
    }
}

impl From<DbError> for ServiceError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::EventNotFound(id) => Self::NotFound(format!("event {id}")),
            DbError::CoreError(core) => core.into(),
            other => Self::DatabaseError(other),
        }
    }
}

impl From<SearchError> for ServiceError {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::InvalidQuery(msg) => Self::InvalidQuery(msg),
            other => Self::SearchError(other),
        }
    }
}
