use milonga_core::model::event::EventId;
use thiserror::Error;

/// Database layer errors
#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] diesel::result::Error),

    #[error("Pool error: {0}")]
    PoolError(#[from] diesel_async::pooled_connection::bb8::RunError),

    #[error("Event not found: id={0}")]
    EventNotFound(EventId),

    #[error(transparent)]
    CoreError(#[from] milonga_core::error::CoreError),
}

pub type DbResult<T> = std::result::Result<T, DbError>;
