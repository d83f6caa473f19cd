//! Synchronization of the primary event store with its search mirror.

pub mod error;
pub mod event;

pub use error::{ServiceError, ServiceResult};
pub use event::service::EventService;
