pub mod request;
pub mod service;
pub mod stats;

pub use request::{CreateEventRequest, EventResponse, NearbyEvents, UpdateEventRequest};
pub use stats::{MirrorStats, MirrorStatsSnapshot};
