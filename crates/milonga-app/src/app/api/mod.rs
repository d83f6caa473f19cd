mod app_specific;
mod events;
mod params;

use salvo::Router;

// Re-export route constants from core
pub use milonga_core::constants::{
    API_ROUTE_COMPONENT, API_ROUTE_PREFIX, APP_ROUTE_PREFIX, EVENTS_ROUTE_COMPONENT,
    EVENTS_ROUTE_PREFIX, GROUPS_ROUTE_COMPONENT, GROUPS_ROUTE_PREFIX,
};

/// ## Summary
/// Constructs the main API router.
#[must_use]
pub fn routes() -> Router {
    Router::with_path(API_ROUTE_COMPONENT)
        .push(app_specific::routes())
        .push(events::group_routes())
        .push(events::nearby_routes())
}
