//! Event routes: CRUD under a group and proximity search.

mod group;
mod nearby;

use milonga_core::constants::{EVENTS_ROUTE_COMPONENT, GROUPS_ROUTE_COMPONENT};
use salvo::Router;

/// `/groups/{group_id}/events[/{event_id}]`
#[must_use]
pub fn group_routes() -> Router {
    Router::with_path(GROUPS_ROUTE_COMPONENT).push(
        Router::with_path("{group_id}").push(
            Router::with_path(EVENTS_ROUTE_COMPONENT)
                .get(group::list_events)
                .post(group::create_event)
                .push(
                    Router::with_path("{event_id}")
                        .get(group::get_event)
                        .put(group::update_event)
                        .delete(group::delete_event),
                ),
        ),
    )
}

/// `/events/nearby`
#[must_use]
pub fn nearby_routes() -> Router {
    Router::with_path(EVENTS_ROUTE_COMPONENT)
        .push(Router::with_path("nearby").get(nearby::nearby_events))
}

#[cfg(test)]
mod test_support;
