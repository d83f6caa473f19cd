/// Route component constants shared across crates
pub const API_ROUTE_COMPONENT: &str = "api";
pub const API_ROUTE_PREFIX: &str = const_str::concat!("/", API_ROUTE_COMPONENT);

pub const APP_ROUTE_COMPONENT: &str = "app";
pub const APP_ROUTE_PREFIX: &str = const_str::concat!(API_ROUTE_PREFIX, "/", APP_ROUTE_COMPONENT);

pub const GROUPS_ROUTE_COMPONENT: &str = "groups";
pub const GROUPS_ROUTE_PREFIX: &str =
    const_str::concat!(API_ROUTE_PREFIX, "/", GROUPS_ROUTE_COMPONENT);

pub const EVENTS_ROUTE_COMPONENT: &str = "events";
pub const EVENTS_ROUTE_PREFIX: &str =
    const_str::concat!(API_ROUTE_PREFIX, "/", EVENTS_ROUTE_COMPONENT);

/// Response header carrying the total number of proximity hits.
pub const TOTAL_HITS_HEADER: &str = "x-total-hits";
/// Response header telling whether a proximity page holds every hit.
pub const RESULT_COMPLETE_HEADER: &str = "x-result-complete";
