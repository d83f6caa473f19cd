use milonga_core::constants::APP_ROUTE_COMPONENT;
use salvo::Router;

mod healthcheck;
mod mirror;

#[must_use]
pub fn routes() -> Router {
    Router::with_path(APP_ROUTE_COMPONENT)
        .push(healthcheck::routes())
        .push(mirror::routes())
}
