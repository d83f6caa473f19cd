use salvo::async_trait;
use std::sync::Arc;

use crate::error::AppResult;
use milonga_core::error::CoreError;
use milonga_service::EventService;

/// Makes the shared [`EventService`] available to every handler below it.
pub struct EventServiceHandler {
    pub service: Arc<EventService>,
}

#[async_trait]
impl salvo::Handler for EventServiceHandler {
    #[tracing::instrument(skip(self, _req, depot, _res, _ctrl))]
    async fn handle(
        &self,
        _req: &mut salvo::Request,
        depot: &mut salvo::Depot,
        _res: &mut salvo::Response,
        _ctrl: &mut salvo::FlowCtrl,
    ) {
        depot.inject(self.service.clone());
    }
}

/// ## Summary
/// Retrieves the event service from the depot.
///
/// ## Errors
/// Returns an error if the event service is not found in the depot.
pub fn get_service_from_depot(depot: &salvo::Depot) -> AppResult<Arc<EventService>> {
    depot
        .obtain::<Arc<EventService>>()
        .cloned()
        .map_err(|_err| CoreError::InvariantViolation("Event service not found in depot").into())
}
