use salvo::writing::Json;
use salvo::{Depot, Response, Router, handler};
use serde::Serialize;

use milonga_core::config::SearchBackend;
use milonga_service::event::MirrorStatsSnapshot;

use crate::config::get_config_from_depot;
use crate::error::AppResult;
use crate::service_handler::get_service_from_depot;

/// ## Summary
/// Mirror status payload
#[derive(Debug, Serialize)]
pub struct MirrorStatusResponse {
    pub backend: SearchBackend,
    pub index: String,
    #[serde(flatten)]
    pub stats: MirrorStatsSnapshot,
}

/// ## Summary
/// GET /api/app/mirror - Search mirror backend and write counters since process start.
///
/// A growing `failed` count means the search index is missing primary writes.
#[handler]
async fn mirror_status(depot: &mut Depot, res: &mut Response) {
    match status(depot) {
        Ok(status) => res.render(Json(status)),
        Err(e) => e.render(res),
    }
}

fn status(depot: &Depot) -> AppResult<MirrorStatusResponse> {
    let settings = get_config_from_depot(depot)?;
    let service = get_service_from_depot(depot)?;

    Ok(MirrorStatusResponse {
        backend: settings.search.backend,
        index: settings.search.index.clone(),
        stats: service.mirror_stats(),
    })
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path("mirror").get(mirror_status)
}
