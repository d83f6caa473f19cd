//! Proximity search, served from the search mirror.

use salvo::http::header::{HeaderName, HeaderValue};
use salvo::writing::Json;
use salvo::{Depot, Request, Response, handler};

use milonga_core::constants::{RESULT_COMPLETE_HEADER, TOTAL_HITS_HEADER};
use milonga_service::event::NearbyEvents;

use crate::app::api::params::query_f64;
use crate::error::AppResult;
use crate::service_handler::get_service_from_depot;

/// ## Summary
/// GET /api/events/nearby?lat=&long=&distance= - Events within `distance` km of a point.
///
/// The body is a JSON array with at most one index page of events in no
/// particular order. `X-Total-Hits` carries the number of matches and
/// `X-Result-Complete` is `false` when the array does not hold all of them.
/// Results reflect the search index and may lag behind recent writes.
///
/// ## Errors
/// Returns HTTP 400 for missing or invalid coordinates or distance
/// Returns HTTP 502 if the search index cannot be queried
#[handler]
pub async fn nearby_events(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    match nearby(req, depot).await {
        Ok(found) => {
            let headers = res.headers_mut();
            headers.insert(
                HeaderName::from_static(TOTAL_HITS_HEADER),
                HeaderValue::from(found.total_hits),
            );
            headers.insert(
                HeaderName::from_static(RESULT_COMPLETE_HEADER),
                HeaderValue::from_static(if found.complete { "true" } else { "false" }),
            );
            res.render(Json(found.events));
        }
        Err(e) => e.render(res),
    }
}

async fn nearby(req: &Request, depot: &Depot) -> AppResult<NearbyEvents> {
    let lat = query_f64(req, "lat")?;
    let long = query_f64(req, "long")?;
    let distance = query_f64(req, "distance")?;
    let service = get_service_from_depot(depot)?;

    Ok(service.nearby_events(lat, long, distance).await?)
}
