//! Event CRUD under `/api/groups/{group_id}/events`.
//!
//! Writes go through the event service, which stores the event first and then
//! mirrors it into the search index. A response always reflects the primary
//! store, even when the mirror write failed.

use salvo::http::StatusCode;
use salvo::writing::Json;
use salvo::{Depot, Request, Response, handler};

use milonga_core::model::event::{Event, GroupId};
use milonga_service::error::ServiceError;
use milonga_service::event::{CreateEventRequest, EventResponse, UpdateEventRequest};

use crate::app::api::params::path_id;
use crate::error::{AppError, AppResult};
use crate::service_handler::get_service_from_depot;

/// Events addressed through another group's path do not exist there.
fn ensure_in_group(event: &Event, group_id: GroupId) -> AppResult<()> {
    if event.group_id == group_id {
        Ok(())
    } else {
        Err(ServiceError::NotFound(format!("event {} in group {group_id}", event.id)).into())
    }
}

async fn parse_body(req: &mut Request) -> AppResult<CreateEventRequest> {
    req.parse_json::<CreateEventRequest>()
        .await
        .map_err(|e| AppError::BadRequest(format!("invalid request body: {e}")))
}

/// ## Summary
/// POST /api/groups/{group_id}/events - Create an event.
///
/// The path group overrides any `groupId` in the body.
///
/// ## Errors
/// Returns HTTP 400 for an unreadable or invalid body
/// Returns HTTP 500 if the primary store write fails
#[handler]
pub async fn create_event(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    match create(req, depot).await {
        Ok(event) => {
            res.status_code(StatusCode::CREATED);
            res.render(Json(event));
        }
        Err(e) => e.render(res),
    }
}

#[tracing::instrument(skip_all)]
async fn create(req: &mut Request, depot: &Depot) -> AppResult<EventResponse> {
    let group_id = path_id(req, "group_id")?;
    let body = parse_body(req).await?;
    let service = get_service_from_depot(depot)?;

    let event = service.create_event(body.into_draft(Some(group_id))?).await?;
    tracing::info!(event_id = event.id, group_id, "Event created");

    Ok(event.into())
}

/// ## Summary
/// GET /api/groups/{group_id}/events - List a group's events from the primary store.
#[handler]
pub async fn list_events(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    match list(req, depot).await {
        Ok(events) => res.render(Json(events)),
        Err(e) => e.render(res),
    }
}

async fn list(req: &Request, depot: &Depot) -> AppResult<Vec<EventResponse>> {
    let group_id = path_id(req, "group_id")?;
    let service = get_service_from_depot(depot)?;

    let events = service.list_events(group_id).await?;
    Ok(events.into_iter().map(EventResponse::from).collect())
}

/// ## Summary
/// GET /api/groups/{group_id}/events/{event_id} - Read one event from the primary store.
///
/// ## Errors
/// Returns HTTP 404 if the event does not exist in this group
#[handler]
pub async fn get_event(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    match get(req, depot).await {
        Ok(event) => res.render(Json(event)),
        Err(e) => e.render(res),
    }
}

async fn get(req: &Request, depot: &Depot) -> AppResult<EventResponse> {
    let group_id = path_id(req, "group_id")?;
    let event_id = path_id(req, "event_id")?;
    let service = get_service_from_depot(depot)?;

    let event = service.get_event(event_id).await?;
    ensure_in_group(&event, group_id)?;
    Ok(event.into())
}

/// ## Summary
/// PUT /api/groups/{group_id}/events/{event_id} - Replace an event.
///
/// ## Errors
/// Returns HTTP 400 for an unreadable or invalid body
/// Returns HTTP 404 if the event does not exist in this group
/// Returns HTTP 500 if the primary store write fails
#[handler]
pub async fn update_event(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    match update(req, depot).await {
        Ok(event) => res.render(Json(event)),
        Err(e) => e.render(res),
    }
}

#[tracing::instrument(skip_all)]
async fn update(req: &mut Request, depot: &Depot) -> AppResult<EventResponse> {
    let group_id = path_id(req, "group_id")?;
    let event_id = path_id(req, "event_id")?;
    let body: UpdateEventRequest = parse_body(req).await?;
    let service = get_service_from_depot(depot)?;

    let existing = service.get_event(event_id).await?;
    ensure_in_group(&existing, group_id)?;

    let event = service
        .update_event(event_id, body.into_draft(Some(group_id))?)
        .await?;
    tracing::info!(event_id, version = event.version, "Event updated");

    Ok(event.into())
}

/// ## Summary
/// DELETE /api/groups/{group_id}/events/{event_id} - Delete an event and its mirror document.
///
/// ## Errors
/// Returns HTTP 404 if the event does not exist in this group
#[handler]
pub async fn delete_event(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    match delete(req, depot).await {
        Ok(()) => {
            res.status_code(StatusCode::NO_CONTENT);
        }
        Err(e) => e.render(res),
    }
}

#[tracing::instrument(skip_all)]
async fn delete(req: &Request, depot: &Depot) -> AppResult<()> {
    let group_id = path_id(req, "group_id")?;
    let event_id = path_id(req, "event_id")?;
    let service = get_service_from_depot(depot)?;

    let existing = service.get_event(event_id).await?;
    ensure_in_group(&existing, group_id)?;

    service.delete_event(event_id).await?;
    tracing::info!(event_id, "Event deleted");

    Ok(())
}
