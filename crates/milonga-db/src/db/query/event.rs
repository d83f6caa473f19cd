//! Query composition for `events`.

use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::db::connection::DbConnection;
use crate::db::schema::events;
use crate::model::event::{EventChangeset, EventRow, NewEventRow};

/// ## Summary
/// Returns a query to select all events.
#[must_use]
pub fn all() -> events::BoxedQuery<'static, diesel::pg::Pg> {
    events::table.into_boxed()
}

/// ## Summary
/// Returns a query to find events of a group, oldest first.
#[must_use]
pub fn by_group(group_id: i64) -> events::BoxedQuery<'static, diesel::pg::Pg> {
    all()
        .filter(events::group_id.eq(group_id))
        .order(events::id.asc())
}

/// ## Summary
/// Inserts an event and returns the stored row with its assigned id.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn create_event(
    conn: &mut DbConnection<'_>,
    new_event: &NewEventRow<'_>,
) -> QueryResult<EventRow> {
    diesel::insert_into(events::table)
        .values(new_event)
        .returning(EventRow::as_returning())
        .get_result(conn)
        .await
}

/// ## Summary
/// Replaces every caller-controlled column of an event and bumps its version.
///
/// Returns `Ok(None)` when no row has the given id.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn update_event(
    conn: &mut DbConnection<'_>,
    id: i64,
    changes: &EventChangeset<'_>,
) -> QueryResult<Option<EventRow>> {
    diesel::update(events::table.find(id))
        .set((
            changes,
            events::version.eq(events::version + 1),
            events::updated_at.eq(chrono::Utc::now()),
        ))
        .returning(EventRow::as_returning())
        .get_result(conn)
        .await
        .optional()
}

/// ## Summary
/// Loads an event by id.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn get_event(conn: &mut DbConnection<'_>, id: i64) -> QueryResult<Option<EventRow>> {
    all()
        .filter(events::id.eq(id))
        .select(EventRow::as_select())
        .first(conn)
        .await
        .optional()
}

/// ## Summary
/// Loads every event of a group.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn list_by_group(conn: &mut DbConnection<'_>, group_id: i64) -> QueryResult<Vec<EventRow>> {
    by_group(group_id)
        .select(EventRow::as_select())
        .load(conn)
        .await
}

/// ## Summary
/// Deletes an event and returns the removed row.
///
/// Returns `Ok(None)` when no row has the given id.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn delete_event(conn: &mut DbConnection<'_>, id: i64) -> QueryResult<Option<EventRow>> {
    diesel::delete(events::table.find(id))
        .returning(EventRow::as_returning())
        .get_result(conn)
        .await
        .optional()
}
