//! The primary store contract and its PostgreSQL implementation.

use async_trait::async_trait;
use milonga_core::model::event::{Event, EventDraft, EventId, GroupId};

use crate::db::DbProvider;
use crate::db::connection::DbPool;
use crate::db::query::event as event_query;
use crate::error::{DbError, DbResult};
use crate::model::event::{EventChangeset, NewEventRow};

/// Authoritative storage for events.
///
/// Implementations assign ids on `create`, bump `version` on `update`, and
/// report a missing id as `DbError::EventNotFound` rather than as an empty
/// success.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Stores a new event and returns it with its assigned id and version 1.
    async fn create(&self, draft: &EventDraft) -> DbResult<Event>;

    /// Replaces all caller-controlled fields of an existing event.
    async fn update(&self, id: EventId, draft: &EventDraft) -> DbResult<Event>;

    async fn get(&self, id: EventId) -> DbResult<Event>;

    async fn list_by_group(&self, group_id: GroupId) -> DbResult<Vec<Event>>;

    /// Removes an event and returns the last stored state.
    async fn delete(&self, id: EventId) -> DbResult<Event>;
}

/// `EventStore` backed by a PostgreSQL connection pool.
#[derive(Clone)]
pub struct PgEventStore<P: DbProvider = DbPool> {
    provider: P,
}

impl<P: DbProvider> PgEventStore<P> {
    #[must_use]
    pub const fn new(provider: P) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl<P: DbProvider + 'static> EventStore for PgEventStore<P> {
    #[tracing::instrument(skip(self, draft), fields(group_id = draft.group_id))]
    async fn create(&self, draft: &EventDraft) -> DbResult<Event> {
        let mut conn = self.provider.get_connection().await?;
        let row = event_query::create_event(&mut conn, &NewEventRow::from(draft)).await?;

        tracing::debug!(event_id = row.id, "Event row inserted");
        Ok(row.into())
    }

    #[tracing::instrument(skip(self, draft), fields(group_id = draft.group_id))]
    async fn update(&self, id: EventId, draft: &EventDraft) -> DbResult<Event> {
        let mut conn = self.provider.get_connection().await?;
        let row = event_query::update_event(&mut conn, id, &EventChangeset::from(draft))
            .await?
            .ok_or(DbError::EventNotFound(id))?;

        tracing::debug!(version = row.version, "Event row updated");
        Ok(row.into())
    }

    #[tracing::instrument(skip(self))]
    async fn get(&self, id: EventId) -> DbResult<Event> {
        let mut conn = self.provider.get_connection().await?;
        event_query::get_event(&mut conn, id)
            .await?
            .map(Event::from)
            .ok_or(DbError::EventNotFound(id))
    }

    #[tracing::instrument(skip(self))]
    async fn list_by_group(&self, group_id: GroupId) -> DbResult<Vec<Event>> {
        let mut conn = self.provider.get_connection().await?;
        let rows = event_query::list_by_group(&mut conn, group_id).await?;

        Ok(rows.into_iter().map(Event::from).collect())
    }

    #[tracing::instrument(skip(self))]
    async fn delete(&self, id: EventId) -> DbResult<Event> {
        let mut conn = self.provider.get_connection().await?;
        let row = event_query::delete_event(&mut conn, id)
            .await?
            .ok_or(DbError::EventNotFound(id))?;

        tracing::debug!("Event row deleted");
        Ok(row.into())
    }
}
