#![allow(clippy::expect_used)]
//! Integration tests for the Postgres primary store.
//!
//! Each test uses its own group id, so tests can share one database and run
//! in parallel. Skipped when `TEST_DATABASE_URL` is unset.

use std::sync::atomic::{AtomicI64, Ordering};

use tokio::sync::OnceCell;

use milonga_test::component::db::connection::{DbPool, create_pool};
use milonga_test::component::db::migrate::run_migrations;
use milonga_test::component::db::{DbError, EventStore, PgEventStore};
use milonga_test::fakes::salsa_night;

static POOL: OnceCell<Option<DbPool>> = OnceCell::const_new();
static NEXT_GROUP: AtomicI64 = AtomicI64::new(0);

/// Connects and migrates once per test binary; `None` when no database is configured.
async fn test_store() -> Option<PgEventStore> {
    let pool = POOL
        .get_or_init(|| async {
            let Ok(url) = std::env::var("TEST_DATABASE_URL") else {
                eprintln!("[TestDb] TEST_DATABASE_URL not set, skipping Postgres tests");
                return None;
            };
            run_migrations(&url)
                .await
                .expect("Failed to run migrations on test database");
            Some(
                create_pool(&url, 4)
                    .await
                    .expect("Failed to create test database pool"),
            )
        })
        .await
        .clone()?;

    Some(PgEventStore::new(pool))
}

/// A group id no other test in this run uses.
fn fresh_group() -> i64 {
    let base = chrono::Utc::now().timestamp_micros();
    base + NEXT_GROUP.fetch_add(1, Ordering::SeqCst)
}

#[test_log::test(tokio::test)]
async fn create_assigns_id_and_read_is_stable() {
    let Some(store) = test_store().await else {
        return;
    };
    let group = fresh_group();

    let created = store.create(&salsa_night(group)).await.unwrap();
    assert!(created.id > 0);
    assert_eq!(created.version, 1);
    assert_eq!(created.dance_styles, vec!["salsa", "bachata"]);

    let read = store.get(created.id).await.unwrap();
    assert_eq!(read, created);

    let second = store.create(&salsa_night(group)).await.unwrap();
    assert_ne!(second.id, created.id);
}

#[test_log::test(tokio::test)]
async fn update_replaces_fields_and_bumps_version() {
    let Some(store) = test_store().await else {
        return;
    };
    let created = store.create(&salsa_night(fresh_group())).await.unwrap();

    let mut draft = created.draft();
    draft.name = "Bachata Night".to_string();
    draft.latitude = 53.42;
    draft.levels = vec!["advanced".to_string(), "advanced".to_string()];

    let updated = store.update(created.id, &draft).await.unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.version, 2);
    assert_eq!(updated.name, "Bachata Night");
    assert_eq!(updated.levels.len(), 2);

    let updated = store.update(created.id, &draft).await.unwrap();
    assert_eq!(updated.version, 3);
}

#[test_log::test(tokio::test)]
async fn missing_rows_are_not_found() {
    let Some(store) = test_store().await else {
        return;
    };

    let missing = i64::MAX;
    assert!(matches!(
        store.update(missing, &salsa_night(fresh_group())).await,
        Err(DbError::EventNotFound(id)) if id == missing
    ));
    assert!(matches!(
        store.get(missing).await,
        Err(DbError::EventNotFound(_))
    ));
    assert!(matches!(
        store.delete(missing).await,
        Err(DbError::EventNotFound(_))
    ));
}

#[test_log::test(tokio::test)]
async fn list_by_group_and_delete() {
    let Some(store) = test_store().await else {
        return;
    };
    let group = fresh_group();
    let other = fresh_group();

    let first = store.create(&salsa_night(group)).await.unwrap();
    let second = store.create(&salsa_night(group)).await.unwrap();
    store.create(&salsa_night(other)).await.unwrap();

    let ids: Vec<_> = store
        .list_by_group(group)
        .await
        .unwrap()
        .into_iter()
        .map(|e| e.id)
        .collect();
    assert_eq!(ids, vec![first.id, second.id]);

    let deleted = store.delete(first.id).await.unwrap();
    assert_eq!(deleted, first);
    assert_eq!(store.list_by_group(group).await.unwrap().len(), 1);
}
