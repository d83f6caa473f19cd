#![allow(clippy::expect_used)]
//! Integration tests for the Elasticsearch mirror.
//!
//! Every test creates its own index and removes it afterwards. Skipped when
//! `TEST_ELASTICSEARCH_URL` is unset.

use std::time::Duration;

use milonga_test::component::model::event::Event;
use milonga_test::component::search::elastic::{ElasticConfig, ElasticIndex};
use milonga_test::component::search::query::{GeoRadius, ResultOrder};
use milonga_test::component::search::{IndexStatus, SearchIndex, UpsertOutcome};
use milonga_test::fakes::salsa_night;

struct TestIndex {
    index: ElasticIndex,
    url: String,
    name: String,
}

impl TestIndex {
    fn new(tag: &str) -> Option<Self> {
        let Ok(url) = std::env::var("TEST_ELASTICSEARCH_URL") else {
            eprintln!("[TestIndex] TEST_ELASTICSEARCH_URL not set, skipping Elasticsearch tests");
            return None;
        };
        let name = format!(
            "milonga-test-{tag}-{}",
            chrono::Utc::now().timestamp_micros()
        );
        let index = ElasticIndex::new(ElasticConfig {
            urls: vec![url.clone()],
            index: name.clone(),
            page_size: 2,
            order: ResultOrder::NearestFirst,
            refresh_on_write: true,
            timeout: Duration::from_secs(10),
            username: std::env::var("TEST_ELASTICSEARCH_USERNAME").ok(),
            password: std::env::var("TEST_ELASTICSEARCH_PASSWORD").ok(),
        })
        .expect("Failed to build Elasticsearch client");

        Some(Self { index, url, name })
    }

    /// Best-effort cleanup.
    async fn remove(self) {
        let mut request = reqwest::Client::new().delete(format!(
            "{}/{}",
            self.url.trim_end_matches('/'),
            self.name
        ));
        if let Ok(username) = std::env::var("TEST_ELASTICSEARCH_USERNAME") {
            request = request.basic_auth(username, std::env::var("TEST_ELASTICSEARCH_PASSWORD").ok());
        }
        if let Err(e) = request.send().await {
            eprintln!("[TestIndex] Failed to remove {}: {e}", self.name);
        }
    }
}

fn event(id: i64, version: i64, lat: f64) -> Event {
    let draft = salsa_night(1);
    Event {
        id,
        group_id: draft.group_id,
        name: format!("{} v{version}", draft.name),
        time: draft.time,
        location: draft.location,
        latitude: lat,
        longitude: draft.longitude,
        dance_styles: draft.dance_styles,
        event_type: draft.event_type,
        levels: draft.levels,
        version,
    }
}

#[test_log::test(tokio::test)]
async fn bootstrap_is_idempotent() {
    let Some(test) = TestIndex::new("bootstrap") else {
        return;
    };

    assert_eq!(test.index.ensure_index().await.unwrap(), IndexStatus::Created);
    assert_eq!(test.index.ensure_index().await.unwrap(), IndexStatus::Existing);

    test.remove().await;
}

#[test_log::test(tokio::test)]
async fn upsert_query_and_versioning() {
    let Some(test) = TestIndex::new("versions") else {
        return;
    };
    test.index.ensure_index().await.unwrap();

    assert_eq!(
        test.index.upsert(&event(1, 1, 52.52)).await.unwrap(),
        UpsertOutcome::Applied
    );
    // same version again converges on the same document
    assert_eq!(
        test.index.upsert(&event(1, 1, 52.52)).await.unwrap(),
        UpsertOutcome::Applied
    );
    assert_eq!(
        test.index.upsert(&event(1, 3, 52.52)).await.unwrap(),
        UpsertOutcome::Applied
    );
    assert_eq!(
        test.index.upsert(&event(1, 2, 0.0)).await.unwrap(),
        UpsertOutcome::Superseded
    );

    let radius = GeoRadius::new(52.50, 13.39, 5.0).unwrap();
    let page = test.index.query_by_radius(&radius).await.unwrap();
    assert_eq!(page.total_hits, 1);
    assert_eq!(page.events[0].version, 3);
    assert_eq!(page.events[0].name, "Salsa Night v3");

    test.remove().await;
}

#[test_log::test(tokio::test)]
async fn radius_page_and_delete() {
    let Some(test) = TestIndex::new("radius") else {
        return;
    };
    test.index.ensure_index().await.unwrap();

    for (id, lat) in [(1, 52.53), (2, 52.521), (3, 52.54), (4, 0.0)] {
        test.index.upsert(&event(id, 1, lat)).await.unwrap();
    }

    let radius = GeoRadius::new(52.52, 13.40, 5.0).unwrap();
    let page = test.index.query_by_radius(&radius).await.unwrap();
    let ids: Vec<_> = page.events.iter().map(|e| e.id).collect();
    assert_eq!(page.total_hits, 3);
    assert!(!page.complete);
    assert_eq!(ids, vec![2, 1]);

    test.index.delete(&event(2, 1, 52.521)).await.unwrap();
    // deleting twice is fine
    test.index.delete(&event(2, 1, 52.521)).await.unwrap();
    assert_eq!(
        test.index.upsert(&event(2, 1, 52.521)).await.unwrap(),
        UpsertOutcome::Superseded
    );

    let page = test.index.query_by_radius(&radius).await.unwrap();
    assert_eq!(page.total_hits, 2);
    assert!(page.complete);

    test.remove().await;
}
