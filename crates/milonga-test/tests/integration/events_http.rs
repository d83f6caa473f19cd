//! Integration tests for the event HTTP routes.
//!
//! Tests:
//! - Create, read, update, list and delete through the API
//! - Proximity search reflecting writes
//! - Error statuses for missing events and bad input
//! - Mirror failures not changing write outcomes

use salvo::http::StatusCode;
use serde_json::{Value, json};

use milonga_test::component::event::{EventResponse, MirrorStatsSnapshot};

use super::helpers::*;

#[test_log::test(tokio::test)]
async fn salsa_night_create_and_find_nearby() {
    let app = TestApp::new();

    let created: EventResponse = post_json(
        &group_events_path(1),
        &event_body("Salsa Night", 52.52, 13.40),
        &app.service,
    )
    .await
    .assert_status(StatusCode::CREATED)
    .json();

    assert_eq!(created.id, 1);
    assert_eq!(created.name, "Salsa Night");
    assert_eq!(created.group_id, 1);
    assert_eq!(created.location, "Berlin");
    assert_eq!(created.dance_styles, vec!["salsa"]);

    let read: EventResponse = get(&event_path(1, created.id), &app.service)
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(read, created);

    let nearby: Vec<EventResponse> = get(&nearby_path(52.50, 13.39, 5.0), &app.service)
        .await
        .assert_status(StatusCode::OK)
        .assert_header("x-total-hits", "1")
        .assert_header("x-result-complete", "true")
        .json();
    assert!(nearby.iter().any(|e| e.id == created.id));

    let far: Vec<EventResponse> = get(&nearby_path(0.0, 0.0, 5.0), &app.service)
        .await
        .assert_status(StatusCode::OK)
        .assert_header("x-total-hits", "0")
        .json();
    assert!(far.is_empty());
}

#[test_log::test(tokio::test)]
async fn moved_event_leaves_old_radius() {
    let app = TestApp::new();

    let created: EventResponse = post_json(
        &group_events_path(1),
        &event_body("Salsa Night", 52.52, 13.40),
        &app.service,
    )
    .await
    .assert_status(StatusCode::CREATED)
    .json();

    // about 100 km north
    let updated: EventResponse = put_json(
        &event_path(1, created.id),
        &event_body("Salsa Night", 53.42, 13.40),
        &app.service,
    )
    .await
    .assert_status(StatusCode::OK)
    .json();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.version, 2);

    let old_spot: Vec<EventResponse> = get(&nearby_path(52.52, 13.40, 5.0), &app.service)
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert!(old_spot.is_empty());

    let new_spot: Vec<EventResponse> = get(&nearby_path(53.42, 13.40, 5.0), &app.service)
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(new_spot.len(), 1);
    assert_eq!(app.index.len(), 1);
}

#[test_log::test(tokio::test)]
async fn update_of_missing_event_is_not_found() {
    let app = TestApp::new();

    put_json(
        &event_path(1, 404),
        &event_body("Ghost Social", 52.52, 13.40),
        &app.service,
    )
    .await
    .assert_status(StatusCode::NOT_FOUND);

    assert!(app.store.is_empty());
    assert!(app.index.is_empty());
}

#[test_log::test(tokio::test)]
async fn path_group_overrides_body_group() {
    let app = TestApp::new();

    let mut body = event_body("Kizomba Class", 52.52, 13.40);
    body["groupId"] = json!(99);

    let created: EventResponse = post_json(&group_events_path(7), &body, &app.service)
        .await
        .assert_status(StatusCode::CREATED)
        .json();
    assert_eq!(created.group_id, 7);

    let mut no_group = event_body("Kizomba Class", 52.52, 13.40);
    if let Some(fields) = no_group.as_object_mut() {
        fields.remove("groupId");
    }
    post_json(&group_events_path(7), &no_group, &app.service)
        .await
        .assert_status(StatusCode::CREATED);
}

#[test_log::test(tokio::test)]
async fn event_is_only_visible_under_its_group() {
    let app = TestApp::new();

    let created: EventResponse = post_json(
        &group_events_path(1),
        &event_body("Salsa Night", 52.52, 13.40),
        &app.service,
    )
    .await
    .json();

    get(&event_path(2, created.id), &app.service)
        .await
        .assert_status(StatusCode::NOT_FOUND);
    delete(&event_path(2, created.id), &app.service)
        .await
        .assert_status(StatusCode::NOT_FOUND);
    assert_eq!(app.store.len(), 1);
}

#[test_log::test(tokio::test)]
async fn list_returns_group_events_in_id_order() {
    let app = TestApp::new();

    for (group, name) in [(1, "Salsa Night"), (2, "Tango Práctica"), (1, "Bachata Social")] {
        post_json(
            &group_events_path(group),
            &event_body(name, 52.52, 13.40),
            &app.service,
        )
        .await
        .assert_status(StatusCode::CREATED);
    }

    let events: Vec<EventResponse> = get(&group_events_path(1), &app.service)
        .await
        .assert_status(StatusCode::OK)
        .json();
    let names: Vec<_> = events.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["Salsa Night", "Bachata Social"]);
}

#[test_log::test(tokio::test)]
async fn delete_removes_event_and_mirror_document() {
    let app = TestApp::new();

    let created: EventResponse = post_json(
        &group_events_path(1),
        &event_body("Salsa Night", 52.52, 13.40),
        &app.service,
    )
    .await
    .json();

    delete(&event_path(1, created.id), &app.service)
        .await
        .assert_status(StatusCode::NO_CONTENT);

    get(&event_path(1, created.id), &app.service)
        .await
        .assert_status(StatusCode::NOT_FOUND);
    assert!(app.index.document(created.id).is_none());

    let nearby: Vec<EventResponse> = get(&nearby_path(52.52, 13.40, 5.0), &app.service)
        .await
        .json();
    assert!(nearby.is_empty());
}

#[test_log::test(tokio::test)]
async fn invalid_input_is_bad_request() {
    let app = TestApp::new();

    post_json(
        &group_events_path(1),
        &event_body("", 52.52, 13.40),
        &app.service,
    )
    .await
    .assert_status(StatusCode::BAD_REQUEST);

    post_json(
        &group_events_path(1),
        &event_body("Salsa Night", -90.5, 13.40),
        &app.service,
    )
    .await
    .assert_status(StatusCode::BAD_REQUEST);

    get(&nearby_path(52.52, 13.40, 0.001), &app.service)
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    assert!(app.store.is_empty());
}

#[test_log::test(tokio::test)]
async fn mirror_failure_keeps_writes_successful() {
    let app = BrokenMirrorApp::new();

    let created: EventResponse = post_json(
        &group_events_path(1),
        &event_body("Salsa Night", 52.52, 13.40),
        &app.service,
    )
    .await
    .assert_status(StatusCode::CREATED)
    .json();
    assert_eq!(created.id, 1);

    let updated: EventResponse = put_json(
        &event_path(1, created.id),
        &event_body("Bachata Night", 52.52, 13.40),
        &app.service,
    )
    .await
    .assert_status(StatusCode::OK)
    .json();
    assert_eq!(updated.name, "Bachata Night");
    assert_eq!(app.store.row(1).map(|e| e.name).as_deref(), Some("Bachata Night"));

    let status: Value = get("/api/app/mirror", &app.service)
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(status["backend"], "memory");
    assert_eq!(status["failed"], 2);
    assert_eq!(status["mirrored"], 0);
    assert_eq!(app.index.calls(), 2);

    // reads by radius depend on the index
    get(&nearby_path(52.52, 13.40, 5.0), &app.service)
        .await
        .assert_status(StatusCode::BAD_GATEWAY);
}

#[test_log::test(tokio::test)]
async fn mirror_status_counts_writes() {
    let app = TestApp::new();

    post_json(
        &group_events_path(1),
        &event_body("Salsa Night", 52.52, 13.40),
        &app.service,
    )
    .await
    .assert_status(StatusCode::CREATED);

    let status: Value = get("/api/app/mirror", &app.service).await.json();
    let stats: MirrorStatsSnapshot = MirrorStatsSnapshot {
        mirrored: status["mirrored"].as_u64().unwrap_or_default(),
        superseded: status["superseded"].as_u64().unwrap_or_default(),
        failed: status["failed"].as_u64().unwrap_or_default(),
    };
    assert_eq!(
        stats,
        MirrorStatsSnapshot {
            mirrored: 1,
            superseded: 0,
            failed: 0,
        }
    );
    assert_eq!(status["index"], "events");
}

#[tokio::test]
async fn healthcheck_is_ok() {
    let app = TestApp::new();
    let response = get("/api/app/healthcheck", &app.service)
        .await
        .assert_status(StatusCode::OK);
    assert_eq!(response.body, b"OK");
}
