// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Walk-log API tests against the in-memory store.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use chrono::{NaiveDate, TimeZone, Utc};
use pawtrail::db::PersistenceGateway;
use pawtrail::models::{StampDelta, WalkingRecord};
use serde_json::json;
use tower::ServiceExt;

mod common;

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
}

fn record(id: &str, d: u32, minutes: i64) -> WalkingRecord {
    let start = Utc.with_ymd_and_hms(2024, 5, d, 8, 0, 0).unwrap();
    WalkingRecord {
        id: id.to_string(),
        pet_id: "kong".to_string(),
        date: day(d),
        start_time: start,
        end_time: start + chrono::Duration::minutes(minutes),
        elapsed_seconds: minutes as u64 * 60,
        distance_meters: 111.19,
        path: vec![[127.0, 37.5], [127.0, 37.501]],
        path_points: None,
        step_count: None,
        avg_speed_kmh: None,
        max_speed_kmh: None,
        goal_achieved: minutes >= 20,
    }
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn post_json(uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_health() {
    let (app, _state) = common::create_test_app();

    let response = app.oneshot(get("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = common::json_body(response).await;
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_create_walk() {
    let (app, state) = common::create_test_app();
    let walk = serde_json::to_value(record("w1", 3, 25)).unwrap();

    let response = app.oneshot(post_json("/api/walks", &walk)).await.unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(common::json_body(response).await, json!({ "id": "w1" }));
    assert!(state.store.get_walk("w1").is_some());
}

#[tokio::test]
async fn test_create_walk_without_pet_rejected() {
    let (app, state) = common::create_test_app();
    let mut walk = record("w1", 3, 25);
    walk.pet_id = " ".to_string();

    let response = app
        .oneshot(post_json("/api/walks", &serde_json::to_value(walk).unwrap()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(common::json_body(response).await["error"], "bad_request");
    assert_eq!(state.store.walk_count(), 0);
}

#[tokio::test]
async fn test_create_walk_with_bad_coordinates_rejected() {
    let (app, _state) = common::create_test_app();
    let mut walk = record("w1", 3, 25);
    walk.path.push([127.0, 91.0]);

    let response = app
        .oneshot(post_json("/api/walks", &serde_json::to_value(walk).unwrap()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_walks_by_date() {
    let (app, state) = common::create_test_app();
    state.store.save_walk(&record("w1", 3, 25)).await.unwrap();
    state.store.save_walk(&record("w2", 4, 10)).await.unwrap();

    let response = app
        .oneshot(get("/api/walks?pet_id=kong&date=2024-05-03"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = common::json_body(response).await;
    let walks = body.as_array().unwrap();
    assert_eq!(walks.len(), 1);
    assert_eq!(walks[0]["id"], "w1");
}

#[tokio::test]
async fn test_list_walks_bad_date() {
    let (app, _state) = common::create_test_app();

    let response = app
        .oneshot(get("/api/walks?pet_id=kong&date=05/03/2024"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_stamp_upsert_accumulates() {
    let (app, _state) = common::create_test_app();
    let first = json!({
        "pet_id": "kong",
        "date": "2024-05-03",
        "delta": { "count": 1, "goal_achieved": true }
    });
    // count defaults to 1
    let second = json!({
        "pet_id": "kong",
        "date": "2024-05-03",
        "delta": { "goal_achieved": false }
    });

    app.clone()
        .oneshot(post_json("/api/stamps", &first))
        .await
        .unwrap();
    let response = app
        .oneshot(post_json("/api/stamps", &second))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let stamp = common::json_body(response).await;
    assert_eq!(stamp["stamp_count"], 2);
    assert_eq!(stamp["goal_achieved"], true);
}

#[tokio::test]
async fn test_list_stamps_by_month() {
    let (app, state) = common::create_test_app();
    for d in [9, 2] {
        state
            .store
            .upsert_stamp("kong", day(d), StampDelta::single(false))
            .await
            .unwrap();
    }

    let response = app
        .oneshot(get("/api/stamps?pet_id=kong&year=2024&month=5"))
        .await
        .unwrap();

    let body = common::json_body(response).await;
    let dates: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["date"].as_str().unwrap())
        .collect();
    assert_eq!(dates, vec!["2024-05-02", "2024-05-09"]);
}

#[tokio::test]
async fn test_list_stamps_invalid_month() {
    let (app, _state) = common::create_test_app();

    let response = app
        .oneshot(get("/api/stamps?pet_id=kong&year=2024&month=13"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_stats_include_streak_and_progress() {
    let (app, state) = common::create_test_app();
    for (id, d, minutes) in [("a", 1, 25), ("b", 2, 5), ("c", 3, 12), ("d", 3, 4)] {
        let walk = record(id, d, minutes);
        state.store.save_walk(&walk).await.unwrap();
        state
            .store
            .upsert_stamp("kong", walk.date, StampDelta::single(walk.goal_achieved))
            .await
            .unwrap();
    }

    let response = app
        .oneshot(get("/api/stats?pet_id=kong&today=2024-05-03"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = common::json_body(response).await;
    assert_eq!(body["stats"]["total_walks"], 4);
    assert_eq!(body["stats"]["total_goal_achievements"], 1);
    assert_eq!(body["stats"]["current_streak"], 3);
    assert_eq!(body["today"]["minutes"], 16);
    assert_eq!(body["today"]["percentage"], 80);
    assert_eq!(body["today_summary"]["walk_count"], 2);
}

#[tokio::test]
async fn test_walk_map() {
    let (app, state) = common::create_test_app();
    state.store.save_walk(&record("w1", 3, 25)).await.unwrap();

    let response = app.clone().oneshot(get("/api/walks/w1/map")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = common::json_body(response).await;
    assert_eq!(body["feature"]["geometry"]["type"], "LineString");
    assert_eq!(body["trace"]["coordinates"][0], json!([127.0, 37.5]));

    let missing = app.oneshot(get("/api/walks/nope/map")).await.unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}
