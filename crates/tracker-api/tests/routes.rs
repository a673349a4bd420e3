use std::sync::Arc;

use anyhow::{Result, anyhow};
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use chrono::{Duration, Utc};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

use tracker_api::{AppStateInner, router};
use tracker_db::{Database, ExerciseStore};
use tracker_types::date::format_date;
use tracker_types::models::{Exercise, ExerciseFilter, NewExercise, User};

fn app() -> (Router, Arc<Database>) {
    let db = Arc::new(Database::open_in_memory().unwrap());
    (router(AppStateInner::new(Arc::clone(&db))), db)
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_form(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn create_user(app: &Router, name: &str) -> String {
    let (status, body) = send(app, post_form("/api/users", &format!("username={}", name))).await;
    assert_eq!(status, StatusCode::OK);
    body["id"].as_str().unwrap().to_string()
}

async fn add_exercise(app: &Router, user_id: &str, body: &str) -> (StatusCode, Value) {
    send(app, post_form(&format!("/api/users/{}/exercises", user_id), body)).await
}

fn exercise_count(db: &Database) -> i64 {
    db.with_conn(|conn| Ok(conn.query_row("SELECT COUNT(*) FROM exercises", [], |r| r.get(0))?))
        .unwrap()
}

#[tokio::test]
async fn create_user_returns_username_and_fresh_id() {
    let (app, _db) = app();

    let (status, first) = send(&app, post_form("/api/users", "username=alice")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["username"], "alice");

    let (_, second) = send(&app, post_json("/api/users", json!({ "username": "alice" }))).await;
    assert_eq!(second["username"], "alice");

    let first_id: Uuid = first["id"].as_str().unwrap().parse().unwrap();
    let second_id: Uuid = second["id"].as_str().unwrap().parse().unwrap();
    assert_ne!(first_id, second_id);
}

#[tokio::test]
async fn list_users_returns_every_user() {
    let (app, _db) = app();
    let a = create_user(&app, "a").await;
    let b = create_user(&app, "b").await;

    let (status, body) = send(&app, get("/api/users")).await;
    assert_eq!(status, StatusCode::OK);

    let users = body.as_array().unwrap();
    assert_eq!(users.len(), 2);
    assert!(users.iter().any(|u| u["id"] == a.as_str() && u["username"] == "a"));
    assert!(users.iter().any(|u| u["id"] == b.as_str() && u["username"] == "b"));
}

#[tokio::test]
async fn exercise_response_echoes_the_user() {
    let (app, _db) = app();
    let id = create_user(&app, "runner").await;

    let (status, body) =
        add_exercise(&app, &id, "description=Morning+run&duration=30&date=1990-01-01").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], id.as_str());
    assert_eq!(body["username"], "runner");
    assert_eq!(body["description"], "Morning run");
    assert_eq!(body["duration"], 30);
    assert_eq!(body["date"], "Mon Jan 01 1990");
}

#[tokio::test]
async fn exercise_accepts_json_body() {
    let (app, _db) = app();
    let id = create_user(&app, "swimmer").await;

    let (status, body) = send(
        &app,
        post_json(
            &format!("/api/users/{}/exercises", id),
            json!({ "description": "laps", "duration": 45, "date": "2024-02-29" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["duration"], 45);
    assert_eq!(body["date"], "Thu Feb 29 2024");
}

#[tokio::test]
async fn exercise_without_date_is_logged_today() {
    let (app, _db) = app();
    let id = create_user(&app, "today").await;

    let before = Utc::now().date_naive();
    let (status, body) = add_exercise(&app, &id, "description=walk&duration=10").await;
    assert_eq!(status, StatusCode::OK);

    // Tolerate the request straddling midnight.
    let date = body["date"].as_str().unwrap();
    assert!(
        date == format_date(before) || date == format_date(before + Duration::days(1)),
        "unexpected date {}",
        date
    );
}

#[tokio::test]
async fn exercise_for_unknown_user_is_not_found_and_not_stored() {
    let (app, db) = app();

    let missing = Uuid::new_v4();
    let (status, body) =
        add_exercise(&app, &missing.to_string(), "description=ghost&duration=5").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "User not found" }));

    let (status, _) = add_exercise(&app, "not-a-uuid", "description=ghost&duration=5").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    assert_eq!(exercise_count(&db), 0);
}

#[tokio::test]
async fn invalid_bodies_are_rejected_with_json_errors() {
    let (app, db) = app();
    let id = create_user(&app, "checker").await;

    let (status, body) = send(&app, post_form("/api/users", "username=")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    for bad in [
        "duration=10",
        "description=run",
        "description=run&duration=abc",
        "description=run&duration=0",
        "description=run&duration=10&date=someday",
    ] {
        let (status, body) = add_exercise(&app, &id, bad).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body {}", bad);
        assert!(body["error"].is_string());
    }

    let (status, body) = send(
        &app,
        Request::builder()
            .method("POST")
            .uri("/api/users")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    assert_eq!(exercise_count(&db), 0);
}

#[tokio::test]
async fn log_filters_by_from_date() {
    let (app, _db) = app();
    let id = create_user(&app, "filter").await;
    for date in ["2024-01-01", "2024-01-02", "2024-01-03"] {
        add_exercise(&app, &id, &format!("description={}&duration=20&date={}", date, date)).await;
    }

    let (status, body) = send(&app, get(&format!("/api/users/{}/logs?from=2024-01-02", id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "filter");
    assert_eq!(body["id"], id.as_str());
    assert_eq!(body["count"], 2);

    let descriptions: Vec<_> = body["log"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["description"].as_str().unwrap())
        .collect();
    assert_eq!(descriptions, ["2024-01-02", "2024-01-03"]);
    assert_eq!(body["log"][0]["date"], "Tue Jan 02 2024");
    assert_eq!(body["log"][0]["duration"], 20);

    let (_, body) = send(
        &app,
        get(&format!("/api/users/{}/logs?from=2024-01-02&to=2024-01-02", id)),
    )
    .await;
    assert_eq!(body["count"], 1);
}

#[tokio::test]
async fn log_limit_caps_entries() {
    let (app, _db) = app();
    let id = create_user(&app, "limit").await;
    for day in 1..=3 {
        add_exercise(&app, &id, &format!("description=d{}&duration=5&date=2024-03-0{}", day, day)).await;
    }

    let (_, body) = send(&app, get(&format!("/api/users/{}/logs?limit=1", id))).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["log"].as_array().unwrap().len(), 1);
    assert_eq!(body["log"][0]["description"], "d1");
}

#[tokio::test]
async fn unusable_limit_falls_back_to_ten() {
    let (app, _db) = app();
    let id = create_user(&app, "many").await;
    for day in 10..=21 {
        add_exercise(&app, &id, &format!("description=x&duration=1&date=2024-04-{}", day)).await;
    }

    for query in ["", "?limit=abc", "?limit=0", "?limit=-1"] {
        let (status, body) = send(&app, get(&format!("/api/users/{}/logs{}", id, query))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 10, "query {:?}", query);
    }

    let (_, body) = send(&app, get(&format!("/api/users/{}/logs?limit=50", id))).await;
    assert_eq!(body["count"], 12);
}

#[tokio::test]
async fn log_errors_are_structured() {
    let (app, _db) = app();

    let (status, body) = send(&app, get(&format!("/api/users/{}/logs", Uuid::new_v4()))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "User not found" }));

    let id = create_user(&app, "dates").await;
    let (status, body) = send(&app, get(&format!("/api/users/{}/logs?to=soon", id))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("to"));
}

/// Store whose every call fails, standing in for an unreachable backend.
struct BrokenStore;

impl ExerciseStore for BrokenStore {
    fn create_user(&self, _username: &str) -> Result<User> {
        Err(anyhow!("backend down"))
    }

    fn get_user(&self, _id: Uuid) -> Result<Option<User>> {
        Err(anyhow!("backend down"))
    }

    fn list_users(&self) -> Result<Vec<User>> {
        Err(anyhow!("backend down"))
    }

    fn insert_exercise(&self, _new: &NewExercise) -> Result<Exercise> {
        Err(anyhow!("backend down"))
    }

    fn find_exercises(&self, _filter: &ExerciseFilter) -> Result<Vec<Exercise>> {
        Err(anyhow!("backend down"))
    }
}

#[tokio::test]
async fn store_failures_become_500_on_every_endpoint() {
    let app = router(AppStateInner::new(BrokenStore));
    let id = Uuid::new_v4();

    let requests = [
        get("/api/users"),
        post_form("/api/users", "username=x"),
        post_form(&format!("/api/users/{}/exercises", id), "description=x&duration=1"),
        get(&format!("/api/users/{}/logs", id)),
    ];

    for req in requests {
        let (status, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "Internal server error" }));
    }
}
