//! Drives the router in-process with `tower::ServiceExt::oneshot`.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use rollcall_attendance::{RosterStore, ServiceContext};
use rollcall_core::{ManualClock, Participant};
use rollcall_persistence::init_database;
use rollcall_server::{router, AppState};
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

struct TestApp {
    state: AppState,
    dir: TempDir,
}

impl TestApp {
    async fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let pool = init_database(&dir.path().join("attendance.db")).await.unwrap();
        let roster = RosterStore::from_participants(vec![
            Participant::new("S1", "Ann Lee").with_token("AA:BB:CC:00:00:01"),
            Participant::new("S2", "Bob Tran"),
        ])
        .unwrap();
        let clock = Arc::new(ManualClock::at("2024-03-04T09:00:00").unwrap());
        let ctx = ServiceContext::new(pool, Arc::new(roster))
            .with_clock(clock)
            .with_roster_file(dir.path().join("roster.csv"));
        Self {
            state: AppState::new(ctx),
            dir,
        }
    }

    fn app(&self) -> Router {
        router(self.state.clone())
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = self.app().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, bytes.to_vec())
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let (status, body) = self
            .send(Request::get(uri).body(Body::empty()).unwrap())
            .await;
        (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
    }

    async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let (status, body) = self.send(request).await;
        (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
    }
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new().await;
    let (status, body) = app.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["participants_loaded"], 2);
    assert_eq!(body["attendance_rows"], 0);
    assert_eq!(body["active_session"], Value::Null);
}

#[tokio::test]
async fn test_validate_day_scope_then_duplicate() {
    let app = TestApp::new().await;

    let (status, body) = app.post("/api/validate", json!({ "student_id": "S1" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "valid");
    assert_eq!(body["logged"], true);
    assert_eq!(body["scope"], "day");
    assert_eq!(body["date"], "2024-03-04");
    assert_eq!(body["timestamp"], "2024-03-04T09:00:00");
    assert_eq!(body["participant"]["id"], "S1");

    let (status, body) = app
        .post("/api/validate", json!({ "mac_address": "aa:bb:cc:00:00:01" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["logged"], false);
    assert_eq!(body["reason"], "already_logged_today");
}

#[tokio::test]
async fn test_validate_unknown_and_empty() {
    let app = TestApp::new().await;

    let (status, body) = app.post("/api/validate", json!({ "student_id": "nobody" })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "status": "invalid" }));

    let (status, _) = app.post("/api/validate", json!({ "name": "   " })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_session_lifecycle() {
    let app = TestApp::new().await;

    let (status, body) = app.post("/api/session/end", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No active session to end");

    let (status, body) = app.post("/api/session/start", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["active_session"]["label"], "Lecture 2024-03-04");

    let (_, body) = app.post("/api/validate", json!({ "name": "bob tran" })).await;
    assert_eq!(body["scope"], "session");
    assert_eq!(body["session"]["id"], 1);

    let (_, body) = app.get("/api/session").await;
    assert_eq!(body["active_session"]["id"], 1);

    let (status, body) = app.post("/api/session/end", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ended_session"]["id"], 1);

    let (_, body) = app.get("/api/sessions").await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert!(body[0]["closed_at"].is_string());
}

#[tokio::test]
async fn test_manual_check_in_rejections() {
    let app = TestApp::new().await;

    let (status, _) = app.post("/api/attendance", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app.post("/api/attendance", json!({ "student_id": "S9" })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Student not found");

    let (status, body) = app.post("/api/attendance", json!({ "student_id": "S2" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Attendance logged");

    let (status, body) = app.post("/api/attendance", json!({ "name": "Bob Tran" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Already logged today");
}

#[tokio::test]
async fn test_attendance_query_and_bad_limit() {
    let app = TestApp::new().await;
    app.post("/api/validate", json!({ "student_id": "S1" })).await;
    app.post("/api/validate", json!({ "student_id": "S2" })).await;

    let (status, body) = app.get("/api/attendance?limit=abc").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (_, body) = app.get("/api/attendance?limit=1").await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["participant_id"], "S2");

    let (_, body) = app.get("/api/attendance?date_from=2024-03-05").await;
    assert!(body.as_array().unwrap().is_empty());

    let (status, _) = app.get("/api/attendance?session_id=x").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_export_formats() {
    let app = TestApp::new().await;
    app.post("/api/validate", json!({ "student_id": "S1" })).await;

    let response = app
        .app()
        .oneshot(Request::get("/api/attendance/export").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/csv");
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"attendance.csv\""
    );
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.starts_with("Student ID,Name,MAC,Timestamp,Session ID\n"));
    assert!(text.contains("S1,Ann Lee,AA:BB:CC:00:00:01,2024-03-04T09:00:00,"));

    let (status, body) = app.get("/api/attendance/export?format=json").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["Student ID"], "S1");

    let (_, raw) = app
        .send(Request::get("/api/attendance/export?format=pdf").body(Body::empty()).unwrap())
        .await;
    assert!(String::from_utf8(raw).unwrap().starts_with("Student ID,"));
}

#[tokio::test]
async fn test_students_add_and_upload() {
    let app = TestApp::new().await;

    let (status, _) = app.post("/api/students", json!({ "name": "Cara Vu" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .post("/api/students", json!({ "name": "Cara Vu", "student_id": "S3", "mac": "" }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["participant"]["id"], "S3");
    assert!(app.dir.path().join("roster.csv").exists());

    let (status, body) = app
        .post("/api/students", json!({ "name": "Other", "student_id": "S3" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Student ID already exists");

    let (status, body) = app
        .post("/api/students/upload", json!({ "csv": "Name,Student ID\nDan Ho,S4\n" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Uploaded 1 students");

    let (_, body) = app.get("/api/students").await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["display_name"], "Dan Ho");

    let (status, _) = app.post("/api/students/upload", json!({ "csv": " " })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_summary() {
    let app = TestApp::new().await;
    app.post("/api/validate", json!({ "student_id": "S1" })).await;

    let (status, _) = app.get("/api/reports/summary").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app.get("/api/reports/summary?date=2024-03-04").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_participants"], 2);
    assert_eq!(body["present"], 1);
    assert_eq!(body["absent"], 1);
    assert_eq!(body["scope"], "day");
}

#[tokio::test]
async fn test_unknown_api_path() {
    let app = TestApp::new().await;
    let (status, body) = app.get("/api/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Not Found");
    assert!(body["hint"].as_str().unwrap().contains("/api/validate"));
}
