//! Route table

mod attendance;
mod health;
mod reports;
mod session;
mod students;

use crate::AppState;
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::NaiveDate;
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::error::{ApiError, ApiResult};

const API_HINT: &str = "Try POST /api/validate, GET /api/attendance, GET/POST /api/session*, \
GET/POST /api/students*, POST /api/students/upload, POST /api/attendance, \
GET /api/reports/summary, GET /api/sessions";

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/api/session", get(session::current))
        .route("/api/session/start", post(session::start))
        .route("/api/session/end", post(session::end))
        .route("/api/sessions", get(session::list))
        .route("/api/validate", post(attendance::validate))
        .route(
            "/api/attendance",
            get(attendance::list).post(attendance::manual),
        )
        .route("/api/attendance/export", get(attendance::export))
        .route("/api/students", get(students::list).post(students::add))
        .route("/api/students/upload", post(students::upload))
        .route("/api/reports/summary", get(reports::summary))
        .fallback(fallback)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn fallback(uri: Uri) -> Response {
    if uri.path().starts_with("/api/") {
        (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Not Found", "hint": API_HINT })),
        )
            .into_response()
    } else {
        (StatusCode::NOT_FOUND, "Not Found").into_response()
    }
}

/// Trimmed, non-empty query value
fn param(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_session_id(value: &Option<String>) -> ApiResult<Option<i64>> {
    param(value)
        .map(|v| {
            v.parse::<i64>()
                .map_err(|_| ApiError::bad_request(format!("invalid session_id: {}", v)))
        })
        .transpose()
}

fn parse_date(name: &str, value: &Option<String>) -> ApiResult<Option<NaiveDate>> {
    param(value)
        .map(|v| {
            NaiveDate::parse_from_str(v, "%Y-%m-%d")
                .map_err(|_| ApiError::bad_request(format!("invalid {} (expected YYYY-MM-DD): {}", name, v)))
        })
        .transpose()
}
