use super::{parse_date, parse_session_id};
use crate::error::{ApiError, ApiResult};
use crate::AppState;
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use rollcall_attendance::{resolve_limit, AttendanceFilter};
use rollcall_core::{AttendanceRecord, CheckIn, NotLoggedReason, RosterQuery, ValidationOutcome};
use rollcall_reports::{AttendanceReport, ExportFormat};
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Default, Deserialize)]
pub struct ValidateRequest {
    pub student_id: Option<String>,
    pub name: Option<String>,
    pub mac_address: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ManualRequest {
    pub student_id: Option<String>,
    pub name: Option<String>,
}

/// Query string for listing and export. Kept as text so a bad `limit`
/// falls back to the default instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct AttendanceParams {
    pub session_id: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub limit: Option<String>,
    pub format: Option<String>,
}

impl AttendanceParams {
    fn filter(&self) -> ApiResult<AttendanceFilter> {
        Ok(AttendanceFilter {
            session_id: parse_session_id(&self.session_id)?,
            date_from: parse_date("date_from", &self.date_from)?,
            date_to: parse_date("date_to", &self.date_to)?,
        })
    }
}

#[derive(Serialize)]
struct ValidResponse {
    status: &'static str,
    #[serde(flatten)]
    check_in: CheckIn,
}

pub async fn validate(
    State(state): State<AppState>,
    body: Option<Json<ValidateRequest>>,
) -> ApiResult<Response> {
    let request = body.map(|Json(b)| b).unwrap_or_default();
    let query = RosterQuery::new(
        request.student_id.as_deref(),
        request.name.as_deref(),
        request.mac_address.as_deref(),
    );

    match state.ctx.validator().validate(&query).await? {
        ValidationOutcome::Invalid => {
            Ok((StatusCode::NOT_FOUND, Json(json!({ "status": "invalid" }))).into_response())
        }
        ValidationOutcome::Valid(check_in) => Ok(Json(ValidResponse {
            status: "valid",
            check_in,
        })
        .into_response()),
    }
}

pub async fn manual(
    State(state): State<AppState>,
    body: Option<Json<ManualRequest>>,
) -> ApiResult<Json<serde_json::Value>> {
    let request = body.map(|Json(b)| b).unwrap_or_default();
    let query = RosterQuery::new(request.student_id.as_deref(), request.name.as_deref(), None);
    if query.is_empty() {
        return Err(ApiError::bad_request("Student ID or Name required"));
    }

    let outcome = state
        .ctx
        .validator()
        .record_manual(query.identifier.as_deref(), query.display_name.as_deref())
        .await?;

    match outcome {
        ValidationOutcome::Invalid => Err(ApiError::NotFound("Student not found".to_string())),
        ValidationOutcome::Valid(check_in) if !check_in.logged => {
            let message = match check_in.reason {
                Some(NotLoggedReason::AlreadyLoggedInSession) => "Already logged for this session",
                _ => "Already logged today",
            };
            Err(ApiError::bad_request(message))
        }
        ValidationOutcome::Valid(check_in) => Ok(Json(json!({
            "message": "Attendance logged",
            "participant": check_in.participant,
            "timestamp": check_in.timestamp,
        }))),
    }
}

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<AttendanceParams>,
) -> ApiResult<Json<Vec<AttendanceRecord>>> {
    let filter = params.filter()?;
    let limit = resolve_limit(
        params.limit.as_deref(),
        state.ctx.settings().default_limit,
    );
    Ok(Json(state.ctx.attendance().query(&filter, limit).await?))
}

pub async fn export(
    State(state): State<AppState>,
    Query(params): Query<AttendanceParams>,
) -> ApiResult<Response> {
    let filter = params.filter()?;
    let records = state.ctx.attendance().query_all(&filter).await?;

    let exporter = ExportFormat::parse(params.format.as_deref().unwrap_or_default()).exporter();
    let report =
        AttendanceReport::from_records("Attendance", &records).with_generated_at(state.ctx.now());
    let body = exporter.export(&report);
    let disposition = format!(
        "attachment; filename=\"attendance.{}\"",
        exporter.extension()
    );

    Ok((
        [
            (header::CONTENT_TYPE, exporter.mime_type().to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}
