use crate::error::{ApiError, ApiResult};
use crate::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use rollcall_attendance::ServiceError;
use rollcall_core::{CoreError, Participant};
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Debug, Default, Deserialize)]
pub struct NewStudent {
    pub name: Option<String>,
    pub student_id: Option<String>,
    pub mac: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Upload {
    pub csv: Option<String>,
}

pub async fn list(State(state): State<AppState>) -> Json<Vec<Participant>> {
    Json(state.ctx.roster().snapshot().participants().to_vec())
}

pub async fn add(
    State(state): State<AppState>,
    body: Option<Json<NewStudent>>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let request = body.map(|Json(b)| b).unwrap_or_default();
    let name = request.name.as_deref().unwrap_or_default().trim();
    let id = request.student_id.as_deref().unwrap_or_default().trim();
    if name.is_empty() || id.is_empty() {
        return Err(ApiError::bad_request("Name and Student ID are required"));
    }

    let participant =
        Participant::new(id, name).with_token(request.mac.as_deref().unwrap_or_default());
    let added = match state.ctx.roster_admin().add(participant).await {
        Err(ServiceError::Roster(CoreError::DuplicateParticipant(_))) => {
            return Err(ApiError::bad_request("Student ID already exists"))
        }
        other => other?,
    };

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Student added", "participant": added })),
    ))
}

pub async fn upload(
    State(state): State<AppState>,
    body: Option<Json<Upload>>,
) -> ApiResult<Json<Value>> {
    let request = body.map(|Json(b)| b).unwrap_or_default();
    let csv = request.csv.as_deref().unwrap_or_default().trim();
    if csv.is_empty() {
        return Err(ApiError::bad_request("CSV data required"));
    }

    let count = state.ctx.roster_admin().upload(csv).await?;
    Ok(Json(json!({ "message": format!("Uploaded {} students", count) })))
}
