use crate::error::{ApiError, ApiResult};
use crate::AppState;
use axum::extract::State;
use axum::Json;
use rollcall_core::Session;
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Debug, Default, Deserialize)]
pub struct StartSession {
    pub name: Option<String>,
}

pub async fn current(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let active = state.ctx.sessions().active_session().await?;
    Ok(Json(json!({ "active_session": active })))
}

pub async fn start(
    State(state): State<AppState>,
    body: Option<Json<StartSession>>,
) -> ApiResult<Json<Value>> {
    let request = body.map(|Json(b)| b).unwrap_or_default();
    let session = state
        .ctx
        .sessions()
        .open_session(request.name.as_deref())
        .await?;
    Ok(Json(json!({
        "active_session": session,
        "message": "Session started",
    })))
}

pub async fn end(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    match state.ctx.sessions().close_session().await? {
        Some(session) => Ok(Json(json!({
            "ended_session": session,
            "message": "Session ended",
        }))),
        None => Err(ApiError::bad_request("No active session to end")),
    }
}

pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<Session>>> {
    Ok(Json(state.ctx.sessions().list_sessions().await?))
}
