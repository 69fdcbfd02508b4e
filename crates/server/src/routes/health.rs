use crate::error::ApiResult;
use crate::AppState;
use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

pub async fn health(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let ctx = &state.ctx;
    let attendance_rows = ctx.attendance().count().await?;
    let active_session = ctx.sessions().active_session().await?;

    Ok(Json(json!({
        "status": "ok",
        "participants_loaded": ctx.roster().len(),
        "attendance_rows": attendance_rows,
        "roster_file_exists": ctx.roster_file().is_some_and(|p| p.exists()),
        "active_session": active_session,
    })))
}
