use super::{parse_date, parse_session_id};
use crate::error::{ApiError, ApiResult};
use crate::AppState;
use axum::extract::{Query, State};
use axum::Json;
use rollcall_attendance::AttendanceSummary;
use rollcall_core::Scope;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct SummaryParams {
    pub session_id: Option<String>,
    pub date: Option<String>,
}

/// `session_id` wins when both are given
pub async fn summary(
    State(state): State<AppState>,
    Query(params): Query<SummaryParams>,
) -> ApiResult<Json<AttendanceSummary>> {
    let scope = match (
        parse_session_id(&params.session_id)?,
        parse_date("date", &params.date)?,
    ) {
        (Some(id), _) => Scope::Session(id),
        (None, Some(date)) => Scope::Day(date),
        (None, None) => return Err(ApiError::bad_request("Provide session_id or date")),
    };

    Ok(Json(state.ctx.attendance().summarize(&scope).await?))
}
