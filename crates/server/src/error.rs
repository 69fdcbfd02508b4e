//! HTTP error mapping

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use rollcall_attendance::{RosterFileError, ServiceError};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Service(#[from] ServiceError),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Service(err) => match err {
                ServiceError::InvalidInput(_) | ServiceError::Roster(_) => StatusCode::BAD_REQUEST,
                ServiceError::AlreadyRecorded(_) => StatusCode::CONFLICT,
                // A CSV error wrapping IO is the server's file, not the upload
                ServiceError::RosterFile(RosterFileError::Csv(e)) if e.is_io_error() => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
                ServiceError::RosterFile(RosterFileError::Csv(_)) => StatusCode::BAD_REQUEST,
                ServiceError::RosterFile(RosterFileError::Io(_))
                | ServiceError::StoreUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
            match self {
                ApiError::Service(ServiceError::StoreUnavailable(_)) => "Storage unavailable",
                _ => "Internal server error",
            }
            .to_string()
        } else {
            self.to_string()
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
