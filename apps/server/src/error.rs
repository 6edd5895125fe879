use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use septic_core::errors::{DatabaseError, Error as CoreError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Core(#[from] CoreError),
    #[error("Not Found")]
    NotFound,
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    PayloadTooLarge(String),
    #[error("{0}")]
    Internal(String),
    #[error("{0}")]
    Anyhow(#[from] anyhow::Error),
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    code: u16,
    message: String,
}

/// SQLite reports `UNIQUE constraint failed: permits.permit_number`; clients
/// get `permit_number already exists`.
fn unique_violation_message(detail: &str) -> String {
    let field = detail
        .rsplit(':')
        .next()
        .and_then(|cols| cols.split(',').next())
        .map(|col| col.trim().rsplit('.').next().unwrap_or(col).trim())
        .filter(|f| !f.is_empty())
        .unwrap_or("value");
    format!("{} already exists", field)
}

fn core_status(err: &CoreError) -> (StatusCode, String) {
    match err {
        CoreError::Validation(_) | CoreError::InvalidTransition(_) => {
            (StatusCode::BAD_REQUEST, err.to_string())
        }
        CoreError::NotFound(_) | CoreError::Database(DatabaseError::NotFound(_)) => {
            (StatusCode::NOT_FOUND, err.to_string())
        }
        CoreError::ConstraintViolation(_) => (StatusCode::CONFLICT, err.to_string()),
        CoreError::Database(DatabaseError::UniqueViolation(detail)) => {
            (StatusCode::BAD_REQUEST, unique_violation_message(detail))
        }
        CoreError::Database(DatabaseError::ForeignKeyViolation(_)) => (
            StatusCode::BAD_REQUEST,
            "Referenced record does not exist or is still in use".to_string(),
        ),
        CoreError::Document(_) => (StatusCode::BAD_REQUEST, err.to_string()),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, msg) = match &self {
            ApiError::Core(e) => core_status(e),
            ApiError::NotFound => (StatusCode::NOT_FOUND, self.to_string()),
            ApiError::BadRequest(reason) => (StatusCode::BAD_REQUEST, reason.clone()),
            ApiError::Unauthorized(reason) => (StatusCode::UNAUTHORIZED, reason.clone()),
            ApiError::Forbidden(reason) => (StatusCode::FORBIDDEN, reason.clone()),
            ApiError::PayloadTooLarge(reason) => (StatusCode::PAYLOAD_TOO_LARGE, reason.clone()),
            ApiError::Internal(reason) => (StatusCode::INTERNAL_SERVER_ERROR, reason.clone()),
            ApiError::Anyhow(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
        };

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self, "request failed");
        } else {
            tracing::warn!(status = status.as_u16(), error = %msg, "request rejected");
        }

        let body = Json(ErrorBody {
            error: status.canonical_reason().unwrap_or("Error"),
            code: status.as_u16(),
            message: msg,
        });
        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
