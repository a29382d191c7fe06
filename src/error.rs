use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::validation::FieldErrors;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("resource not found")]
    NotFound,
    #[error("validation failed: {0:?}")]
    Validation(FieldErrors),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("unsupported media type: {0}")]
    UnsupportedMediaType(String),
    #[error("database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

#[derive(Serialize)]
struct DetailResponse {
    detail: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound => StatusCode::NOT_FOUND.into_response(),
            ApiError::Validation(errors) => (StatusCode::BAD_REQUEST, Json(errors)).into_response(),
            ApiError::BadRequest(detail) => {
                (StatusCode::BAD_REQUEST, Json(DetailResponse { detail })).into_response()
            }
            ApiError::UnsupportedMediaType(detail) => {
                (StatusCode::UNSUPPORTED_MEDIA_TYPE, Json(DetailResponse { detail })).into_response()
            }
            ApiError::DatabaseError(err) => {
                tracing::error!("Database error: {}", err);

                let status = StatusCode::INTERNAL_SERVER_ERROR;
                let body = Json(ErrorResponse {
                    error: status.to_string(),
                    message: "Database error".to_string(),
                });

                (status, body).into_response()
            }
        }
    }
}

impl From<FieldErrors> for ApiError {
    fn from(errors: FieldErrors) -> Self {
        ApiError::Validation(errors)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::MissingJsonContentType(_) => ApiError::UnsupportedMediaType(
                "Unsupported media type in request; expected application/json.".to_string(),
            ),
            other => ApiError::BadRequest(format!("JSON parse error - {}", other.body_text())),
        }
    }
}
