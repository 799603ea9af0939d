// rest/error.rs — central error-to-response mapping.
//
// Every failure raised by the layers above converges here: validation
// failures become 400 with the itemized field list, missing tasks 404,
// credential problems 401, and anything unrecognized 500 with a generic
// message (full detail is logged server-side only).

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

use crate::tasks::schema::FieldError;
use crate::tasks::TaskError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("validation failed")]
    Validation(Vec<FieldError>),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<TaskError> for ApiError {
    fn from(err: TaskError) -> Self {
        match err {
            // Keep the service's message ("Task with ID ... not found").
            not_found @ TaskError::NotFound(_) => ApiError::NotFound(not_found.to_string()),
            TaskError::Store(err) => ApiError::Internal(err),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(details) => (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "Validation Error",
                    "details": details,
                    "statusCode": 400,
                })),
            )
                .into_response(),
            ApiError::NotFound(message) => (
                StatusCode::NOT_FOUND,
                Json(json!({
                    "error": "NotFoundError",
                    "message": message,
                    "statusCode": 404,
                })),
            )
                .into_response(),
            ApiError::Unauthorized(message) => (
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "error": "UnauthorizedError",
                    "message": message,
                    "statusCode": 401,
                })),
            )
                .into_response(),
            ApiError::Internal(err) => {
                // Never leak internal detail to the client.
                error!("internal error: {err:#}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "error": "Internal Server Error",
                        "message": "Something went wrong",
                        "statusCode": 500,
                    })),
                )
                    .into_response()
            }
        }
    }
}
