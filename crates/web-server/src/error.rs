use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use services::ServiceError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Service(#[from] ServiceError),
    /// The body could not be decoded under its declared content type.
    #[error("Malformed request body: {0}")]
    BadRequest(String),
}

/// Converts our custom `AppError` into an HTTP response.
///
/// Validation failures are a bare array of `{field: message}` objects;
/// everything else is `{"detail": message}`.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Service(ServiceError::Validation(errors)) => {
                return (StatusCode::UNPROCESSABLE_ENTITY, Json(errors)).into_response();
            }
            AppError::Service(ServiceError::NotFound(message)) => (StatusCode::NOT_FOUND, message),
            AppError::Service(ServiceError::Conflict(message)) => (StatusCode::CONFLICT, message),
            AppError::Service(ServiceError::BusinessRule(message)) => {
                (StatusCode::BAD_REQUEST, message)
            }
            AppError::Service(ServiceError::Internal(message)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, message)
            }
            AppError::BadRequest(message) => {
                tracing::debug!(%message, "Rejected request body.");
                (StatusCode::BAD_REQUEST, message)
            }
        };

        (status, Json(json!({ "detail": message }))).into_response()
    }
}
