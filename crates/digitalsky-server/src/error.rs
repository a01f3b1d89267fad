use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use digitalsky_core::error::AppError;

use crate::dto::ErrorResponse;

/// Wrapper so we can implement `IntoResponse` for `AppError`.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl ApiError {
    pub fn status_and_kind(&self) -> (StatusCode, &'static str) {
        match &self.0 {
            AppError::ApplicationNotFound(_) | AppError::StorageFileNotFound(_) => {
                (StatusCode::NOT_FOUND, "not_found")
            }
            AppError::NotEditable(_) => (StatusCode::UNPROCESSABLE_ENTITY, "not_editable"),
            AppError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "unauthorized"),
            AppError::Forbidden(_) => (StatusCode::FORBIDDEN, "forbidden"),
            AppError::StorageError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "storage_error"),
            AppError::IoError(_) => (StatusCode::UNPROCESSABLE_ENTITY, "io_error"),
            AppError::MalformedPayload(_) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "malformed_payload")
            }
            AppError::ValidationError(_) => (StatusCode::BAD_REQUEST, "validation_error"),
            AppError::DatabaseError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "database_error"),
            AppError::ConfigError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "config_error"),
            AppError::SerializationError(_) | AppError::Generic(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type) = self.status_and_kind();
        if self.0.is_not_found() {
            tracing::debug!(error = %self.0, "Resource not found");
        } else if self.0.is_client_error() {
            tracing::warn!(error = %self.0, "Request rejected");
        } else {
            tracing::error!(error = %self.0, "Request failed");
        }

        let body = ErrorResponse {
            error: error_type.to_string(),
            message: self.0.to_string(),
        };

        (status, axum::Json(body)).into_response()
    }
}
