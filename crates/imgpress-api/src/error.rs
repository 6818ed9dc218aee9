//! HTTP error response conversion
//!
//! Handlers return `Result<_, HttpAppError>`. Anything that converts into `AppError`
//! converts into `HttpAppError`, so every failure renders as the same
//! `{code, message}` body with the status its `ErrorMetadata` declares.

use axum::{
    extract::multipart::MultipartError,
    extract::multipart::MultipartRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use imgpress_core::{AppError, ErrorBody, ErrorMetadata, LogLevel};
use imgpress_processing::{PipelineError, ValidationError};
use imgpress_storage::StorageError;

/// Wrapper type for AppError to implement IntoResponse
/// This is necessary because of Rust's orphan rules - we can't implement
/// IntoResponse (external trait) for AppError (external type from imgpress-core)
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<ValidationError> for HttpAppError {
    fn from(err: ValidationError) -> Self {
        HttpAppError(err.into())
    }
}

impl From<PipelineError> for HttpAppError {
    fn from(err: PipelineError) -> Self {
        HttpAppError(err.into())
    }
}

impl From<StorageError> for HttpAppError {
    fn from(err: StorageError) -> Self {
        let app_error = match err {
            StorageError::NotFound(path) => AppError::SourceUnavailable(path),
            other => AppError::Internal(other.to_string()),
        };
        HttpAppError(app_error)
    }
}

impl From<MultipartError> for HttpAppError {
    fn from(err: MultipartError) -> Self {
        let app_error = if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge("Uploaded file exceeds the size limit".to_string())
        } else {
            AppError::Validation(format!("Malformed multipart body: {}", err.body_text()))
        };
        HttpAppError(app_error)
    }
}

impl From<MultipartRejection> for HttpAppError {
    fn from(rejection: MultipartRejection) -> Self {
        HttpAppError(AppError::Validation(format!(
            "Invalid multipart request: {}",
            rejection.body_text()
        )))
    }
}

/// Log the full error. Sensitive errors carry details the client never sees, so their
/// whole source chain goes to the log.
fn log_error(error: &AppError) {
    let error_type = error.error_type();
    let code = error.error_code();
    let status = error.http_status_code();
    let recoverable = error.is_recoverable();
    let details = if error.is_sensitive() {
        error.detailed_message()
    } else {
        error.to_string()
    };
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %details, error_type, code, status, "Request failed");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %details, error_type, code, status, recoverable, "Request failed");
        }
        LogLevel::Error => {
            tracing::error!(
                error = %details,
                error_type,
                code,
                status,
                recoverable,
                "Request failed"
            );
        }
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        let body = ErrorBody {
            code: status.as_u16(),
            message: app_error.client_message(),
        };

        (status, Json(body)).into_response()
    }
}
