//! HTTP error response conversion
//!
//! **Preferred handler pattern:** Return `Result<impl IntoResponse, HttpAppError>`.
//! Use `AppError` (or types that implement `Into<AppError>`) for errors and `?`
//! so they become `HttpAppError` and render consistently (status, body, logging).

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use ideaport_core::{AppError, ErrorMetadata, LogLevel};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Machine-readable error code for programmatic handling
    pub code: String,
}

/// Wrapper type for AppError to implement IntoResponse. Necessary because of
/// Rust's orphan rules: we can't implement IntoResponse (external trait) for
/// AppError (type from ideaport-core).
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        })
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let err = self.0;
        let status =
            StatusCode::from_u16(err.http_status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        match err.log_level() {
            LogLevel::Debug => tracing::debug!(code = err.error_code(), error = %err, "Request failed"),
            LogLevel::Warn => tracing::warn!(code = err.error_code(), error = %err, "Request failed"),
            LogLevel::Error => {
                tracing::error!(code = err.error_code(), error = %err.detailed_message(), "Request failed")
            }
        }

        // Sensitive variants never leak internal detail to clients.
        let details = if err.is_sensitive() {
            None
        } else {
            Some(err.to_string())
        };

        let body = ErrorResponse {
            error: err.client_message(),
            details,
            code: err.error_code().to_string(),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_maps_to_409() {
        let response =
            HttpAppError(AppError::Conflict("only draft ideas can be submitted".into()))
                .into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn database_error_maps_to_500() {
        let response = HttpAppError(AppError::Database(sqlx::Error::PoolClosed)).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn payload_too_large_maps_to_413() {
        let response =
            HttpAppError(AppError::PayloadTooLarge("too big".into())).into_response();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
