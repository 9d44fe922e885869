//! HTTP error response conversion
//!
//! This module renders `AppError` as an HTTP response.
//!
//! **Handler pattern:** Return `Result<impl IntoResponse, HttpAppError>` and let `?`
//! convert `AppError` (or anything that converts into it) so every failure renders
//! the same `{"error": "..."}` body and is logged at the level the error declares.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use cloudmock_core::{AppError, ErrorMetadata, LogLevel};
use cloudmock_storage::StorageError;
use serde::{Deserialize, Serialize};

/// Error body of the emulated provider.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error: String,
}

/// Wrapper type for AppError to implement IntoResponse
/// This is necessary because of Rust's orphan rules - we can't implement
/// IntoResponse (external trait) for AppError (external type from cloudmock-core)
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<StorageError> for HttpAppError {
    fn from(err: StorageError) -> Self {
        HttpAppError(err.into())
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(err.into())
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    let error_code = error.error_code();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type, error_code, "Upload rejected");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type, error_code, "Upload rejected");
        }
        LogLevel::Error => {
            tracing::error!(error = %error, error_type, error_code, "Upload failed");
        }
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        // Sensitive errors only ever expose their generic client message.
        let body = Json(ErrorResponse {
            error: app_error.client_message(),
        });

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn render(err: impl Into<HttpAppError>) -> (StatusCode, serde_json::Value) {
        let response = err.into().into_response();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_no_file_body() {
        let (status, body) = render(AppError::NoFileUploaded("none".to_string())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, serde_json::json!({ "error": "No file uploaded" }));
    }

    #[tokio::test]
    async fn test_storage_error_details_not_leaked() {
        let (status, body) = render(StorageError::UploadFailed(
            "Failed to write file /srv/uploads/.incoming-x.part: No space left on device"
                .to_string(),
        ))
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, serde_json::json!({ "error": "Upload failed" }));
    }

    #[tokio::test]
    async fn test_size_limit_status() {
        let (status, body) = render(StorageError::SizeLimitExceeded { limit: 1 }).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body["error"], "File too large");
    }

    #[tokio::test]
    async fn test_unsupported_media_type_status() {
        let (status, body) = render(AppError::UnsupportedMediaType {
            content_type: "application/pdf".to_string(),
            allowed: vec!["image/png".to_string()],
        })
        .await;
        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(body["error"], "Only JPEG and PNG files are allowed!");
    }

    #[tokio::test]
    async fn test_anyhow_is_internal() {
        let (status, body) = render(anyhow::anyhow!("boom")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Upload failed");
    }
}
