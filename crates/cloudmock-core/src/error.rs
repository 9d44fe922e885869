//! Error types module
//!
//! All failures of the upload pipeline are unified under `AppError`. Each variant
//! self-describes its HTTP status, client-facing message and log level through
//! `ErrorMetadata`, so the HTTP layer only has to render it.

use std::io;

use crate::constants::{
    MSG_FILE_TOO_LARGE, MSG_NO_FILE, MSG_UNSUPPORTED_MEDIA_TYPE, MSG_UPLOAD_FAILED,
};

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for client behaviour worth noticing (oversized uploads, aborted streams)
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "PAYLOAD_TOO_LARGE")
    fn error_code(&self) -> &'static str;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details must stay server-side
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Zero (or more than one) file part under the expected field.
    #[error("No file uploaded: {0}")]
    NoFileUploaded(String),

    #[error("Unsupported media type '{content_type}' (allowed: {allowed:?})")]
    UnsupportedMediaType {
        content_type: String,
        allowed: Vec<String>,
    },

    #[error("File too large: exceeds {max} bytes")]
    PayloadTooLarge { max: u64 },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Storage error: {0}")]
    Storage(String),

    /// A generated name was already taken in the storage root.
    #[error("Name collision: {0}")]
    NameCollision(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Storage(format!("IO error: {}", err))
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(format!("{:#}", err))
    }
}

/// Static metadata for each variant: (http_status, error_code, sensitive, log_level).
fn app_error_static_metadata(err: &AppError) -> (u16, &'static str, bool, LogLevel) {
    match err {
        AppError::NoFileUploaded(_) => (400, "NO_FILE_UPLOADED", false, LogLevel::Debug),
        AppError::UnsupportedMediaType { .. } => {
            (415, "UNSUPPORTED_MEDIA_TYPE", false, LogLevel::Debug)
        }
        AppError::PayloadTooLarge { .. } => (413, "PAYLOAD_TOO_LARGE", false, LogLevel::Warn),
        AppError::InvalidInput(_) => (400, "INVALID_INPUT", false, LogLevel::Warn),
        AppError::Storage(_) => (500, "STORAGE_ERROR", true, LogLevel::Error),
        AppError::NameCollision(_) => (500, "NAME_COLLISION", true, LogLevel::Error),
        AppError::Internal(_) => (500, "INTERNAL_ERROR", true, LogLevel::Error),
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn client_message(&self) -> String {
        match self {
            AppError::NoFileUploaded(_) => MSG_NO_FILE.to_string(),
            AppError::UnsupportedMediaType { .. } => MSG_UNSUPPORTED_MEDIA_TYPE.to_string(),
            AppError::PayloadTooLarge { .. } => MSG_FILE_TOO_LARGE.to_string(),
            AppError::InvalidInput(msg) => msg.clone(),
            AppError::Storage(_) | AppError::NameCollision(_) | AppError::Internal(_) => {
                MSG_UPLOAD_FAILED.to_string()
            }
        }
    }

    fn is_sensitive(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).3
    }
}

impl AppError {
    /// Get the error type name for logging
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::NoFileUploaded(_) => "NoFileUploaded",
            AppError::UnsupportedMediaType { .. } => "UnsupportedMediaType",
            AppError::PayloadTooLarge { .. } => "PayloadTooLarge",
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::Storage(_) => "Storage",
            AppError::NameCollision(_) => "NameCollision",
            AppError::Internal(_) => "Internal",
        }
    }

    /// Client input errors are recoverable by resubmitting; server-side ones are not.
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.http_status_code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_file_metadata() {
        let err = AppError::NoFileUploaded("zero file parts".to_string());
        assert_eq!(err.http_status_code(), 400);
        assert_eq!(err.client_message(), "No file uploaded");
        assert!(err.is_client_error());
        assert!(!err.is_sensitive());
    }

    #[test]
    fn test_validation_errors_are_distinct() {
        let media = AppError::UnsupportedMediaType {
            content_type: "application/pdf".to_string(),
            allowed: vec!["image/png".to_string()],
        };
        let size = AppError::PayloadTooLarge { max: 1024 };

        assert_eq!(media.http_status_code(), 415);
        assert_eq!(size.http_status_code(), 413);
        assert_ne!(media.error_code(), size.error_code());
        assert_eq!(media.client_message(), "Only JPEG and PNG files are allowed!");
        assert_eq!(size.client_message(), "File too large");
    }

    #[test]
    fn test_storage_errors_hide_details() {
        let err = AppError::Storage("disk full at /var/uploads".to_string());
        assert_eq!(err.http_status_code(), 500);
        assert_eq!(err.client_message(), "Upload failed");
        assert!(err.is_sensitive());
        assert_eq!(err.log_level(), LogLevel::Error);
        assert!(!err.is_client_error());
    }

    #[test]
    fn test_name_collision_is_server_side() {
        let err = AppError::NameCollision("file-1-2.png".to_string());
        assert_eq!(err.http_status_code(), 500);
        assert_eq!(err.client_message(), "Upload failed");
    }

    #[test]
    fn test_io_error_maps_to_storage() {
        let err: AppError = io::Error::new(io::ErrorKind::PermissionDenied, "denied").into();
        assert!(matches!(err, AppError::Storage(_)));
    }
}
