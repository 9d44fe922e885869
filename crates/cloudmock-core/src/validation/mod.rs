//! Upload validation rules
//!
//! The validator decides accept/reject for an incoming file part before any byte
//! is committed to storage. The byte ceiling cannot be checked up front for a
//! streamed part, so `max_bytes()` is handed to the persister, which aborts as
//! soon as the ceiling is crossed.

use crate::error::AppError;

/// Upload validator
#[derive(Debug, Clone)]
pub struct UploadValidator {
    max_bytes: u64,
    allowed_content_types: Vec<String>,
}

impl UploadValidator {
    pub fn new(max_bytes: u64, allowed_content_types: Vec<String>) -> Self {
        Self {
            max_bytes,
            allowed_content_types: allowed_content_types
                .into_iter()
                .map(|ct| ct.trim().to_lowercase())
                .collect(),
        }
    }

    pub fn from_config(config: &crate::Config) -> Self {
        Self::new(
            config.max_file_size_bytes(),
            config.allowed_content_types().to_vec(),
        )
    }

    /// Size ceiling in bytes.
    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    pub fn allowed_content_types(&self) -> &[String] {
        &self.allowed_content_types
    }

    /// Exactly one file part must be present under the expected field.
    pub fn check_part_count(&self, parts: usize) -> Result<(), AppError> {
        match parts {
            1 => Ok(()),
            0 => Err(AppError::NoFileUploaded("no file part present".to_string())),
            n => Err(AppError::NoFileUploaded(format!(
                "{} file parts present, exactly one is accepted",
                n
            ))),
        }
    }

    /// Validate the declared media type against the allow-list.
    /// Parameters (`; charset=...`) are ignored and the comparison is case-insensitive.
    pub fn validate_media_type(&self, declared: Option<&str>) -> Result<(), AppError> {
        let declared = declared.unwrap_or("application/octet-stream");
        let normalized = normalize_mime_type(declared).to_lowercase();

        if !self.allowed_content_types.iter().any(|ct| *ct == normalized) {
            return Err(AppError::UnsupportedMediaType {
                content_type: declared.to_string(),
                allowed: self.allowed_content_types.clone(),
            });
        }

        Ok(())
    }

    /// Validate a byte count against the ceiling.
    pub fn validate_size(&self, size: u64) -> Result<(), AppError> {
        if size > self.max_bytes {
            return Err(AppError::PayloadTooLarge {
                max: self.max_bytes,
            });
        }
        Ok(())
    }
}

/// Normalize MIME type by stripping parameters (e.g. "image/jpeg; q=1" -> "image/jpeg").
fn normalize_mime_type(content_type: &str) -> &str {
    content_type
        .split(';')
        .next()
        .map(|s| s.trim())
        .unwrap_or(content_type)
}
