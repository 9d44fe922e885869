//! Storage abstraction trait
//!
//! This module defines the Storage trait that storage backends implement.

use std::path::Path;
use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use cloudmock_core::{AppError, StoredFile};
use futures::Stream;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Upload exceeds size limit of {limit} bytes")]
    SizeLimitExceeded { limit: u64 },

    /// The byte source failed mid-stream (client disconnect, malformed body).
    #[error("Upload stream aborted: {0}")]
    SourceAborted(String),

    #[error("Generated name already in use: {0}")]
    NameCollision(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Chunked byte source consumed by [`Storage::store_stream`].
pub type ByteStream<'a> = Pin<Box<dyn Stream<Item = Result<Bytes, StorageError>> + Send + 'a>>;

/// Everything the persister needs to know about an accepted upload.
#[derive(Debug, Clone)]
pub struct StoreRequest {
    pub field_name: String,
    pub original_name: String,
    /// Acceptance time; its millisecond timestamp becomes part of the generated name.
    pub accepted_at: DateTime<Utc>,
    /// Abort and discard the upload once more than this many bytes have arrived.
    pub max_bytes: Option<u64>,
}

/// Storage abstraction trait
///
/// Handlers work against `Arc<dyn Storage>` so the backend can be swapped (tests
/// inject failing backends to exercise server-side error paths).
#[async_trait]
pub trait Storage: Send + Sync {
    /// Stream an upload to storage under a freshly generated, never-reused name.
    ///
    /// Either the whole stream is persisted and a [`StoredFile`] is returned, or an
    /// error is returned and nothing from this call remains in storage.
    async fn store_stream(
        &self,
        request: StoreRequest,
        stream: ByteStream<'_>,
    ) -> StorageResult<StoredFile>;

    /// Check if a file exists
    async fn exists(&self, storage_key: &str) -> StorageResult<bool>;

    /// Delete a file by its storage key. Deleting a missing file is not an error.
    async fn delete(&self, storage_key: &str) -> StorageResult<()>;

    /// Directory that stored files live under.
    fn storage_root(&self) -> &Path;
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::SizeLimitExceeded { limit } => AppError::PayloadTooLarge { max: limit },
            StorageError::SourceAborted(msg) => AppError::InvalidInput(msg),
            StorageError::NameCollision(name) => AppError::NameCollision(name),
            StorageError::InvalidKey(msg) => AppError::InvalidInput(msg),
            StorageError::UploadFailed(msg)
            | StorageError::DeleteFailed(msg)
            | StorageError::ConfigError(msg) => AppError::Storage(msg),
            StorageError::IoError(err) => AppError::Storage(format!("IO error: {}", err)),
        }
    }
}
