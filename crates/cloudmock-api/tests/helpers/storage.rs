//! Storage backends that fail on purpose.

use async_trait::async_trait;
use cloudmock_core::StoredFile;
use cloudmock_storage::{ByteStream, Storage, StorageError, StorageResult, StoreRequest};
use futures::StreamExt;
use std::path::{Path, PathBuf};

/// Consumes the upload and then reports a write failure.
pub struct FailingStorage {
    root: PathBuf,
}

impl FailingStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl Storage for FailingStorage {
    async fn store_stream(
        &self,
        _request: StoreRequest,
        mut stream: ByteStream<'_>,
    ) -> StorageResult<StoredFile> {
        while let Some(chunk) = stream.next().await {
            chunk?;
        }
        Err(StorageError::UploadFailed(
            "Failed to write file: No space left on device".to_string(),
        ))
    }

    async fn exists(&self, _storage_key: &str) -> StorageResult<bool> {
        Ok(false)
    }

    async fn delete(&self, _storage_key: &str) -> StorageResult<()> {
        Ok(())
    }

    fn storage_root(&self) -> &Path {
        &self.root
    }
}
