use crate::naming::{file_extension, generate_name, RandomSuffix, SuffixSource};
use crate::traits::{ByteStream, Storage, StorageError, StorageResult, StoreRequest};
use async_trait::async_trait;
use cloudmock_core::StoredFile;
use futures::StreamExt;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tempfile::{NamedTempFile, PersistError};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Generated names drawn per upload before giving up on a collision.
const NAME_ATTEMPTS: usize = 2;

/// Subdirectory of the storage root that holds uploads still being received.
pub const STAGING_DIR: &str = ".incoming";
const STAGING_PREFIX: &str = ".incoming-";
const STAGING_SUFFIX: &str = ".part";

/// Mode of published files, readable by a file server running as another user.
#[cfg(unix)]
const PUBLISHED_MODE: u32 = 0o644;

/// Local filesystem storage implementation
#[derive(Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
    suffixes: Arc<dyn SuffixSource>,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// The storage root (and any missing parents) is created if absent.
    ///
    /// # Arguments
    /// * `base_path` - Root directory for file storage (e.g., "./uploads")
    pub async fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        Self::with_suffix_source(base_path, Arc::new(RandomSuffix)).await
    }

    /// Create a LocalStorage drawing name suffixes from `suffixes`.
    pub async fn with_suffix_source(
        base_path: impl Into<PathBuf>,
        suffixes: Arc<dyn SuffixSource>,
    ) -> StorageResult<Self> {
        let base_path = base_path.into();
        let staging_dir = base_path.join(STAGING_DIR);

        fs::create_dir_all(&staging_dir).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                staging_dir.display(),
                e
            ))
        })?;

        let storage = LocalStorage {
            base_path,
            suffixes,
        };
        storage.sweep_staging().await?;
        Ok(storage)
    }

    fn staging_dir(&self) -> PathBuf {
        self.base_path.join(STAGING_DIR)
    }

    /// Remove staging files left behind by a process that died mid-upload.
    async fn sweep_staging(&self) -> StorageResult<()> {
        let staging_dir = self.staging_dir();
        let mut entries = fs::read_dir(&staging_dir).await?;
        let mut swept = 0usize;

        while let Some(entry) = entries.next_entry().await? {
            let stale = entry
                .file_name()
                .to_str()
                .is_some_and(|name| name.starts_with(STAGING_PREFIX));
            if !stale {
                continue;
            }
            match fs::remove_file(entry.path()).await {
                Ok(()) => swept += 1,
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }

        if swept > 0 {
            tracing::info!(
                staging_dir = %staging_dir.display(),
                swept,
                "Removed stale staging files"
            );
        }
        Ok(())
    }

    /// Convert storage key to filesystem path.
    ///
    /// Keys are single file names directly below the storage root.
    fn key_to_path(&self, storage_key: &str) -> StorageResult<PathBuf> {
        let mut components = Path::new(storage_key).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Ok(self.base_path.join(storage_key)),
            _ => Err(StorageError::InvalidKey(format!(
                "Storage key '{}' must be a single file name",
                storage_key
            ))),
        }
    }

    /// Create an anonymous staging file in the staging directory.
    ///
    /// It lives on the same filesystem as its final destination so publishing is a
    /// link, and it is removed when dropped unless published.
    async fn create_staging_file(&self) -> StorageResult<(NamedTempFile, fs::File)> {
        let dir = self.staging_dir();
        let (staging, handle) = tokio::task::spawn_blocking(move || {
            let staging = tempfile::Builder::new()
                .prefix(STAGING_PREFIX)
                .suffix(STAGING_SUFFIX)
                .tempfile_in(&dir)?;
            let handle = staging.as_file().try_clone()?;
            Ok::<_, std::io::Error>((staging, handle))
        })
        .await
        .map_err(|e| StorageError::UploadFailed(format!("Staging task failed: {}", e)))?
        .map_err(|e| {
            StorageError::UploadFailed(format!(
                "Failed to create staging file in {}: {}",
                self.base_path.display(),
                e
            ))
        })?;

        Ok((staging, fs::File::from_std(handle)))
    }

    /// Publish a fully written staging file under a fresh generated name without
    /// ever replacing an existing file.
    async fn publish(
        &self,
        mut staging: NamedTempFile,
        request: &StoreRequest,
        extension: &str,
    ) -> StorageResult<(String, PathBuf)> {
        let accepted_at_ms = request.accepted_at.timestamp_millis();
        let mut last_name = String::new();

        for attempt in 1..=NAME_ATTEMPTS {
            let name = generate_name(
                &request.field_name,
                accepted_at_ms,
                self.suffixes.next_suffix(),
                extension,
            );
            let path = self.key_to_path(&name)?;

            let target = path.clone();
            let outcome = tokio::task::spawn_blocking(move || staging.persist_noclobber(&target))
                .await
                .map_err(|e| StorageError::UploadFailed(format!("Publish task failed: {}", e)))?;

            match outcome {
                Ok(_) => return Ok((name, path)),
                Err(PersistError { error, file }) if error.kind() == ErrorKind::AlreadyExists => {
                    tracing::warn!(
                        generated_name = %name,
                        attempt,
                        "Generated name already taken, drawing a new one"
                    );
                    staging = file;
                    last_name = name;
                }
                Err(PersistError { error, .. }) => {
                    return Err(StorageError::UploadFailed(format!(
                        "Failed to publish {}: {}",
                        path.display(),
                        error
                    )));
                }
            }
        }

        Err(StorageError::NameCollision(last_name))
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn store_stream(
        &self,
        request: StoreRequest,
        mut stream: ByteStream<'_>,
    ) -> StorageResult<StoredFile> {
        let start = std::time::Instant::now();
        let extension = file_extension(&request.original_name).to_string();

        // From here on every early return drops `staging`, which deletes the partial file.
        let (staging, mut file) = self.create_staging_file().await?;
        let mut written: u64 = 0;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            written += chunk.len() as u64;

            if let Some(limit) = request.max_bytes {
                if written > limit {
                    tracing::warn!(
                        original_name = %request.original_name,
                        received_bytes = written,
                        limit,
                        "Upload exceeded size limit, discarding partial file"
                    );
                    return Err(StorageError::SizeLimitExceeded { limit });
                }
            }

            file.write_all(&chunk).await.map_err(|e| {
                StorageError::UploadFailed(format!(
                    "Failed to write file {}: {}",
                    staging.path().display(),
                    e
                ))
            })?;
        }

        file.flush().await?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(std::fs::Permissions::from_mode(PUBLISHED_MODE))
                .await?;
        }
        file.sync_all().await.map_err(|e| {
            StorageError::UploadFailed(format!(
                "Failed to sync file {}: {}",
                staging.path().display(),
                e
            ))
        })?;
        drop(file);

        let (generated_name, absolute_path) = self.publish(staging, &request, &extension).await?;

        tracing::info!(
            path = %absolute_path.display(),
            generated_name = %generated_name,
            size_bytes = written,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage stream upload successful"
        );

        Ok(StoredFile {
            generated_name,
            extension,
            absolute_path,
            byte_size: written,
        })
    }

    async fn exists(&self, storage_key: &str) -> StorageResult<bool> {
        let path = self.key_to_path(storage_key)?;
        Ok(fs::try_exists(&path).await?)
    }

    async fn delete(&self, storage_key: &str) -> StorageResult<()> {
        let path = self.key_to_path(storage_key)?;

        match fs::remove_file(&path).await {
            Ok(()) => {
                tracing::info!(
                    path = %path.display(),
                    key = %storage_key,
                    "Local storage delete successful"
                );
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::DeleteFailed(format!(
                "Failed to delete file {}: {}",
                path.display(),
                e
            ))),
        }
    }

    fn storage_root(&self) -> &Path {
        &self.base_path
    }
}
