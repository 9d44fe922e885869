//! Upload service
//!
//! Pipeline: identify the file part → validate its media type → stream it to
//! storage under a generated name → build the provider-shaped response.
//! The size ceiling is enforced by the persister while bytes arrive, so an
//! oversized upload is aborted without ever being buffered or published.

use std::sync::Arc;

use axum::extract::multipart::{Field, MultipartError};
use axum::extract::Multipart;
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use cloudmock_core::{AppError, StoredFile, UploadResult};
use cloudmock_storage::{Storage, StorageError, StoreRequest};
use futures::TryStreamExt;

use crate::state::AppState;

/// A file that made it to storage during the current request.
///
/// Until [`AcceptedFile::keep`] is called the file belongs to nobody, so dropping
/// the guard (a cancelled request) schedules its deletion.
struct AcceptedFile {
    file: Option<StoredFile>,
    accepted_at: DateTime<Utc>,
    storage: Arc<dyn Storage>,
}

impl AcceptedFile {
    fn new(file: StoredFile, accepted_at: DateTime<Utc>, storage: Arc<dyn Storage>) -> Self {
        Self {
            file: Some(file),
            accepted_at,
            storage,
        }
    }

    /// Hand the file over to the response; it is no longer cleaned up.
    fn keep(mut self) -> Option<StoredFile> {
        self.file.take()
    }

    /// Delete the file now, waiting for the removal to finish.
    async fn discard(mut self) {
        if let Some(file) = self.file.take() {
            remove_stored(self.storage.as_ref(), &file).await;
        }
    }
}

impl Drop for AcceptedFile {
    fn drop(&mut self) {
        let Some(file) = self.file.take() else {
            return;
        };
        tracing::warn!(
            storage_key = %file.storage_key(),
            "Upload abandoned after the file was stored, removing it"
        );
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let storage = self.storage.clone();
                handle.spawn(async move { remove_stored(storage.as_ref(), &file).await });
            }
            Err(_) => tracing::error!(
                storage_key = %file.storage_key(),
                "No runtime available to remove an abandoned upload"
            ),
        }
    }
}

async fn remove_stored(storage: &dyn Storage, file: &StoredFile) {
    if let Err(e) = storage.delete(file.storage_key()).await {
        tracing::error!(
            error = %e,
            storage_key = %file.storage_key(),
            "Failed to remove stored file of a rejected upload"
        );
    }
}

pub struct UploadService {
    state: Arc<AppState>,
}

impl UploadService {
    pub fn new(state: &Arc<AppState>) -> Self {
        Self {
            state: state.clone(),
        }
    }

    /// Accept a multipart upload and return the stored file's metadata.
    ///
    /// Exactly one file part under the configured field name is accepted. When the
    /// request fails or is cancelled after a file has been stored, that file is
    /// deleted again.
    pub async fn accept(&self, mut multipart: Multipart) -> Result<UploadResult, AppError> {
        let mut accepted: Option<AcceptedFile> = None;

        let outcome = self
            .receive_parts(&mut multipart, &mut accepted)
            .await
            .and_then(|file_parts| self.state.validator.check_part_count(file_parts));

        match (outcome, accepted) {
            (Ok(()), Some(upload)) => {
                let accepted_at = upload.accepted_at;
                let file = upload.keep().ok_or_else(|| {
                    AppError::Internal("accepted upload has no stored file".to_string())
                })?;
                let result = UploadResult::from_stored(
                    &file,
                    self.state.config.public_base_url(),
                    accepted_at,
                );
                tracing::info!(
                    public_id = %result.public_id,
                    format = %result.format,
                    bytes = result.bytes,
                    "Image upload accepted"
                );
                Ok(result)
            }
            (Ok(()), None) => Err(AppError::NoFileUploaded(
                "file part was not stored".to_string(),
            )),
            (Err(err), Some(upload)) => {
                upload.discard().await;
                Err(err)
            }
            (Err(err), None) => Err(err),
        }
    }

    /// Walk the multipart body, storing the first file part and counting file parts.
    ///
    /// Reading stops at the second file part; the count alone rejects the request.
    async fn receive_parts(
        &self,
        multipart: &mut Multipart,
        accepted: &mut Option<AcceptedFile>,
    ) -> Result<usize, AppError> {
        let max_bytes = self.state.validator.max_bytes();
        let mut file_parts = 0;

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| multipart_error(e, max_bytes))?
        {
            if !self.is_file_part(&field) {
                tracing::debug!(field = ?field.name(), "Skipping non-file multipart field");
                drain(field, max_bytes).await?;
                continue;
            }

            file_parts += 1;
            if file_parts > 1 {
                break;
            }

            *accepted = Some(self.store_part(field).await?);
        }

        Ok(file_parts)
    }

    fn is_file_part(&self, field: &Field<'_>) -> bool {
        field.name() == Some(self.state.config.field_name()) && field.file_name().is_some()
    }

    async fn store_part(&self, field: Field<'_>) -> Result<AcceptedFile, AppError> {
        // Rejected before a single byte reaches the storage root.
        self.state
            .validator
            .validate_media_type(field.content_type())?;

        let max_bytes = self.state.validator.max_bytes();
        let accepted_at = Utc::now();
        let request = StoreRequest {
            field_name: self.state.config.field_name().to_string(),
            original_name: field.file_name().unwrap_or_default().to_string(),
            accepted_at,
            max_bytes: Some(max_bytes),
        };

        tracing::debug!(
            original_name = %request.original_name,
            content_type = ?field.content_type(),
            "Streaming file part to storage"
        );

        let stream = field.map_err(move |e| stream_error(e, max_bytes));
        let file = self
            .state
            .storage
            .store_stream(request, Box::pin(stream))
            .await?;

        Ok(AcceptedFile::new(
            file,
            accepted_at,
            self.state.storage.clone(),
        ))
    }
}

/// Consume a field that is not the upload, still honouring the body ceiling.
async fn drain(mut field: Field<'_>, max_bytes: u64) -> Result<(), AppError> {
    while field
        .chunk()
        .await
        .map_err(|e| multipart_error(e, max_bytes))?
        .is_some()
    {}
    Ok(())
}

fn multipart_error(err: MultipartError, max_bytes: u64) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge { max: max_bytes }
    } else {
        AppError::InvalidInput(err.body_text())
    }
}

fn stream_error(err: MultipartError, max_bytes: u64) -> StorageError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        StorageError::SizeLimitExceeded { limit: max_bytes }
    } else {
        StorageError::SourceAborted(err.body_text())
    }
}
