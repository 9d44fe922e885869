use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartRejection, Multipart, Path, State},
    Json,
};
use cloudmock_core::{AppError, UploadResult};

use crate::error::HttpAppError;
use crate::services::upload::UploadService;
use crate::state::AppState;

/// Upload image handler
///
/// Accepts a `multipart/form-data` body carrying one image under the configured
/// field and answers with the provider-shaped metadata of the stored file.
///
/// # Arguments
/// * `account_name` - Opaque account segment of the path, never validated
/// * `multipart` - Multipart form data containing the image file
///
/// # Errors
/// - `AppError::NoFileUploaded` - Not multipart, or not exactly one file part
/// - `AppError::UnsupportedMediaType` - Declared type outside the allow-list
/// - `AppError::PayloadTooLarge` - File exceeds the size ceiling
/// - `AppError::Storage` - Write failure
#[tracing::instrument(skip(state, multipart), fields(operation = "upload_image"))]
pub async fn upload_image(
    State(state): State<Arc<AppState>>,
    Path(account_name): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResult>, HttpAppError> {
    let multipart = multipart.map_err(|rejection| {
        AppError::NoFileUploaded(format!("request is not multipart: {}", rejection))
    })?;

    let result = UploadService::new(&state).accept(multipart).await?;

    Ok(Json(result))
}
