//! Storage setup and initialization

use anyhow::{Context, Result};
use cloudmock_core::Config;
use cloudmock_storage::{create_storage, Storage};
use std::sync::Arc;

/// Create the storage root if needed and return the backend.
pub async fn setup_storage(config: &Config) -> Result<Arc<dyn Storage>> {
    tracing::info!(upload_dir = %config.upload_dir().display(), "Initializing storage...");
    let storage = create_storage(config).await.with_context(|| {
        format!(
            "Failed to initialize storage root {}",
            config.upload_dir().display()
        )
    })?;
    tracing::info!(
        storage_root = %storage.storage_root().display(),
        "Storage initialized successfully"
    );
    Ok(storage)
}
