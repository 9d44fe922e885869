//! Application state shared by all handlers.

use cloudmock_core::{Config, UploadValidator};
use cloudmock_storage::Storage;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub storage: Arc<dyn Storage>,
    pub validator: UploadValidator,
}

impl AppState {
    pub fn new(config: Config, storage: Arc<dyn Storage>) -> Self {
        let validator = UploadValidator::from_config(&config);
        Self {
            config,
            storage,
            validator,
        }
    }
}
