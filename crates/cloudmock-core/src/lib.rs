//! Cloudmock Core Library
//!
//! This crate provides the domain models, error types, configuration, and upload
//! validation rules shared by the storage and API crates.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod validation;

// Re-export commonly used types
pub use config::{Config, ServerConfig, UploadConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{StoredFile, UploadResult};
pub use validation::UploadValidator;
