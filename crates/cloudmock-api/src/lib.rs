//! Cloudmock API Library
//!
//! This crate provides the HTTP surface of the image-hosting stand-in: the upload
//! handler, middleware, and application setup.

// Module declarations
mod handlers;
mod middleware;
mod services;
mod telemetry;

// Public modules
pub mod constants;
pub mod error;
pub mod setup;
pub mod state;

// Re-exports
pub use error::{ErrorResponse, HttpAppError};
pub use state::AppState;
