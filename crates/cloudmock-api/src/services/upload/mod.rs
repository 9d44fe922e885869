//! Image upload pipeline: identify the file part, validate it, stream it to storage.

mod service;

pub use service::UploadService;
