//! Domain models

pub mod stored_file;
pub mod upload;

pub use stored_file::StoredFile;
pub use upload::UploadResult;
