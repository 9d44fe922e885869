//! Fixed values of the emulated provider contract.

/// Placeholder dimensions reported for every upload; no image decoding happens.
pub const PLACEHOLDER_WIDTH: u32 = 800;
pub const PLACEHOLDER_HEIGHT: u32 = 600;

/// `resource_type` reported for every upload.
pub const RESOURCE_TYPE_IMAGE: &str = "image";

/// Inclusive upper bound of the random component of generated names.
pub const NAME_RANDOM_MAX: u32 = 999_999_999;

pub const DEFAULT_FIELD_NAME: &str = "file";
pub const DEFAULT_MAX_FILE_SIZE_BYTES: u64 = 1024 * 1024;
pub const DEFAULT_ALLOWED_CONTENT_TYPES: &str = "image/jpeg,image/png,image/jpg";
pub const DEFAULT_UPLOAD_DIR: &str = "./uploads";
pub const DEFAULT_PUBLIC_BASE_URL: &str = "http://localhost:8080/uploads";
pub const DEFAULT_PORT: u16 = 8080;

/// Client-facing error messages.
pub const MSG_NO_FILE: &str = "No file uploaded";
pub const MSG_UNSUPPORTED_MEDIA_TYPE: &str = "Only JPEG and PNG files are allowed!";
pub const MSG_FILE_TOO_LARGE: &str = "File too large";
pub const MSG_UPLOAD_FAILED: &str = "Upload failed";
