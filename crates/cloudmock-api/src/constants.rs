//! API-wide constants

/// Upload endpoint; `{account_name}` is opaque and not validated.
pub const UPLOAD_ROUTE: &str = "/v1_1/{account_name}/image/upload";

pub const HEALTH_ROUTE: &str = "/health";
pub const READINESS_ROUTE: &str = "/health/ready";

/// Request body allowance on top of the file ceiling for multipart boundaries,
/// part headers and small text fields.
pub const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub const REQUEST_ID_HEADER: &str = "X-Request-ID";
