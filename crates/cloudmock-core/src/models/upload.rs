//! Provider-shaped upload response.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};

use crate::constants::{PLACEHOLDER_HEIGHT, PLACEHOLDER_WIDTH, RESOURCE_TYPE_IMAGE};
use crate::models::StoredFile;

/// Response body of a successful upload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UploadResult {
    pub public_id: String,
    pub secure_url: String,
    pub url: String,
    pub width: u32,
    pub height: u32,
    pub format: String,
    pub resource_type: String,
    #[serde(serialize_with = "serialize_iso_millis")]
    pub created_at: DateTime<Utc>,
    pub bytes: u64,
}

impl UploadResult {
    /// Map a stored file to the response shape. No I/O.
    ///
    /// `public_id` keeps only the segment before the first `.` of the generated name,
    /// which clients of the emulated provider rely on.
    pub fn from_stored(stored: &StoredFile, base_url: &str, accepted_at: DateTime<Utc>) -> Self {
        let url = format!(
            "{}/{}",
            base_url.trim_end_matches('/'),
            stored.storage_key()
        );
        let public_id = stored
            .generated_name
            .split('.')
            .next()
            .unwrap_or_default()
            .to_string();

        UploadResult {
            public_id,
            secure_url: url.clone(),
            url,
            width: PLACEHOLDER_WIDTH,
            height: PLACEHOLDER_HEIGHT,
            format: stored.extension.clone(),
            resource_type: RESOURCE_TYPE_IMAGE.to_string(),
            created_at: accepted_at,
            bytes: stored.byte_size,
        }
    }
}

/// ISO-8601 with millisecond precision and a `Z` suffix, e.g. `2024-05-01T10:00:00.123Z`.
fn serialize_iso_millis<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::path::PathBuf;

    fn stored(name: &str, ext: &str, size: u64) -> StoredFile {
        StoredFile {
            generated_name: name.to_string(),
            extension: ext.to_string(),
            absolute_path: PathBuf::from("/srv/uploads").join(name),
            byte_size: size,
        }
    }

    fn accepted_at() -> DateTime<Utc> {
        Utc.timestamp_millis_opt(1_714_557_600_123).unwrap()
    }

    #[test]
    fn test_from_stored_png() {
        let file = stored("file-1714557600123-42.png", "png", 10240);
        let result = UploadResult::from_stored(&file, "http://localhost:8080/uploads", accepted_at());

        assert_eq!(result.public_id, "file-1714557600123-42");
        assert_eq!(
            result.secure_url,
            "http://localhost:8080/uploads/file-1714557600123-42.png"
        );
        assert_eq!(result.url, result.secure_url);
        assert_eq!(result.width, 800);
        assert_eq!(result.height, 600);
        assert_eq!(result.format, "png");
        assert_eq!(result.resource_type, "image");
        assert_eq!(result.bytes, 10240);
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let file = stored("file-1-2.jpg", "jpg", 1);
        let result = UploadResult::from_stored(&file, "http://localhost:8080/uploads/", accepted_at());
        assert_eq!(result.url, "http://localhost:8080/uploads/file-1-2.jpg");
    }

    #[test]
    fn test_public_id_keeps_first_segment_only() {
        let file = stored("file-1-2.tar.gz", "gz", 1);
        let result = UploadResult::from_stored(&file, "http://h", accepted_at());
        assert_eq!(result.public_id, "file-1-2");
    }

    #[test]
    fn test_no_extension() {
        let file = stored("file-1-2", "", 3);
        let result = UploadResult::from_stored(&file, "http://h", accepted_at());
        assert_eq!(result.public_id, "file-1-2");
        assert_eq!(result.format, "");
        assert_eq!(result.url, "http://h/file-1-2");
    }

    #[test]
    fn test_serialized_shape() {
        let file = stored("file-1714557600123-42.png", "png", 5);
        let result = UploadResult::from_stored(&file, "http://h/uploads", accepted_at());
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["created_at"], "2024-05-01T10:00:00.123Z");
        assert_eq!(json["resource_type"], "image");
        assert_eq!(json["bytes"], 5);
        let keys: Vec<&str> = json.as_object().unwrap().keys().map(|k| k.as_str()).collect();
        for key in [
            "public_id",
            "secure_url",
            "url",
            "width",
            "height",
            "format",
            "resource_type",
            "created_at",
            "bytes",
        ] {
            assert!(keys.contains(&key), "missing {}", key);
        }
        assert_eq!(keys.len(), 9);
    }
}
