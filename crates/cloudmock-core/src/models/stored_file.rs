//! The persisted artifact of an accepted upload.

use std::path::PathBuf;

/// A file written below the storage root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    /// `<field>-<millis>-<random>[.<ext>]`, unique within the storage root.
    pub generated_name: String,
    /// Extension of the original file name without the leading dot, case preserved.
    /// Empty when the original name had none.
    pub extension: String,
    pub absolute_path: PathBuf,
    /// Bytes actually written to disk, never the client-declared size.
    pub byte_size: u64,
}

impl StoredFile {
    /// Path of the file relative to the storage root.
    pub fn storage_key(&self) -> &str {
        &self.generated_name
    }
}
