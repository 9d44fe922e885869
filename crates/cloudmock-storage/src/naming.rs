//! Generated file names.
//!
//! Name format: `<field>-<millis>-<random>.<ext>`, or `<field>-<millis>-<random>`
//! when the original file name has no extension.

use cloudmock_core::constants::NAME_RANDOM_MAX;
use rand::Rng;

/// Source of the random component of generated names.
pub trait SuffixSource: Send + Sync {
    fn next_suffix(&self) -> u32;
}

/// Uniform suffix in `0..=999_999_999` from the thread-local RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomSuffix;

impl SuffixSource for RandomSuffix {
    fn next_suffix(&self) -> u32 {
        rand::rng().random_range(0..=NAME_RANDOM_MAX)
    }
}

/// Extension of `original_name` without the leading dot, case preserved.
///
/// Only the final component of the name is considered. A leading dot (`.bashrc`)
/// or a bare trailing dot (`photo.`) yields no extension.
pub fn file_extension(original_name: &str) -> &str {
    let base = original_name
        .rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or(original_name);

    match base.rfind('.') {
        Some(0) | None => "",
        Some(idx) => &base[idx + 1..],
    }
}

pub fn generate_name(field_name: &str, accepted_at_ms: i64, random: u32, extension: &str) -> String {
    if extension.is_empty() {
        format!("{}-{}-{}", field_name, accepted_at_ms, random)
    } else {
        format!("{}-{}-{}.{}", field_name, accepted_at_ms, random, extension)
    }
}
