//! Cloudmock Storage Library
//!
//! This crate provides the storage abstraction and the local filesystem backend
//! that persists accepted uploads.
//!
//! # Naming
//!
//! Every stored file gets a generated name `<field>-<millis>-<random>[.<ext>]`
//! placed directly below the storage root. Name generation lives in the
//! `naming` module; the backend guarantees a name is never reused by publishing
//! files with a no-clobber link. Uploads still being received live in the
//! `.incoming` subdirectory and only appear below the root once complete.

pub mod factory;
pub mod local;
pub mod naming;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use local::{LocalStorage, STAGING_DIR};
pub use naming::{RandomSuffix, SuffixSource};
pub use traits::{ByteStream, Storage, StorageError, StorageResult, StoreRequest};
