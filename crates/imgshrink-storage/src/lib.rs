//! imgshrink Storage Library
//!
//! Object-storage abstraction used by the resize pipeline, with implementations for S3
//! (and S3-compatible providers) and for the local filesystem.
//!
//! # Addressing
//!
//! Objects are addressed by `(bucket, key)`. The local backend maps a bucket to a
//! directory under its base path, so `photos/album/cat.jpg` lives at
//! `{base}/photos/album/cat.jpg`. Keys must not contain `..` or a leading `/`.

pub mod factory;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use imgshrink_core::{ObjectMetadata, StorageBackend};
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{ByteStream, ObjectBody, ObjectStorage, StorageError, StorageResult};
