//! Storage abstraction trait
//!
//! This module defines the ObjectStorage trait that all storage backends must implement.

use crate::{ObjectMetadata, StorageBackend};
use async_trait::async_trait;
use bytes::Bytes;
use futures::{Stream, StreamExt};
use std::pin::Pin;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Chunked object content as produced by a backend.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, StorageError>> + Send>>;

/// Handle to the body of a fetched object.
///
/// Owns the underlying stream (an open file or an HTTP response body). The stream is
/// released when the handle is dropped, whether or not it was read.
pub struct ObjectBody {
    stream: ByteStream,
    size_hint: Option<u64>,
}

impl ObjectBody {
    pub fn new(stream: ByteStream, size_hint: Option<u64>) -> Self {
        Self { stream, size_hint }
    }

    /// Body backed by bytes already in memory.
    pub fn from_bytes(data: impl Into<Bytes>) -> Self {
        let data = data.into();
        let size = data.len() as u64;
        let stream = futures::stream::once(futures::future::ready(Ok(data)));
        Self::new(Box::pin(stream), Some(size))
    }

    /// Expected size in bytes, when the backend knows it up front.
    pub fn size_hint(&self) -> Option<u64> {
        self.size_hint
    }

    /// Read the whole body into memory, consuming the handle.
    pub async fn read_to_end(mut self) -> StorageResult<Bytes> {
        let capacity = self.size_hint.unwrap_or(0) as usize;
        let mut buffer = Vec::with_capacity(capacity);

        while let Some(chunk) = self.stream.next().await {
            buffer.extend_from_slice(&chunk?);
        }

        Ok(Bytes::from(buffer))
    }
}

impl std::fmt::Debug for ObjectBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectBody")
            .field("size_hint", &self.size_hint)
            .finish_non_exhaustive()
    }
}

/// Object storage abstraction
///
/// The resize pipeline only needs to fetch, write and remove whole objects, so the
/// contract is deliberately small. Implementations must be safe to share between
/// concurrent invocations and keep no per-request state.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Open the object at `bucket/key` for reading.
    ///
    /// Fails with [`StorageError::NotFound`] if the object does not exist.
    async fn get(&self, bucket: &str, key: &str) -> StorageResult<ObjectBody>;

    /// Create or overwrite the object at `bucket/key`.
    async fn put(
        &self,
        bucket: &str,
        key: &str,
        data: Bytes,
        metadata: &ObjectMetadata,
    ) -> StorageResult<()>;

    /// Delete the object at `bucket/key`.
    ///
    /// Fails with [`StorageError::NotFound`] if the object does not exist.
    async fn delete(&self, bucket: &str, key: &str) -> StorageResult<()>;

    /// Check if an object exists
    async fn exists(&self, bucket: &str, key: &str) -> StorageResult<bool>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_object_body_from_bytes() {
        let body = ObjectBody::from_bytes(b"hello".to_vec());
        assert_eq!(body.size_hint(), Some(5));
        assert_eq!(body.read_to_end().await.unwrap(), Bytes::from_static(b"hello"));
    }

    #[tokio::test]
    async fn test_object_body_concatenates_chunks() {
        let chunks = vec![
            Ok(Bytes::from_static(b"ab")),
            Ok(Bytes::from_static(b"cd")),
            Ok(Bytes::from_static(b"e")),
        ];
        let body = ObjectBody::new(Box::pin(futures::stream::iter(chunks)), None);
        assert_eq!(body.read_to_end().await.unwrap(), Bytes::from_static(b"abcde"));
    }

    #[tokio::test]
    async fn test_object_body_propagates_stream_error() {
        let chunks = vec![
            Ok(Bytes::from_static(b"ab")),
            Err(StorageError::DownloadFailed("connection reset".to_string())),
        ];
        let body = ObjectBody::new(Box::pin(futures::stream::iter(chunks)), Some(4));
        let result = body.read_to_end().await;
        assert!(matches!(result, Err(StorageError::DownloadFailed(_))));
    }
}
