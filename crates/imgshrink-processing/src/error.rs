//! Error types for the resize pipeline
//!
//! A benign skip is not an error: it is reported through
//! [`imgshrink_core::PipelineOutcome::Skipped`]. Everything here is a real failure that
//! the invoking environment should see.

use std::fmt::{Display, Formatter, Result as FmtResult};

use image::{ImageError, ImageFormat};
use imgshrink_storage::StorageError;

use crate::validator::ValidationError;

/// Storage call that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageOperation {
    Get,
    Put,
    Delete,
}

impl Display for StorageOperation {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            StorageOperation::Get => write!(f, "get"),
            StorageOperation::Put => write!(f, "put"),
            StorageOperation::Delete => write!(f, "delete"),
        }
    }
}

/// Failure category, for callers that branch on the kind of failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidEvent,
    Validation,
    Decode,
    InvalidDimensions,
    Encode,
    StorageIo,
}

#[derive(Debug, thiserror::Error)]
pub enum ResizeError {
    #[error("Invalid event: {0}")]
    InvalidEvent(String),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Failed to decode {format:?} image: {source}")]
    Decode {
        format: ImageFormat,
        #[source]
        source: ImageError,
    },

    #[error("Image of {width}x{height} scaled by {scale} has an empty dimension")]
    InvalidDimensions { width: u32, height: u32, scale: f64 },

    #[error("Failed to encode {format:?} image: {source}")]
    Encode {
        format: ImageFormat,
        #[source]
        source: ImageError,
    },

    #[error("Storage {operation} failed for {bucket}/{key}: {source}")]
    Storage {
        operation: StorageOperation,
        bucket: String,
        key: String,
        #[source]
        source: StorageError,
    },
}

impl ResizeError {
    pub fn storage(
        operation: StorageOperation,
        bucket: &str,
        key: &str,
        source: StorageError,
    ) -> Self {
        ResizeError::Storage {
            operation,
            bucket: bucket.to_string(),
            key: key.to_string(),
            source,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ResizeError::InvalidEvent(_) => ErrorKind::InvalidEvent,
            ResizeError::Validation(_) => ErrorKind::Validation,
            ResizeError::Decode { .. } => ErrorKind::Decode,
            ResizeError::InvalidDimensions { .. } => ErrorKind::InvalidDimensions,
            ResizeError::Encode { .. } => ErrorKind::Encode,
            ResizeError::Storage { .. } => ErrorKind::StorageIo,
        }
    }

    /// Whether running the same notification again could succeed.
    ///
    /// Only transient storage failures qualify; a missing object or bad image stays bad.
    pub fn is_recoverable(&self) -> bool {
        match self {
            ResizeError::Storage { source, .. } => !matches!(
                source,
                StorageError::NotFound(_)
                    | StorageError::InvalidKey(_)
                    | StorageError::PermissionDenied(_)
                    | StorageError::ConfigError(_)
            ),
            _ => false,
        }
    }

    /// The storage operation that failed, if this is a storage failure.
    pub fn storage_operation(&self) -> Option<StorageOperation> {
        match self {
            ResizeError::Storage { operation, .. } => Some(*operation),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_and_recoverable() {
        let err = ResizeError::storage(
            StorageOperation::Get,
            "photos",
            "cat.jpg",
            StorageError::NotFound("photos/cat.jpg".to_string()),
        );
        assert_eq!(err.kind(), ErrorKind::StorageIo);
        assert_eq!(err.storage_operation(), Some(StorageOperation::Get));
        assert!(!err.is_recoverable());

        let err = ResizeError::storage(
            StorageOperation::Put,
            "photos-resized",
            "cat.jpg",
            StorageError::UploadFailed("timeout".to_string()),
        );
        assert!(err.is_recoverable());

        let err = ResizeError::InvalidDimensions {
            width: 1,
            height: 1,
            scale: 0.5,
        };
        assert_eq!(err.kind(), ErrorKind::InvalidDimensions);
        assert!(!err.is_recoverable());
        assert_eq!(err.storage_operation(), None);
    }

    #[test]
    fn test_storage_error_message() {
        let err = ResizeError::storage(
            StorageOperation::Delete,
            "photos",
            "album/cat.jpg",
            StorageError::PermissionDenied("photos/album/cat.jpg".to_string()),
        );
        assert_eq!(
            err.to_string(),
            "Storage delete failed for photos/album/cat.jpg: Permission denied: photos/album/cat.jpg"
        );
    }
}
