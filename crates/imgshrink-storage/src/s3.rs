use crate::traits::{ObjectBody, ObjectStorage, StorageError, StorageResult};
use crate::{ObjectMetadata, StorageBackend};
use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::path::Path;
use object_store::Error as ObjectStoreError;
use object_store::{
    Attribute, Attributes, ObjectStore, ObjectStoreExt, PutOptions, PutPayload,
    Result as ObjectResult,
};
use std::borrow::Cow;

/// User metadata entry carrying the encoded size of an uploaded object.
const CONTENT_LENGTH_METADATA: &str = "content-length";

/// S3 storage implementation
///
/// `object_store` clients are bound to a single bucket, so one is built per call from
/// the shared region and endpoint settings. Credentials come from the environment.
#[derive(Clone, Debug)]
pub struct S3Storage {
    region: String,
    endpoint_url: Option<String>, // Custom endpoint for S3-compatible providers
}

impl S3Storage {
    /// Create a new S3Storage instance
    ///
    /// # Arguments
    /// * `region` - AWS region (or region identifier for S3-compatible providers)
    /// * `endpoint_url` - Optional custom endpoint URL for S3-compatible providers
    ///   (e.g., "http://localhost:9000" for MinIO)
    pub fn new(region: String, endpoint_url: Option<String>) -> StorageResult<Self> {
        if region.trim().is_empty() {
            return Err(StorageError::ConfigError(
                "S3 region must not be empty".to_string(),
            ));
        }

        Ok(S3Storage {
            region,
            endpoint_url,
        })
    }

    fn store_for(&self, bucket: &str) -> StorageResult<AmazonS3> {
        if bucket.is_empty() {
            return Err(StorageError::InvalidKey("Bucket name is empty".to_string()));
        }

        let mut builder = AmazonS3Builder::from_env()
            .with_region(self.region.clone())
            .with_bucket_name(bucket);

        if let Some(ref endpoint) = self.endpoint_url {
            let allow_http = endpoint.starts_with("http://");
            builder = builder
                .with_endpoint(endpoint.clone())
                .with_allow_http(allow_http);
        }

        builder
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))
    }

    /// Object location for a key, kept byte-for-byte.
    ///
    /// Keys with empty, `.` or `..` segments are rejected rather than normalized.
    fn location(key: &str) -> StorageResult<Path> {
        Path::parse(key)
            .map_err(|e| StorageError::InvalidKey(format!("Invalid object key {:?}: {}", key, e)))
    }

    /// Map an object_store error, keeping not-found and permission failures distinct.
    fn map_error(
        err: ObjectStoreError,
        bucket: &str,
        key: &str,
        fallback: fn(String) -> StorageError,
    ) -> StorageError {
        match err {
            ObjectStoreError::NotFound { .. } => {
                StorageError::NotFound(format!("{}/{}", bucket, key))
            }
            ObjectStoreError::PermissionDenied { .. } | ObjectStoreError::Unauthenticated { .. } => {
                StorageError::PermissionDenied(format!("{}/{}: {}", bucket, key, err))
            }
            other => fallback(other.to_string()),
        }
    }
}

#[async_trait]
impl ObjectStorage for S3Storage {
    async fn get(&self, bucket: &str, key: &str) -> StorageResult<ObjectBody> {
        let store = self.store_for(bucket)?;
        let start = std::time::Instant::now();
        let location = Self::location(key)?;

        let result: ObjectResult<_> = store.get(&location).await;

        let result = result.map_err(|e| {
            tracing::error!(
                error = %e,
                bucket = %bucket,
                key = %key,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "S3 get failed"
            );
            Self::map_error(e, bucket, key, StorageError::DownloadFailed)
        })?;

        let size = result.meta.size as u64;

        tracing::info!(
            bucket = %bucket,
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 get successful"
        );

        let log_bucket = bucket.to_string();
        let log_key = key.to_string();
        let stream = result.into_stream().map(move |res| {
            res.map_err(|e| {
                tracing::error!(
                    error = %e,
                    bucket = %log_bucket,
                    key = %log_key,
                    "S3 stream read error"
                );
                StorageError::DownloadFailed(e.to_string())
            })
        });

        Ok(ObjectBody::new(Box::pin(stream), Some(size)))
    }

    async fn put(
        &self,
        bucket: &str,
        key: &str,
        data: Bytes,
        metadata: &ObjectMetadata,
    ) -> StorageResult<()> {
        let store = self.store_for(bucket)?;
        let size = data.len() as u64;
        let location = Self::location(key)?;
        let start = std::time::Instant::now();

        let mut attributes = Attributes::new();
        attributes.insert(Attribute::ContentType, metadata.content_type.clone().into());
        attributes.insert(
            Attribute::Metadata(Cow::Borrowed(CONTENT_LENGTH_METADATA)),
            metadata.content_length.to_string().into(),
        );
        let options = PutOptions {
            attributes,
            ..Default::default()
        };

        let result: ObjectResult<_> = store
            .put_opts(&location, PutPayload::from(data), options)
            .await;

        result.map_err(|e| {
            tracing::error!(
                error = %e,
                bucket = %bucket,
                key = %key,
                size_bytes = size,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "S3 put failed"
            );
            Self::map_error(e, bucket, key, StorageError::UploadFailed)
        })?;

        tracing::info!(
            bucket = %bucket,
            key = %key,
            size_bytes = size,
            content_type = %metadata.content_type,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 put successful"
        );

        Ok(())
    }

    async fn delete(&self, bucket: &str, key: &str) -> StorageResult<()> {
        let store = self.store_for(bucket)?;
        let start = std::time::Instant::now();
        let location = Self::location(key)?;

        // S3 reports success when deleting a missing key; check first so an
        // already-processed object surfaces as NotFound.
        store
            .head(&location)
            .await
            .map_err(|e| Self::map_error(e, bucket, key, StorageError::DeleteFailed))?;

        let result: ObjectResult<_> = store.delete(&location).await;

        result.map_err(|e| {
            tracing::error!(
                error = %e,
                bucket = %bucket,
                key = %key,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "S3 delete failed"
            );
            Self::map_error(e, bucket, key, StorageError::DeleteFailed)
        })?;

        tracing::info!(
            bucket = %bucket,
            key = %key,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 delete successful"
        );

        Ok(())
    }

    async fn exists(&self, bucket: &str, key: &str) -> StorageResult<bool> {
        let store = self.store_for(bucket)?;
        let location = Self::location(key)?;
        match store.head(&location).await {
            Ok(_) => Ok(true),
            Err(ObjectStoreError::NotFound { .. }) => Ok(false),
            Err(e) => Err(StorageError::BackendError(e.to_string())),
        }
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_empty_region() {
        let result = S3Storage::new("  ".to_string(), None);
        assert!(matches!(result, Err(StorageError::ConfigError(_))));
    }

    #[test]
    fn test_store_for_rejects_empty_bucket() {
        let storage = S3Storage::new("us-east-1".to_string(), None).unwrap();
        assert!(matches!(
            storage.store_for(""),
            Err(StorageError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_store_for_custom_endpoint() {
        let storage = S3Storage::new(
            "us-east-1".to_string(),
            Some("http://localhost:9000".to_string()),
        )
        .unwrap();
        assert!(storage.store_for("photos").is_ok());
        assert_eq!(storage.backend_type(), StorageBackend::S3);
    }

    #[test]
    fn test_location_keeps_key_unchanged() {
        for key in [
            "album/cat.jpg",
            "album/cat[1].jpg",
            "album/100%.png",
            "my photo #2.jpg",
            "a{b}|c.png",
            "貓/cat.png",
        ] {
            let location = S3Storage::location(key).unwrap();
            assert_eq!(location.to_string(), key);
        }
    }

    #[test]
    fn test_location_rejects_empty_segments() {
        assert!(matches!(
            S3Storage::location("a//b.jpg"),
            Err(StorageError::InvalidKey(_))
        ));
        assert!(matches!(
            S3Storage::location("album/../cat.jpg"),
            Err(StorageError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_map_error_not_found() {
        let err = ObjectStoreError::NotFound {
            path: "album/cat.jpg".to_string(),
            source: "missing".into(),
        };
        let mapped = S3Storage::map_error(err, "photos", "album/cat.jpg", StorageError::DeleteFailed);
        assert!(matches!(mapped, StorageError::NotFound(ref s) if s == "photos/album/cat.jpg"));
    }

    #[test]
    fn test_map_error_permission_denied() {
        let err = ObjectStoreError::PermissionDenied {
            path: "cat.jpg".to_string(),
            source: "AccessDenied".into(),
        };
        let mapped = S3Storage::map_error(err, "photos", "cat.jpg", StorageError::DeleteFailed);
        assert!(matches!(mapped, StorageError::PermissionDenied(_)));
    }
}
