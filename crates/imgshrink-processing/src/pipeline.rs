//! Resize pipeline
//!
//! One notification in, at most one upload and one delete out:
//!
//! 1. Parse the key and check its extension against the allow-list (skip if either fails)
//! 2. Fetch the source object
//! 3. Decode, scale and re-encode in the same format
//! 4. Upload to `<bucket><suffix>` under the same key
//! 5. Delete the source object
//!
//! Steps run strictly in order with no retries. If the delete fails after a
//! successful upload, the resized copy stays in place and the error is returned.

use crate::error::{ResizeError, StorageOperation};
use crate::image::ImageTransformer;
use crate::key::split_key;
use crate::validator::{ImageTypeValidator, ValidationError};
use image::ImageFormat;
use imgshrink_core::{
    ChangeNotification, DestinationDescriptor, ParsedKey, PipelineOutcome, ResizeConfig,
    ResizeReport, SkipReason,
};
use imgshrink_storage::ObjectStorage;
use std::sync::Arc;
use std::time::Instant;

/// Whether a key will be processed, decided without touching storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    Accepted {
        parsed: ParsedKey,
        format: ImageFormat,
    },
    Skipped(SkipReason),
}

/// Decide whether `key` is parsed and allowed by `validator`, without touching storage.
///
/// An allowed extension the image codecs cannot handle is an error, not a skip.
pub fn admit_key(validator: &ImageTypeValidator, key: &str) -> Result<Admission, ResizeError> {
    let Some(parsed) = split_key(key) else {
        return Ok(Admission::Skipped(SkipReason::MissingExtension {
            key: key.to_string(),
        }));
    };

    match validator.validate(&parsed) {
        Ok(format) => Ok(Admission::Accepted { parsed, format }),
        Err(ValidationError::UnsupportedExtension { extension, .. }) => {
            Ok(Admission::Skipped(SkipReason::UnsupportedExtension {
                name: parsed.name.clone(),
                extension,
            }))
        }
        Err(e) => Err(e.into()),
    }
}

/// Resize pipeline bound to a configuration and a storage backend.
///
/// Holds no per-invocation state, so one instance can serve concurrent invocations.
#[derive(Clone)]
pub struct ResizePipeline {
    config: Arc<ResizeConfig>,
    storage: Arc<dyn ObjectStorage>,
    validator: ImageTypeValidator,
}

impl ResizePipeline {
    pub fn new(config: ResizeConfig, storage: Arc<dyn ObjectStorage>) -> Self {
        let validator = ImageTypeValidator::new(config.allowed_extensions.clone());
        Self {
            config: Arc::new(config),
            storage,
            validator,
        }
    }

    /// Handle a batch of notifications. Only the first one is processed.
    pub async fn handle_batch(
        &self,
        notifications: &[ChangeNotification],
    ) -> Result<PipelineOutcome, ResizeError> {
        tracing::info!(
            count = notifications.len(),
            "{} images uploaded event accepted",
            notifications.len()
        );

        let first = notifications.first().ok_or_else(|| {
            tracing::error!("Notification batch contains no records");
            ResizeError::InvalidEvent("notification batch contains no records".to_string())
        })?;

        if notifications.len() > 1 {
            tracing::warn!(
                ignored = notifications.len() - 1,
                "Only the first record of a batch is processed"
            );
        }

        self.handle(first).await
    }

    /// Decide whether `key` would be processed.
    pub fn admit(&self, key: &str) -> Result<Admission, ResizeError> {
        admit_key(&self.validator, key)
    }

    /// Destination the resized copy of `key` would be written to.
    pub fn destination_for(
        &self,
        bucket: &str,
        parsed: &ParsedKey,
        content_length: u64,
    ) -> DestinationDescriptor {
        DestinationDescriptor::for_source(&self.config, bucket, parsed, content_length)
    }

    /// Handle one notification.
    pub async fn handle(
        &self,
        notification: &ChangeNotification,
    ) -> Result<PipelineOutcome, ResizeError> {
        let bucket = notification.bucket.as_str();
        let key = notification.key.as_str();

        let (parsed, format) = match self.admit(key) {
            Ok(Admission::Accepted { parsed, format }) => (parsed, format),
            Ok(Admission::Skipped(reason)) => {
                tracing::info!(bucket = %bucket, key = %key, "{}", reason);
                return Ok(PipelineOutcome::Skipped(reason));
            }
            Err(e) => {
                tracing::error!(bucket = %bucket, key = %key, error = %e, "{}", e);
                return Err(e);
            }
        };

        let result = self.process(bucket, key, &parsed, format).await;

        if let Err(ref e) = result {
            tracing::error!(
                bucket = %bucket,
                key = %key,
                kind = ?e.kind(),
                recoverable = e.is_recoverable(),
                "{}",
                e
            );
        }

        result
    }

    async fn process(
        &self,
        bucket: &str,
        key: &str,
        parsed: &ParsedKey,
        format: ImageFormat,
    ) -> Result<PipelineOutcome, ResizeError> {
        let started = Instant::now();
        let data = {
            let body = self
                .storage
                .get(bucket, key)
                .await
                .map_err(|e| ResizeError::storage(StorageOperation::Get, bucket, key, e))?;
            body.read_to_end()
                .await
                .map_err(|e| ResizeError::storage(StorageOperation::Get, bucket, key, e))?
        };

        let resized = ImageTransformer::resize(&data, format, self.config.scale)?;
        drop(data);

        let destination = self.destination_for(bucket, parsed, resized.data.len() as u64);

        tracing::info!(
            bucket = %destination.bucket,
            key = %destination.key,
            size_bytes = destination.metadata.content_length,
            "Writing to: {}",
            destination.location()
        );
        self.storage
            .put(
                &destination.bucket,
                &destination.key,
                resized.data,
                &destination.metadata,
            )
            .await
            .map_err(|e| {
                ResizeError::storage(
                    StorageOperation::Put,
                    &destination.bucket,
                    &destination.key,
                    e,
                )
            })?;
        tracing::info!(
            duration_ms = started.elapsed().as_millis() as u64,
            "Successfully resized {}/{} and uploaded to {}",
            bucket,
            key,
            destination.location()
        );

        tracing::info!("Deleting from: {}/{}", bucket, key);
        self.storage.delete(bucket, key).await.map_err(|e| {
            tracing::warn!(
                destination = %destination.location(),
                "Source not deleted; resized copy remains"
            );
            ResizeError::storage(StorageOperation::Delete, bucket, key, e)
        })?;

        Ok(PipelineOutcome::Completed(ResizeReport {
            source_bucket: bucket.to_string(),
            source_key: key.to_string(),
            destination,
            source_dimensions: resized.source_dimensions,
            target_dimensions: resized.target_dimensions,
        }))
    }
}
