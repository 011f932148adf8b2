use async_trait::async_trait;
use bytes::Bytes;
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use imgshrink_storage::{
    ObjectBody, ObjectMetadata, ObjectStorage, StorageBackend, StorageError, StorageResult,
};
use std::collections::HashMap;
use std::io::Cursor;
use std::sync::Mutex;

/// A storage call as observed by [`MockStorage`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Get { bucket: String, key: String },
    Put { bucket: String, key: String, metadata: ObjectMetadata },
    Delete { bucket: String, key: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    Get,
    Put,
    Delete,
}

/// In-memory storage with call recording and per-operation fault injection
#[derive(Default)]
pub struct MockStorage {
    objects: Mutex<HashMap<(String, String), Bytes>>,
    calls: Mutex<Vec<Call>>,
    failures: Mutex<HashMap<Op, fn(String) -> StorageError>>,
}

impl MockStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, bucket: &str, key: &str, data: impl Into<Bytes>) {
        self.objects
            .lock()
            .unwrap()
            .insert((bucket.to_string(), key.to_string()), data.into());
    }

    pub fn object(&self, bucket: &str, key: &str) -> Option<Bytes> {
        self.objects
            .lock()
            .unwrap()
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
    }

    pub fn contains(&self, bucket: &str, key: &str) -> bool {
        self.object(bucket, key).is_some()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Make every call of `op` fail with the error built by `error`.
    pub fn fail(&self, op: Op, error: fn(String) -> StorageError) {
        self.failures.lock().unwrap().insert(op, error);
    }

    fn injected(&self, op: Op, bucket: &str, key: &str) -> StorageResult<()> {
        match self.failures.lock().unwrap().get(&op) {
            Some(error) => Err(error(format!("{}/{}", bucket, key))),
            None => Ok(()),
        }
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl ObjectStorage for MockStorage {
    async fn get(&self, bucket: &str, key: &str) -> StorageResult<ObjectBody> {
        self.record(Call::Get {
            bucket: bucket.to_string(),
            key: key.to_string(),
        });
        self.injected(Op::Get, bucket, key)?;

        self.object(bucket, key)
            .map(ObjectBody::from_bytes)
            .ok_or_else(|| StorageError::NotFound(format!("{}/{}", bucket, key)))
    }

    async fn put(
        &self,
        bucket: &str,
        key: &str,
        data: Bytes,
        metadata: &ObjectMetadata,
    ) -> StorageResult<()> {
        self.record(Call::Put {
            bucket: bucket.to_string(),
            key: key.to_string(),
            metadata: metadata.clone(),
        });
        self.injected(Op::Put, bucket, key)?;

        self.insert(bucket, key, data);
        Ok(())
    }

    async fn delete(&self, bucket: &str, key: &str) -> StorageResult<()> {
        self.record(Call::Delete {
            bucket: bucket.to_string(),
            key: key.to_string(),
        });
        self.injected(Op::Delete, bucket, key)?;

        self.objects
            .lock()
            .unwrap()
            .remove(&(bucket.to_string(), key.to_string()))
            .map(|_| ())
            .ok_or_else(|| StorageError::NotFound(format!("{}/{}", bucket, key)))
    }

    async fn exists(&self, bucket: &str, key: &str) -> StorageResult<bool> {
        Ok(self.contains(bucket, key))
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}

/// Encode a solid-color test image
pub fn image_bytes(width: u32, height: u32, color: Rgba<u8>, format: ImageFormat) -> Vec<u8> {
    let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, color));
    // JPEG has no alpha channel
    let img = if format == ImageFormat::Jpeg {
        DynamicImage::ImageRgb8(img.to_rgb8())
    } else {
        img
    };

    let mut buffer = Vec::new();
    img.write_to(&mut Cursor::new(&mut buffer), format).unwrap();
    buffer
}

pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    image_bytes(width, height, Rgba([200, 40, 40, 255]), ImageFormat::Jpeg)
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    image_bytes(width, height, Rgba([40, 200, 40, 255]), ImageFormat::Png)
}
