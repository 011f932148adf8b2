//! Configuration module
//!
//! Settings for the resize pipeline and for the storage backend it reads from and
//! writes to. Everything has a compiled default; the environment can override it.

use std::env;

use crate::storage_types::StorageBackend;

// Pipeline defaults
const RESIZE_SCALE: f64 = 0.5;
const ALLOWED_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png"];
const DESTINATION_BUCKET_SUFFIX: &str = "-resized";
const CONTENT_TYPE_PREFIX: &str = "image/";

/// Storage backend configuration
#[derive(Clone, Debug, Default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // Custom endpoint for S3-compatible providers (MinIO, etc.)
    pub aws_region: Option<String>,
    pub local_storage_path: Option<String>,
}

impl StorageConfig {
    /// Region for S3, preferring `S3_REGION` over `AWS_REGION`.
    pub fn region(&self) -> Option<&str> {
        self.s3_region
            .as_deref()
            .or(self.aws_region.as_deref())
    }
}

/// Resize pipeline configuration.
///
/// Passed to the pipeline at construction so tests can run with alternate values.
#[derive(Clone, Debug)]
pub struct ResizeConfig {
    /// Factor applied to both dimensions. Must be in (0, 1].
    pub scale: f64,
    /// Extensions (with leading dot) accepted for processing. Matched case-sensitively.
    pub allowed_extensions: Vec<String>,
    /// Appended to the source bucket name to form the destination bucket.
    pub destination_suffix: String,
    /// Prepended to the bare extension to form the uploaded content type.
    pub content_type_prefix: String,
    pub storage: StorageConfig,
}

impl Default for ResizeConfig {
    fn default() -> Self {
        Self {
            scale: RESIZE_SCALE,
            allowed_extensions: ALLOWED_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            destination_suffix: DESTINATION_BUCKET_SUFFIX.to_string(),
            content_type_prefix: CONTENT_TYPE_PREFIX.to_string(),
            storage: StorageConfig::default(),
        }
    }
}

impl ResizeConfig {
    /// Load configuration from the process environment (and `.env`, if present).
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// Unset and blank variables fall back to the defaults. Values that are set but
    /// malformed are errors rather than silently ignored.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mut config = ResizeConfig::default();

        if let Some(scale) = var("RESIZE_SCALE") {
            config.scale = scale
                .parse::<f64>()
                .map_err(|e| anyhow::anyhow!("RESIZE_SCALE must be a number ({}): {}", scale, e))?;
        }

        if let Some(extensions) = var("ALLOWED_EXTENSIONS") {
            config.allowed_extensions = parse_extensions(&extensions);
        }

        if let Some(suffix) = var("DESTINATION_BUCKET_SUFFIX") {
            config.destination_suffix = suffix;
        }

        if let Some(prefix) = var("CONTENT_TYPE_PREFIX") {
            config.content_type_prefix = prefix;
        }

        if let Some(backend) = var("STORAGE_BACKEND") {
            config.storage.backend = backend.parse()?;
        }

        config.storage.s3_region = var("S3_REGION");
        config.storage.s3_endpoint = var("S3_ENDPOINT");
        config.storage.aws_region = var("AWS_REGION");
        config.storage.local_storage_path = var("LOCAL_STORAGE_PATH");

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if !(self.scale > 0.0 && self.scale <= 1.0) {
            return Err(anyhow::anyhow!(
                "RESIZE_SCALE must be greater than 0 and at most 1, got {}",
                self.scale
            ));
        }

        if self.allowed_extensions.is_empty() {
            return Err(anyhow::anyhow!("ALLOWED_EXTENSIONS must not be empty"));
        }

        if let Some(ext) = self
            .allowed_extensions
            .iter()
            .find(|ext| !ext.starts_with('.') || ext.len() < 2)
        {
            return Err(anyhow::anyhow!(
                "Invalid extension in ALLOWED_EXTENSIONS: {:?}",
                ext
            ));
        }

        if self.destination_suffix.is_empty() {
            return Err(anyhow::anyhow!(
                "DESTINATION_BUCKET_SUFFIX must not be empty, the resized copy would overwrite the source"
            ));
        }

        match self.storage.backend {
            StorageBackend::S3 if self.storage.region().is_none() => Err(anyhow::anyhow!(
                "STORAGE_BACKEND=s3 requires S3_REGION or AWS_REGION to be set"
            )),
            StorageBackend::Local if self.storage.local_storage_path.is_none() => Err(
                anyhow::anyhow!("STORAGE_BACKEND=local requires LOCAL_STORAGE_PATH to be set"),
            ),
            _ => Ok(()),
        }
    }

    /// Destination bucket for objects from `source_bucket`.
    pub fn destination_bucket(&self, source_bucket: &str) -> String {
        format!("{}{}", source_bucket, self.destination_suffix)
    }

    /// Content type for an extension given with or without its leading dot.
    pub fn content_type_for(&self, extension: &str) -> String {
        format!(
            "{}{}",
            self.content_type_prefix,
            extension.strip_prefix('.').unwrap_or(extension)
        )
    }
}

/// Parse a comma-separated extension list, adding the leading dot where it is missing.
/// Case is kept as given since matching is case-sensitive.
fn parse_extensions(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| {
            if s.starts_with('.') {
                s.to_string()
            } else {
                format!(".{}", s)
            }
        })
        .collect()
}
