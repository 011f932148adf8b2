use serde::Serialize;

use crate::config::ResizeConfig;
use crate::models::ParsedKey;
use crate::storage_types::ObjectMetadata;

/// Where and how the resized copy of an object is written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DestinationDescriptor {
    pub bucket: String,
    pub key: String,
    pub metadata: ObjectMetadata,
}

impl DestinationDescriptor {
    /// Destination for `source_key` in `source_bucket`.
    ///
    /// The key is kept as-is; only the bucket changes.
    pub fn for_source(
        config: &ResizeConfig,
        source_bucket: &str,
        parsed: &ParsedKey,
        content_length: u64,
    ) -> Self {
        Self {
            bucket: config.destination_bucket(source_bucket),
            key: parsed.to_key(),
            metadata: ObjectMetadata {
                content_type: config.content_type_for(&parsed.extension),
                content_length,
            },
        }
    }

    /// `bucket/key`, for log lines.
    pub fn location(&self) -> String {
        format!("{}/{}", self.bucket, self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_source() {
        let parsed = ParsedKey {
            prefix: "album/".to_string(),
            name: "cat".to_string(),
            extension: ".jpg".to_string(),
        };
        let dest = DestinationDescriptor::for_source(&ResizeConfig::default(), "photos", &parsed, 42);

        assert_eq!(dest.bucket, "photos-resized");
        assert_eq!(dest.key, "album/cat.jpg");
        assert_eq!(dest.metadata.content_type, "image/jpg");
        assert_eq!(dest.metadata.content_length, 42);
        assert_eq!(dest.location(), "photos-resized/album/cat.jpg");
    }

    #[test]
    fn test_for_source_custom_suffix() {
        let config = ResizeConfig {
            destination_suffix: "-thumbs".to_string(),
            ..ResizeConfig::default()
        };
        let parsed = ParsedKey {
            prefix: String::new(),
            name: "logo".to_string(),
            extension: ".png".to_string(),
        };
        let dest = DestinationDescriptor::for_source(&config, "assets", &parsed, 7);

        assert_eq!(dest.bucket, "assets-thumbs");
        assert_eq!(dest.key, "logo.png");
        assert_eq!(dest.metadata.content_type, "image/png");
    }
}
