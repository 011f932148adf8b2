use image::ImageFormat;
use imgshrink_core::ParsedKey;

/// Image type validation errors
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Unsupported image type: {extension} (allowed: {allowed:?})")]
    UnsupportedExtension {
        extension: String,
        allowed: Vec<String>,
    },

    #[error("Extension {extension} is allowed but has no usable image codec")]
    NoCodec { extension: String },
}

/// Allow-list check for object extensions
///
/// Matching is case-sensitive: `.JPG` is rejected unless listed as such.
#[derive(Debug, Clone)]
pub struct ImageTypeValidator {
    allowed_extensions: Vec<String>,
}

impl ImageTypeValidator {
    pub fn new(allowed_extensions: Vec<String>) -> Self {
        Self { allowed_extensions }
    }

    pub fn is_allowed(&self, extension: &str) -> bool {
        self.allowed_extensions.iter().any(|e| e == extension)
    }

    /// Validate the extension and resolve the codec used for both decode and encode.
    pub fn validate(&self, parsed: &ParsedKey) -> Result<ImageFormat, ValidationError> {
        if !self.is_allowed(&parsed.extension) {
            return Err(ValidationError::UnsupportedExtension {
                extension: parsed.extension.clone(),
                allowed: self.allowed_extensions.clone(),
            });
        }

        Self::format_for(parsed.bare_extension()).ok_or_else(|| ValidationError::NoCodec {
            extension: parsed.extension.clone(),
        })
    }

    /// Codec for a bare extension, if it can both be read and written.
    pub fn format_for(extension: &str) -> Option<ImageFormat> {
        ImageFormat::from_extension(extension)
            .filter(|format| format.reading_enabled() && format.writing_enabled())
    }
}
