//! Image transformer - decode, scale and re-encode in the source format

use crate::error::ResizeError;
use crate::image::resize::ImageResize;
use bytes::Bytes;
use image::{DynamicImage, GenericImageView, ImageFormat, RgbImage};
use std::io::Cursor;

/// Encoded output of a resize
#[derive(Debug, Clone)]
pub struct ResizedImage {
    pub data: Bytes,
    pub source_dimensions: (u32, u32),
    pub target_dimensions: (u32, u32),
}

pub struct ImageTransformer;

impl ImageTransformer {
    /// Decode `data` as `format`. No format sniffing: a PNG body under a `.jpg` key fails.
    pub fn decode(data: &[u8], format: ImageFormat) -> Result<DynamicImage, ResizeError> {
        image::load_from_memory_with_format(data, format)
            .map_err(|source| ResizeError::Decode { format, source })
    }

    pub fn encode(img: &RgbImage, format: ImageFormat) -> Result<Bytes, ResizeError> {
        let (width, height) = img.dimensions();
        let estimated_size = width as usize * height as usize * 3;
        let mut buffer = Vec::with_capacity(estimated_size);
        let mut cursor = Cursor::new(&mut buffer);
        img.write_to(&mut cursor, format)
            .map_err(|source| ResizeError::Encode { format, source })?;

        Ok(Bytes::from(buffer))
    }

    /// Decode, scale by `scale` and encode back to the same format.
    pub fn resize(data: &[u8], format: ImageFormat, scale: f64) -> Result<ResizedImage, ResizeError> {
        let img = Self::decode(data, format)?;
        let (width, height) = img.dimensions();

        let resized = ImageResize::scale(&img, scale).ok_or(ResizeError::InvalidDimensions {
            width,
            height,
            scale,
        })?;
        let target_dimensions = resized.dimensions();

        let data = Self::encode(&resized, format)?;

        Ok(ResizedImage {
            data,
            source_dimensions: (width, height),
            target_dimensions,
        })
    }
}
