use image::imageops::{self, FilterType};
use image::{DynamicImage, GenericImageView, Rgba, RgbImage, RgbaImage};

/// Bilinear filtering.
pub const RESAMPLE_FILTER: FilterType = FilterType::Triangle;

const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Fixed-ratio image scaling
pub struct ImageResize;

impl ImageResize {
    /// Target dimensions for a scale factor, truncated toward zero.
    ///
    /// Returns `None` when either dimension truncates to zero.
    pub fn scaled_dimensions(width: u32, height: u32, scale: f64) -> Option<(u32, u32)> {
        let target_width = (width as f64 * scale).floor() as u32;
        let target_height = (height as f64 * scale).floor() as u32;

        if target_width == 0 || target_height == 0 {
            return None;
        }

        Some((target_width, target_height))
    }

    /// Resize to exact dimensions onto a white background, producing 8-bit RGB.
    ///
    /// Any alpha channel is flattened onto white.
    pub fn resize_onto_white(img: &DynamicImage, width: u32, height: u32) -> RgbImage {
        let resized = img.resize_exact(width, height, RESAMPLE_FILTER).to_rgba8();

        let mut canvas = RgbaImage::from_pixel(width, height, BACKGROUND);
        imageops::overlay(&mut canvas, &resized, 0, 0);

        DynamicImage::ImageRgba8(canvas).to_rgb8()
    }

    /// Scale an image by `scale`, or `None` if the result would be empty.
    pub fn scale(img: &DynamicImage, scale: f64) -> Option<RgbImage> {
        let (width, height) = img.dimensions();
        let (target_width, target_height) = Self::scaled_dimensions(width, height, scale)?;

        tracing::debug!(
            width,
            height,
            target_width,
            target_height,
            "Resizing image"
        );

        Some(Self::resize_onto_white(img, target_width, target_height))
    }
}
