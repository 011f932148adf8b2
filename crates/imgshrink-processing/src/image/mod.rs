//! Image processing module
//!
//! - Fixed-ratio resampling onto an RGB canvas (resize)
//! - Decode / resize / encode in the source format (transformer)

pub mod resize;
pub mod transformer;

pub use resize::ImageResize;
pub use transformer::{ImageTransformer, ResizedImage};
