//! imgshrink Processing Library
//!
//! The resize pipeline and the pieces it is built from:
//! - key parsing ([`split_key`])
//! - type filtering ([`ImageTypeValidator`])
//! - resampling and re-encoding ([`ImageResize`], [`ImageTransformer`])
//! - orchestration against object storage ([`ResizePipeline`])

pub mod error;
pub mod image;
pub mod key;
pub mod pipeline;
pub mod validator;

pub use error::{ErrorKind, ResizeError, StorageOperation};
pub use crate::image::{ImageResize, ImageTransformer, ResizedImage};
pub use ::image::ImageFormat;
pub use key::split_key;
pub use pipeline::{admit_key, Admission, ResizePipeline};
pub use validator::{ImageTypeValidator, ValidationError};
