//! imgshrink Core Library
//!
//! This crate provides the domain models, configuration and storage types shared by the
//! storage backends, the resize pipeline and the binaries that drive it.

pub mod config;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use config::{ResizeConfig, StorageConfig};
pub use models::{
    ChangeNotification, DestinationDescriptor, ParsedKey, PipelineOutcome, ResizeReport,
    SkipReason,
};
pub use storage_types::{ObjectMetadata, StorageBackend};
