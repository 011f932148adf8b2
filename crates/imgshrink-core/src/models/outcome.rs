use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::models::DestinationDescriptor;

/// Why a notification was ignored without doing any work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The key has no `<name>.<ext>` file name to infer an image type from.
    MissingExtension { key: String },
    /// The extension is not in the allow-list. `name` is the base name without extension.
    UnsupportedExtension { name: String, extension: String },
}

impl Display for SkipReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            SkipReason::MissingExtension { key } => {
                write!(f, "unable to infer image type for key {}", key)
            }
            SkipReason::UnsupportedExtension { name, extension } => {
                write!(f, "{} has unsupported image type {}", name, extension)
            }
        }
    }
}

/// Summary of a completed resize.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResizeReport {
    pub source_bucket: String,
    pub source_key: String,
    pub destination: DestinationDescriptor,
    pub source_dimensions: (u32, u32),
    pub target_dimensions: (u32, u32),
}

/// Non-failure result of one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutcome {
    Skipped(SkipReason),
    Completed(ResizeReport),
}

impl PipelineOutcome {
    /// Body returned to the invoking environment: empty for a skip, `Ok` on success.
    pub fn response_body(&self) -> &'static str {
        match self {
            PipelineOutcome::Skipped(_) => "",
            PipelineOutcome::Completed(_) => "Ok",
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, PipelineOutcome::Completed(_))
    }
}
