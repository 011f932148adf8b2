//! Domain models
//!
//! Every model here is scoped to a single pipeline invocation.

pub mod destination;
pub mod notification;
pub mod outcome;

pub use destination::DestinationDescriptor;
pub use notification::{ChangeNotification, ParsedKey};
pub use outcome::{PipelineOutcome, ResizeReport, SkipReason};
