//! Lambda adapter for the imgshrink resize pipeline.
//!
//! Turns S3 event notifications into [`imgshrink_core::ChangeNotification`]s and the
//! pipeline outcome into the function's string result.

pub mod handler;
pub mod telemetry;

pub use handler::{decode_object_key, function_handler, notifications_from_event};
pub use telemetry::init_telemetry;
