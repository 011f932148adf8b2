use aws_lambda_events::event::s3::{S3Event, S3EventRecord};
use imgshrink_core::ChangeNotification;
use imgshrink_processing::{ResizeError, ResizePipeline};
use lambda_runtime::{Error, LambdaEvent};

/// Decode an object key as delivered in S3 event notifications.
///
/// S3 form-encodes keys: spaces arrive as `+` and reserved characters percent-encoded.
pub fn decode_object_key(raw: &str) -> Result<String, ResizeError> {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|key| key.into_owned())
        .map_err(|e| {
            ResizeError::InvalidEvent(format!("object key {:?} is not valid UTF-8: {}", raw, e))
        })
}

fn notification_from_record(record: &S3EventRecord) -> Result<ChangeNotification, ResizeError> {
    let bucket = record
        .s3
        .bucket
        .name
        .as_deref()
        .filter(|name| !name.is_empty())
        .ok_or_else(|| ResizeError::InvalidEvent("record has no bucket name".to_string()))?;

    let raw_key = record
        .s3
        .object
        .key
        .as_deref()
        .ok_or_else(|| ResizeError::InvalidEvent("record has no object key".to_string()))?;

    Ok(ChangeNotification::new(bucket, decode_object_key(raw_key)?))
}

/// Convert every record of an S3 event into a change notification.
pub fn notifications_from_event(event: &S3Event) -> Result<Vec<ChangeNotification>, ResizeError> {
    event.records.iter().map(notification_from_record).collect()
}

/// Lambda handler: `""` when the object was skipped, `"Ok"` once it was resized.
pub async fn function_handler(
    event: LambdaEvent<S3Event>,
    pipeline: &ResizePipeline,
) -> Result<String, Error> {
    let request_id = event.context.request_id.clone();

    let notifications = notifications_from_event(&event.payload).map_err(|e| {
        tracing::error!(request_id = %request_id, error = %e, "{}", e);
        e
    })?;

    let outcome = pipeline.handle_batch(&notifications).await?;

    Ok(outcome.response_body().to_string())
}
