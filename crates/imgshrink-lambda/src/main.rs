//! imgshrink Lambda
//!
//! Configure with RESIZE_SCALE, ALLOWED_EXTENSIONS, DESTINATION_BUCKET_SUFFIX and the
//! storage variables (STORAGE_BACKEND, AWS_REGION / S3_REGION, S3_ENDPOINT).

use aws_lambda_events::event::s3::S3Event;
use imgshrink_core::ResizeConfig;
use imgshrink_lambda::{function_handler, init_telemetry};
use imgshrink_processing::ResizePipeline;
use imgshrink_storage::create_storage;
use lambda_runtime::{run, service_fn, Error, LambdaEvent};

#[tokio::main]
async fn main() -> Result<(), Error> {
    init_telemetry();

    let config = ResizeConfig::from_env()?;
    config.validate()?;

    let storage = create_storage(&config.storage).await?;
    tracing::info!(
        backend = %storage.backend_type(),
        scale = config.scale,
        allowed_extensions = ?config.allowed_extensions,
        destination_suffix = %config.destination_suffix,
        "Resize function starting"
    );

    let pipeline = ResizePipeline::new(config, storage);

    run(service_fn(|event: LambdaEvent<S3Event>| {
        function_handler(event, &pipeline)
    }))
    .await
}
