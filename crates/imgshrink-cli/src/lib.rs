use imgshrink_core::{PipelineOutcome, ResizeConfig};
use imgshrink_processing::{Admission, ImageTypeValidator};
use serde_json::{json, Value};
use std::collections::BTreeMap;

/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}

/// One-line summary of a pipeline outcome.
pub fn describe_outcome(outcome: &PipelineOutcome) -> String {
    match outcome {
        PipelineOutcome::Skipped(reason) => format!("skipped: {}", reason),
        PipelineOutcome::Completed(report) => format!(
            "Ok {}/{} ({}x{}) -> {} ({}x{}, {} bytes, {})",
            report.source_bucket,
            report.source_key,
            report.source_dimensions.0,
            report.source_dimensions.1,
            report.destination.location(),
            report.target_dimensions.0,
            report.target_dimensions.1,
            report.destination.metadata.content_length,
            report.destination.metadata.content_type,
        ),
    }
}

/// JSON report of what the pipeline would do with `bucket/key`, without storage access.
///
/// The destination content length is unknown until the image is encoded and is
/// reported as `null`.
pub fn inspection_report(
    config: &ResizeConfig,
    bucket: &str,
    key: &str,
    admission: &Admission,
) -> Value {
    match admission {
        Admission::Accepted { parsed, format } => json!({
            "bucket": bucket,
            "key": key,
            "accepted": true,
            "parsed": parsed,
            "format": format!("{:?}", format),
            "destination": {
                "bucket": config.destination_bucket(bucket),
                "key": parsed.to_key(),
                "content_type": config.content_type_for(&parsed.extension),
                "content_length": Value::Null,
            },
            "scale": config.scale,
        }),
        Admission::Skipped(reason) => json!({
            "bucket": bucket,
            "key": key,
            "accepted": false,
            "reason": reason.to_string(),
            "allowed_extensions": config.allowed_extensions,
            "codec_available": config
                .allowed_extensions
                .iter()
                .map(|ext| {
                    let bare = ext.trim_start_matches('.');
                    (ext.clone(), ImageTypeValidator::format_for(bare).is_some())
                })
                .collect::<BTreeMap<_, _>>(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use imgshrink_core::{DestinationDescriptor, ObjectMetadata, ParsedKey, ResizeReport, SkipReason};
    use imgshrink_processing::{split_key, ImageFormat};

    #[test]
    fn describe_skipped() {
        let outcome = PipelineOutcome::Skipped(SkipReason::MissingExtension {
            key: "README".to_string(),
        });
        assert_eq!(
            describe_outcome(&outcome),
            "skipped: unable to infer image type for key README"
        );
    }

    #[test]
    fn describe_completed() {
        let outcome = PipelineOutcome::Completed(ResizeReport {
            source_bucket: "photos".to_string(),
            source_key: "album/cat.jpg".to_string(),
            destination: DestinationDescriptor {
                bucket: "photos-resized".to_string(),
                key: "album/cat.jpg".to_string(),
                metadata: ObjectMetadata {
                    content_type: "image/jpg".to_string(),
                    content_length: 1234,
                },
            },
            source_dimensions: (200, 100),
            target_dimensions: (100, 50),
        });
        assert_eq!(
            describe_outcome(&outcome),
            "Ok photos/album/cat.jpg (200x100) -> photos-resized/album/cat.jpg (100x50, 1234 bytes, image/jpg)"
        );
    }

    #[test]
    fn inspection_accepted() {
        let config = ResizeConfig::default();
        let parsed: ParsedKey = split_key("album/cat.png").unwrap();
        let admission = Admission::Accepted {
            parsed,
            format: ImageFormat::Png,
        };

        let report = inspection_report(&config, "photos", "album/cat.png", &admission);
        assert_eq!(report["accepted"], true);
        assert_eq!(report["parsed"]["prefix"], "album/");
        assert_eq!(report["parsed"]["name"], "cat");
        assert_eq!(report["destination"]["bucket"], "photos-resized");
        assert_eq!(report["destination"]["content_type"], "image/png");
        assert!(report["destination"]["content_length"].is_null());
    }

    #[test]
    fn inspection_skipped() {
        let config = ResizeConfig::default();
        let admission = Admission::Skipped(SkipReason::UnsupportedExtension {
            name: "notes".to_string(),
            extension: ".txt".to_string(),
        });

        let report = inspection_report(&config, "photos", "notes.txt", &admission);
        assert_eq!(report["accepted"], false);
        assert_eq!(report["reason"], "notes has unsupported image type .txt");
        assert_eq!(report["codec_available"][".jpg"], true);
    }
}
