//! imgshrink CLI: run the resize pipeline against one object, or preview what it would do.
//!
//! Reads the same environment as the Lambda function (RESIZE_SCALE, ALLOWED_EXTENSIONS,
//! DESTINATION_BUCKET_SUFFIX, STORAGE_BACKEND, ...). A `.env` file is honored.

use anyhow::Context;
use clap::{Parser, Subcommand};
use imgshrink_cli::{describe_outcome, init_tracing, inspection_report};
use imgshrink_core::{ChangeNotification, ResizeConfig};
use imgshrink_processing::{admit_key, ImageTypeValidator, ResizePipeline};
use imgshrink_storage::create_storage;

#[derive(Parser)]
#[command(name = "imgshrink", about = "Shrink uploaded images into a sibling bucket")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resize one object, upload the copy and delete the source
    Run {
        /// Source bucket
        #[arg(long)]
        bucket: String,
        /// Object key, already decoded
        #[arg(long)]
        key: String,
    },
    /// Show how a key would be handled, without touching storage
    Inspect {
        /// Source bucket
        #[arg(long)]
        bucket: String,
        /// Object key, already decoded
        #[arg(long)]
        key: String,
    },
}

fn load_config() -> anyhow::Result<ResizeConfig> {
    let config = ResizeConfig::from_env().context("Failed to read configuration")?;
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { bucket, key } => {
            let config = load_config()?;
            let storage = create_storage(&config.storage)
                .await
                .context("Failed to initialize storage")?;
            let pipeline = ResizePipeline::new(config, storage);

            let outcome = pipeline
                .handle(&ChangeNotification::new(bucket.as_str(), key.as_str()))
                .await
                .with_context(|| format!("Failed to resize {}/{}", bucket, key))?;
            println!("{}", describe_outcome(&outcome));
        }
        Commands::Inspect { bucket, key } => {
            let config = load_config()?;
            let validator = ImageTypeValidator::new(config.allowed_extensions.clone());
            let admission = admit_key(&validator, &key)?;

            let report = inspection_report(&config, &bucket, &key, &admission);
            let out = serde_json::to_string_pretty(&report).context("Serialize report")?;
            println!("{}", out);
        }
    }

    Ok(())
}
