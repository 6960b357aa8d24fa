//! Batch fetch runner - runs fetches without the HTTP server

use anyhow::Result;
use std::env;
use tracing::{error, info, warn};
use wris_backend::{build_pipeline, log_filter};
use wris_backend::config::Config;
use wris_backend::ingestion::RunStatus;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var("RUST_LOG").ok().as_deref()))
        .with_target(false)
        .with_thread_ids(false)
        .with_level(true)
        .init();

    info!("Starting batch fetch");

    let config = Config::from_env()?;
    info!("Configuration loaded");

    let pipeline = build_pipeline(&config)?;

    // Source keys from command line args, or every registered source
    let args: Vec<String> = env::args().skip(1).collect();
    let sources = if args.is_empty() {
        pipeline.registry().keys().map(str::to_string).collect()
    } else {
        args
    };

    for source_key in sources {
        info!("Running fetch for: {}", source_key);

        match pipeline.run(&source_key).await {
            Ok(report) if report.status == RunStatus::InvalidSource => {
                warn!("Unknown source: {}", source_key);
            }
            Ok(report) => {
                info!("✓ {} completed: {}", source_key, report.stats);
            }
            Err(e) => {
                error!("✗ {} failed: {:#}", source_key, e);
            }
        }
    }

    info!("Batch fetch complete");

    Ok(())
}
