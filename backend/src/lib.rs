// Library module for the API server and ingestion worker

pub mod api;
pub mod config;
pub mod ingestion;

use config::Config;
use ingestion::catalog::{RegionCatalog, SourceRegistry};
use ingestion::fetch::ReqwestDatasetClient;
use ingestion::pipeline::Pipeline;
use ingestion::write::FsWriter;
use ingestion::QueryWindow;
use std::sync::Arc;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Wire the production pipeline: built-in catalog and registry, reqwest client, filesystem output
pub fn build_pipeline(config: &Config) -> anyhow::Result<Pipeline> {
    let client = ReqwestDatasetClient::new(&config.base_url, config.request_timeout)?;

    Ok(Pipeline::new(
        Arc::new(RegionCatalog::india()),
        Arc::new(SourceRegistry::india_wris()),
        QueryWindow::default(),
        Arc::new(client),
        Arc::new(FsWriter::new(&config.output_dir)),
    ))
}

/// Log filter from a `RUST_LOG`-style spec, `info` when unset or empty
pub fn log_filter(spec: Option<&str>) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .parse_lossy(spec.unwrap_or_default())
}
