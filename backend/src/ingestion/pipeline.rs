//! Fetch orchestrator - walks the catalog and writes one file per state

use crate::ingestion::catalog::{RegionCatalog, SourceRegistry};
use crate::ingestion::fetch::DatasetClient;
use crate::ingestion::parse::classify;
use crate::ingestion::types::{
    DistrictQuery, FetchResult, QueryWindow, Region, RunReport, RunStats, RunStatus, Source,
};
use crate::ingestion::utils::output_dir_name;
use crate::ingestion::write::{write_state_result, StorageWriter};
use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Runs fetches for one source key at a time.
///
/// Reference data and the query window are fixed at construction; the client
/// and writer are injected so runs can be pointed at fakes.
#[derive(Clone)]
pub struct Pipeline {
    catalog: Arc<RegionCatalog>,
    registry: Arc<SourceRegistry>,
    window: QueryWindow,
    client: Arc<dyn DatasetClient>,
    writer: Arc<dyn StorageWriter>,
}

impl Pipeline {
    pub fn new(
        catalog: Arc<RegionCatalog>,
        registry: Arc<SourceRegistry>,
        window: QueryWindow,
        client: Arc<dyn DatasetClient>,
        writer: Arc<dyn StorageWriter>,
    ) -> Self {
        Pipeline {
            catalog,
            registry,
            window,
            client,
            writer,
        }
    }

    pub fn registry(&self) -> &SourceRegistry {
        &self.registry
    }

    /// Fetch every district of every region for `source_key`.
    ///
    /// Unknown keys return `InvalidSource` before any I/O. Per-district
    /// failures are recorded in the output files; only storage errors abort.
    pub async fn run(&self, source_key: &str) -> Result<RunReport> {
        let Some(source) = self.registry.get(source_key) else {
            warn!("Unknown source key: {}", source_key);
            return Ok(RunReport {
                status: RunStatus::InvalidSource,
                stats: RunStats::default(),
            });
        };

        info!(
            "Fetching {} ({} / {}) for {} regions",
            source.key,
            source.endpoint,
            source.agency,
            self.catalog.regions().len()
        );

        let dir_name = output_dir_name(&source.key);
        let dir = Path::new(&dir_name);
        self.writer.ensure_dir(dir).await?;

        let mut stats = RunStats::default();

        for region in self.catalog.regions() {
            let result = self.fetch_region(source, region, &mut stats).await;
            write_state_result(self.writer.as_ref(), dir, &result).await?;
            stats.files_written += 1;
        }

        info!("Fetch run for {} complete: {}", source.key, stats);

        Ok(RunReport {
            status: RunStatus::Completed,
            stats,
        })
    }

    async fn fetch_region(&self, source: &Source, region: &Region, stats: &mut RunStats) -> FetchResult {
        let mut result = FetchResult::new(&region.state);

        for district in &region.districts {
            let query = DistrictQuery {
                source,
                state: &region.state,
                district,
                window: &self.window,
            };

            let district_result = classify(self.client.fetch(&query).await);
            info!("{} {} {}", region.state, district, district_result.outcome());

            stats.record(&district_result);
            result.insert(district, district_result);
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingestion::fetch::mock::{MockCall, MockDatasetClient};
    use crate::ingestion::types::{FetchError, HttpResponse};
    use crate::ingestion::write::memory::MemoryWriter;
    use serde_json::json;
    use std::collections::BTreeSet;
    use std::path::PathBuf;

    fn pipeline(client: &MockDatasetClient, writer: &Arc<MemoryWriter>) -> Pipeline {
        Pipeline::new(
            Arc::new(RegionCatalog::india()),
            Arc::new(SourceRegistry::india_wris()),
            QueryWindow::default(),
            Arc::new(client.clone()),
            writer.clone(),
        )
    }

    #[tokio::test]
    async fn test_one_file_per_region_with_all_districts() {
        let client = MockDatasetClient::replying(200, r#"{"level": 12.5}"#);
        let writer = Arc::new(MemoryWriter::new());
        let catalog = RegionCatalog::india();

        let report = pipeline(&client, &writer).run("groundwater").await.unwrap();
        assert_eq!(report.status, RunStatus::Completed);
        assert_eq!(report.stats.files_written, catalog.regions().len());
        assert_eq!(report.stats.districts, catalog.district_count());
        assert_eq!(report.stats.failed, 0);

        let files = writer.files();
        assert_eq!(files.len(), catalog.regions().len());

        for region in catalog.regions() {
            let path = format!("groundwater_data/{}.json", region.state.replace(' ', "_"));
            let written = writer.file_json(&path).unwrap();
            assert_eq!(written["state"], region.state.as_str());

            let districts: Vec<&String> = written["districts"]
                .as_object()
                .unwrap()
                .keys()
                .collect();
            assert_eq!(districts, region.districts.iter().collect::<Vec<_>>());
        }

        assert_eq!(writer.dirs(), vec![PathBuf::from("groundwater_data")]);
    }

    #[tokio::test]
    async fn test_invalid_key_does_no_io() {
        let client = MockDatasetClient::replying(200, "{}");
        let writer = Arc::new(MemoryWriter::new());

        let report = pipeline(&client, &writer).run("snowfall").await.unwrap();
        assert_eq!(report.status, RunStatus::InvalidSource);
        assert!(client.calls().is_empty());
        assert!(writer.files().is_empty());
        assert!(writer.dirs().is_empty());
    }

    #[tokio::test]
    async fn test_district_failures_are_recorded_in_place() {
        let client = MockDatasetClient::replying(200, r#"{"level": 1}"#);
        client.set_district(
            "North Goa",
            Ok(HttpResponse {
                status: 200,
                body: "not json".to_string(),
            }),
        );
        client.set_district(
            "South Goa",
            Ok(HttpResponse {
                status: 404,
                body: String::new(),
            }),
        );
        client.set_district(
            "Panaji",
            Err(FetchError::Timeout(
                "request timed out after 25s".to_string(),
            )),
        );
        client.set_district(
            "Kohima",
            Err(FetchError::Transport("connection refused".to_string())),
        );
        let writer = Arc::new(MemoryWriter::new());

        let report = pipeline(&client, &writer).run("rainfall").await.unwrap();
        assert_eq!(report.status, RunStatus::Completed);
        assert_eq!(report.stats.failed, 4);

        let goa = writer.file_json("rainfall_data/Goa.json").unwrap();
        assert_eq!(goa["districts"]["North Goa"], json!({"error": "Invalid JSON"}));
        assert_eq!(goa["districts"]["South Goa"], json!({"error": "HTTP 404"}));
        let timeout = goa["districts"]["Panaji"]["error"].as_str().unwrap();
        assert!(timeout.contains("timed out"));

        let nagaland = writer.file_json("rainfall_data/Nagaland.json").unwrap();
        assert_eq!(
            nagaland["districts"]["Kohima"],
            json!({"error": "connection refused"})
        );
        assert_eq!(nagaland["districts"]["Dimapur"], json!({"level": 1}));
    }

    #[tokio::test]
    async fn test_goa_scenario() {
        let client = MockDatasetClient::replying(200, r#"{"level": 12.5}"#);
        let writer = Arc::new(MemoryWriter::new());

        pipeline(&client, &writer).run("rainfall").await.unwrap();

        assert_eq!(
            writer.file_json("rainfall_data/Goa.json").unwrap(),
            json!({
                "state": "Goa",
                "districts": {
                    "North Goa": {"level": 12.5},
                    "South Goa": {"level": 12.5},
                    "Panaji": {"level": 12.5}
                }
            })
        );
    }

    #[tokio::test]
    async fn test_requests_are_sequential_and_ordered() {
        let client = MockDatasetClient::replying(200, "{}");
        let writer = Arc::new(MemoryWriter::new());
        let catalog = RegionCatalog::india();

        pipeline(&client, &writer).run("groundwater").await.unwrap();

        let expected: Vec<MockCall> = catalog
            .regions()
            .iter()
            .flat_map(|r| {
                r.districts.iter().map(move |d| MockCall {
                    source: "groundwater".to_string(),
                    state: r.state.clone(),
                    district: d.clone(),
                })
            })
            .collect();
        assert_eq!(client.calls(), expected);
        assert_eq!(client.max_in_flight(), 1);
    }

    #[tokio::test]
    async fn test_rerun_is_byte_identical() {
        let client = MockDatasetClient::replying(200, r#"{"b": 2, "a": [1, {"z": 0, "y": 1}]}"#);
        let writer = Arc::new(MemoryWriter::new());
        let pipeline = pipeline(&client, &writer);

        pipeline.run("groundwater").await.unwrap();
        let first = writer.files();
        pipeline.run("groundwater").await.unwrap();
        let second = writer.files();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_storage_failure_aborts_run() {
        let client = MockDatasetClient::replying(200, "{}");
        let writer = Arc::new(MemoryWriter::failing_after(2));

        let result = pipeline(&client, &writer).run("rainfall").await;
        assert!(result.is_err());

        // Two regions written, third region fetched then failed; nothing after
        let written: BTreeSet<_> = writer.files().into_keys().collect();
        assert_eq!(
            written,
            BTreeSet::from([
                PathBuf::from("rainfall_data/Andhra_Pradesh.json"),
                PathBuf::from("rainfall_data/Telangana.json"),
            ])
        );
        assert_eq!(client.calls().len(), 9);
    }
}
