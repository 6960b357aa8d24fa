//! Core data types for the fetch pipeline
//! Pure data structures with no I/O

use chrono::NaiveDate;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use thiserror::Error;

/// A state and its sample districts, in fetch order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub state: String,
    pub districts: Vec<String>,
}

impl Region {
    pub fn new(state: &str, districts: &[&str]) -> Self {
        Region {
            state: state.to_string(),
            districts: districts.iter().map(|d| d.to_string()).collect(),
        }
    }
}

/// A remote dataset: registry key, portal endpoint name and owning agency
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    pub key: String,
    pub endpoint: String,
    pub agency: String,
}

/// Fixed request window sent with every district query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub page: u32,
    pub size: u32,
}

impl Default for QueryWindow {
    fn default() -> Self {
        QueryWindow {
            start: NaiveDate::from_ymd_opt(2024, 1, 1).expect("static start date"),
            end: NaiveDate::from_ymd_opt(2025, 12, 31).expect("static end date"),
            page: 0,
            size: 500,
        }
    }
}

/// Everything the dataset client needs to issue one district request
#[derive(Debug, Clone, Copy)]
pub struct DistrictQuery<'a> {
    pub source: &'a Source,
    pub state: &'a str,
    pub district: &'a str,
    pub window: &'a QueryWindow,
}

/// Raw upstream reply, before classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// Why a single district fetch produced no payload
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("HTTP {0}")]
    Status(u16),

    #[error("Invalid JSON")]
    InvalidJson,

    #[error("{0}")]
    Timeout(String),

    #[error("{0}")]
    Transport(String),
}

/// Outcome of one district fetch
#[derive(Debug, Clone, PartialEq)]
pub enum DistrictResult {
    Data(serde_json::Value),
    Failed(FetchError),
}

impl DistrictResult {
    pub fn is_ok(&self) -> bool {
        matches!(self, DistrictResult::Data(_))
    }

    /// Short label for log lines
    pub fn outcome(&self) -> String {
        match self {
            DistrictResult::Data(_) => "200".to_string(),
            DistrictResult::Failed(e) => e.to_string(),
        }
    }
}

impl Serialize for DistrictResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            DistrictResult::Data(value) => value.serialize(serializer),
            DistrictResult::Failed(e) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("error", &e.to_string())?;
                map.end()
            }
        }
    }
}

/// Per-state results of one fetch run. Districts keep catalog order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FetchResult {
    pub state: String,
    #[serde(serialize_with = "serialize_districts")]
    pub districts: Vec<(String, DistrictResult)>,
}

impl FetchResult {
    pub fn new(state: &str) -> Self {
        FetchResult {
            state: state.to_string(),
            districts: Vec::new(),
        }
    }

    pub fn insert(&mut self, district: &str, result: DistrictResult) {
        self.districts.push((district.to_string(), result));
    }
}

fn serialize_districts<S: Serializer>(
    districts: &[(String, DistrictResult)],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(districts.len()))?;
    for (name, result) in districts {
        map.serialize_entry(name, result)?;
    }
    map.end()
}

/// Run-level answer reported back to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Completed,
    InvalidSource,
}

impl Serialize for RunStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            RunStatus::Completed => serializer.serialize_str("Completed"),
            RunStatus::InvalidSource => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("error", "Invalid API key")?;
                map.end()
            }
        }
    }
}

/// Fetch run statistics
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunStats {
    pub districts: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub files_written: usize,
}

impl RunStats {
    pub fn record(&mut self, result: &DistrictResult) {
        self.districts += 1;
        if result.is_ok() {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
    }
}

impl std::fmt::Display for RunStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "districts: {}, succeeded: {}, failed: {}, files: {}",
            self.districts, self.succeeded, self.failed, self.files_written
        )
    }
}

/// Status plus stats for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub status: RunStatus,
    pub stats: RunStats,
}
