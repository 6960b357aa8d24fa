//! Utility functions for request building and output naming

use crate::ingestion::types::DistrictQuery;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, REFERER, USER_AGENT};

pub const PORTAL_BASE_URL: &str = "https://indiawris.gov.in";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Dataset endpoint for a given portal base, e.g. `https://indiawris.gov.in/Dataset/RainFall`
pub fn dataset_url(base_url: &str, endpoint: &str) -> String {
    format!("{}/Dataset/{}", base_url.trim_end_matches('/'), endpoint)
}

/// Query string parameters for one district request
pub fn query_params(query: &DistrictQuery<'_>) -> Vec<(&'static str, String)> {
    vec![
        ("stateName", query.state.to_string()),
        ("districtName", query.district.to_string()),
        ("agencyName", query.source.agency.clone()),
        ("startdate", query.window.start.format(DATE_FORMAT).to_string()),
        ("enddate", query.window.end.format(DATE_FORMAT).to_string()),
        ("download", "false".to_string()),
        ("page", query.window.page.to_string()),
        ("size", query.window.size.to_string()),
    ]
}

/// Headers the portal expects from a browser
pub fn portal_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(USER_AGENT, HeaderValue::from_static("Mozilla/5.0"));
    headers.insert(REFERER, HeaderValue::from_static("https://indiawris.gov.in/"));
    headers
}

/// Directory that holds every state file for one source
pub fn output_dir_name(source_key: &str) -> String {
    format!("{}_data", source_key)
}

/// File name for a state, spaces replaced by underscores
pub fn state_file_name(state: &str) -> String {
    format!("{}.json", state.replace(' ', "_"))
}
