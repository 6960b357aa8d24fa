//! Parse functions - classify raw upstream replies into district results

use crate::ingestion::types::{DistrictResult, FetchError, HttpResponse};

/// Classify an upstream reply. Only a 200 is decoded; the payload is kept as-is.
pub fn parse_response(response: &HttpResponse) -> DistrictResult {
    if response.status != 200 {
        return DistrictResult::Failed(FetchError::Status(response.status));
    }

    match serde_json::from_str::<serde_json::Value>(&response.body) {
        Ok(value) => DistrictResult::Data(value),
        Err(_) => DistrictResult::Failed(FetchError::InvalidJson),
    }
}

/// Fold a client outcome (reply or transport failure) into a district result
pub fn classify(outcome: Result<HttpResponse, FetchError>) -> DistrictResult {
    match outcome {
        Ok(response) => parse_response(&response),
        Err(e) => DistrictResult::Failed(e),
    }
}
