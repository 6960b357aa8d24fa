//! Fetch functions - issue district requests against the dataset portal

use crate::ingestion::types::{DistrictQuery, FetchError, HttpResponse};
use crate::ingestion::utils::{dataset_url, portal_headers, query_params};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Issues one POST per district. Transport failures come back as `FetchError`,
/// any HTTP status is a successful reply.
#[async_trait]
pub trait DatasetClient: Send + Sync {
    async fn fetch(&self, query: &DistrictQuery<'_>) -> std::result::Result<HttpResponse, FetchError>;
}

/// Production client backed by reqwest
#[derive(Debug, Clone)]
pub struct ReqwestDatasetClient {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl ReqwestDatasetClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .default_headers(portal_headers())
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(ReqwestDatasetClient {
            client,
            base_url: base_url.to_string(),
            timeout,
        })
    }

    fn transport_error(&self, e: reqwest::Error) -> FetchError {
        if e.is_timeout() {
            FetchError::Timeout(format!("request timed out after {:?}: {}", self.timeout, e))
        } else {
            FetchError::Transport(e.to_string())
        }
    }
}

#[async_trait]
impl DatasetClient for ReqwestDatasetClient {
    async fn fetch(&self, query: &DistrictQuery<'_>) -> std::result::Result<HttpResponse, FetchError> {
        let url = dataset_url(&self.base_url, &query.source.endpoint);
        debug!("POST {} ({} / {})", url, query.state, query.district);

        let response = self
            .client
            .post(&url)
            .query(&query_params(query))
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| self.transport_error(e))?;

        Ok(HttpResponse { status, body })
    }
}

#[cfg(test)]
pub(crate) mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    /// A district request as seen by the mock
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct MockCall {
        pub source: String,
        pub state: String,
        pub district: String,
    }

    /// Scripted client: a default reply plus per-district overrides
    #[derive(Clone)]
    pub struct MockDatasetClient {
        default: std::result::Result<HttpResponse, FetchError>,
        overrides: Arc<Mutex<HashMap<String, std::result::Result<HttpResponse, FetchError>>>>,
        calls: Arc<Mutex<Vec<MockCall>>>,
        in_flight: Arc<AtomicUsize>,
        max_in_flight: Arc<AtomicUsize>,
    }

    impl MockDatasetClient {
        pub fn replying(status: u16, body: &str) -> Self {
            MockDatasetClient {
                default: Ok(HttpResponse {
                    status,
                    body: body.to_string(),
                }),
                overrides: Arc::default(),
                calls: Arc::default(),
                in_flight: Arc::default(),
                max_in_flight: Arc::default(),
            }
        }

        pub fn set_district(
            &self,
            district: &str,
            reply: std::result::Result<HttpResponse, FetchError>,
        ) {
            self.overrides
                .lock()
                .unwrap()
                .insert(district.to_string(), reply);
        }

        pub fn calls(&self) -> Vec<MockCall> {
            self.calls.lock().unwrap().clone()
        }

        pub fn max_in_flight(&self) -> usize {
            self.max_in_flight.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl DatasetClient for MockDatasetClient {
        async fn fetch(
            &self,
            query: &DistrictQuery<'_>,
        ) -> std::result::Result<HttpResponse, FetchError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);

            self.calls.lock().unwrap().push(MockCall {
                source: query.source.key.clone(),
                state: query.state.to_string(),
                district: query.district.to_string(),
            });

            let reply = self
                .overrides
                .lock()
                .unwrap()
                .get(query.district)
                .cloned()
                .unwrap_or_else(|| self.default.clone());

            tokio::task::yield_now().await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            reply
        }
    }
}
