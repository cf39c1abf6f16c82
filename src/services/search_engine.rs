use std::time::{Duration, Instant};

use reqwest::{Client as HttpClient, Url};

use crate::{
    error::{AppError, AppResult},
    models::SearchResultSet,
};

/// Outbound search engine abstraction
///
/// Implementations perform exactly one request per call and never retry.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait SearchEngine: Send + Sync {
    /// Executes a fully built search URL and decodes the result set
    async fn execute(&self, url: Url) -> AppResult<SearchResultSet>;

    /// Engine name for logging
    fn name(&self) -> &'static str;
}

/// Vespa search container reached over HTTP
#[derive(Clone)]
pub struct VespaClient {
    http_client: HttpClient,
}

impl VespaClient {
    pub fn new(timeout: Duration) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;
        Ok(Self { http_client })
    }
}

/// Decodes a response body, keeping decode failures apart from transport ones
pub fn decode_result_set(body: &[u8]) -> AppResult<SearchResultSet> {
    serde_json::from_slice(body).map_err(|e| AppError::Decode(e.to_string()))
}

#[async_trait::async_trait]
impl SearchEngine for VespaClient {
    async fn execute(&self, url: Url) -> AppResult<SearchResultSet> {
        let start = Instant::now();

        let response = self.http_client.get(url).send().await.map_err(|e| {
            tracing::error!(error = %e, engine = self.name(), "Search request failed");
            AppError::Upstream(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                status = status.as_u16(),
                body = %body,
                engine = self.name(),
                "Search engine returned error"
            );
            return Err(AppError::UpstreamStatus {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|e| {
            tracing::error!(error = %e, engine = self.name(), "Reading search response failed");
            AppError::Upstream(e.to_string())
        })?;
        let result = decode_result_set(&body)?;

        tracing::debug!(
            hits = result.hits().len(),
            total_count = result.total_count(),
            duration_ms = start.elapsed().as_millis() as u64,
            engine = self.name(),
            "Search engine responded"
        );

        Ok(result)
    }

    fn name(&self) -> &'static str {
        "vespa"
    }
}
