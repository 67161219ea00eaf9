//! Client for the stats stub's JSON API.

use crate::http_client::{HttpClient, HttpClientError};
use crate::{FrameInfo, HealthInfo, PipelineStats};

/// Client for the stub server's `/api/*` routes.
#[derive(Debug, Clone)]
pub struct ViewerClient {
    http: HttpClient,
}

impl ViewerClient {
    /// Create a new client pointing to the given base URL.
    ///
    /// # Arguments
    ///
    /// * `base_url` - The base URL of the stub server (e.g., "http://localhost:3000")
    pub fn new(base_url: &str) -> Self {
        Self {
            http: HttpClient::new(base_url),
        }
    }

    pub fn base_url(&self) -> &str {
        self.http.base_url()
    }

    /// Fetch metadata for the most recent processed frame.
    pub async fn frame(&self) -> Result<FrameInfo, HttpClientError> {
        self.http.get("/api/frame").await
    }

    /// Fetch the pipeline's current processing statistics.
    pub async fn stats(&self) -> Result<PipelineStats, HttpClientError> {
        self.http.get("/api/stats").await
    }

    pub async fn health(&self) -> Result<HealthInfo, HttpClientError> {
        self.http.get("/health").await
    }
}
