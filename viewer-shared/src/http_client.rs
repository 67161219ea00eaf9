//! Thin JSON-over-HTTP client used to talk to the stats stub.

use serde::de::DeserializeOwned;
use std::time::Duration;

/// Failure talking to the stub, split by whether the server answered at all.
#[derive(Debug, thiserror::Error)]
pub enum HttpClientError {
    /// No reply at all, either refused or timed out
    #[error("server unreachable: {0}")]
    Unreachable(String),
    /// The server replied with a non-2xx status
    #[error("server replied {status}: {body}")]
    Status { status: u16, body: String },
    /// The reply arrived but could not be read as the expected JSON
    #[error("bad response: {0}")]
    BadResponse(String),
}

impl From<reqwest::Error> for HttpClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            HttpClientError::Unreachable(err.to_string())
        } else {
            HttpClientError::BadResponse(err.to_string())
        }
    }
}

/// Request timeout applied by [`HttpClient::new`].
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct HttpClient {
    base_url: String,
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET `path` (relative to the base URL) and decode the JSON body.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, HttpClientError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(HttpClientError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| HttpClientError::BadResponse(e.to_string()))
    }
}
