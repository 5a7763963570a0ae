use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, REFERER, USER_AGENT};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Trend sites reject requests that do not look like a desktop browser.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

const BROWSER_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";

/// Why a single source in a chain produced nothing.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("{source_name} timed out after {timeout:?}")]
    Timeout {
        source_name: String,
        timeout: Duration,
    },

    #[error("{source_name} returned HTTP {status}")]
    Status { source_name: String, status: u16 },

    #[error("{source_name} request failed: {message}")]
    Network {
        source_name: String,
        message: String,
    },

    #[error("{source_name} yielded {found} usable tags")]
    InsufficientYield { source_name: String, found: usize },
}

impl SourceError {
    /// `true` for transport-level failures (as opposed to a page that parsed
    /// but did not contain enough tags).
    #[must_use]
    pub const fn is_unavailable(&self) -> bool {
        !matches!(self, Self::InsufficientYield { .. })
    }
}

/// A GET against one external page.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub source_name: String,
    pub url: String,
    pub accept_language: String,
    pub referer: String,
    pub timeout: Duration,
}

#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, request: &FetchRequest) -> Result<String, SourceError>;
}

#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    #[must_use]
    pub const fn with_shared_client(client: Client) -> Self {
        Self { client }
    }

    async fn get(&self, request: &FetchRequest) -> Result<String, SourceError> {
        let network = |e: reqwest::Error| SourceError::Network {
            source_name: request.source_name.clone(),
            message: e.to_string(),
        };

        let response = self
            .client
            .get(&request.url)
            .header(USER_AGENT, BROWSER_USER_AGENT)
            .header(ACCEPT, BROWSER_ACCEPT)
            .header(ACCEPT_LANGUAGE, &request.accept_language)
            .header(REFERER, &request.referer)
            .send()
            .await
            .map_err(network)?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                source_name: request.source_name.clone(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(network)
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, request: &FetchRequest) -> Result<String, SourceError> {
        debug!(source = %request.source_name, url = %request.url, "Fetching trend source");

        // Covers connect, headers and body; the future is dropped on expiry.
        match tokio::time::timeout(request.timeout, self.get(request)).await {
            Ok(result) => result,
            Err(_) => Err(SourceError::Timeout {
                source_name: request.source_name.clone(),
                timeout: request.timeout,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yield_errors_are_not_unavailability() {
        let timeout = SourceError::Timeout {
            source_name: "a".into(),
            timeout: Duration::from_secs(8),
        };
        let short = SourceError::InsufficientYield {
            source_name: "a".into(),
            found: 1,
        };
        assert!(timeout.is_unavailable());
        assert!(!short.is_unavailable());
        assert_eq!(short.to_string(), "a yielded 1 usable tags");
    }

    #[tokio::test]
    async fn test_unreachable_host_is_reported_not_raised() {
        let fetcher = HttpFetcher::with_shared_client(Client::new());
        let request = FetchRequest {
            source_name: "local".into(),
            url: "http://127.0.0.1:9/".into(),
            accept_language: "en-US,en;q=0.9".into(),
            referer: "https://www.google.com/".into(),
            timeout: Duration::from_secs(2),
        };
        let err = fetcher.fetch(&request).await.unwrap_err();
        assert!(err.is_unavailable());
    }
}
