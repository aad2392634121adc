//! Remote feed fetching.

use std::time::{Duration, Instant};

use crate::catalog::sort_live_first;
use crate::config::FeedConfig;
use crate::feed::types::{FeedDocument, Match};
use crate::observability::metrics;

/// Errors from fetching or decoding the feed.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("feed request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("feed returned HTTP status {0}")]
    Status(u16),
    #[error("feed document is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

/// HTTP client for the match feed.
#[derive(Clone)]
pub struct FeedClient {
    client: reqwest::Client,
    url: String,
}

impl FeedClient {
    /// Create a client for the configured feed.
    pub fn new(config: &FeedConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self::with_client(client, &config.url))
    }

    /// Create a client reusing an existing connection pool.
    pub fn with_client(client: reqwest::Client, url: &str) -> Self {
        Self {
            client,
            url: url.to_string(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch the feed and return its matches sorted live-first.
    pub async fn fetch(&self) -> Result<Vec<Match>, FeedError> {
        let start = Instant::now();
        let result = self.fetch_inner().await;

        match &result {
            Ok(matches) => {
                metrics::record_feed_fetch("ok", start);
                tracing::info!(url = %self.url, count = matches.len(), "Feed fetched");
            }
            Err(e) => {
                metrics::record_feed_fetch("error", start);
                tracing::error!(url = %self.url, error = %e, "Failed to fetch matches");
            }
        }

        result
    }

    async fn fetch_inner(&self) -> Result<Vec<Match>, FeedError> {
        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        let mut matches = parse_feed(&body)?;
        sort_live_first(&mut matches);
        Ok(matches)
    }
}

/// Decode a feed document body into its match list.
pub fn parse_feed(body: &[u8]) -> Result<Vec<Match>, FeedError> {
    let document: FeedDocument = serde_json::from_slice(body)?;
    Ok(document.matches)
}
