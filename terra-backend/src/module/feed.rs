//! Common contract for live data source clients
//!
//! Each external feed is wrapped in a client implementing [`LiveFeed`]. The
//! refresh orchestrator only sees `Arc<dyn LiveFeed<Output = ..>>`, so real
//! HTTP clients and test doubles are interchangeable.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::error::FeedError;

const USER_AGENT: &str = concat!("terra-backend/", env!("CARGO_PKG_VERSION"));

#[async_trait]
pub trait LiveFeed: Send + Sync {
    type Output: Send + 'static;

    /// Short name used in log lines
    fn name(&self) -> &str;

    /// Fetch and decode one snapshot from the source
    async fn fetch(&self) -> Result<Self::Output, FeedError>;
}

/// Build the HTTP client used by all feeds
pub fn build_http_client(timeout: Duration) -> Result<Client, FeedError> {
    Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| FeedError::InvalidRequest(format!("Failed to build HTTP client: {}", e)))
}
