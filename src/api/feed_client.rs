//! HTTP client for the external match feed.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::env;
use tracing::{debug, warn};

use crate::error::FeedUnavailable;
use crate::models::Match;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Source of the initial match set, called once per active session start.
#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch_matches(&self) -> Result<Vec<Match>, FeedUnavailable>;
}

/// Read-only client for an HTTP match feed serving `GET {base}/matches`.
pub struct FeedClient {
    client: Client,
    base_url: String,
}

impl FeedClient {
    pub fn new(base_url: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, base_url })
    }

    /// Build from `FEED_API_URL`, or `None` when no feed is configured and
    /// the caller should fall back to the bundled fixtures.
    pub fn from_env() -> Result<Option<Self>> {
        match env::var("FEED_API_URL") {
            Ok(url) if !url.trim().is_empty() => Ok(Some(Self::new(url)?)),
            _ => Ok(None),
        }
    }
}

#[async_trait]
impl FeedSource for FeedClient {
    async fn fetch_matches(&self) -> Result<Vec<Match>, FeedUnavailable> {
        let url = format!("{}/matches", self.base_url);
        debug!(url = %url, "Fetching match feed");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| FeedUnavailable(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(FeedUnavailable(format!(
                "feed request failed: {} - {}",
                status, body
            )));
        }

        let matches: Vec<Match> = response
            .json()
            .await
            .map_err(|e| FeedUnavailable(format!("failed to parse feed response: {}", e)))?;

        // Entries with non-positive odds would break the drift invariant;
        // drop them at the boundary.
        let matches: Vec<Match> = matches
            .into_iter()
            .filter(|m| {
                if m.odds.is_valid() {
                    true
                } else {
                    warn!(id = %m.id, "Dropping feed entry with non-positive odds");
                    false
                }
            })
            .collect();

        Ok(matches)
    }
}
