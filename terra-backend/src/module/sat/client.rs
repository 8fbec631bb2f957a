///! CelesTrak TLE client
///!
///! Downloads 3LE text for a set of CelesTrak groups, parses it and stamps
///! every record with its position at fetch time.

use async_trait::async_trait;
use chrono::Utc;
use futures::future::join_all;
use reqwest::Client;
use std::collections::HashSet;
use std::time::Duration;

use super::tle::parse_many;
use super::types::OrbitalElementSet;
use crate::error::{FeedError, FeedResult};
use crate::module::feed::{LiveFeed, build_http_client};

pub const CELESTRAK_GP_URL: &str = "https://celestrak.org/NORAD/elements/gp.php";

/// Satellite TLE client
pub struct CelestrakClient {
    client: Client,
    base_url: String,
    groups: Vec<String>,
}

impl CelestrakClient {
    pub fn new(base_url: impl Into<String>, groups: Vec<String>, timeout: Duration) -> FeedResult<Self> {
        Ok(Self {
            client: build_http_client(timeout)?,
            base_url: base_url.into(),
            groups,
        })
    }

    pub fn groups(&self) -> &[String] {
        &self.groups
    }

    /// Fetch and parse one CelesTrak group (no propagation)
    pub async fn fetch_group(&self, group: &str) -> FeedResult<Vec<OrbitalElementSet>> {
        tracing::debug!("Fetching CelesTrak group '{}' from {}", group, self.base_url);

        let response = self
            .client
            .get(&self.base_url)
            .query(&[("GROUP", group), ("FORMAT", "tle")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::from_status(status));
        }

        let text = response.text().await?;
        Ok(parse_many(&text))
    }

    /// Fetch all configured groups, merge by catalog id and propagate to now
    ///
    /// A failing group is logged and skipped; the call only fails when every
    /// group failed.
    pub async fn fetch_satellites(&self) -> FeedResult<Vec<OrbitalElementSet>> {
        let results = join_all(self.groups.iter().map(|g| self.fetch_group(g))).await;

        let mut seen = HashSet::new();
        let mut satellites = Vec::new();
        let mut first_error = None;
        let mut any_success = false;

        for (group, result) in self.groups.iter().zip(results) {
            match result {
                Ok(records) => {
                    any_success = true;
                    tracing::debug!("CelesTrak group '{}': {} records", group, records.len());
                    for record in records {
                        if seen.insert(record.catalog_id.clone()) {
                            satellites.push(record);
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!("CelesTrak group '{}' failed: {}", group, e);
                    first_error.get_or_insert(e);
                }
            }
        }

        if !any_success {
            if let Some(e) = first_error {
                return Err(e);
            }
        }

        let now = Utc::now();
        for sat in &mut satellites {
            sat.update_position(now);
        }

        Ok(satellites)
    }
}

#[async_trait]
impl LiveFeed for CelestrakClient {
    type Output = Vec<OrbitalElementSet>;

    fn name(&self) -> &str {
        "celestrak"
    }

    async fn fetch(&self) -> FeedResult<Vec<OrbitalElementSet>> {
        self.fetch_satellites().await
    }
}
