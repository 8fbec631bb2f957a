///! USGS earthquake feed client

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::parser::parse_geojson;
use super::types::SeismicEvent;
use crate::error::{FeedError, FeedResult};
use crate::module::feed::{LiveFeed, build_http_client};

pub const USGS_SUMMARY_URL: &str = "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary";
pub const USGS_QUERY_URL: &str = "https://earthquake.usgs.gov/fdsnws/event/1/query";

/// Pre-built USGS summary feeds (time window × magnitude threshold)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SeismicFeed {
    #[serde(rename = "all_hour")]
    HourAll,
    #[default]
    #[serde(rename = "all_day")]
    DayAll,
    #[serde(rename = "all_week")]
    WeekAll,
    #[serde(rename = "significant_day")]
    DaySignificant,
    #[serde(rename = "significant_week")]
    WeekSignificant,
    #[serde(rename = "2.5_day")]
    Day25,
    #[serde(rename = "2.5_week")]
    Week25,
    #[serde(rename = "4.5_day")]
    Day45,
    #[serde(rename = "4.5_week")]
    Week45,
}

impl SeismicFeed {
    /// Path segment of the summary feed
    pub fn slug(&self) -> &'static str {
        match self {
            SeismicFeed::HourAll => "all_hour",
            SeismicFeed::DayAll => "all_day",
            SeismicFeed::WeekAll => "all_week",
            SeismicFeed::DaySignificant => "significant_day",
            SeismicFeed::WeekSignificant => "significant_week",
            SeismicFeed::Day25 => "2.5_day",
            SeismicFeed::Week25 => "2.5_week",
            SeismicFeed::Day45 => "4.5_day",
            SeismicFeed::Week45 => "4.5_week",
        }
    }
}

/// Parameterized event search
#[derive(Debug, Clone, PartialEq)]
pub struct EventQuery {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub min_magnitude: f64,
    pub max_magnitude: Option<f64>,
    pub limit: u32,
}

impl EventQuery {
    /// Events since `start` up to now, M2.5+, at most 1000
    pub fn since(start: DateTime<Utc>) -> Self {
        Self {
            start,
            end: Utc::now(),
            min_magnitude: 2.5,
            max_magnitude: None,
            limit: 1000,
        }
    }

    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("format", "geojson".to_string()),
            ("starttime", self.start.to_rfc3339_opts(SecondsFormat::Secs, true)),
            ("endtime", self.end.to_rfc3339_opts(SecondsFormat::Secs, true)),
            ("minmagnitude", self.min_magnitude.to_string()),
            ("limit", self.limit.to_string()),
            ("orderby", "time".to_string()),
        ];
        if let Some(max) = self.max_magnitude {
            params.push(("maxmagnitude", max.to_string()));
        }
        params
    }
}

/// Seismic client; [`LiveFeed::fetch`] reads the configured summary feed
pub struct UsgsClient {
    client: Client,
    summary_url: String,
    query_url: String,
    feed: SeismicFeed,
}

impl UsgsClient {
    pub fn new(
        summary_url: impl Into<String>,
        query_url: impl Into<String>,
        feed: SeismicFeed,
        timeout: Duration,
    ) -> FeedResult<Self> {
        Ok(Self {
            client: build_http_client(timeout)?,
            summary_url: summary_url.into(),
            query_url: query_url.into(),
            feed,
        })
    }

    pub fn feed(&self) -> SeismicFeed {
        self.feed
    }

    /// Fetch one of the pre-built summary feeds
    pub async fn fetch_feed(&self, feed: SeismicFeed) -> FeedResult<Vec<SeismicEvent>> {
        let url = format!("{}/{}.geojson", self.summary_url.trim_end_matches('/'), feed.slug());
        tracing::debug!("Fetching USGS feed {}", url);

        let body = self.get_body(self.client.get(&url)).await?;
        parse_geojson(&body)
    }

    /// Run a parameterized event search
    pub async fn fetch_query(&self, query: &EventQuery) -> FeedResult<Vec<SeismicEvent>> {
        if query.start > query.end {
            return Err(FeedError::InvalidRequest("starttime is after endtime".to_string()));
        }

        let request = self.client.get(&self.query_url).query(&query.to_params());
        let body = self.get_body(request).await?;
        parse_geojson(&body)
    }

    async fn get_body(&self, request: reqwest::RequestBuilder) -> FeedResult<String> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::from_status(status));
        }
        Ok(response.text().await?)
    }
}

#[async_trait]
impl LiveFeed for UsgsClient {
    type Output = Vec<SeismicEvent>;

    fn name(&self) -> &str {
        "usgs"
    }

    async fn fetch(&self) -> FeedResult<Vec<SeismicEvent>> {
        self.fetch_feed(self.feed).await
    }
}
