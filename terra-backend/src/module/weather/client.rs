///! RainViewer weather-timestamp client
///!
///! The frame index changes every few minutes, so parsed timestamps are
///! cached for five minutes and the accessors only hit the network when the
///! cache is stale. The scheduled feed path always refetches and refills
///! that cache.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use super::parser::parse_weather_maps;
use super::types::WeatherFrames;
use crate::error::{FeedError, FeedResult};
use crate::module::feed::{LiveFeed, build_http_client};

pub const RAINVIEWER_MAPS_URL: &str = "https://api.rainviewer.com/public/weather-maps.json";
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);

#[derive(Debug, Default)]
struct FrameCache {
    fetched_at: Option<Instant>,
    frames: WeatherFrames,
}

pub struct RainViewerClient {
    client: Client,
    url: String,
    cache_ttl: Duration,
    cache: RwLock<FrameCache>,
}

impl RainViewerClient {
    pub fn new(url: impl Into<String>, cache_ttl: Duration, timeout: Duration) -> FeedResult<Self> {
        Ok(Self {
            client: build_http_client(timeout)?,
            url: url.into(),
            cache_ttl,
            cache: RwLock::new(FrameCache::default()),
        })
    }

    /// Frame timestamps, fetched only when the cache is stale or empty
    pub async fn fetch_frames(&self) -> FeedResult<WeatherFrames> {
        {
            let cache = self.cache.read().await;
            if let Some(fetched_at) = cache.fetched_at {
                if fetched_at.elapsed() < self.cache_ttl && !cache.frames.radar.is_empty() {
                    return Ok(cache.frames.clone());
                }
            }
        }

        self.refresh_frames().await
    }

    /// Always hit the network and replace the cached frames
    pub async fn refresh_frames(&self) -> FeedResult<WeatherFrames> {
        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::from_status(status));
        }
        let body = response.text().await?;
        let (mut frames, has_satellite) = parse_weather_maps(&body)?;

        let mut cache = self.cache.write().await;
        if !has_satellite {
            frames.satellite = std::mem::take(&mut cache.frames.satellite);
        }
        cache.fetched_at = Some(Instant::now());
        cache.frames = frames.clone();

        tracing::info!(
            "RainViewer: {} radar frames, {} satellite frames",
            frames.radar.len(),
            frames.satellite.len()
        );

        Ok(frames)
    }

    /// Most recent radar frame, or the current time if none is available
    pub async fn latest_radar_timestamp(&self) -> i64 {
        match self.fetch_frames().await {
            Ok(frames) => frames.latest_radar().unwrap_or_else(now_unix),
            Err(e) => {
                tracing::warn!("Failed to fetch radar timestamps: {}", e);
                now_unix()
            }
        }
    }

    /// Most recent infrared satellite frame, or the current time if none is available
    pub async fn latest_satellite_timestamp(&self) -> i64 {
        match self.fetch_frames().await {
            Ok(frames) => frames.latest_satellite().unwrap_or_else(now_unix),
            Err(e) => {
                tracing::warn!("Failed to fetch satellite timestamps: {}", e);
                now_unix()
            }
        }
    }

    /// Cached radar frames for animation (no network access)
    pub async fn radar_frames(&self) -> Vec<i64> {
        self.cache.read().await.frames.radar.clone()
    }
}

fn now_unix() -> i64 {
    Utc::now().timestamp()
}

#[async_trait]
impl LiveFeed for RainViewerClient {
    type Output = WeatherFrames;

    fn name(&self) -> &str {
        "rainviewer"
    }

    /// Scheduled refreshes bypass the accessor cache
    async fn fetch(&self) -> FeedResult<WeatherFrames> {
        self.refresh_frames().await
    }
}
