///! OpenSky Network flight-state client
///!
///! Anonymous OpenSky access allows roughly one request per 10 seconds, so
///! the client keeps the last result and serves it again for calls made
///! inside the minimum interval.

use async_trait::async_trait;
use reqwest::Client;
use std::time::{Duration, Instant};
use terra_common::BoundingBox;
use tokio::sync::RwLock;

use super::parser::parse_states_json;
use super::types::FlightState;
use crate::error::{FeedError, FeedResult};
use crate::module::feed::{LiveFeed, build_http_client};

pub const OPENSKY_STATES_URL: &str = "https://opensky-network.org/api/states/all";
pub const DEFAULT_MIN_INTERVAL: Duration = Duration::from_secs(10);

#[derive(Debug, Default)]
struct FlightCache {
    fetched_at: Option<Instant>,
    flights: Vec<FlightState>,
}

/// Flight-state client with a shared in-memory cache
pub struct OpenSkyClient {
    client: Client,
    base_url: String,
    min_interval: Duration,
    cache: RwLock<FlightCache>,
}

impl OpenSkyClient {
    pub fn new(base_url: impl Into<String>, min_interval: Duration, timeout: Duration) -> FeedResult<Self> {
        Ok(Self {
            client: build_http_client(timeout)?,
            base_url: base_url.into(),
            min_interval,
            cache: RwLock::new(FlightCache::default()),
        })
    }

    /// Fetch all flights worldwide, honoring the minimum request interval
    pub async fn fetch_flights(&self) -> FeedResult<Vec<FlightState>> {
        {
            let cache = self.cache.read().await;
            if let Some(fetched_at) = cache.fetched_at {
                if fetched_at.elapsed() < self.min_interval {
                    tracing::debug!(
                        "OpenSky: serving {} cached flights ({:.1}s old)",
                        cache.flights.len(),
                        fetched_at.elapsed().as_secs_f64()
                    );
                    return Ok(cache.flights.clone());
                }
            }
        }

        let flights = self.request(None).await?;

        // Cache and timestamp are replaced together
        let mut cache = self.cache.write().await;
        cache.fetched_at = Some(Instant::now());
        cache.flights = flights.clone();

        Ok(flights)
    }

    /// Fetch flights inside a bounding box (not cached)
    pub async fn fetch_flights_in(&self, bbox: &BoundingBox) -> FeedResult<Vec<FlightState>> {
        if bbox.min_lat > bbox.max_lat || bbox.min_lon > bbox.max_lon {
            return Err(FeedError::InvalidRequest(format!("Inverted bounding box: {:?}", bbox)));
        }
        self.request(Some(bbox)).await
    }

    async fn request(&self, bbox: Option<&BoundingBox>) -> FeedResult<Vec<FlightState>> {
        let mut request = self.client.get(&self.base_url);
        if let Some(b) = bbox {
            request = request.query(&[
                ("lamin", b.min_lat),
                ("lamax", b.max_lat),
                ("lomin", b.min_lon),
                ("lomax", b.max_lon),
            ]);
        }

        let response = request.send().await?;
        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(FeedError::from_status(status));
        }

        let body = response.text().await?;
        parse_states_json(&body)
    }
}

#[async_trait]
impl LiveFeed for OpenSkyClient {
    type Output = Vec<FlightState>;

    fn name(&self) -> &str {
        "opensky"
    }

    async fn fetch(&self) -> FeedResult<Vec<FlightState>> {
        self.fetch_flights().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::spawn_server;
    use axum::{Router, extract::Query, http::StatusCode, routing::get};
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const BODY: &str = r#"{"time":1704067200,"states":[
        ["a808c4","SWA1234 ","United States",1704067190,1704067195,-97.03,32.89,10363.2,false,231.5,45.2,0.0,null,10500.0,"3456",false,0],
        ["4ca2b1","RYR12AB ","Ireland",1704067190,1704067195,-6.27,53.42,null,true,0.0,270.0,null,null,null,null,false,0]
    ]}"#;

    async fn counting_server(status: StatusCode, hits: Arc<AtomicUsize>) -> String {
        let router = Router::new().route(
            "/api/states/all",
            get(move || {
                let hits = hits.clone();
                async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    (status, BODY)
                }
            }),
        );
        format!("{}/api/states/all", spawn_server(router).await)
    }

    #[tokio::test]
    async fn test_fetch_drops_grounded_flights() {
        let hits = Arc::new(AtomicUsize::new(0));
        let url = counting_server(StatusCode::OK, hits.clone()).await;
        let client = OpenSkyClient::new(url, DEFAULT_MIN_INTERVAL, Duration::from_secs(5)).unwrap();

        let flights = client.fetch().await.unwrap();
        assert_eq!(flights.len(), 1);
        assert_eq!(flights[0].icao24, "a808c4");
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_cache_served_inside_min_interval() {
        let hits = Arc::new(AtomicUsize::new(0));
        let url = counting_server(StatusCode::OK, hits.clone()).await;
        let client = OpenSkyClient::new(url, DEFAULT_MIN_INTERVAL, Duration::from_secs(5)).unwrap();

        let first = client.fetch().await.unwrap();
        let second = client.fetch().await.unwrap();
        assert_eq!(first, second);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_zero_interval_always_requests() {
        let hits = Arc::new(AtomicUsize::new(0));
        let url = counting_server(StatusCode::OK, hits.clone()).await;
        let client = OpenSkyClient::new(url, Duration::ZERO, Duration::from_secs(5)).unwrap();

        client.fetch().await.unwrap();
        client.fetch().await.unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_status_codes_map_to_error_kinds() {
        let cases = [
            (StatusCode::TOO_MANY_REQUESTS, FeedError::RateLimited),
            (StatusCode::SERVICE_UNAVAILABLE, FeedError::ServiceUnavailable),
            (StatusCode::INTERNAL_SERVER_ERROR, FeedError::Http(500)),
            (StatusCode::FORBIDDEN, FeedError::Http(403)),
        ];

        for (status, expected) in cases {
            let hits = Arc::new(AtomicUsize::new(0));
            let url = counting_server(status, hits).await;
            let client = OpenSkyClient::new(url, DEFAULT_MIN_INTERVAL, Duration::from_secs(5)).unwrap();
            assert_eq!(client.fetch().await.unwrap_err(), expected);
        }
    }

    #[tokio::test]
    async fn test_failure_does_not_populate_cache() {
        let hits = Arc::new(AtomicUsize::new(0));
        let url = counting_server(StatusCode::TOO_MANY_REQUESTS, hits.clone()).await;
        let client = OpenSkyClient::new(url, DEFAULT_MIN_INTERVAL, Duration::from_secs(5)).unwrap();

        assert!(client.fetch().await.is_err());
        assert!(client.fetch().await.is_err());
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_timeout_maps_to_timeout_kind() {
        let router = Router::new().route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                "{}"
            }),
        );
        let url = format!("{}/slow", spawn_server(router).await);
        let client = OpenSkyClient::new(url, DEFAULT_MIN_INTERVAL, Duration::from_millis(200)).unwrap();

        assert_eq!(client.fetch().await.unwrap_err(), FeedError::Timeout);
    }

    #[tokio::test]
    async fn test_bounding_box_query() {
        let router = Router::new().route(
            "/api/states/all",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                let ok = ["lamin", "lamax", "lomin", "lomax"]
                    .iter()
                    .all(|k| params.contains_key(*k));
                let lamin = params.get("lamin").and_then(|v| v.parse::<f64>().ok());
                let lomax = params.get("lomax").and_then(|v| v.parse::<f64>().ok());
                if ok && lamin == Some(30.0) && lomax == Some(-90.5) {
                    (StatusCode::OK, BODY)
                } else {
                    (StatusCode::BAD_REQUEST, "")
                }
            }),
        );
        let url = format!("{}/api/states/all", spawn_server(router).await);
        let client = OpenSkyClient::new(url, DEFAULT_MIN_INTERVAL, Duration::from_secs(5)).unwrap();

        let bbox = BoundingBox::new(30.0, 35.0, -100.0, -90.5);
        let flights = client.fetch_flights_in(&bbox).await.unwrap();
        assert_eq!(flights.len(), 1);

        let inverted = BoundingBox::new(35.0, 30.0, -100.0, -90.5);
        assert!(matches!(
            client.fetch_flights_in(&inverted).await,
            Err(FeedError::InvalidRequest(_))
        ));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_network_error() {
        // Nothing listens on port 9 of localhost
        let client =
            OpenSkyClient::new("http://127.0.0.1:9/api/states/all", DEFAULT_MIN_INTERVAL, Duration::from_secs(5))
                .unwrap();
        assert!(matches!(client.fetch().await, Err(FeedError::Network(_))));
    }
}
