use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;

use terra_common::DataLayer;

use crate::module::flight::OPENSKY_STATES_URL;
use crate::module::quake::{SeismicFeed, USGS_QUERY_URL, USGS_SUMMARY_URL};
use crate::module::sat::CELESTRAK_GP_URL;
use crate::module::scheduled::RefreshIntervals;
use crate::module::weather::RAINVIEWER_MAPS_URL;

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerraConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default = "default_log_dir")]
    pub log_dir: String,

    /// Per-request timeout for every HTTP client
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Layers switched on at startup
    #[serde(default = "default_active_layers")]
    pub active_layers: Vec<DataLayer>,

    #[serde(default)]
    pub refresh: RefreshConfig,

    #[serde(default)]
    pub endpoints: EndpointConfig,

    #[serde(default)]
    pub feeds: FeedConfig,
}

/// Timer periods in seconds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshConfig {
    #[serde(default = "default_flights_secs")]
    pub flights_secs: u64,
    #[serde(default = "default_satellites_secs")]
    pub satellites_secs: u64,
    #[serde(default = "default_earthquakes_secs")]
    pub earthquakes_secs: u64,
    #[serde(default = "default_weather_secs")]
    pub weather_secs: u64,
    #[serde(default = "default_cctv_secs")]
    pub cctv_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    #[serde(default = "default_opensky_url")]
    pub opensky: String,
    #[serde(default = "default_usgs_summary_url")]
    pub usgs_summary: String,
    #[serde(default = "default_usgs_query_url")]
    pub usgs_query: String,
    #[serde(default = "default_rainviewer_url")]
    pub rainviewer: String,
    #[serde(default = "default_celestrak_url")]
    pub celestrak: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Minimum spacing between real OpenSky requests
    #[serde(default = "default_flight_min_interval_secs")]
    pub flight_min_interval_secs: u64,
    #[serde(default = "default_weather_cache_secs")]
    pub weather_cache_secs: u64,
    #[serde(default)]
    pub seismic_feed: SeismicFeed,
    /// CelesTrak GROUP names
    #[serde(default = "default_satellite_groups")]
    pub satellite_groups: Vec<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_dir() -> String {
    "logs".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_active_layers() -> Vec<DataLayer> {
    vec![DataLayer::Flights, DataLayer::Satellites, DataLayer::Earthquakes]
}

fn default_flights_secs() -> u64 {
    15
}

fn default_satellites_secs() -> u64 {
    60
}

fn default_earthquakes_secs() -> u64 {
    300
}

fn default_weather_secs() -> u64 {
    300
}

fn default_cctv_secs() -> u64 {
    600
}

fn default_opensky_url() -> String {
    OPENSKY_STATES_URL.to_string()
}

fn default_usgs_summary_url() -> String {
    USGS_SUMMARY_URL.to_string()
}

fn default_usgs_query_url() -> String {
    USGS_QUERY_URL.to_string()
}

fn default_rainviewer_url() -> String {
    RAINVIEWER_MAPS_URL.to_string()
}

fn default_celestrak_url() -> String {
    CELESTRAK_GP_URL.to_string()
}

fn default_flight_min_interval_secs() -> u64 {
    10
}

fn default_weather_cache_secs() -> u64 {
    300
}

fn default_satellite_groups() -> Vec<String> {
    vec!["stations".to_string(), "visual".to_string()]
}

impl Default for TerraConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_dir: default_log_dir(),
            request_timeout_secs: default_request_timeout_secs(),
            active_layers: default_active_layers(),
            refresh: RefreshConfig::default(),
            endpoints: EndpointConfig::default(),
            feeds: FeedConfig::default(),
        }
    }
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            flights_secs: default_flights_secs(),
            satellites_secs: default_satellites_secs(),
            earthquakes_secs: default_earthquakes_secs(),
            weather_secs: default_weather_secs(),
            cctv_secs: default_cctv_secs(),
        }
    }
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            opensky: default_opensky_url(),
            usgs_summary: default_usgs_summary_url(),
            usgs_query: default_usgs_query_url(),
            rainviewer: default_rainviewer_url(),
            celestrak: default_celestrak_url(),
        }
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            flight_min_interval_secs: default_flight_min_interval_secs(),
            weather_cache_secs: default_weather_cache_secs(),
            seismic_feed: SeismicFeed::default(),
            satellite_groups: default_satellite_groups(),
        }
    }
}

impl TerraConfig {
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: TerraConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would stall a timer or every request
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(self.request_timeout_secs > 0, "request_timeout_secs must be greater than 0");

        let refresh = [
            ("flights_secs", self.refresh.flights_secs),
            ("satellites_secs", self.refresh.satellites_secs),
            ("earthquakes_secs", self.refresh.earthquakes_secs),
            ("weather_secs", self.refresh.weather_secs),
            ("cctv_secs", self.refresh.cctv_secs),
        ];
        for (key, secs) in refresh {
            anyhow::ensure!(secs > 0, "refresh.{} must be greater than 0", key);
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn refresh_intervals(&self) -> RefreshIntervals {
        RefreshIntervals {
            flights: Duration::from_secs(self.refresh.flights_secs),
            satellites: Duration::from_secs(self.refresh.satellites_secs),
            earthquakes: Duration::from_secs(self.refresh.earthquakes_secs),
            weather: Duration::from_secs(self.refresh.weather_secs),
            cctv: Duration::from_secs(self.refresh.cctv_secs),
        }
    }
}

pub static CONFIG: OnceLock<TerraConfig> = OnceLock::new();

/// Where the loaded configuration came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigOrigin {
    File,
    /// The file did not exist
    Defaults,
}

/// Load `path` into [`CONFIG`]; a missing file falls back to defaults
///
/// Runs once per process. Later calls fail instead of silently keeping the
/// first configuration.
pub fn read_config(path: impl AsRef<Path>) -> anyhow::Result<(&'static TerraConfig, ConfigOrigin)> {
    let path = path.as_ref();
    let (config, origin) = if path.exists() {
        let config = TerraConfig::from_file(path)
            .map_err(|e| anyhow::anyhow!("Failed to parse config file {}: {}", path.display(), e))?;
        (config, ConfigOrigin::File)
    } else {
        (TerraConfig::default(), ConfigOrigin::Defaults)
    };

    CONFIG
        .set(config)
        .map_err(|_| anyhow::anyhow!("Configuration already loaded, ignoring {}", path.display()))?;
    let config = CONFIG
        .get()
        .ok_or_else(|| anyhow::anyhow!("Configuration not initialized"))?;
    Ok((config, origin))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: TerraConfig = toml::from_str("").unwrap();
        assert_eq!(config.log_level, "info");
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.feeds.seismic_feed, SeismicFeed::DayAll);
        assert_eq!(config.feeds.satellite_groups, vec!["stations", "visual"]);
        assert_eq!(config.endpoints.opensky, OPENSKY_STATES_URL);

        let intervals = config.refresh_intervals();
        assert_eq!(intervals.flights, Duration::from_secs(15));
        assert_eq!(intervals.cctv, Duration::from_secs(600));
    }

    #[test]
    fn test_partial_config() {
        let config: TerraConfig = toml::from_str(
            r#"
            log_level = "debug"
            active_layers = ["weather", "military"]

            [refresh]
            flights_secs = 30

            [feeds]
            seismic_feed = "4.5_week"
            "#,
        )
        .unwrap();

        assert_eq!(config.log_level, "debug");
        assert_eq!(config.active_layers, vec![DataLayer::Weather, DataLayer::Military]);
        assert_eq!(config.refresh.flights_secs, 30);
        assert_eq!(config.refresh.satellites_secs, 60);
        assert_eq!(config.feeds.seismic_feed, SeismicFeed::Week45);
        assert_eq!(config.feeds.weather_cache_secs, 300);
    }

    #[test]
    fn test_unknown_layer_is_rejected() {
        let result: Result<TerraConfig, _> = toml::from_str(r#"active_layers = ["lasers"]"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_values_are_rejected() {
        assert!(TerraConfig::default().validate().is_ok());

        let config: TerraConfig = toml::from_str("[refresh]\nweather_secs = 0").unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("refresh.weather_secs"), "{}", err);

        let config: TerraConfig = toml::from_str("request_timeout_secs = 0").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_file_validates() {
        let path = std::env::temp_dir().join(format!("terra-config-test-{}.toml", std::process::id()));
        std::fs::write(&path, "[refresh]\nflights_secs = 0\n").unwrap();
        let result = TerraConfig::from_file(&path);
        std::fs::remove_file(&path).unwrap();
        assert!(result.is_err());
    }

    // The only test that touches the global CONFIG
    #[test]
    fn test_read_config_once() {
        let (config, origin) = read_config("does-not-exist.toml").unwrap();
        assert_eq!(origin, ConfigOrigin::Defaults);
        assert_eq!(config.request_timeout_secs, 30);

        let err = read_config("other.toml").unwrap_err();
        assert!(err.to_string().contains("already loaded"), "{}", err);
    }
}
