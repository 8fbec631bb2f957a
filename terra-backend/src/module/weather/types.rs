///! Weather radar frame types

use serde::{Deserialize, Serialize};

/// Available radar / satellite frame timestamps (Unix seconds, oldest first)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherFrames {
    pub radar: Vec<i64>,
    pub satellite: Vec<i64>,
    /// When the upstream index was generated
    pub generated: i64,
    /// Tile host, e.g. "https://tilecache.rainviewer.com"
    pub host: String,
}

impl WeatherFrames {
    pub fn latest_radar(&self) -> Option<i64> {
        self.radar.last().copied()
    }

    pub fn latest_satellite(&self) -> Option<i64> {
        self.satellite.last().copied()
    }
}
