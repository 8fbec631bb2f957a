use serde::{Deserialize, Serialize};

/// Data layers a globe client can toggle on and off.
///
/// Every live or static data source is bound to exactly one layer; an
/// unforced refresh only runs while its layer is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataLayer {
    Flights,
    Satellites,
    Earthquakes,
    Weather,
    Cctv,
    Military,
    Nuclear,
}

impl DataLayer {
    pub const ALL: [DataLayer; 7] = [
        DataLayer::Flights,
        DataLayer::Satellites,
        DataLayer::Earthquakes,
        DataLayer::Weather,
        DataLayer::Cctv,
        DataLayer::Military,
        DataLayer::Nuclear,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DataLayer::Flights => "flights",
            DataLayer::Satellites => "satellites",
            DataLayer::Earthquakes => "earthquakes",
            DataLayer::Weather => "weather",
            DataLayer::Cctv => "cctv",
            DataLayer::Military => "military",
            DataLayer::Nuclear => "nuclear",
        }
    }

    /// Human readable label
    pub fn display_name(&self) -> &'static str {
        match self {
            DataLayer::Flights => "Live Flights",
            DataLayer::Satellites => "Satellites",
            DataLayer::Earthquakes => "Earthquakes",
            DataLayer::Weather => "Weather Radar",
            DataLayer::Cctv => "CCTV Cameras",
            DataLayer::Military => "Military Bases",
            DataLayer::Nuclear => "Nuclear Sites",
        }
    }

    /// Whether the layer is backed by a network feed rather than a built-in table
    pub fn is_live(&self) -> bool {
        matches!(
            self,
            DataLayer::Flights | DataLayer::Satellites | DataLayer::Earthquakes | DataLayer::Weather
        )
    }
}

impl std::fmt::Display for DataLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for DataLayer {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "flights" => Ok(DataLayer::Flights),
            "satellites" => Ok(DataLayer::Satellites),
            "earthquakes" => Ok(DataLayer::Earthquakes),
            "weather" => Ok(DataLayer::Weather),
            "cctv" => Ok(DataLayer::Cctv),
            "military" => Ok(DataLayer::Military),
            "nuclear" => Ok(DataLayer::Nuclear),
            _ => Err(format!("Unknown data layer: {}", s)),
        }
    }
}

/// A geographic point in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

/// Latitude/longitude bounding box used for regional queries
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    pub fn new(min_lat: f64, max_lat: f64, min_lon: f64, max_lon: f64) -> Self {
        Self {
            min_lat,
            max_lat,
            min_lon,
            max_lon,
        }
    }

    /// Box of `radius_deg` degrees around a center point, clamped to valid ranges
    pub fn around(center: GeoPoint, radius_deg: f64) -> Self {
        Self {
            min_lat: (center.latitude - radius_deg).max(-90.0),
            max_lat: (center.latitude + radius_deg).min(90.0),
            min_lon: (center.longitude - radius_deg).max(-180.0),
            max_lon: (center.longitude + radius_deg).min(180.0),
        }
    }

    pub fn contains(&self, point: GeoPoint) -> bool {
        point.latitude >= self.min_lat
            && point.latitude <= self.max_lat
            && point.longitude >= self.min_lon
            && point.longitude <= self.max_lon
    }
}
