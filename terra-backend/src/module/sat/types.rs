///! Satellite data types

use serde::{Deserialize, Serialize};

/// Sub-satellite point computed by the position estimator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubSatellitePoint {
    /// Degrees, [-90, 90]
    pub latitude: f64,
    /// Degrees, [-180, 180)
    pub longitude: f64,
    /// Kilometers above the mean Earth radius
    pub altitude_km: f64,
}

/// One satellite as published in a TLE feed
///
/// The raw lines are the source of truth; `position` is derived from them
/// and overwritten on every propagation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrbitalElementSet {
    /// NORAD catalog number, e.g. "25544"
    pub catalog_id: String,
    pub name: String,
    pub line1: String,
    pub line2: String,
    /// Last computed position (None until first propagation)
    #[serde(default)]
    pub position: Option<SubSatellitePoint>,
}

impl OrbitalElementSet {
    pub fn category(&self) -> SatelliteCategory {
        SatelliteCategory::from_name(&self.name)
    }

    pub fn latitude(&self) -> Option<f64> {
        self.position.map(|p| p.latitude)
    }

    pub fn longitude(&self) -> Option<f64> {
        self.position.map(|p| p.longitude)
    }

    pub fn altitude_km(&self) -> Option<f64> {
        self.position.map(|p| p.altitude_km)
    }

    /// Altitude for display, e.g. "423 km"
    pub fn altitude_display(&self) -> String {
        match self.position {
            Some(p) => format!("{:.0} km", p.altitude_km),
            None => "N/A".to_string(),
        }
    }
}

/// Coarse classification derived from the satellite name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SatelliteCategory {
    Starlink,
    OneWeb,
    Station,
    Navigation,
    Military,
    Other,
}

impl SatelliteCategory {
    pub fn from_name(name: &str) -> Self {
        let lower = name.to_lowercase();
        if lower.contains("starlink") {
            SatelliteCategory::Starlink
        } else if lower.contains("oneweb") {
            SatelliteCategory::OneWeb
        } else if lower.contains("iss") || lower.contains("zarya") {
            SatelliteCategory::Station
        } else if lower.contains("gps") || lower.contains("navstar") {
            SatelliteCategory::Navigation
        } else if lower.contains("cosmos") || lower.contains("usa") {
            SatelliteCategory::Military
        } else {
            SatelliteCategory::Other
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SatelliteCategory::Starlink => "Starlink",
            SatelliteCategory::OneWeb => "OneWeb",
            SatelliteCategory::Station => "Space Station",
            SatelliteCategory::Navigation => "Navigation",
            SatelliteCategory::Military => "Military",
            SatelliteCategory::Other => "Other",
        }
    }
}
