///! Seismic event data types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use terra_common::GeoPoint;

/// One earthquake from the USGS feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeismicEvent {
    /// Provider event id, e.g. "us7000abcd"
    pub id: String,
    pub magnitude: f64,
    pub place: String,
    pub time: DateTime<Utc>,
    pub longitude: f64,
    pub latitude: f64,
    /// Hypocenter depth (km)
    pub depth_km: f64,
    pub tsunami: bool,
    /// USGS significance score (0-1000+)
    pub significance: i64,
}

impl SeismicEvent {
    pub fn position(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }

    /// e.g. "M4.7"
    pub fn magnitude_label(&self) -> String {
        format!("M{:.1}", self.magnitude)
    }

    pub fn severity(&self) -> Severity {
        Severity::from_magnitude(self.magnitude)
    }

    pub fn depth_class(&self) -> DepthClass {
        DepthClass::from_depth(self.depth_km)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    Minor,
    Moderate,
    Strong,
    Major,
}

impl Severity {
    pub fn from_magnitude(magnitude: f64) -> Self {
        if magnitude < 3.0 {
            Severity::Minor
        } else if magnitude < 5.0 {
            Severity::Moderate
        } else if magnitude < 7.0 {
            Severity::Strong
        } else {
            Severity::Major
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Minor => "minor",
            Severity::Moderate => "moderate",
            Severity::Strong => "strong",
            Severity::Major => "major",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DepthClass {
    /// < 70 km
    Shallow,
    /// 70..300 km
    Intermediate,
    Deep,
}

impl DepthClass {
    pub fn from_depth(depth_km: f64) -> Self {
        if depth_km < 70.0 {
            DepthClass::Shallow
        } else if depth_km < 300.0 {
            DepthClass::Intermediate
        } else {
            DepthClass::Deep
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DepthClass::Shallow => "Shallow",
            DepthClass::Intermediate => "Intermediate",
            DepthClass::Deep => "Deep",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_boundaries() {
        assert_eq!(Severity::from_magnitude(2.99), Severity::Minor);
        assert_eq!(Severity::from_magnitude(3.0), Severity::Moderate);
        assert_eq!(Severity::from_magnitude(5.0), Severity::Strong);
        assert_eq!(Severity::from_magnitude(7.0), Severity::Major);
        assert_eq!(Severity::Strong.as_str(), "strong");
    }

    #[test]
    fn test_depth_class_boundaries() {
        assert_eq!(DepthClass::from_depth(10.0), DepthClass::Shallow);
        assert_eq!(DepthClass::from_depth(70.0), DepthClass::Intermediate);
        assert_eq!(DepthClass::from_depth(300.0), DepthClass::Deep);
        assert_eq!(DepthClass::Deep.label(), "Deep");
    }
}
