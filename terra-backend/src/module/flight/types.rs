///! Flight state data types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use terra_common::GeoPoint;

const METERS_TO_FEET: f64 = 3.280_84;
const MPS_TO_KNOTS: f64 = 1.943_844;

/// One airborne aircraft from an OpenSky state vector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightState {
    /// ICAO 24-bit transponder address (hex string)
    pub icao24: String,
    /// Callsign, trimmed (may be empty)
    pub callsign: String,
    pub origin_country: String,
    pub longitude: f64,
    pub latitude: f64,
    /// Barometric altitude (m)
    pub baro_altitude: Option<f64>,
    /// Geometric altitude (m)
    pub geo_altitude: Option<f64>,
    /// Ground speed (m/s)
    pub velocity: Option<f64>,
    /// True track, degrees clockwise from north
    pub heading: Option<f64>,
    /// Vertical rate (m/s)
    pub vertical_rate: Option<f64>,
    pub on_ground: bool,
    pub squawk: Option<String>,
    pub last_contact: Option<DateTime<Utc>>,
}

impl FlightState {
    pub fn position(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }

    /// Callsign if present, otherwise the uppercase transponder address
    pub fn display_name(&self) -> String {
        if self.callsign.is_empty() {
            self.icao24.to_uppercase()
        } else {
            self.callsign.clone()
        }
    }

    pub fn altitude_feet(&self) -> Option<f64> {
        self.baro_altitude.or(self.geo_altitude).map(|m| m * METERS_TO_FEET)
    }

    pub fn speed_knots(&self) -> Option<f64> {
        self.velocity.map(|v| v * MPS_TO_KNOTS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flight(callsign: &str) -> FlightState {
        FlightState {
            icao24: "abc123".to_string(),
            callsign: callsign.to_string(),
            origin_country: "United States".to_string(),
            longitude: -77.0,
            latitude: 38.9,
            baro_altitude: Some(10_000.0),
            geo_altitude: None,
            velocity: Some(250.0),
            heading: Some(90.0),
            vertical_rate: None,
            on_ground: false,
            squawk: None,
            last_contact: None,
        }
    }

    #[test]
    fn test_display_name_falls_back_to_icao() {
        assert_eq!(flight("UAL123").display_name(), "UAL123");
        assert_eq!(flight("").display_name(), "ABC123");
    }

    #[test]
    fn test_unit_conversions() {
        let f = flight("UAL123");
        assert!((f.altitude_feet().unwrap() - 32_808.4).abs() < 0.1);
        assert!((f.speed_knots().unwrap() - 485.961).abs() < 0.01);
    }
}
