///! Approximate sub-satellite point estimation
///!
///! This is a visualization-grade approximation, NOT SGP4. The orbit is
///! treated as a circle of the Kepler semi-major axis, inclined over a
///! non-rotating Earth, and the orbital phase is measured from midnight UTC
///! of the requested day rather than from the TLE epoch. Output is
///! deterministic and bounded, not accurate.

use chrono::{DateTime, Duration, Utc};
use std::f64::consts::PI;

use super::types::{OrbitalElementSet, SubSatellitePoint};

/// Earth's gravitational parameter (km³/s²)
pub const EARTH_MU: f64 = 398_600.4418;
/// Mean Earth radius (km)
pub const EARTH_RADIUS_KM: f64 = 6371.0;
pub const SECONDS_PER_DAY: f64 = 86_400.0;

pub const DEFAULT_MEAN_MOTION: f64 = 15.0;
pub const DEFAULT_INCLINATION_DEG: f64 = 51.6;
pub const DEFAULT_RAAN_DEG: f64 = 0.0;

/// Shortest line 2 that can be indexed for element extraction
const MIN_LINE2_LEN: usize = 50;

/// Fields extracted from the fixed columns of line 2
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitalElements {
    /// Revolutions per day (columns 52..63)
    pub mean_motion: f64,
    /// Degrees (columns 8..16)
    pub inclination_deg: f64,
    /// Right ascension of the ascending node, degrees (columns 17..25)
    pub raan_deg: f64,
}

impl OrbitalElements {
    /// Extract elements from line 2; returns `None` when the line is too short
    ///
    /// Individual fields that fail to parse fall back to the documented
    /// defaults (15.0 rev/day, 51.6°, 0°).
    pub fn from_line2(line2: &str) -> Option<Self> {
        if line2.len() <= MIN_LINE2_LEN {
            return None;
        }

        let mm_end = line2.len().min(63);
        let mut mean_motion = parse_column(line2, 52, mm_end).unwrap_or(DEFAULT_MEAN_MOTION);
        if !(mean_motion.is_finite() && mean_motion > 0.0) {
            mean_motion = DEFAULT_MEAN_MOTION;
        }

        Some(Self {
            mean_motion,
            inclination_deg: parse_column(line2, 8, 16).unwrap_or(DEFAULT_INCLINATION_DEG),
            raan_deg: parse_column(line2, 17, 25).unwrap_or(DEFAULT_RAAN_DEG),
        })
    }

    /// Semi-major axis from Kepler's third law (km)
    pub fn semi_major_axis_km(&self) -> f64 {
        let n = self.mean_motion * 2.0 * PI / SECONDS_PER_DAY;
        (EARTH_MU / (n * n)).cbrt()
    }

    pub fn altitude_km(&self) -> f64 {
        self.semi_major_axis_km() - EARTH_RADIUS_KM
    }

    /// Orbital period in seconds
    pub fn period_secs(&self) -> f64 {
        SECONDS_PER_DAY / self.mean_motion
    }
}

fn parse_column(line: &str, start: usize, end: usize) -> Option<f64> {
    line.get(start..end)?.trim().parse().ok()
}

/// Compute the approximate sub-satellite point of `record` at `at`
///
/// Pure with respect to `at`. Returns `None` if line 2 is too short.
pub fn propagate(record: &OrbitalElementSet, at: DateTime<Utc>) -> Option<SubSatellitePoint> {
    let elements = OrbitalElements::from_line2(&record.line2)?;
    Some(position_from_elements(&elements, at))
}

pub fn position_from_elements(elements: &OrbitalElements, at: DateTime<Utc>) -> SubSatellitePoint {
    // Seconds of the UTC day, not time since the TLE epoch
    let seconds_of_day = unix_seconds(at) % SECONDS_PER_DAY;
    let phase = seconds_of_day / elements.period_secs() * 2.0 * PI;

    let inc = elements.inclination_deg.to_radians();
    let raan = elements.raan_deg.to_radians();

    let latitude = (inc.sin() * phase.sin()).asin().to_degrees();
    let longitude = (raan + (inc.cos() * phase.sin()).atan2(phase.cos())).to_degrees();

    SubSatellitePoint {
        latitude,
        longitude: normalize_longitude(longitude),
        altitude_km: elements.altitude_km(),
    }
}

/// Wrap a longitude into [-180, 180)
pub fn normalize_longitude(mut longitude: f64) -> f64 {
    if !longitude.is_finite() {
        return 0.0;
    }
    while longitude >= 180.0 {
        longitude -= 360.0;
    }
    while longitude < -180.0 {
        longitude += 360.0;
    }
    longitude
}

/// Sample `count` points starting at `start`, spaced by `step`
pub fn ground_track(
    record: &OrbitalElementSet,
    start: DateTime<Utc>,
    step: Duration,
    count: usize,
) -> Vec<SubSatellitePoint> {
    let Some(elements) = OrbitalElements::from_line2(&record.line2) else {
        return Vec::new();
    };

    // Stops early once the sample time no longer fits in a DateTime
    (0..count)
        .map_while(|i| {
            let offset = step.checked_mul(i32::try_from(i).ok()?)?;
            start.checked_add_signed(offset)
        })
        .map(|at| position_from_elements(&elements, at))
        .collect()
}

fn unix_seconds(at: DateTime<Utc>) -> f64 {
    at.timestamp() as f64 + at.timestamp_subsec_nanos() as f64 * 1e-9
}

impl OrbitalElementSet {
    /// Recompute the stored position for `at`
    ///
    /// Leaves the previous position untouched when line 2 cannot be indexed.
    pub fn update_position(&mut self, at: DateTime<Utc>) {
        if let Some(point) = propagate(self, at) {
            self.position = Some(point);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::sat::tle::parse_one;
    use chrono::TimeZone;

    const ISS_LINE1: &str = "1 25544U 98067A   24001.00000000  .00001000  00000-0  00000-0 0  9991";
    const ISS_LINE2: &str = "2 25544  51.6416 339.9023 0006703 126.0577 325.0166 15.50381730 12345";

    fn iss() -> OrbitalElementSet {
        parse_one(&format!("ISS (ZARYA)\n{}\n{}", ISS_LINE1, ISS_LINE2)).unwrap()
    }

    fn record_with_line2(line2: &str) -> OrbitalElementSet {
        OrbitalElementSet {
            catalog_id: "99999".to_string(),
            name: "TEST".to_string(),
            line1: ISS_LINE1.to_string(),
            line2: line2.to_string(),
            position: None,
        }
    }

    #[test]
    fn test_extract_iss_elements() {
        let elements = OrbitalElements::from_line2(ISS_LINE2).unwrap();
        assert!((elements.mean_motion - 15.50381730).abs() < 1e-9);
        assert!((elements.inclination_deg - 51.6416).abs() < 1e-9);
        assert!((elements.raan_deg - 339.9023).abs() < 1e-9);
    }

    #[test]
    fn test_iss_altitude_range() {
        let point = propagate(&iss(), Utc::now()).unwrap();
        assert!(
            point.altitude_km > 400.0 && point.altitude_km < 430.0,
            "altitude {} out of range",
            point.altitude_km
        );
    }

    #[test]
    fn test_propagate_is_deterministic() {
        let sat = iss();
        let at = Utc.with_ymd_and_hms(2024, 3, 14, 15, 9, 26).unwrap();
        let a = propagate(&sat, at).unwrap();
        let b = propagate(&sat, at).unwrap();
        assert_eq!(a, b);

        // In-place update carries no hidden state either
        let mut copy = sat.clone();
        copy.update_position(at);
        copy.update_position(at + Duration::seconds(1234));
        copy.update_position(at);
        assert_eq!(copy.position, Some(a));
    }

    #[test]
    fn test_output_is_bounded() {
        let sat = iss();
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        for point in ground_track(&sat, start, Duration::seconds(37), 3000) {
            assert!(point.longitude >= -180.0 && point.longitude < 180.0, "lon {}", point.longitude);
            assert!(point.latitude >= -90.0 && point.latitude <= 90.0, "lat {}", point.latitude);
            // |lat| never exceeds the inclination
            assert!(point.latitude.abs() <= 51.6416 + 1e-9);
        }
    }

    #[test]
    fn test_ground_track_stops_at_time_overflow() {
        let sat = iss();
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

        let track = ground_track(&sat, start, Duration::days(36_500_000), 1_000);
        assert!(!track.is_empty());
        assert!(track.len() < 1_000);

        assert_eq!(ground_track(&sat, start, Duration::minutes(1), 10).len(), 10);
    }

    #[test]
    fn test_phase_uses_seconds_of_day() {
        let sat = iss();
        let day1 = Utc.with_ymd_and_hms(2024, 1, 1, 6, 30, 0).unwrap();
        let day2 = Utc.with_ymd_and_hms(2024, 5, 17, 6, 30, 0).unwrap();
        assert_eq!(propagate(&sat, day1), propagate(&sat, day2));
    }

    #[test]
    fn test_midnight_starts_at_ascending_node() {
        let sat = iss();
        let midnight = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let point = propagate(&sat, midnight).unwrap();
        assert!(point.latitude.abs() < 1e-9);
        assert!((point.longitude - normalize_longitude(339.9023)).abs() < 1e-9);
    }

    #[test]
    fn test_short_line2_leaves_position_unset() {
        let mut sat = record_with_line2("2 25544  51.6416 339.9023 0006703 126.0577");
        assert!(propagate(&sat, Utc::now()).is_none());
        sat.update_position(Utc::now());
        assert!(sat.position.is_none());

        // A previous position survives a failed update
        let previous = SubSatellitePoint { latitude: 1.0, longitude: 2.0, altitude_km: 3.0 };
        sat.position = Some(previous);
        sat.update_position(Utc::now());
        assert_eq!(sat.position, Some(previous));
    }

    #[test]
    fn test_unparseable_fields_fall_back_to_defaults() {
        let line2 = "2 99999  xx.xxxx yyy.yyyy 0006703 126.0577 325.0166 zz.zzzzzzzz 12345";
        let elements = OrbitalElements::from_line2(line2).unwrap();
        assert_eq!(elements.mean_motion, DEFAULT_MEAN_MOTION);
        assert_eq!(elements.inclination_deg, DEFAULT_INCLINATION_DEG);
        assert_eq!(elements.raan_deg, DEFAULT_RAAN_DEG);

        let point = propagate(&record_with_line2(line2), Utc::now()).unwrap();
        assert!(point.altitude_km.is_finite());
    }

    #[test]
    fn test_mean_motion_truncated_line() {
        // 51 characters: mean motion columns are missing entirely
        let line2 = "2 25544  51.6416 339.9023 0006703 126.0577 325.0166";
        assert_eq!(line2.len(), 51);
        let elements = OrbitalElements::from_line2(line2).unwrap();
        assert_eq!(elements.mean_motion, DEFAULT_MEAN_MOTION);
        assert!((elements.inclination_deg - 51.6416).abs() < 1e-9);
    }

    #[test]
    fn test_normalize_longitude() {
        assert_eq!(normalize_longitude(180.0), -180.0);
        assert_eq!(normalize_longitude(-180.0), -180.0);
        assert_eq!(normalize_longitude(540.0), -180.0);
        assert!((normalize_longitude(339.9023) - (-20.0977)).abs() < 1e-9);
        assert!((normalize_longitude(-190.0) - 170.0).abs() < 1e-9);
        assert_eq!(normalize_longitude(f64::NAN), 0.0);
    }
}
