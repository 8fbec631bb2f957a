///! RainViewer `weather-maps.json` parser

use serde::Deserialize;

use super::types::WeatherFrames;
use crate::error::FeedResult;

#[derive(Debug, Deserialize)]
struct WeatherMapsResponse {
    #[serde(default)]
    generated: i64,
    #[serde(default)]
    host: String,
    radar: RadarData,
    satellite: Option<SatelliteData>,
}

#[derive(Debug, Deserialize)]
struct RadarData {
    past: Vec<Frame>,
    #[allow(dead_code)]
    nowcast: Option<Vec<Frame>>,
}

#[derive(Debug, Deserialize)]
struct SatelliteData {
    infrared: Option<Vec<Frame>>,
}

#[derive(Debug, Deserialize)]
struct Frame {
    time: i64,
    #[allow(dead_code)]
    #[serde(default)]
    path: String,
}

/// Parse the frame index
///
/// The returned flag is false when the document carries no infrared
/// section, so callers can decide whether to keep a previous list.
pub fn parse_weather_maps(body: &str) -> FeedResult<(WeatherFrames, bool)> {
    let response: WeatherMapsResponse = serde_json::from_str(body)?;

    let infrared = response.satellite.and_then(|s| s.infrared);
    let has_satellite = infrared.is_some();

    let frames = WeatherFrames {
        radar: response.radar.past.iter().map(|f| f.time).collect(),
        satellite: infrared.unwrap_or_default().iter().map(|f| f.time).collect(),
        generated: response.generated,
        host: response.host,
    };

    Ok((frames, has_satellite))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_radar_and_satellite() {
        let body = r#"{
            "version": "2.0", "generated": 1704067500, "host": "https://tilecache.rainviewer.com",
            "radar": {
                "past": [{"time": 1704066000, "path": "/v2/radar/1704066000"}, {"time": 1704066600, "path": "/v2/radar/1704066600"}],
                "nowcast": []
            },
            "satellite": {"infrared": [{"time": 1704065400, "path": "/v2/satellite/abc"}]}
        }"#;
        let (frames, has_satellite) = parse_weather_maps(body).unwrap();
        assert!(has_satellite);
        assert_eq!(frames.radar, vec![1704066000, 1704066600]);
        assert_eq!(frames.latest_radar(), Some(1704066600));
        assert_eq!(frames.latest_satellite(), Some(1704065400));
        assert_eq!(frames.generated, 1704067500);
    }

    #[test]
    fn test_missing_satellite_section() {
        let body = r#"{"generated": 1, "host": "h", "radar": {"past": [{"time": 5, "path": "p"}]}}"#;
        let (frames, has_satellite) = parse_weather_maps(body).unwrap();
        assert!(!has_satellite);
        assert!(frames.satellite.is_empty());
        assert_eq!(frames.latest_satellite(), None);
    }

    #[test]
    fn test_missing_radar_is_error() {
        assert!(parse_weather_maps(r#"{"generated": 1}"#).is_err());
    }
}
