///! USGS GeoJSON FeatureCollection parser

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use super::types::SeismicEvent;
use crate::error::FeedResult;

const UNKNOWN_PLACE: &str = "Unknown location";

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    /// Decoded one by one so a single bad feature cannot sink the batch
    features: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct RawFeature {
    id: String,
    properties: RawProperties,
    geometry: RawGeometry,
}

#[derive(Debug, Deserialize)]
struct RawProperties {
    mag: Option<f64>,
    place: Option<String>,
    /// Milliseconds since the Unix epoch
    time: i64,
    tsunami: Option<i64>,
    sig: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct RawGeometry {
    /// [longitude, latitude, depth]
    coordinates: Vec<f64>,
}

/// Parse a USGS GeoJSON body into seismic events
pub fn parse_geojson(body: &str) -> FeedResult<Vec<SeismicEvent>> {
    let collection: FeatureCollection = serde_json::from_str(body)?;
    let total = collection.features.len();

    let events: Vec<SeismicEvent> = collection
        .features
        .into_iter()
        .filter_map(|value| match serde_json::from_value::<RawFeature>(value) {
            Ok(raw) => event_from_feature(raw),
            Err(e) => {
                tracing::debug!("Skipping malformed USGS feature: {}", e);
                None
            }
        })
        .collect();

    if events.len() < total {
        tracing::debug!("USGS: kept {} of {} features", events.len(), total);
    }

    Ok(events)
}

fn event_from_feature(raw: RawFeature) -> Option<SeismicEvent> {
    let coords = &raw.geometry.coordinates;
    if coords.len() < 3 {
        return None;
    }

    let props = raw.properties;
    Some(SeismicEvent {
        id: raw.id,
        magnitude: props.mag.unwrap_or(0.0),
        place: props.place.unwrap_or_else(|| UNKNOWN_PLACE.to_string()),
        time: DateTime::<Utc>::from_timestamp_millis(props.time)?,
        longitude: coords[0],
        latitude: coords[1],
        depth_km: coords[2],
        tsunami: props.tsunami.unwrap_or(0) == 1,
        significance: props.sig.unwrap_or(0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FeedError;

    const BODY: &str = r#"{
        "type": "FeatureCollection",
        "metadata": {"generated": 1704067200000, "url": "x", "title": "USGS All Earthquakes, Past Day", "count": 4},
        "features": [
            {"type": "Feature", "id": "us7000abcd",
             "properties": {"mag": 5.6, "place": "10 km SW of Somewhere", "time": 1704060000000, "tsunami": 1, "sig": 482},
             "geometry": {"type": "Point", "coordinates": [142.1, 38.3, 35.0]}},
            {"type": "Feature", "id": "nc7300001",
             "properties": {"mag": null, "place": null, "time": 1704061000000, "tsunami": null, "sig": null},
             "geometry": {"type": "Point", "coordinates": [-122.8, 38.8, 2.1]}},
            {"type": "Feature", "id": "ak0241",
             "properties": {"mag": 1.2, "place": "Alaska", "time": 1704062000000},
             "geometry": {"type": "Point", "coordinates": [-150.1, 61.2]}},
            {"type": "Feature", "id": "broken",
             "properties": {"mag": "big"},
             "geometry": {"type": "Point", "coordinates": [0, 0, 0]}}
        ]
    }"#;

    #[test]
    fn test_parse_features() {
        let events = parse_geojson(BODY).unwrap();
        assert_eq!(events.len(), 2);

        let big = &events[0];
        assert_eq!(big.id, "us7000abcd");
        assert_eq!(big.magnitude, 5.6);
        assert_eq!(big.longitude, 142.1);
        assert_eq!(big.latitude, 38.3);
        assert_eq!(big.depth_km, 35.0);
        assert!(big.tsunami);
        assert_eq!(big.significance, 482);
        assert_eq!(big.time.timestamp_millis(), 1704060000000);
        assert_eq!(big.magnitude_label(), "M5.6");
    }

    #[test]
    fn test_missing_properties_use_defaults() {
        let events = parse_geojson(BODY).unwrap();
        let quiet = &events[1];
        assert_eq!(quiet.magnitude, 0.0);
        assert_eq!(quiet.place, "Unknown location");
        assert!(!quiet.tsunami);
        assert_eq!(quiet.significance, 0);
    }

    #[test]
    fn test_two_coordinate_feature_is_dropped() {
        let events = parse_geojson(BODY).unwrap();
        assert!(events.iter().all(|e| e.id != "ak0241"));
    }

    #[test]
    fn test_non_geojson_is_decode_error() {
        assert!(matches!(parse_geojson("[]"), Err(FeedError::Decode(_))));
        assert!(matches!(parse_geojson("not json"), Err(FeedError::Decode(_))));
    }
}
