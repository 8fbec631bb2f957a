///! OpenSky `/states/all` JSON parser
///!
///! The `states` field is an array of positional arrays:
///! [icao24, callsign, origin_country, time_position, last_contact,
///!  longitude, latitude, baro_altitude, on_ground, velocity, true_track,
///!  vertical_rate, sensors, geo_altitude, squawk, spi, position_source]

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use super::types::FlightState;
use crate::error::FeedResult;

const IDX_ICAO24: usize = 0;
const IDX_CALLSIGN: usize = 1;
const IDX_ORIGIN_COUNTRY: usize = 2;
const IDX_LAST_CONTACT: usize = 4;
const IDX_LONGITUDE: usize = 5;
const IDX_LATITUDE: usize = 6;
const IDX_BARO_ALTITUDE: usize = 7;
const IDX_ON_GROUND: usize = 8;
const IDX_VELOCITY: usize = 9;
const IDX_TRUE_TRACK: usize = 10;
const IDX_VERTICAL_RATE: usize = 11;
const IDX_GEO_ALTITUDE: usize = 13;
const IDX_SQUAWK: usize = 14;

#[derive(Debug, Deserialize)]
struct StatesResponse {
    #[allow(dead_code)]
    time: Option<i64>,
    /// null when no aircraft matched
    states: Option<Vec<Value>>,
}

/// Parse an OpenSky response body into airborne flights
///
/// Only a body that is not valid JSON is an error. Entries that cannot be
/// read and aircraft on the ground are dropped.
pub fn parse_states_json(body: &str) -> FeedResult<Vec<FlightState>> {
    let response: StatesResponse = serde_json::from_str(body)?;

    let Some(states) = response.states else {
        return Ok(Vec::new());
    };

    let total = states.len();
    let flights: Vec<FlightState> = states
        .iter()
        .filter_map(|entry| entry.as_array().and_then(|v| parse_state_vector(v)))
        .filter(|f| !f.on_ground)
        .collect();

    tracing::debug!("OpenSky: {} of {} state vectors airborne", flights.len(), total);

    Ok(flights)
}

/// Map one state vector; `None` if identity, position or ground flag is missing
pub fn parse_state_vector(v: &[Value]) -> Option<FlightState> {
    let icao24 = v.get(IDX_ICAO24)?.as_str()?.trim().to_string();
    if icao24.is_empty() {
        return None;
    }

    Some(FlightState {
        icao24,
        callsign: str_at(v, IDX_CALLSIGN).map(|s| s.trim().to_string()).unwrap_or_default(),
        origin_country: str_at(v, IDX_ORIGIN_COUNTRY).unwrap_or_default().to_string(),
        longitude: f64_at(v, IDX_LONGITUDE)?,
        latitude: f64_at(v, IDX_LATITUDE)?,
        baro_altitude: f64_at(v, IDX_BARO_ALTITUDE),
        geo_altitude: f64_at(v, IDX_GEO_ALTITUDE),
        velocity: f64_at(v, IDX_VELOCITY),
        heading: f64_at(v, IDX_TRUE_TRACK),
        vertical_rate: f64_at(v, IDX_VERTICAL_RATE),
        on_ground: v.get(IDX_ON_GROUND)?.as_bool()?,
        squawk: str_at(v, IDX_SQUAWK).map(str::to_string),
        last_contact: v
            .get(IDX_LAST_CONTACT)
            .and_then(Value::as_i64)
            .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0)),
    })
}

fn str_at(v: &[Value], idx: usize) -> Option<&str> {
    v.get(idx).and_then(Value::as_str)
}

fn f64_at(v: &[Value], idx: usize) -> Option<f64> {
    v.get(idx).and_then(Value::as_f64)
}
