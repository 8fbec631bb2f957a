///! Live flight tracking (OpenSky Network)

mod types;
pub use types::FlightState;

pub mod parser;
pub use parser::parse_states_json;

mod client;
pub use client::{DEFAULT_MIN_INTERVAL, OPENSKY_STATES_URL, OpenSkyClient};
