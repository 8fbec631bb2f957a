///! Earthquake module (USGS GeoJSON feeds)

mod types;
pub use types::{DepthClass, SeismicEvent, Severity};

pub mod parser;
pub use parser::parse_geojson;

mod client;
pub use client::{EventQuery, SeismicFeed, USGS_QUERY_URL, USGS_SUMMARY_URL, UsgsClient};
