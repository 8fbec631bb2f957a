///! Weather radar module (RainViewer)

mod types;
pub use types::WeatherFrames;

pub mod parser;
pub use parser::parse_weather_maps;

pub mod tiles;
pub use tiles::{WeatherOverlay, lat_lon_to_tile, radar_tile_url, satellite_tile_url, zoom_for_altitude};

mod client;
pub use client::{DEFAULT_CACHE_TTL, RAINVIEWER_MAPS_URL, RainViewerClient};
