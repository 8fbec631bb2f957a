///! Weather tile addressing
///!
///! Tiles are fetched by the rendering layer; this module only builds
///! slippy-map coordinates and RainViewer tile URLs.

use std::f64::consts::PI;

pub const RAINVIEWER_TILE_HOST: &str = "https://tilecache.rainviewer.com";

/// Overlay styles offered by the globe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeatherOverlay {
    /// Radar, rainbow color scheme
    Rain,
    /// Infrared satellite cloud cover
    Clouds,
    /// Radar, universal blue scheme
    Precipitation,
}

impl WeatherOverlay {
    pub fn tile_url(&self, timestamp: i64, size: u32, zoom: u32, x: u32, y: u32) -> String {
        match self {
            WeatherOverlay::Rain => radar_tile_url(timestamp, size, zoom, x, y, 6),
            WeatherOverlay::Clouds => satellite_tile_url(timestamp, size, zoom, x, y),
            WeatherOverlay::Precipitation => radar_tile_url(timestamp, size, zoom, x, y, 2),
        }
    }

    /// Whether the overlay is keyed on satellite (rather than radar) frames
    pub fn uses_satellite_frames(&self) -> bool {
        matches!(self, WeatherOverlay::Clouds)
    }
}

/// `{host}/v2/radar/{ts}/{size}/{z}/{x}/{y}/{color}/1_1.png` (smoothed, with snow)
pub fn radar_tile_url(timestamp: i64, size: u32, zoom: u32, x: u32, y: u32, color: u8) -> String {
    format!(
        "{}/v2/radar/{}/{}/{}/{}/{}/{}/1_1.png",
        RAINVIEWER_TILE_HOST, timestamp, size, zoom, x, y, color
    )
}

/// `{host}/v2/satellite/{ts}/{size}/{z}/{x}/{y}/0/0_0.png`
pub fn satellite_tile_url(timestamp: i64, size: u32, zoom: u32, x: u32, y: u32) -> String {
    format!(
        "{}/v2/satellite/{}/{}/{}/{}/{}/0/0_0.png",
        RAINVIEWER_TILE_HOST, timestamp, size, zoom, x, y
    )
}

/// Web-Mercator tile containing a point
pub fn lat_lon_to_tile(lat: f64, lon: f64, zoom: u32) -> (u32, u32) {
    let n = f64::from(1u32 << zoom.min(30));
    let max = n - 1.0;

    let x = ((lon + 180.0) / 360.0 * n).floor().clamp(0.0, max);
    let lat_rad = lat.clamp(-85.0511, 85.0511).to_radians();
    let y = ((1.0 - lat_rad.tan().asinh() / PI) / 2.0 * n).floor().clamp(0.0, max);

    (x as u32, y as u32)
}

/// Tile zoom appropriate for a camera altitude in meters
pub fn zoom_for_altitude(altitude_m: f64) -> u32 {
    match altitude_m {
        a if a > 10_000_000.0 => 2,
        a if a > 5_000_000.0 => 3,
        a if a > 2_000_000.0 => 4,
        a if a > 1_000_000.0 => 5,
        a if a > 500_000.0 => 6,
        a if a > 100_000.0 => 7,
        _ => 8,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_urls() {
        assert_eq!(
            WeatherOverlay::Rain.tile_url(1704066600, 512, 4, 4, 6),
            "https://tilecache.rainviewer.com/v2/radar/1704066600/512/4/4/6/6/1_1.png"
        );
        assert_eq!(
            WeatherOverlay::Clouds.tile_url(1704066600, 256, 3, 1, 2),
            "https://tilecache.rainviewer.com/v2/satellite/1704066600/256/3/1/2/0/0_0.png"
        );
        assert!(WeatherOverlay::Precipitation.tile_url(1, 256, 1, 0, 0).ends_with("/2/1_1.png"));
        assert!(WeatherOverlay::Clouds.uses_satellite_frames());
    }

    #[test]
    fn test_lat_lon_to_tile() {
        assert_eq!(lat_lon_to_tile(0.0, 0.0, 1), (1, 1));
        assert_eq!(lat_lon_to_tile(0.0, -180.0, 2), (0, 2));
        // Washington DC at zoom 4
        assert_eq!(lat_lon_to_tile(38.9072, -77.0369, 4), (4, 6));
        // Poles and the antimeridian stay in range
        assert_eq!(lat_lon_to_tile(90.0, 180.0, 3), (7, 0));
        assert_eq!(lat_lon_to_tile(-90.0, -180.0, 3), (0, 7));
    }

    #[test]
    fn test_zoom_for_altitude() {
        assert_eq!(zoom_for_altitude(20_000_000.0), 2);
        assert_eq!(zoom_for_altitude(10_000_000.0), 3);
        assert_eq!(zoom_for_altitude(750_000.0), 6);
        assert_eq!(zoom_for_altitude(1_000.0), 8);
    }
}
