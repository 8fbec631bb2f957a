///! Public CCTV camera locations

use serde::{Deserialize, Serialize};

use super::StaticTable;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CctvCamera {
    pub id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub city: String,
    /// Public still-image or stream endpoint, if one is known
    pub stream_url: Option<String>,
}

const CAMERAS: &[(&str, &str, f64, f64, &str)] = &[
    ("DC-001", "Pennsylvania Ave & 15th St", 38.8977, -77.0334, "Washington"),
    ("DC-002", "Union Station", 38.8973, -77.0063, "Washington"),
    ("NYC-001", "Times Square", 40.7580, -73.9855, "New York"),
    ("NYC-002", "Brooklyn Bridge", 40.7061, -73.9969, "New York"),
    ("LDN-001", "Trafalgar Square", 51.5080, -0.1281, "London"),
    ("LDN-002", "Tower Bridge", 51.5055, -0.0754, "London"),
    ("TYO-001", "Shibuya Crossing", 35.6595, 139.7005, "Tokyo"),
    ("PAR-001", "Champs-Elysees", 48.8698, 2.3078, "Paris"),
];

/// Built-in camera table
#[derive(Debug, Default, Clone, Copy)]
pub struct CctvTable;

impl StaticTable for CctvTable {
    type Record = CctvCamera;

    fn name(&self) -> &str {
        "cctv"
    }

    fn load(&self) -> Vec<CctvCamera> {
        CAMERAS
            .iter()
            .map(|&(id, name, latitude, longitude, city)| CctvCamera {
                id: id.to_string(),
                name: name.to_string(),
                latitude,
                longitude,
                city: city.to_string(),
                stream_url: None,
            })
            .collect()
    }
}
