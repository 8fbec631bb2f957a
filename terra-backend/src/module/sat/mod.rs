///! Satellite tracking module
///!
///! - `tle`: Two-Line Element text parsing
///! - `orbit`: approximate sub-satellite point estimation
///! - `client`: CelesTrak TLE feed client

mod types;
pub use types::{OrbitalElementSet, SatelliteCategory, SubSatellitePoint};

pub mod tle;
pub use tle::{parse_many, parse_one};

pub mod orbit;
pub use orbit::{OrbitalElements, ground_track, propagate};

mod client;
pub use client::{CELESTRAK_GP_URL, CelestrakClient};
