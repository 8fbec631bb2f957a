pub mod types;

pub use types::{BoundingBox, DataLayer, GeoPoint};
