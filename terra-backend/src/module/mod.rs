pub mod feed;
pub mod fixed;
pub mod flight;
pub mod quake;
pub mod sat;
pub mod scheduled;
pub mod state;
pub mod weather;
