///! Built-in static layers
///!
///! Military bases, nuclear sites and CCTV cameras are not network feeds;
///! they load from fixed in-memory tables. They still go through the same
///! refresh lifecycle as live sources so consumers see uniform state.

pub mod cctv;
pub mod military;
pub mod nuclear;

pub use cctv::{CctvCamera, CctvTable};
pub use military::{BaseType, Branch, MilitaryBase, MilitaryBaseTable};
pub use nuclear::{NuclearSite, NuclearSiteTable, SiteStatus, SiteType};

/// Synchronous source of a fixed record set
pub trait StaticTable: Send + Sync {
    type Record: Clone + Send + Sync + 'static;

    fn name(&self) -> &str;

    fn load(&self) -> Vec<Self::Record>;
}
