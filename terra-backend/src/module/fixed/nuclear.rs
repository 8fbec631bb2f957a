///! Nuclear site reference table

use serde::{Deserialize, Serialize};

use super::StaticTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SiteType {
    PowerPlant,
    WeaponsStorage,
    IcbmBase,
    ResearchReactor,
    EnrichmentFacility,
    ReprocessingPlant,
    WasteStorage,
    TestSite,
    SubmarineBase,
    CommandControl,
}

impl SiteType {
    pub fn display_name(&self) -> &'static str {
        match self {
            SiteType::PowerPlant => "Power Plant",
            SiteType::WeaponsStorage => "Weapons Storage",
            SiteType::IcbmBase => "ICBM Base",
            SiteType::ResearchReactor => "Research Reactor",
            SiteType::EnrichmentFacility => "Enrichment Facility",
            SiteType::ReprocessingPlant => "Reprocessing Plant",
            SiteType::WasteStorage => "Waste Storage",
            SiteType::TestSite => "Test Site",
            SiteType::SubmarineBase => "Submarine Base",
            SiteType::CommandControl => "Command Control",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SiteStatus {
    Operational,
    Decommissioned,
    UnderConstruction,
    Planned,
    Shutdown,
    Historical,
}

impl SiteStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, SiteStatus::Operational | SiteStatus::UnderConstruction)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NuclearSite {
    pub id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub country: String,
    pub site_type: SiteType,
    pub status: SiteStatus,
    pub operated_by: String,
    /// Net electrical capacity, power plants only
    pub capacity_mw: Option<u32>,
}

type Row = (&'static str, &'static str, f64, f64, &'static str, SiteType, SiteStatus, &'static str, Option<u32>);

const SITES: &[Row] = &[
    ("US-PV-001", "Palo Verde", 33.388, -112.862, "United States", SiteType::PowerPlant, SiteStatus::Operational, "Arizona Public Service", Some(3937)),
    ("US-WB-001", "Watts Bar", 35.603, -84.793, "United States", SiteType::PowerPlant, SiteStatus::Operational, "Tennessee Valley Authority", Some(2330)),
    ("US-HC-001", "Hope Creek", 39.463, -75.534, "United States", SiteType::PowerPlant, SiteStatus::Operational, "PSEG", Some(1261)),
    ("US-GG-001", "Grand Gulf", 32.008, -91.048, "United States", SiteType::PowerPlant, SiteStatus::Operational, "Entergy", Some(1443)),
    ("US-FER-001", "Fermi 2", 41.963, -83.258, "United States", SiteType::PowerPlant, SiteStatus::Operational, "DTE Energy", Some(1198)),
    ("US-IP-001", "Indian Point", 41.270, -73.953, "United States", SiteType::PowerPlant, SiteStatus::Shutdown, "Constellation Energy", Some(0)),
    ("US-NTS-001", "Nevada Test Site", 37.117, -116.050, "United States", SiteType::TestSite, SiteStatus::Historical, "NNSA", None),
    ("JP-KK-001", "Kashiwazaki-Kariwa", 37.426, 138.597, "Japan", SiteType::PowerPlant, SiteStatus::Operational, "Tokyo Electric Power", Some(8212)),
    ("FR-LH-001", "La Hague", 49.678, -1.879, "France", SiteType::ReprocessingPlant, SiteStatus::Operational, "Orano", None),
];

/// Built-in nuclear site table
#[derive(Debug, Default, Clone, Copy)]
pub struct NuclearSiteTable;

impl StaticTable for NuclearSiteTable {
    type Record = NuclearSite;

    fn name(&self) -> &str {
        "nuclear-sites"
    }

    fn load(&self) -> Vec<NuclearSite> {
        SITES
            .iter()
            .map(|&(id, name, latitude, longitude, country, site_type, status, operated_by, capacity_mw)| {
                NuclearSite {
                    id: id.to_string(),
                    name: name.to_string(),
                    latitude,
                    longitude,
                    country: country.to_string(),
                    site_type,
                    status,
                    operated_by: operated_by.to_string(),
                    capacity_mw,
                }
            })
            .collect()
    }
}
