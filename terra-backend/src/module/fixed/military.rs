///! Military base reference table

use serde::{Deserialize, Serialize};

use super::StaticTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Branch {
    Army,
    Navy,
    AirForce,
    Marines,
    SpaceForce,
    MultiService,
    Foreign,
}

impl Branch {
    pub fn display_name(&self) -> &'static str {
        match self {
            Branch::Army => "Army",
            Branch::Navy => "Navy",
            Branch::AirForce => "Air Force",
            Branch::Marines => "Marines",
            Branch::SpaceForce => "Space Force",
            Branch::MultiService => "Joint/Multi",
            Branch::Foreign => "Foreign",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BaseType {
    AirBase,
    NavalBase,
    ArmyPost,
    MarineBase,
    JointBase,
    MissileSilo,
    CommandCenter,
    TrainingFacility,
    IntelligenceFacility,
    ForeignBase,
}

impl BaseType {
    pub fn display_name(&self) -> &'static str {
        match self {
            BaseType::AirBase => "Air Base",
            BaseType::NavalBase => "Naval Base",
            BaseType::ArmyPost => "Army Post",
            BaseType::MarineBase => "Marine Base",
            BaseType::JointBase => "Joint Base",
            BaseType::MissileSilo => "ICBM Silo",
            BaseType::CommandCenter => "Command Center",
            BaseType::TrainingFacility => "Training Facility",
            BaseType::IntelligenceFacility => "Intelligence",
            BaseType::ForeignBase => "Foreign Base",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MilitaryBase {
    pub id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    /// ISO country code of the host territory
    pub country: String,
    pub branch: Branch,
    pub base_type: BaseType,
    pub operated_by: String,
    pub is_overseas: bool,
}

type Row = (&'static str, &'static str, f64, f64, &'static str, Branch, BaseType, &'static str, bool);

const BASES: &[Row] = &[
    ("US-ARMY-001", "Fort Liberty (Bragg)", 35.139, -79.006, "US", Branch::Army, BaseType::ArmyPost, "United States", false),
    ("US-ARMY-010", "Fort Sill", 34.650, -98.400, "US", Branch::Army, BaseType::ArmyPost, "United States", false),
    ("US-AF-003", "Eglin AFB", 30.483, -86.525, "US", Branch::AirForce, BaseType::AirBase, "United States", false),
    ("US-AF-013", "Tinker AFB", 35.415, -97.385, "US", Branch::AirForce, BaseType::AirBase, "United States", false),
    ("US-ICBM-002", "Minot AFB", 48.416, -101.358, "US", Branch::AirForce, BaseType::MissileSilo, "United States", false),
    ("US-OVRSEAS-009", "RAF Croughton", 51.993, -1.206, "GB", Branch::AirForce, BaseType::IntelligenceFacility, "United States", true),
    ("US-OVRSEAS-024", "Diego Garcia", -7.313, 72.411, "IO", Branch::Navy, BaseType::NavalBase, "United States", true),
    ("RU-012", "Plesetsk Cosmodrome", 62.960, 40.680, "RU", Branch::SpaceForce, BaseType::TrainingFacility, "Russia", false),
    ("GB-005", "RAF Gibraltar", 36.151, -5.350, "GI", Branch::AirForce, BaseType::AirBase, "United Kingdom", true),
    ("NATO-001", "NATO HQ Brussels", 50.879, 4.424, "BE", Branch::MultiService, BaseType::CommandCenter, "NATO", true),
];

/// Built-in base table
#[derive(Debug, Default, Clone, Copy)]
pub struct MilitaryBaseTable;

impl StaticTable for MilitaryBaseTable {
    type Record = MilitaryBase;

    fn name(&self) -> &str {
        "military-bases"
    }

    fn load(&self) -> Vec<MilitaryBase> {
        BASES
            .iter()
            .map(|&(id, name, latitude, longitude, country, branch, base_type, operated_by, is_overseas)| {
                MilitaryBase {
                    id: id.to_string(),
                    name: name.to_string(),
                    latitude,
                    longitude,
                    country: country.to_string(),
                    branch,
                    base_type,
                    operated_by: operated_by.to_string(),
                    is_overseas,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_table_is_valid() {
        let bases = MilitaryBaseTable.load();
        assert_eq!(bases.len(), BASES.len());

        let ids: HashSet<&str> = bases.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids.len(), bases.len(), "duplicate base id");

        for base in &bases {
            assert!((-90.0..=90.0).contains(&base.latitude), "{}", base.id);
            assert!((-180.0..=180.0).contains(&base.longitude), "{}", base.id);
        }
    }

    #[test]
    fn test_overseas_flag() {
        let bases = MilitaryBaseTable.load();
        let dg = bases.iter().find(|b| b.name == "Diego Garcia").unwrap();
        assert!(dg.is_overseas);
        assert_eq!(dg.base_type.display_name(), "Naval Base");
        assert_eq!(dg.branch.display_name(), "Navy");
    }
}
