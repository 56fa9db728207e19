//! Serialized rule records
//!
//! These mirror the scenario data as it arrives from outside the engine.
//! Maps are ordered so that record ids are assigned deterministically.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::rules::unit_type::AttackRange;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioRecords {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_terrain_type: Option<String>,
    #[serde(default)]
    pub terrain_types: BTreeMap<String, TerrainTypeRecord>,
    #[serde(default)]
    pub movement_types: BTreeMap<String, MovementTypeRecord>,
    #[serde(default)]
    pub unit_types: BTreeMap<String, UnitTypeRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TerrainTypeRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    pub income: i32,
    pub is_capturable: bool,
    pub cover_bonus: i32,
    /// Unit types that can be constructed on this terrain
    pub constructs: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MovementTypeRecord {
    pub costs: BTreeMap<String, i32>,
    pub consumes_supplies: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitTypeRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    pub movement_range: i32,
    pub movement_type: String,
    #[serde(default)]
    pub attack_range: AttackRange,
    #[serde(default)]
    pub weapons: Vec<WeaponRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_health: Option<i32>,
    #[serde(default)]
    pub max_ammo: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_supplies: Option<i32>,
    #[serde(default)]
    pub build_cost: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WeaponRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub damage_percentages_by_unit_type: BTreeMap<String, i32>,
    pub ammo_per_shot: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_camel_case_records() {
        let json = r#"{
            "name": "Skirmish",
            "terrainTypes": { "Plains": { "income": 0 }, "City": { "income": 100, "isCapturable": true, "coverBonus": 30 } },
            "movementTypes": { "Foot": { "costs": { "Plains": 1, "City": 1 } } },
            "unitTypes": {
                "Infantry": {
                    "movementRange": 3,
                    "movementType": "Foot",
                    "attackRange": [1, 1],
                    "weapons": [{ "damagePercentagesByUnitType": { "Infantry": 55 }, "ammoPerShot": 0 }]
                }
            }
        }"#;

        let records: ScenarioRecords = serde_json::from_str(json).unwrap();
        assert_eq!(records.terrain_types["City"].cover_bonus, 30);
        assert!(records.terrain_types["City"].is_capturable);
        let infantry = &records.unit_types["Infantry"];
        assert_eq!(infantry.attack_range, AttackRange::new(1, 1));
        assert_eq!(infantry.weapons[0].damage_percentages_by_unit_type["Infantry"], 55);
    }
}
