//! Built-in rule set for quick matches and tests

use crate::core::config::EngineConfig;
use crate::core::error::Result;
use crate::rules::loader::{load_scenario_json, LoadedScenario};

/// Small land-war rule set: three unit types, six terrains
pub const SKIRMISH_RULES: &str = r#"{
    "name": "Skirmish",
    "defaultTerrainType": "Plains",
    "terrainTypes": {
        "Plains":   { "income": 0 },
        "Forest":   { "coverBonus": 20 },
        "Mountain": { "coverBonus": 40 },
        "Sea":      {},
        "City":     { "income": 100, "isCapturable": true, "coverBonus": 30 },
        "HQ":       { "displayName": "Headquarters", "income": 100, "isCapturable": true, "coverBonus": 40 },
        "Factory":  { "income": 100, "isCapturable": true, "coverBonus": 30, "constructs": ["Infantry", "Tank", "Artillery"] }
    },
    "movementTypes": {
        "Foot":   { "costs": { "Plains": 1, "Forest": 1, "Mountain": 2, "City": 1, "HQ": 1, "Factory": 1, "Sea": -1 } },
        "Treads": { "costs": { "Plains": 1, "Forest": 2, "City": 1, "HQ": 1, "Factory": 1 }, "consumesSupplies": true }
    },
    "unitTypes": {
        "Infantry": {
            "movementRange": 3,
            "movementType": "Foot",
            "attackRange": [1, 1],
            "weapons": [
                { "name": "Rifle", "damagePercentagesByUnitType": { "Infantry": 55, "Tank": 15, "Artillery": 45 } }
            ],
            "maxSupplies": 99,
            "buildCost": 100
        },
        "Tank": {
            "movementRange": 6,
            "movementType": "Treads",
            "attackRange": [1, 1],
            "weapons": [
                { "name": "Cannon", "ammoPerShot": 1, "damagePercentagesByUnitType": { "Tank": 55, "Artillery": 70, "Infantry": 80 } },
                { "name": "Machine Gun", "damagePercentagesByUnitType": { "Infantry": 70, "Artillery": 40, "Tank": 5 } }
            ],
            "maxAmmo": 9,
            "maxSupplies": 70,
            "buildCost": 700
        },
        "Artillery": {
            "movementRange": 5,
            "movementType": "Treads",
            "attackRange": [2, 3],
            "weapons": [
                { "name": "Shell", "ammoPerShot": 1, "damagePercentagesByUnitType": { "Infantry": 90, "Tank": 70, "Artillery": 75 } }
            ],
            "maxAmmo": 9,
            "maxSupplies": 50,
            "buildCost": 600
        }
    }
}"#;

pub fn skirmish_scenario(config: &EngineConfig) -> Result<LoadedScenario> {
    load_scenario_json(SKIRMISH_RULES, config)
}
