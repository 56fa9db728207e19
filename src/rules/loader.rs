//! Build a `Scenario` from serialized rule records
//!
//! Each record is validated on its own. A bad record is logged and skipped,
//! the rest of the scenario still loads.

use tracing::{debug, warn};

use crate::core::config::EngineConfig;
use crate::core::error::{EngineError, Result};
use crate::rules::movement::MovementType;
use crate::rules::records::{MovementTypeRecord, ScenarioRecords, TerrainTypeRecord, UnitTypeRecord};
use crate::rules::scenario::Scenario;
use crate::rules::terrain::TerrainType;
use crate::rules::unit_type::{UnitType, Weapon};

/// Result of a load: the usable scenario plus every record that was dropped
#[derive(Debug)]
pub struct LoadedScenario {
    pub scenario: Scenario,
    pub skipped: Vec<EngineError>,
}

/// Parse JSON records and load them
pub fn load_scenario_json(json: &str, config: &EngineConfig) -> Result<LoadedScenario> {
    let records: ScenarioRecords = serde_json::from_str(json)?;
    Ok(load_scenario(&records, config))
}

/// Load terrain, then movement, then unit types (each depends on the previous)
pub fn load_scenario(records: &ScenarioRecords, config: &EngineConfig) -> LoadedScenario {
    let mut scenario = Scenario::new(records.name.clone());
    let mut skipped = Vec::new();

    for (name, record) in &records.terrain_types {
        let result = build_terrain(name, record)
            .and_then(|terrain| scenario.terrain_types.insert(terrain));
        if let Err(err) = result {
            skip(&mut skipped, err);
        }
    }

    for (name, record) in &records.movement_types {
        let result = build_movement_type(&scenario, name, record)
            .and_then(|movement| scenario.movement_types.insert(movement));
        if let Err(err) = result {
            skip(&mut skipped, err);
        }
    }

    for (name, record) in &records.unit_types {
        let result = build_unit_type(&scenario, config, name, record)
            .and_then(|unit_type| scenario.unit_types.insert(unit_type));
        if let Err(err) = result {
            skip(&mut skipped, err);
        }
    }

    prune_construct_lists(&mut scenario);

    scenario.default_terrain = match &records.default_terrain_type {
        Some(name) => {
            let found = scenario.find_terrain(name);
            if found.is_none() {
                skip(
                    &mut skipped,
                    EngineError::configuration(
                        format!("Scenario \"{}\"", records.name),
                        format!("unknown default terrain \"{}\"", name),
                    ),
                );
            }
            found
        }
        None => None,
    };

    debug!(
        scenario = %scenario.name,
        terrain_types = scenario.terrain_types.len(),
        movement_types = scenario.movement_types.len(),
        unit_types = scenario.unit_types.len(),
        skipped = skipped.len(),
        "Loaded scenario"
    );

    LoadedScenario { scenario, skipped }
}

fn skip(skipped: &mut Vec<EngineError>, err: EngineError) {
    warn!(error = %err, "Skipping rule record");
    skipped.push(err);
}

fn build_terrain(name: &str, record: &TerrainTypeRecord) -> Result<TerrainType> {
    let label = format!("TerrainType \"{}\"", name);
    if !(0..=100).contains(&record.cover_bonus) {
        return Err(EngineError::configuration(
            label,
            format!("coverBonus {} outside 0..=100", record.cover_bonus),
        ));
    }
    if record.income < 0 {
        return Err(EngineError::configuration(
            label,
            format!("negative income {}", record.income),
        ));
    }

    Ok(TerrainType {
        name: name.to_string(),
        display_name: record.display_name.clone().unwrap_or_else(|| name.to_string()),
        income: record.income,
        cover_bonus: record.cover_bonus,
        capturable: record.is_capturable,
        constructible_unit_types: record.constructs.clone(),
    })
}

fn build_movement_type(
    scenario: &Scenario,
    name: &str,
    record: &MovementTypeRecord,
) -> Result<MovementType> {
    let mut movement = MovementType::new(name);
    movement.consumes_supplies = record.consumes_supplies;

    for (terrain_name, &cost) in &record.costs {
        match scenario.find_terrain(terrain_name) {
            Some(terrain) => movement.set_cost(terrain, cost)?,
            None => warn!(
                movement_type = name,
                terrain = %terrain_name,
                "Ignoring cost for unknown terrain"
            ),
        }
    }

    Ok(movement)
}

fn build_unit_type(
    scenario: &Scenario,
    config: &EngineConfig,
    name: &str,
    record: &UnitTypeRecord,
) -> Result<UnitType> {
    let label = format!("UnitType \"{}\"", name);

    let movement_type = scenario
        .movement_types
        .id_of(&record.movement_type)
        .ok_or_else(|| {
            EngineError::configuration(
                &label,
                format!("unknown movement type \"{}\"", record.movement_type),
            )
        })?;

    if record.movement_range < 0 {
        return Err(EngineError::configuration(&label, "negative movementRange"));
    }
    if record.attack_range.min > record.attack_range.max {
        return Err(EngineError::configuration(
            &label,
            format!(
                "attackRange [{}, {}] is inverted",
                record.attack_range.min, record.attack_range.max
            ),
        ));
    }

    let max_health = record.max_health.unwrap_or(config.max_health);
    let max_supplies = record.max_supplies.unwrap_or(config.default_max_supplies);
    if max_health <= 0 || record.max_ammo < 0 || max_supplies < 0 || record.build_cost < 0 {
        return Err(EngineError::configuration(
            &label,
            "maxima and buildCost must not be negative (maxHealth must be positive)",
        ));
    }

    let mut weapons = Vec::with_capacity(record.weapons.len());
    for (index, weapon_record) in record.weapons.iter().enumerate() {
        if weapon_record.ammo_per_shot < 0 {
            return Err(EngineError::configuration(
                &label,
                format!("weapon {} has negative ammoPerShot", index),
            ));
        }
        let weapon_name = weapon_record
            .name
            .clone()
            .unwrap_or_else(|| format!("{} weapon {}", name, index + 1));
        let mut weapon = Weapon::new(weapon_name).with_ammo_per_shot(weapon_record.ammo_per_shot);
        for (target, &pct) in &weapon_record.damage_percentages_by_unit_type {
            weapon.set_damage_percentage(target, pct);
        }
        weapons.push(weapon);
    }

    Ok(UnitType {
        name: name.to_string(),
        display_name: record.display_name.clone().unwrap_or_else(|| name.to_string()),
        movement_range: record.movement_range as u32,
        movement_type,
        attack_range: record.attack_range,
        weapons,
        max_health,
        max_ammo: record.max_ammo,
        max_supplies,
        build_cost: record.build_cost,
    })
}

/// Drop construct entries naming unit types that failed to load or never existed
fn prune_construct_lists(scenario: &mut Scenario) {
    let unit_types = &scenario.unit_types;
    let terrain_ids: Vec<_> = scenario.terrain_types.ids().collect();
    let mut pruned = Vec::new();

    for id in terrain_ids {
        let terrain = &scenario.terrain_types[id];
        let (known, unknown): (Vec<String>, Vec<String>) = terrain
            .constructible_unit_types
            .iter()
            .cloned()
            .partition(|name| unit_types.contains(name));
        if !unknown.is_empty() {
            warn!(terrain = %terrain.name, ?unknown, "Dropping unknown constructible unit types");
            pruned.push((id, known));
        }
    }

    for (id, known) in pruned {
        if let Some(terrain) = scenario.terrain_types.get_mut(id) {
            terrain.constructible_unit_types = known;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RULES: &str = r#"{
        "name": "Loader Test",
        "defaultTerrainType": "plains",
        "terrainTypes": {
            "Plains": {},
            "Factory": { "income": 100, "isCapturable": true, "constructs": ["Infantry", "Battleship"] },
            "Swamp": { "coverBonus": 150 }
        },
        "movementTypes": {
            "Foot": { "costs": { "Plains": 1, "Factory": 1, "Lava": 2 } },
            "Broken": { "costs": { "Plains": 0 } }
        },
        "unitTypes": {
            "Infantry": { "movementRange": 3, "movementType": "Foot", "weapons": [{ "damagePercentagesByUnitType": { "Infantry": 55 } }] },
            "Ghost": { "movementRange": 2, "movementType": "Broken" },
            "Sniper": { "movementRange": 2, "movementType": "Foot", "attackRange": [3, 1] }
        }
    }"#;

    #[test]
    fn test_bad_records_are_skipped() {
        let loaded = load_scenario_json(RULES, &EngineConfig::default()).unwrap();
        let scenario = &loaded.scenario;

        // Swamp (cover), Broken (zero cost), Ghost (missing movement type), Sniper (range)
        assert_eq!(loaded.skipped.len(), 4);
        assert_eq!(scenario.terrain_types.len(), 2);
        assert_eq!(scenario.movement_types.len(), 1);
        assert_eq!(scenario.unit_types.len(), 1);
        assert!(scenario.find_unit_type("Infantry").is_some());
        assert!(loaded
            .skipped
            .iter()
            .all(|e| matches!(e, EngineError::Configuration { .. })));
    }

    #[test]
    fn test_defaults_and_construct_pruning() {
        let loaded = load_scenario_json(RULES, &EngineConfig::default()).unwrap();
        let scenario = &loaded.scenario;

        assert_eq!(scenario.default_terrain, scenario.find_terrain("Plains"));
        let factory = scenario.terrain(scenario.find_terrain("factory").unwrap());
        assert_eq!(factory.constructible_unit_types, vec!["Infantry".to_string()]);

        let infantry = scenario.unit_type(scenario.find_unit_type("Infantry").unwrap());
        assert_eq!(infantry.max_health, 10);
        assert_eq!(infantry.max_supplies, 99);
        assert!(infantry.weapons[0].can_target("infantry"));
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        let result = load_scenario_json("{ not json", &EngineConfig::default());
        assert!(matches!(result, Err(EngineError::Serde(_))));
    }
}
