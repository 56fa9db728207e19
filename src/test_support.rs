//! Shared fixtures for unit tests

use std::sync::Arc;

use crate::core::config::EngineConfig;
use crate::core::types::{Color, FactionId, UnitId};
use crate::grid::TilePos;
use crate::map::Map;
use crate::rules::{presets, Scenario};

pub fn skirmish_scenario() -> Arc<Scenario> {
    let loaded = presets::skirmish_scenario(&EngineConfig::default()).expect("built-in rules load");
    Arc::new(loaded.scenario)
}

/// Skirmish-rules map with Red to move on turn 0
pub fn duel_map(width: i32, height: i32) -> (Map, FactionId, FactionId) {
    let mut map = Map::with_size(skirmish_scenario(), EngineConfig::default(), width, height)
        .expect("map fits the size limit");
    let red = map.add_faction("Red", Color::RED);
    let blue = map.add_faction("Blue", Color::BLUE);
    map.set_turn_state(Some(red), 0);
    (map, red, blue)
}

/// Spawn an active unit by type name
pub fn spawn(map: &mut Map, unit_type: &str, owner: FactionId, x: i16, y: i16) -> UnitId {
    let ty = map.scenario().find_unit_type(unit_type).expect("known unit type");
    let id = map.spawn_unit(ty, owner, TilePos::new(x, y)).expect("free tile");
    map.set_unit_active(id, true).expect("unit exists");
    id
}
