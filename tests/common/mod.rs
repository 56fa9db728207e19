//! Shared setup for integration tests

#![allow(dead_code)]

use std::sync::Arc;

use grid_tactics::core::{Color, EngineConfig, FactionId, UnitId};
use grid_tactics::grid::TilePos;
use grid_tactics::map::Map;
use grid_tactics::rules::{skirmish_scenario, Scenario};

pub fn scenario() -> Arc<Scenario> {
    let loaded = skirmish_scenario(&EngineConfig::default()).unwrap();
    Arc::new(loaded.scenario)
}

/// Plains-only map with Red and Blue registered, match not started
pub fn open_field(width: i32, height: i32) -> (Map, FactionId, FactionId) {
    let mut map = Map::with_size(scenario(), EngineConfig::default(), width, height).unwrap();
    let red = map.add_faction("Red", Color::RED);
    let blue = map.add_faction("Blue", Color::BLUE);
    (map, red, blue)
}

pub fn spawn(map: &mut Map, unit_type: &str, owner: FactionId, x: i16, y: i16) -> UnitId {
    let ty = map.scenario().find_unit_type(unit_type).unwrap();
    map.spawn_unit(ty, owner, TilePos::new(x, y)).unwrap()
}

pub fn set_terrain(map: &mut Map, name: &str, x: i16, y: i16) {
    let terrain = map.scenario().find_terrain(name).unwrap();
    map.set_terrain(TilePos::new(x, y), terrain).unwrap();
}
