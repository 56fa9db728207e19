//! Save/sync format
//!
//! Terrain is palette encoded: one character per tile, row-major, with the
//! characters assigned in order of first appearance. Restoring a snapshot
//! and taking a new one yields an identical value.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

use ahash::AHashMap;
use tracing::{debug, warn};

use crate::core::config::EngineConfig;
use crate::core::error::{EngineError, Result};
use crate::core::types::{Color, FactionId, TurnIndex, UnitId};
use crate::grid::TilePos;
use crate::map::battle_map::Map;
use crate::map::unit::Unit;
use crate::rules::{Scenario, TerrainTypeId};

const PALETTE: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapSnapshot {
    pub scenario_name: String,
    pub width: i16,
    pub height: i16,
    pub tiles: String,
    /// Palette character -> terrain name
    pub terrain_types: BTreeMap<String, String>,
    #[serde(default)]
    pub units: Vec<UnitSnapshot>,
    #[serde(default)]
    pub factions: Vec<FactionSnapshot>,
    #[serde(default)]
    pub tile_owners: Vec<TileOwnerSnapshot>,
    #[serde(default)]
    pub current_faction: Option<FactionId>,
    #[serde(default)]
    pub turn_index: TurnIndex,
    #[serde(default = "first_unit_id")]
    pub next_unit_id: UnitId,
}

fn first_unit_id() -> UnitId {
    UnitId(1)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitSnapshot {
    /// Missing ids are handed out in record order past every listed id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<UnitId>,
    pub unit_type: String,
    pub owner: FactionId,
    pub x: i16,
    pub y: i16,
    pub health: i32,
    pub ammo: i32,
    pub supplies: i32,
    #[serde(default)]
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactionSnapshot {
    pub name: String,
    #[serde(default)]
    pub funds: i32,
    #[serde(default)]
    pub color: Color,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headquarters: Option<TilePos>,
    #[serde(default = "default_controllable")]
    pub controllable: bool,
    #[serde(default)]
    pub defeated: bool,
}

fn default_controllable() -> bool {
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileOwnerSnapshot {
    pub x: i16,
    pub y: i16,
    pub owner: FactionId,
}

impl MapSnapshot {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl Map {
    /// Capture the full match state
    pub fn snapshot(&self) -> Result<MapSnapshot> {
        let mut palette: AHashMap<TerrainTypeId, char> = AHashMap::new();
        let mut terrain_types = BTreeMap::new();
        let mut free_chars = PALETTE.chars();
        let mut tiles = String::with_capacity(self.width() as usize * self.height() as usize);
        let mut tile_owners = Vec::new();

        for pos in self.grid().positions() {
            let Some(tile) = self.tile(pos) else {
                continue;
            };
            let symbol = match palette.get(&tile.terrain) {
                Some(&c) => c,
                None => {
                    let c = free_chars.next().ok_or_else(|| {
                        EngineError::configuration(
                            format!("Scenario \"{}\"", self.scenario().name),
                            format!("more than {} terrain types on one map", PALETTE.len()),
                        )
                    })?;
                    palette.insert(tile.terrain, c);
                    terrain_types.insert(c.to_string(), self.scenario().terrain(tile.terrain).name.clone());
                    c
                }
            };
            tiles.push(symbol);

            if let Some(owner) = tile.owner {
                tile_owners.push(TileOwnerSnapshot { x: pos.x, y: pos.y, owner });
            }
        }

        let units = self
            .units()
            .map(|unit| UnitSnapshot {
                id: Some(unit.id),
                unit_type: self.unit_type_of(unit).name.clone(),
                owner: unit.owner,
                x: unit.position.x,
                y: unit.position.y,
                health: unit.health(),
                ammo: unit.ammo(),
                supplies: unit.supplies(),
                active: unit.active,
            })
            .collect();

        let factions = self
            .factions()
            .iter()
            .map(|faction| FactionSnapshot {
                name: faction.name.clone(),
                funds: faction.funds(),
                color: faction.color(),
                headquarters: faction.headquarters(),
                controllable: faction.controllable,
                defeated: faction.defeated,
            })
            .collect();

        Ok(MapSnapshot {
            scenario_name: self.scenario().name.clone(),
            width: self.width(),
            height: self.height(),
            tiles,
            terrain_types,
            units,
            factions,
            tile_owners,
            current_faction: self.current_faction(),
            turn_index: self.turn_index(),
            next_unit_id: self.next_unit_id(),
        })
    }

    /// Rebuild a map from a snapshot
    ///
    /// The event queue of the returned map is empty.
    pub fn from_snapshot(scenario: Arc<Scenario>, config: EngineConfig, snapshot: &MapSnapshot) -> Result<Map> {
        if !snapshot.scenario_name.eq_ignore_ascii_case(&scenario.name) {
            warn!(
                expected = %scenario.name,
                found = %snapshot.scenario_name,
                "Snapshot was taken with a different scenario"
            );
        }

        let mut map = Map::with_size(
            scenario,
            config,
            i32::from(snapshot.width),
            i32::from(snapshot.height),
        )?;

        let mut palette: AHashMap<char, TerrainTypeId> = AHashMap::new();
        for (symbol, name) in &snapshot.terrain_types {
            let mut chars = symbol.chars();
            let (Some(c), None) = (chars.next(), chars.next()) else {
                return Err(snapshot_error(format!("palette key \"{}\" is not one character", symbol)));
            };
            let terrain = map
                .scenario()
                .find_terrain(name)
                .ok_or_else(|| snapshot_error(format!("unknown terrain \"{}\"", name)))?;
            palette.insert(c, terrain);
        }

        let positions: Vec<TilePos> = map.grid().positions().collect();
        if snapshot.tiles.chars().count() != positions.len() {
            return Err(snapshot_error(format!(
                "expected {} tiles, found {}",
                positions.len(),
                snapshot.tiles.chars().count()
            )));
        }
        for (pos, symbol) in positions.into_iter().zip(snapshot.tiles.chars()) {
            let terrain = *palette
                .get(&symbol)
                .ok_or_else(|| snapshot_error(format!("tile {} uses unmapped symbol '{}'", pos, symbol)))?;
            map.set_terrain(pos, terrain)?;
        }

        for record in &snapshot.factions {
            let id = map.add_faction(record.name.clone(), record.color);
            map.set_funds(id, record.funds)?;
            let faction = map.faction_mut(id)?;
            faction.controllable = record.controllable;
            faction.defeated = record.defeated;
        }

        // Saves that only carry owner indices get placeholder factions
        let referenced = snapshot
            .units
            .iter()
            .map(|u| u.owner)
            .chain(snapshot.tile_owners.iter().map(|t| t.owner))
            .chain(snapshot.current_faction)
            .map(|f| f.index() + 1)
            .max()
            .unwrap_or(0);
        while map.factions().len() < referenced {
            let name = format!("Faction {}", map.factions().len() + 1);
            map.add_faction(name, Color::default());
        }

        for owner in &snapshot.tile_owners {
            map.set_tile_owner(TilePos::new(owner.x, owner.y), Some(owner.owner))?;
        }
        for (index, record) in snapshot.factions.iter().enumerate() {
            if let Some(hq) = record.headquarters {
                map.set_headquarters(FactionId::new(index), hq)?;
            }
        }

        let mut next_free = snapshot.next_unit_id;
        for id in snapshot.units.iter().filter_map(|u| u.id) {
            next_free = next_free.max(id.next().ok_or_else(|| exhausted_ids(id))?);
        }

        for record in &snapshot.units {
            let id = match record.id {
                Some(id) => id,
                None => {
                    let id = next_free;
                    next_free = id.next().ok_or_else(|| exhausted_ids(id))?;
                    id
                }
            };
            let unit_type = map
                .scenario()
                .find_unit_type(&record.unit_type)
                .ok_or_else(|| snapshot_error(format!("unknown unit type \"{}\"", record.unit_type)))?;
            let ty = map.scenario().unit_type(unit_type);
            let mut unit = Unit::new(id, unit_type, ty, record.owner, TilePos::new(record.x, record.y));
            unit.set_health(ty, record.health);
            unit.set_ammo(ty, record.ammo);
            unit.set_supplies(ty, record.supplies);
            unit.active = record.active;
            map.insert_unit(unit)?;
        }

        if let Some(faction) = snapshot.current_faction {
            map.require_faction(faction)?;
        }
        map.set_next_unit_id(next_free);
        map.set_turn_state(snapshot.current_faction, snapshot.turn_index);
        map.clear_events();

        debug!(
            width = snapshot.width,
            height = snapshot.height,
            units = snapshot.units.len(),
            factions = snapshot.factions.len(),
            "Restored map from snapshot"
        );
        Ok(map)
    }
}

fn snapshot_error(reason: String) -> EngineError {
    EngineError::configuration("MapSnapshot", reason)
}

fn exhausted_ids(id: UnitId) -> EngineError {
    snapshot_error(format!("{} leaves no id for later units", id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::skirmish_scenario;

    fn sample_map() -> Map {
        let scenario = skirmish_scenario();
        let mut map = Map::with_size(scenario, EngineConfig::default(), 5, 4).unwrap();
        let forest = map.scenario().find_terrain("Forest").unwrap();
        let city = map.scenario().find_terrain("City").unwrap();
        let hq = map.scenario().find_terrain("HQ").unwrap();
        map.set_terrain(TilePos::new(1, 0), forest).unwrap();
        map.set_terrain(TilePos::new(4, 3), city).unwrap();
        map.set_terrain(TilePos::new(0, 3), hq).unwrap();

        let red = map.add_faction("Red", Color::RED);
        let blue = map.add_faction("Blue", Color::BLUE);
        map.set_headquarters(red, TilePos::new(0, 3)).unwrap();
        map.set_tile_owner(TilePos::new(4, 3), Some(blue)).unwrap();
        map.set_funds(blue, 450).unwrap();

        let infantry = map.scenario().find_unit_type("Infantry").unwrap();
        let tank = map.scenario().find_unit_type("Tank").unwrap();
        let a = map.spawn_unit(infantry, red, TilePos::new(0, 0)).unwrap();
        map.spawn_unit(tank, blue, TilePos::new(3, 2)).unwrap();
        map.set_unit_stats(a, 6, 0, 40).unwrap();
        map.set_unit_active(a, true).unwrap();
        map.set_turn_state(Some(red), 2);
        map
    }

    #[test]
    fn test_palette_assigned_by_first_appearance() {
        let snapshot = sample_map().snapshot().unwrap();
        assert_eq!(snapshot.tiles.len(), 20);
        assert_eq!(&snapshot.tiles[..5], "abaaa");
        assert_eq!(snapshot.terrain_types["a"], "Plains");
        assert_eq!(snapshot.terrain_types["b"], "Forest");
        assert_eq!(snapshot.terrain_types["c"], "HQ");
        assert_eq!(snapshot.terrain_types["d"], "City");
    }

    #[test]
    fn test_snapshot_round_trip() {
        let map = sample_map();
        let snapshot = map.snapshot().unwrap();
        let json = snapshot.to_json().unwrap();

        let restored_snapshot = MapSnapshot::from_json(&json).unwrap();
        let restored = Map::from_snapshot(map.scenario_handle(), EngineConfig::default(), &restored_snapshot).unwrap();

        assert_eq!(restored.snapshot().unwrap(), snapshot);
        assert!(restored.check_invariants().is_ok());
        assert!(restored.pending_events().is_empty());
        assert_eq!(restored.faction(FactionId(0)).unwrap().headquarters(), Some(TilePos::new(0, 3)));
        assert_eq!(restored.unit(UnitId(1)).unwrap().health(), 6);
    }

    #[test]
    fn test_rejects_mismatched_tile_count() {
        let map = sample_map();
        let mut snapshot = map.snapshot().unwrap();
        snapshot.tiles.pop();
        let result = Map::from_snapshot(map.scenario_handle(), EngineConfig::default(), &snapshot);
        assert!(matches!(result, Err(EngineError::Configuration { .. })));
    }

    #[test]
    fn test_rejects_unknown_names() {
        let map = sample_map();
        let mut snapshot = map.snapshot().unwrap();
        snapshot.units[0].unit_type = "Battleship".to_string();
        assert!(Map::from_snapshot(map.scenario_handle(), EngineConfig::default(), &snapshot).is_err());

        let mut snapshot = map.snapshot().unwrap();
        snapshot.terrain_types.insert("a".to_string(), "Lava".to_string());
        assert!(Map::from_snapshot(map.scenario_handle(), EngineConfig::default(), &snapshot).is_err());
    }

    #[test]
    fn test_last_unit_id_is_rejected_not_overflowed() {
        let map = sample_map();
        let mut snapshot = map.snapshot().unwrap();
        snapshot.units[0].id = Some(UnitId(u32::MAX));
        let result = Map::from_snapshot(map.scenario_handle(), EngineConfig::default(), &snapshot);
        assert!(matches!(result, Err(EngineError::Configuration { .. })));

        let mut map = sample_map();
        let infantry = map.scenario().find_unit_type("Infantry").unwrap();
        let red = FactionId(0);
        let result = map.spawn_unit_with_id(UnitId(u32::MAX), infantry, red, TilePos::new(2, 0));
        assert!(matches!(result, Err(EngineError::Configuration { .. })));
        assert!(map.tile(TilePos::new(2, 0)).unwrap().unit.is_none());
        assert!(map.check_invariants().is_ok());
    }

    #[test]
    fn test_loads_save_without_unit_ids_or_factions() {
        let json = r#"{
            "scenarioName": "Skirmish",
            "width": 3,
            "height": 2,
            "tiles": "aabaaa",
            "terrainTypes": { "a": "Plains", "b": "Forest" },
            "units": [
                { "unitType": "Infantry", "owner": 0, "x": 0, "y": 0, "health": 7, "ammo": 0, "supplies": 50 },
                { "unitType": "Tank", "owner": 1, "x": 2, "y": 1, "health": 10, "ammo": 6, "supplies": 40 }
            ]
        }"#;
        let snapshot = MapSnapshot::from_json(json).unwrap();
        assert!(snapshot.units.iter().all(|u| u.id.is_none()));

        let map = Map::from_snapshot(skirmish_scenario(), EngineConfig::default(), &snapshot).unwrap();
        assert_eq!(map.factions().len(), 2);
        assert_eq!(map.unit(UnitId(1)).unwrap().position, TilePos::new(0, 0));
        assert_eq!(map.unit(UnitId(1)).unwrap().health(), 7);
        assert_eq!(map.unit(UnitId(2)).unwrap().owner, FactionId(1));
        assert_eq!(map.next_unit_id(), UnitId(3));
        assert!(map.check_invariants().is_ok());
    }

    #[test]
    fn test_missing_ids_follow_listed_ones() {
        let map = sample_map();
        let mut snapshot = map.snapshot().unwrap();
        snapshot.units[0].id = None;
        snapshot.units[1].id = Some(UnitId(5));

        let restored = Map::from_snapshot(map.scenario_handle(), EngineConfig::default(), &snapshot).unwrap();
        assert!(restored.unit(UnitId(5)).is_some());
        assert_eq!(restored.unit(UnitId(6)).unwrap().position, TilePos::new(0, 0));
        assert_eq!(restored.next_unit_id(), UnitId(7));
        assert!(restored.check_invariants().is_ok());
    }
}
