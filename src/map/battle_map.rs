//! The map: owner of every tile, unit and faction in a match
//!
//! Cross references are integer handles. Every mutation of `Unit::owner`,
//! `Unit::position` or `Tile::owner` goes through this type so the faction
//! caches and tile occupancy never diverge from the authoritative fields.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, info};

use crate::core::config::EngineConfig;
use crate::core::error::{EngineError, Reference, Result};
use crate::core::types::{Color, FactionId, TurnIndex, UnitId};
use crate::grid::{Grid, Rect, TilePos};
use crate::map::events::{EventQueue, MapEvent};
use crate::map::faction::Faction;
use crate::map::tile::Tile;
use crate::map::unit::Unit;
use crate::pathfinding::Path;
use crate::rules::{Scenario, TerrainType, TerrainTypeId, UnitType, UnitTypeId};

#[derive(Debug, Clone)]
pub struct Map {
    scenario: Arc<Scenario>,
    config: EngineConfig,
    grid: Grid<Tile>,
    units: BTreeMap<UnitId, Unit>,
    factions: Vec<Faction>,
    next_unit_id: UnitId,
    current_faction: Option<FactionId>,
    turn_index: TurnIndex,
    events: EventQueue,
}

impl Map {
    /// Empty 0x0 map; every slot starts as the scenario's default terrain
    pub fn new(scenario: Arc<Scenario>, config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let terrain = scenario.fallback_terrain().ok_or_else(|| {
            EngineError::configuration(
                format!("Scenario \"{}\"", scenario.name),
                "no terrain types loaded",
            )
        })?;

        Ok(Self {
            grid: Grid::filled(config.max_size_exponent, Tile::new(terrain)),
            scenario,
            config,
            units: BTreeMap::new(),
            factions: Vec::new(),
            next_unit_id: UnitId(1),
            current_faction: None,
            turn_index: 0,
            events: EventQueue::new(),
        })
    }

    pub fn with_size(scenario: Arc<Scenario>, config: EngineConfig, width: i32, height: i32) -> Result<Self> {
        let mut map = Self::new(scenario, config)?;
        map.resize(width, height)?;
        Ok(map)
    }

    pub fn scenario(&self) -> &Scenario {
        &self.scenario
    }

    pub fn scenario_handle(&self) -> Arc<Scenario> {
        Arc::clone(&self.scenario)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // === GRID ===

    /// Change the playable area; units and owned tiles must stay inside it
    pub fn resize(&mut self, width: i32, height: i32) -> Result<()> {
        let target = Rect::with_size(
            width.clamp(0, i32::from(i16::MAX)) as i16,
            height.clamp(0, i32::from(i16::MAX)) as i16,
        );
        if let Some(unit) = self.units.values().find(|u| !target.contains(u.position)) {
            return Err(EngineError::illegal(format!(
                "resize to {}x{} would strand {} at {}",
                width, height, unit.id, unit.position
            )));
        }
        if let Some(pos) = self
            .factions
            .iter()
            .flat_map(|f| f.tiles().iter())
            .find(|pos| !target.contains(**pos))
        {
            return Err(EngineError::illegal(format!(
                "resize to {}x{} would drop owned tile {}",
                width, height, pos
            )));
        }

        let resize = self.grid.resize(width, height)?;
        self.events.push(MapEvent::GridResized {
            old_size: resize.old_size,
            new_size: resize.new_size,
        });
        Ok(())
    }

    pub fn width(&self) -> i16 {
        self.grid.width()
    }

    pub fn height(&self) -> i16 {
        self.grid.height()
    }

    pub fn grid(&self) -> &Grid<Tile> {
        &self.grid
    }

    pub fn is_valid_pos(&self, pos: TilePos) -> bool {
        self.grid.is_valid_pos(pos)
    }

    pub fn tile(&self, pos: TilePos) -> Option<&Tile> {
        self.grid.get(pos)
    }

    pub fn require_tile(&self, pos: TilePos) -> Result<&Tile> {
        self.grid
            .get(pos)
            .ok_or(EngineError::InvalidReference(Reference::Tile(pos)))
    }

    pub fn terrain_at(&self, pos: TilePos) -> Option<&TerrainType> {
        self.tile(pos).map(|tile| self.scenario.terrain(tile.terrain))
    }

    /// Change a tile's terrain; ownership is dropped if the new terrain is not capturable
    pub fn set_terrain(&mut self, pos: TilePos, terrain: TerrainTypeId) -> Result<()> {
        let tile = *self.require_tile(pos)?;
        let capturable = self
            .scenario
            .terrain_types
            .get(terrain)
            .ok_or_else(|| {
                EngineError::configuration("TerrainType", format!("{:?} is not in this scenario", terrain))
            })?
            .capturable;

        if tile.owner.is_some() && !capturable {
            self.set_tile_owner(pos, None)?;
        }
        if let Some(slot) = self.grid.get_mut(pos) {
            slot.terrain = terrain;
        }
        self.events.push(MapEvent::TileChanged { pos });
        Ok(())
    }

    /// Set the terrain of every tile in `area` (clipped to the map)
    pub fn fill_terrain(&mut self, area: Rect, terrain: TerrainTypeId) -> Result<()> {
        let positions: Vec<_> = area.intersect(&self.grid.bounds()).positions().collect();
        for pos in positions {
            self.set_terrain(pos, terrain)?;
        }
        Ok(())
    }

    /// Change a tile's owner, keeping both factions' tile sets in step
    pub fn set_tile_owner(&mut self, pos: TilePos, owner: Option<FactionId>) -> Result<()> {
        let tile = *self.require_tile(pos)?;
        if let Some(faction) = owner {
            self.require_faction(faction)?;
            if !self.scenario.terrain(tile.terrain).capturable {
                return Err(EngineError::illegal(format!(
                    "terrain at {} cannot be owned",
                    pos
                )));
            }
        }
        if tile.owner == owner {
            return Ok(());
        }

        if let Some(previous) = tile.owner.and_then(|id| self.factions.get_mut(id.index())) {
            previous.tile_lost(pos);
        }
        if let Some(next) = owner.and_then(|id| self.factions.get_mut(id.index())) {
            next.tile_gained(pos);
        }
        if let Some(slot) = self.grid.get_mut(pos) {
            slot.owner = owner;
        }
        self.events.push(MapEvent::TileChanged { pos });
        Ok(())
    }

    // === FACTIONS ===

    pub fn add_faction(&mut self, name: impl Into<String>, color: Color) -> FactionId {
        let id = FactionId::new(self.factions.len());
        self.factions.push(Faction::new(id, name, color));
        id
    }

    pub fn factions(&self) -> &[Faction] {
        &self.factions
    }

    pub fn faction(&self, id: FactionId) -> Option<&Faction> {
        self.factions.get(id.index())
    }

    pub fn require_faction(&self, id: FactionId) -> Result<&Faction> {
        self.faction(id)
            .ok_or(EngineError::InvalidReference(Reference::Faction(id)))
    }

    pub(crate) fn faction_mut(&mut self, id: FactionId) -> Result<&mut Faction> {
        self.factions
            .get_mut(id.index())
            .ok_or(EngineError::InvalidReference(Reference::Faction(id)))
    }

    pub fn set_funds(&mut self, id: FactionId, funds: i32) -> Result<()> {
        let faction = self.faction_mut(id)?;
        faction.set_funds(funds);
        let funds = faction.funds();
        self.events.push(MapEvent::FundsChanged { faction: id, funds });
        Ok(())
    }

    pub fn add_funds(&mut self, id: FactionId, delta: i32) -> Result<()> {
        let faction = self.faction_mut(id)?;
        faction.add_funds(delta);
        let funds = faction.funds();
        self.events.push(MapEvent::FundsChanged { faction: id, funds });
        Ok(())
    }

    pub fn set_faction_color(&mut self, id: FactionId, color: Color) -> Result<()> {
        let faction = self.faction_mut(id)?;
        if faction.color() == color {
            return Ok(());
        }
        faction.set_color(color);
        self.events.push(MapEvent::FactionColorChanged { faction: id, color });
        Ok(())
    }

    pub fn set_controllable(&mut self, id: FactionId, controllable: bool) -> Result<()> {
        self.faction_mut(id)?.controllable = controllable;
        Ok(())
    }

    /// Make `pos` the faction's headquarters, taking ownership of the tile
    pub fn set_headquarters(&mut self, id: FactionId, pos: TilePos) -> Result<()> {
        let already_owned = self.require_tile(pos)?.owner == Some(id);
        self.set_tile_owner(pos, Some(id))?;
        self.faction_mut(id)?.set_headquarters(Some(pos));
        // Ownership changes were already reported
        if already_owned {
            self.events.push(MapEvent::TileChanged { pos });
        }
        Ok(())
    }

    /// Sum of terrain income over every tile the faction owns
    pub fn calculate_income(&self, id: FactionId) -> Result<i32> {
        let faction = self.require_faction(id)?;
        Ok(faction
            .tiles()
            .iter()
            .filter_map(|&pos| self.terrain_at(pos))
            .map(|terrain| terrain.income)
            .fold(0i32, |sum, income| sum.saturating_add(income)))
    }

    /// Mark every faction with no units and no headquarters as defeated
    pub fn update_defeats(&mut self) -> Vec<FactionId> {
        let mut defeated = Vec::new();
        for faction in self.factions.iter_mut() {
            if !faction.defeated && faction.is_eliminated() {
                faction.defeated = true;
                defeated.push(faction.id);
            }
        }
        for &faction in &defeated {
            info!(%faction, "Faction defeated");
            self.events.push(MapEvent::FactionDefeated { faction });
        }
        defeated
    }

    /// The last faction standing once every other one is defeated
    pub fn winner(&self) -> Option<FactionId> {
        if self.factions.len() < 2 {
            return None;
        }
        let mut standing = self.factions.iter().filter(|f| !f.defeated);
        match (standing.next(), standing.next()) {
            (Some(last), None) => Some(last.id),
            _ => None,
        }
    }

    // === TURN STATE ===

    pub fn current_faction(&self) -> Option<FactionId> {
        self.current_faction
    }

    pub fn turn_index(&self) -> TurnIndex {
        self.turn_index
    }

    pub(crate) fn set_turn_state(&mut self, faction: Option<FactionId>, turn_index: TurnIndex) {
        self.current_faction = faction;
        self.turn_index = turn_index;
    }

    // === UNITS ===

    /// Id the next spawned unit will receive
    pub fn next_unit_id(&self) -> UnitId {
        self.next_unit_id
    }

    pub(crate) fn set_next_unit_id(&mut self, id: UnitId) {
        self.next_unit_id = self.next_unit_id.max(id);
    }

    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.get(&id)
    }

    pub fn require_unit(&self, id: UnitId) -> Result<&Unit> {
        self.unit(id)
            .ok_or(EngineError::InvalidReference(Reference::Unit(id)))
    }

    /// All units in ascending id order
    pub fn units(&self) -> impl Iterator<Item = &Unit> {
        self.units.values()
    }

    pub fn unit_count(&self) -> usize {
        self.units.len()
    }

    pub fn unit_at(&self, pos: TilePos) -> Option<&Unit> {
        self.tile(pos)
            .and_then(|tile| tile.unit)
            .and_then(|id| self.units.get(&id))
    }

    pub fn unit_type_of(&self, unit: &Unit) -> &UnitType {
        self.scenario.unit_type(unit.unit_type)
    }

    /// Place a new, fully stocked, inactive unit
    pub fn spawn_unit(&mut self, unit_type: UnitTypeId, owner: FactionId, pos: TilePos) -> Result<UnitId> {
        let id = self.next_unit_id;
        self.spawn_unit_with_id(id, unit_type, owner, pos)
    }

    /// Spawn with a pre-assigned id (ids from replays and network peers)
    pub fn spawn_unit_with_id(
        &mut self,
        id: UnitId,
        unit_type: UnitTypeId,
        owner: FactionId,
        pos: TilePos,
    ) -> Result<UnitId> {
        let ty = self.scenario.unit_types.get(unit_type).ok_or_else(|| {
            EngineError::configuration("UnitType", format!("{:?} is not in this scenario", unit_type))
        })?;
        let unit = Unit::new(id, unit_type, ty, owner, pos);
        self.insert_unit(unit)?;
        Ok(id)
    }

    pub(crate) fn insert_unit(&mut self, unit: Unit) -> Result<()> {
        if self.units.contains_key(&unit.id) {
            return Err(EngineError::illegal(format!("{} already exists", unit.id)));
        }
        let next_id = unit.id.next().ok_or_else(|| {
            EngineError::configuration("Unit", format!("{} leaves no id for later units", unit.id))
        })?;
        self.require_faction(unit.owner)?;
        let tile = self.require_tile(unit.position)?;
        if let Some(occupant) = tile.unit {
            return Err(EngineError::illegal(format!(
                "{} is occupied by {}",
                unit.position, occupant
            )));
        }

        let (id, owner, pos) = (unit.id, unit.owner, unit.position);
        if let Some(slot) = self.grid.get_mut(pos) {
            slot.unit = Some(id);
        }
        self.faction_mut(owner)?.unit_gained(id);
        self.units.insert(id, unit);
        self.next_unit_id = self.next_unit_id.max(next_id);

        debug!(unit = %id, %owner, %pos, "Unit created");
        self.events.push(MapEvent::UnitCreated { unit: id, pos });
        Ok(())
    }

    pub fn destroy_unit(&mut self, id: UnitId) -> Result<Unit> {
        let unit = self
            .units
            .remove(&id)
            .ok_or(EngineError::InvalidReference(Reference::Unit(id)))?;

        if let Some(slot) = self.grid.get_mut(unit.position) {
            if slot.unit == Some(id) {
                slot.unit = None;
            }
        }
        if let Some(faction) = self.factions.get_mut(unit.owner.index()) {
            faction.unit_lost(id);
        }

        debug!(unit = %id, pos = %unit.position, "Unit destroyed");
        self.events.push(MapEvent::UnitDestroyed { unit: id, pos: unit.position });
        Ok(unit)
    }

    /// Teleport a unit; the destination must be empty or already hold it
    pub fn relocate_unit(&mut self, id: UnitId, dest: TilePos) -> Result<()> {
        let from = self.require_unit(id)?.position;
        let tile = self.require_tile(dest)?;
        if let Some(occupant) = tile.unit.filter(|&o| o != id) {
            return Err(EngineError::illegal(format!("{} is occupied by {}", dest, occupant)));
        }
        if from == dest {
            return Ok(());
        }

        if let Some(slot) = self.grid.get_mut(from) {
            slot.unit = None;
        }
        if let Some(slot) = self.grid.get_mut(dest) {
            slot.unit = Some(id);
        }
        if let Some(unit) = self.units.get_mut(&id) {
            unit.position = dest;
        }
        self.events.push(MapEvent::UnitMoved { unit: id, from, to: dest });
        Ok(())
    }

    /// Move along a validated path, spending supplies if the movement type consumes them
    ///
    /// Returns the path's entry cost.
    pub fn move_unit_along_path(&mut self, id: UnitId, path: &Path) -> Result<u32> {
        let unit = self.require_unit(id)?;
        let cost = self.validate_path(unit, path)?;
        let dest = path.destination().unwrap_or(unit.position);
        if !self.can_unit_occupy_tile(unit, dest) {
            return Err(EngineError::illegal(format!("{} cannot stop at {}", id, dest)));
        }
        let consumes = self.scenario.movement_type_of(unit.unit_type).consumes_supplies;

        self.relocate_unit(id, dest)?;
        if consumes {
            if let Some(unit) = self.units.get_mut(&id) {
                unit.spend_supplies(cost as i32);
            }
        }
        Ok(cost)
    }

    pub fn set_unit_active(&mut self, id: UnitId, active: bool) -> Result<()> {
        let unit = self
            .units
            .get_mut(&id)
            .ok_or(EngineError::InvalidReference(Reference::Unit(id)))?;
        unit.active = active;
        Ok(())
    }

    /// Overwrite health, ammo and supplies (each clamped to the type's maxima)
    pub fn set_unit_stats(&mut self, id: UnitId, health: i32, ammo: i32, supplies: i32) -> Result<()> {
        let scenario = Arc::clone(&self.scenario);
        let unit = self
            .units
            .get_mut(&id)
            .ok_or(EngineError::InvalidReference(Reference::Unit(id)))?;
        let ty = scenario.unit_type(unit.unit_type);
        unit.set_health(ty, health);
        unit.set_ammo(ty, ammo);
        unit.set_supplies(ty, supplies);
        Ok(())
    }

    pub fn spend_ammo(&mut self, id: UnitId, amount: i32) -> Result<()> {
        self.units
            .get_mut(&id)
            .ok_or(EngineError::InvalidReference(Reference::Unit(id)))?
            .spend_ammo(amount);
        Ok(())
    }

    pub fn resupply_unit(&mut self, id: UnitId) -> Result<()> {
        let scenario = Arc::clone(&self.scenario);
        let unit = self
            .units
            .get_mut(&id)
            .ok_or(EngineError::InvalidReference(Reference::Unit(id)))?;
        unit.resupply(scenario.unit_type(unit.unit_type));
        Ok(())
    }

    /// Apply damage; a unit reduced to zero health is destroyed
    ///
    /// Returns the remaining health.
    pub fn damage_unit(&mut self, id: UnitId, amount: i32) -> Result<i32> {
        let unit = self
            .units
            .get_mut(&id)
            .ok_or(EngineError::InvalidReference(Reference::Unit(id)))?;
        let lost = unit.take_damage(amount);
        let health = unit.health();
        self.events.push(MapEvent::UnitDamaged { unit: id, amount: lost, health });

        if health == 0 {
            self.destroy_unit(id)?;
        }
        Ok(health)
    }

    // === MOVEMENT RULES ===

    /// Cost for the unit to enter `pos`, `None` if off-map or impassable
    pub fn entry_cost(&self, unit: &Unit, pos: TilePos) -> Option<u32> {
        let tile = self.tile(pos)?;
        self.scenario.entry_cost(unit.unit_type, tile.terrain)
    }

    /// Passable terrain, and either empty or held by a unit of the same faction
    pub fn can_unit_enter_tile(&self, unit: &Unit, pos: TilePos) -> bool {
        let Some(tile) = self.tile(pos) else {
            return false;
        };
        if self.scenario.entry_cost(unit.unit_type, tile.terrain).is_none() {
            return false;
        }
        match tile.unit.and_then(|id| self.units.get(&id)) {
            Some(other) => other.owner == unit.owner,
            None => true,
        }
    }

    /// Can enter, and the tile is empty or already holds this unit
    pub fn can_unit_occupy_tile(&self, unit: &Unit, pos: TilePos) -> bool {
        self.can_unit_enter_tile(unit, pos)
            && self
                .tile(pos)
                .map_or(false, |tile| tile.unit.map_or(true, |id| id == unit.id))
    }

    /// Movement range, capped by remaining supplies for supply-consuming movement
    pub fn effective_movement_range(&self, unit: &Unit) -> u32 {
        let ty = self.unit_type_of(unit);
        if self.scenario.movement_type(ty.movement_type).consumes_supplies {
            ty.movement_range.min(unit.supplies().max(0) as u32)
        } else {
            ty.movement_range
        }
    }

    /// Replay a path from the unit's position, summing entry costs
    ///
    /// Every step must be cardinal and enter a tile the unit may enter.
    pub fn path_cost(&self, unit: &Unit, path: &Path) -> Result<u32> {
        let origin = path
            .origin
            .ok_or_else(|| EngineError::illegal("path has no origin"))?;
        if origin != unit.position {
            return Err(EngineError::illegal(format!(
                "path starts at {} but {} is at {}",
                origin, unit.id, unit.position
            )));
        }

        let mut pos = origin;
        let mut total: u32 = 0;
        for &direction in &path.directions {
            if !direction.is_cardinal() {
                return Err(EngineError::illegal(format!(
                    "path step {} is not cardinal",
                    direction.name()
                )));
            }
            pos = pos.offset(direction);
            if !self.can_unit_enter_tile(unit, pos) {
                return Err(EngineError::illegal(format!("{} cannot enter {}", unit.id, pos)));
            }
            let cost = self
                .entry_cost(unit, pos)
                .ok_or_else(|| EngineError::illegal(format!("{} is impassable", pos)))?;
            total = total.saturating_add(cost);
        }
        Ok(total)
    }

    /// `path_cost`, additionally bounded by the unit's effective movement range
    pub fn validate_path(&self, unit: &Unit, path: &Path) -> Result<u32> {
        let cost = self.path_cost(unit, path)?;
        let range = self.effective_movement_range(unit);
        if cost > range {
            return Err(EngineError::illegal(format!(
                "path cost {} exceeds movement range {} of {}",
                cost, range, unit.id
            )));
        }
        Ok(cost)
    }

    // === EVENTS ===

    pub fn drain_events(&mut self) -> Vec<MapEvent> {
        self.events.drain()
    }

    pub fn pending_events(&self) -> &[MapEvent] {
        self.events.pending()
    }

    pub(crate) fn push_event(&mut self, event: MapEvent) {
        self.events.push(event);
    }

    pub(crate) fn clear_events(&mut self) {
        self.events.clear();
    }

    // === CONSISTENCY ===

    /// Verify every cross reference between tiles, units and factions
    pub fn check_invariants(&self) -> std::result::Result<(), String> {
        for unit in self.units.values() {
            let tile = self
                .tile(unit.position)
                .ok_or_else(|| format!("{} stands off the map at {}", unit.id, unit.position))?;
            if tile.unit != Some(unit.id) {
                return Err(format!("tile {} does not reference {}", unit.position, unit.id));
            }
            let faction = self
                .faction(unit.owner)
                .ok_or_else(|| format!("{} has unknown owner {}", unit.id, unit.owner))?;
            if !faction.owns_unit(unit.id) {
                return Err(format!("{} does not list {}", unit.owner, unit.id));
            }
            let ty = self.unit_type_of(unit);
            if !(0..=ty.max_health).contains(&unit.health())
                || !(0..=ty.max_ammo).contains(&unit.ammo())
                || !(0..=ty.max_supplies).contains(&unit.supplies())
            {
                return Err(format!("{} has stats outside its type maxima", unit.id));
            }
        }

        let mut owned_tiles = 0usize;
        for pos in self.grid.positions() {
            let Some(tile) = self.tile(pos) else {
                continue;
            };
            if let Some(id) = tile.unit {
                match self.units.get(&id) {
                    Some(unit) if unit.position == pos => {}
                    _ => return Err(format!("tile {} references stale {}", pos, id)),
                }
            }
            if let Some(owner) = tile.owner {
                owned_tiles += 1;
                if !self.scenario.terrain(tile.terrain).capturable {
                    return Err(format!("tile {} is owned but not capturable", pos));
                }
                match self.faction(owner) {
                    Some(faction) if faction.owns_tile(pos) => {}
                    _ => return Err(format!("{} does not list tile {}", owner, pos)),
                }
            }
        }

        let mut listed_units = 0usize;
        let mut listed_tiles = 0usize;
        for faction in &self.factions {
            if faction.funds() < 0 {
                return Err(format!("{} has negative funds", faction.id));
            }
            for id in faction.units() {
                match self.units.get(id) {
                    Some(unit) if unit.owner == faction.id => listed_units += 1,
                    _ => return Err(format!("{} lists foreign or stale {}", faction.id, id)),
                }
            }
            for &pos in faction.tiles() {
                if self.tile(pos).and_then(|t| t.owner) != Some(faction.id) {
                    return Err(format!("{} lists tile {} it does not own", faction.id, pos));
                }
                listed_tiles += 1;
            }
            if let Some(hq) = faction.headquarters() {
                if !faction.owns_tile(hq) {
                    return Err(format!("{} headquarters {} is not owned", faction.id, hq));
                }
            }
        }

        if listed_units != self.units.len() || listed_tiles != owned_tiles {
            return Err("faction ownership sets do not mirror units and tiles".to_string());
        }
        if let Some(max_id) = self.units.keys().next_back() {
            if *max_id >= self.next_unit_id {
                return Err(format!("next unit id {} is not past {}", self.next_unit_id, max_id));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::PrimaryDirection::{East, South, SouthEast, West};
    use crate::test_support::skirmish_scenario;

    fn map() -> Map {
        Map::with_size(skirmish_scenario(), EngineConfig::default(), 8, 8).unwrap()
    }

    #[test]
    fn test_spawn_and_destroy_keep_invariants() {
        let mut map = map();
        let red = map.add_faction("Red", Color::RED);
        let infantry = map.scenario().find_unit_type("Infantry").unwrap();

        let id = map.spawn_unit(infantry, red, TilePos::new(2, 2)).unwrap();
        assert_eq!(map.unit_at(TilePos::new(2, 2)).map(|u| u.id), Some(id));
        assert!(map.faction(red).unwrap().owns_unit(id));
        assert!(map.check_invariants().is_ok());

        assert!(map.spawn_unit(infantry, red, TilePos::new(2, 2)).is_err());

        map.destroy_unit(id).unwrap();
        assert!(map.unit_at(TilePos::new(2, 2)).is_none());
        assert!(map.faction(red).unwrap().units().is_empty());
        assert!(map.check_invariants().is_ok());

        let next = map.spawn_unit(infantry, red, TilePos::new(2, 2)).unwrap();
        assert!(next > id, "ids are never reused");
    }

    #[test]
    fn test_tile_owner_requires_capturable_terrain() {
        let mut map = map();
        let red = map.add_faction("Red", Color::RED);
        let city = map.scenario().find_terrain("City").unwrap();

        assert!(map.set_tile_owner(TilePos::new(0, 0), Some(red)).is_err());

        map.set_terrain(TilePos::new(1, 1), city).unwrap();
        map.set_tile_owner(TilePos::new(1, 1), Some(red)).unwrap();
        assert!(map.faction(red).unwrap().owns_tile(TilePos::new(1, 1)));

        let plains = map.scenario().find_terrain("Plains").unwrap();
        map.set_terrain(TilePos::new(1, 1), plains).unwrap();
        assert_eq!(map.tile(TilePos::new(1, 1)).unwrap().owner, None);
        assert!(map.faction(red).unwrap().tiles().is_empty());
        assert!(map.check_invariants().is_ok());
    }

    #[test]
    fn test_changing_owner_moves_tile_between_factions() {
        let mut map = map();
        let red = map.add_faction("Red", Color::RED);
        let blue = map.add_faction("Blue", Color::BLUE);
        let hq = map.scenario().find_terrain("HQ").unwrap();
        let pos = TilePos::new(3, 3);
        map.set_terrain(pos, hq).unwrap();
        map.set_headquarters(red, pos).unwrap();

        map.set_tile_owner(pos, Some(blue)).unwrap();
        assert!(!map.faction(red).unwrap().owns_tile(pos));
        assert_eq!(map.faction(red).unwrap().headquarters(), None);
        assert!(map.faction(blue).unwrap().owns_tile(pos));
        assert!(map.check_invariants().is_ok());
    }

    #[test]
    fn test_allies_pass_enemies_block() {
        let mut map = map();
        let red = map.add_faction("Red", Color::RED);
        let blue = map.add_faction("Blue", Color::BLUE);
        let infantry = map.scenario().find_unit_type("Infantry").unwrap();
        let mover = map.spawn_unit(infantry, red, TilePos::new(0, 0)).unwrap();
        map.spawn_unit(infantry, red, TilePos::new(1, 0)).unwrap();
        map.spawn_unit(infantry, blue, TilePos::new(0, 1)).unwrap();

        let unit = map.unit(mover).unwrap();
        assert!(map.can_unit_enter_tile(unit, TilePos::new(1, 0)));
        assert!(!map.can_unit_occupy_tile(unit, TilePos::new(1, 0)));
        assert!(!map.can_unit_enter_tile(unit, TilePos::new(0, 1)));
        assert!(map.can_unit_occupy_tile(unit, TilePos::new(0, 0)));
        assert!(!map.can_unit_enter_tile(unit, TilePos::new(-1, 0)));
    }

    #[test]
    fn test_path_validation() {
        let mut map = map();
        let red = map.add_faction("Red", Color::RED);
        let infantry = map.scenario().find_unit_type("Infantry").unwrap();
        let id = map.spawn_unit(infantry, red, TilePos::new(0, 0)).unwrap();
        let unit = map.unit(id).unwrap().clone();

        let path = Path::with_directions(unit.position, vec![East, East, South]);
        assert_eq!(map.validate_path(&unit, &path).unwrap(), 3);

        let too_far = Path::with_directions(unit.position, vec![East; 4]);
        assert_eq!(map.path_cost(&unit, &too_far).unwrap(), 4);
        assert!(map.validate_path(&unit, &too_far).is_err());

        let diagonal = Path::with_directions(unit.position, vec![SouthEast]);
        assert!(map.path_cost(&unit, &diagonal).is_err());

        let off_map = Path::with_directions(unit.position, vec![West]);
        assert!(map.path_cost(&unit, &off_map).is_err());

        let wrong_origin = Path::with_directions(TilePos::new(1, 1), vec![]);
        assert!(map.path_cost(&unit, &wrong_origin).is_err());
        assert!(map.path_cost(&unit, &Path::empty()).is_err());

        assert_eq!(map.move_unit_along_path(id, &path).unwrap(), 3);
        assert_eq!(map.unit(id).unwrap().position, TilePos::new(2, 1));
        assert!(map.check_invariants().is_ok());
    }

    #[test]
    fn test_supply_consuming_movement() {
        let mut map = map();
        let red = map.add_faction("Red", Color::RED);
        let tank = map.scenario().find_unit_type("Tank").unwrap();
        let id = map.spawn_unit(tank, red, TilePos::new(0, 0)).unwrap();
        map.set_unit_stats(id, 10, 3, 2).unwrap();

        let unit = map.unit(id).unwrap().clone();
        assert_eq!(map.effective_movement_range(&unit), 2);

        let path = Path::with_directions(unit.position, vec![East, East]);
        map.move_unit_along_path(id, &path).unwrap();
        assert_eq!(map.unit(id).unwrap().supplies(), 0);
    }

    #[test]
    fn test_damage_destroys_at_zero() {
        let mut map = map();
        let red = map.add_faction("Red", Color::RED);
        let infantry = map.scenario().find_unit_type("Infantry").unwrap();
        let id = map.spawn_unit(infantry, red, TilePos::new(4, 4)).unwrap();

        assert_eq!(map.damage_unit(id, 3).unwrap(), 7);
        assert_eq!(map.damage_unit(id, 30).unwrap(), 0);
        assert!(map.unit(id).is_none());
        assert!(map.tile(TilePos::new(4, 4)).unwrap().is_empty());

        let events = map.drain_events();
        assert!(events
            .iter()
            .any(|e| matches!(e, MapEvent::UnitDestroyed { unit, .. } if *unit == id)));
    }

    #[test]
    fn test_resize_refuses_to_strand_units() {
        let mut map = map();
        let red = map.add_faction("Red", Color::RED);
        let infantry = map.scenario().find_unit_type("Infantry").unwrap();
        map.spawn_unit(infantry, red, TilePos::new(6, 6)).unwrap();

        assert!(map.resize(4, 4).is_err());
        assert!(map.resize(16, 16).is_ok());
        assert!(map.resize(100, 100).is_err());
        assert_eq!((map.width(), map.height()), (16, 16));
    }

    #[test]
    fn test_income_and_defeat() {
        let mut map = map();
        let red = map.add_faction("Red", Color::RED);
        let blue = map.add_faction("Blue", Color::BLUE);
        let city = map.scenario().find_terrain("City").unwrap();
        map.set_terrain(TilePos::new(0, 0), city).unwrap();
        map.set_terrain(TilePos::new(1, 0), city).unwrap();
        map.set_tile_owner(TilePos::new(0, 0), Some(red)).unwrap();
        map.set_tile_owner(TilePos::new(1, 0), Some(red)).unwrap();
        let infantry = map.scenario().find_unit_type("Infantry").unwrap();
        map.spawn_unit(infantry, red, TilePos::new(5, 5)).unwrap();

        assert_eq!(map.calculate_income(red).unwrap(), 200);
        assert_eq!(map.update_defeats(), vec![blue]);
        assert_eq!(map.winner(), Some(red));
        assert!(map.update_defeats().is_empty());
    }

    #[test]
    fn test_color_change_emits_once() {
        let mut map = map();
        let red = map.add_faction("Red", Color::RED);
        map.drain_events();

        map.set_faction_color(red, Color::YELLOW).unwrap();
        map.set_faction_color(red, Color::YELLOW).unwrap();
        assert_eq!(
            map.drain_events(),
            vec![MapEvent::FactionColorChanged { faction: red, color: Color::YELLOW }]
        );
    }

    #[test]
    fn test_headquarters_reports_tile_once() {
        let mut map = map();
        let red = map.add_faction("Red", Color::RED);
        let hq = map.scenario().find_terrain("HQ").unwrap();
        let pos = TilePos::new(1, 1);
        map.set_terrain(pos, hq).unwrap();
        map.drain_events();

        map.set_headquarters(red, pos).unwrap();
        assert_eq!(map.drain_events(), vec![MapEvent::TileChanged { pos }]);

        map.set_headquarters(red, pos).unwrap();
        assert_eq!(map.drain_events(), vec![MapEvent::TileChanged { pos }]);
        assert_eq!(map.faction(red).unwrap().headquarters(), Some(pos));
    }
}
