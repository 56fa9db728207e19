//! Built-in two-faction battlefield for the skirmish rules

use std::sync::Arc;

use crate::core::config::EngineConfig;
use crate::core::error::{EngineError, Result};
use crate::core::types::{Color, FactionId};
use crate::grid::{Rect, TilePos};
use crate::map::battle_map::Map;
use crate::rules::{Scenario, TerrainTypeId};

pub const SKIRMISH_WIDTH: i32 = 12;
pub const SKIRMISH_HEIGHT: i32 = 8;
pub const STARTING_FUNDS: i32 = 1000;

fn terrain(scenario: &Scenario, name: &str) -> Result<TerrainTypeId> {
    scenario
        .find_terrain(name)
        .ok_or_else(|| EngineError::configuration("TerrainType", format!("{} is required by the skirmish layout", name)))
}

/// Mirror a position through the map center
fn mirrored(pos: TilePos) -> TilePos {
    TilePos::new(SKIRMISH_WIDTH as i16 - 1 - pos.x, SKIRMISH_HEIGHT as i16 - 1 - pos.y)
}

/// 12x8 point-symmetric map: Red in the west, Blue in the east, neutral
/// cities in between. Neither faction has the turn yet.
pub fn skirmish_map(scenario: Arc<Scenario>, config: EngineConfig) -> Result<Map> {
    let mut map = Map::with_size(Arc::clone(&scenario), config, SKIRMISH_WIDTH, SKIRMISH_HEIGHT)?;
    let forest = terrain(&scenario, "Forest")?;
    let mountain = terrain(&scenario, "Mountain")?;
    let sea = terrain(&scenario, "Sea")?;
    let city = terrain(&scenario, "City")?;
    let hq = terrain(&scenario, "HQ")?;
    let factory = terrain(&scenario, "Factory")?;

    map.fill_terrain(Rect::new(5, 0, 7, 2), sea)?;
    map.fill_terrain(Rect::new(5, 6, 7, 8), sea)?;

    let red = map.add_faction("Red", Color::RED);
    let blue = map.add_faction("Blue", Color::BLUE);

    let features = [
        (TilePos::new(3, 2), forest),
        (TilePos::new(3, 3), forest),
        (TilePos::new(4, 5), mountain),
        (TilePos::new(5, 3), city),
        (TilePos::new(2, 6), city),
        (TilePos::new(1, 3), hq),
        (TilePos::new(2, 1), factory),
    ];
    for (pos, kind) in features {
        map.set_terrain(pos, kind)?;
        map.set_terrain(mirrored(pos), kind)?;
    }

    for (faction, flip) in [(red, false), (blue, true)] {
        let place = |pos: TilePos| if flip { mirrored(pos) } else { pos };
        map.set_headquarters(faction, place(TilePos::new(1, 3)))?;
        map.set_tile_owner(place(TilePos::new(2, 1)), Some(faction))?;
        map.set_funds(faction, STARTING_FUNDS)?;
        spawn(&mut map, &scenario, faction, "Infantry", place(TilePos::new(2, 3)))?;
        spawn(&mut map, &scenario, faction, "Infantry", place(TilePos::new(1, 5)))?;
        spawn(&mut map, &scenario, faction, "Tank", place(TilePos::new(2, 4)))?;
        spawn(&mut map, &scenario, faction, "Artillery", place(TilePos::new(0, 4)))?;
    }

    map.clear_events();
    Ok(map)
}

fn spawn(map: &mut Map, scenario: &Scenario, owner: FactionId, unit_type: &str, pos: TilePos) -> Result<()> {
    let ty = scenario.find_unit_type(unit_type).ok_or_else(|| {
        EngineError::configuration("UnitType", format!("{} is required by the skirmish layout", unit_type))
    })?;
    map.spawn_unit(ty, owner, pos)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::skirmish_scenario;

    #[test]
    fn test_layout_is_symmetric() {
        let map = skirmish_map(skirmish_scenario(), EngineConfig::default()).unwrap();
        assert_eq!(map.unit_count(), 8);
        assert!(map.check_invariants().is_ok());

        let red = &map.factions()[0];
        let blue = &map.factions()[1];
        assert_eq!(red.headquarters(), Some(TilePos::new(1, 3)));
        assert_eq!(blue.headquarters(), Some(TilePos::new(10, 4)));
        assert_eq!(red.tiles().len(), blue.tiles().len());
        assert_eq!(map.calculate_income(red.id).unwrap(), 200);
        assert!(map.current_faction().is_none());
        assert!(map.pending_events().is_empty());
    }
}
