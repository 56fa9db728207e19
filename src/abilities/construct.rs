use tracing::debug;

use crate::abilities::ability::{mismatched, ActionOutcome, UnitAbility};
use crate::abilities::action::{AbilityKind, Action, ConstructUnitAction};
use crate::core::error::{EngineError, Result};
use crate::core::types::FactionId;
use crate::grid::TilePos;
use crate::map::Map;
use crate::rules::UnitTypeId;

/// Build a new unit on an owned production tile
#[derive(Debug, Default, Clone, Copy)]
pub struct ConstructUnitAbility;

/// Owned, empty tile whose terrain can produce units
fn check_site(map: &Map, faction: FactionId, pos: TilePos) -> Result<()> {
    let tile = map.require_tile(pos)?;
    if tile.owner != Some(faction) {
        return Err(EngineError::illegal(format!("{} does not own {}", faction, pos)));
    }
    if let Some(occupant) = tile.unit {
        return Err(EngineError::illegal(format!("{} is occupied by {}", pos, occupant)));
    }
    Ok(())
}

fn check_order(map: &Map, order: &ConstructUnitAction) -> Result<UnitTypeId> {
    let faction = map.require_faction(order.faction)?;
    check_site(map, order.faction, order.tile_pos)?;

    let type_id = map.scenario().find_unit_type(&order.unit_type).ok_or_else(|| {
        EngineError::illegal(format!("unknown unit type {:?}", order.unit_type))
    })?;
    let ty = map.scenario().unit_type(type_id);
    let terrain = map.require_tile(order.tile_pos).map(|tile| map.scenario().terrain(tile.terrain))?;
    if !terrain.can_construct(&ty.name) {
        return Err(EngineError::illegal(format!(
            "{} cannot be built on {}",
            ty.name, terrain.name
        )));
    }
    if order.build_cost != ty.build_cost {
        return Err(EngineError::illegal(format!(
            "{} costs {}, not {}",
            ty.name, ty.build_cost, order.build_cost
        )));
    }
    if !faction.can_afford(ty.build_cost) {
        return Err(EngineError::illegal(format!(
            "{} cannot afford {} ({} < {})",
            faction.id,
            ty.name,
            faction.funds(),
            ty.build_cost
        )));
    }
    if order.unit_id != map.next_unit_id() {
        return Err(EngineError::illegal(format!(
            "{} is not the next unit id ({})",
            order.unit_id,
            map.next_unit_id()
        )));
    }
    Ok(type_id)
}

impl UnitAbility for ConstructUnitAbility {
    fn kind(&self) -> AbilityKind {
        AbilityKind::ConstructUnit
    }

    fn determine_available_actions_for_tile(&self, map: &Map, faction: FactionId, pos: TilePos) -> Vec<Action> {
        let Ok(funds) = map.require_faction(faction).map(|f| f.funds()) else {
            return Vec::new();
        };
        if check_site(map, faction, pos).is_err() {
            return Vec::new();
        }
        let Some(terrain) = map.terrain_at(pos) else {
            return Vec::new();
        };

        let scenario = map.scenario();
        scenario
            .unit_types
            .iter()
            .filter(|(_, ty)| terrain.can_construct(&ty.name) && funds >= ty.build_cost)
            .map(|(_, ty)| {
                Action::ConstructUnit(ConstructUnitAction {
                    unit_id: map.next_unit_id(),
                    faction,
                    unit_type: ty.name.clone(),
                    tile_pos: pos,
                    build_cost: ty.build_cost,
                })
            })
            .collect()
    }

    fn validate(&self, map: &Map, action: &Action) -> Result<()> {
        let Action::ConstructUnit(order) = action else {
            return Err(mismatched(self.kind(), action));
        };
        check_order(map, order).map(|_| ())
    }

    fn moves_unit(&self) -> bool {
        false
    }

    fn apply(&self, map: &mut Map, action: &Action, outcome: &mut ActionOutcome) -> Result<()> {
        let Action::ConstructUnit(order) = action else {
            return Err(mismatched(self.kind(), action));
        };
        let type_id = check_order(map, order)?;

        map.add_funds(order.faction, -order.build_cost)?;
        let id = map.spawn_unit_with_id(order.unit_id, type_id, order.faction, order.tile_pos)?;
        outcome.created = Some(id);

        debug!(unit = %id, faction = %order.faction, unit_type = %order.unit_type, "Unit constructed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{duel_map, spawn};

    fn factory_map() -> (Map, FactionId, TilePos) {
        let (mut map, red, _) = duel_map(6, 6);
        let factory = map.scenario().find_terrain("Factory").unwrap();
        let pos = TilePos::new(2, 2);
        map.set_terrain(pos, factory).unwrap();
        map.set_tile_owner(pos, Some(red)).unwrap();
        (map, red, pos)
    }

    #[test]
    fn test_offers_only_affordable_types() {
        let (mut map, red, pos) = factory_map();
        map.set_funds(red, 650).unwrap();

        let actions = ConstructUnitAbility.determine_available_actions_for_tile(&map, red, pos);
        let names: Vec<_> = actions
            .iter()
            .map(|a| match a {
                Action::ConstructUnit(c) => c.unit_type.as_str(),
                _ => "",
            })
            .collect();
        assert_eq!(names, vec!["Artillery", "Infantry"]);
    }

    #[test]
    fn test_construct_spends_funds_and_spawns_inactive() {
        let (mut map, red, pos) = factory_map();
        map.set_funds(red, 1000).unwrap();

        let action = ConstructUnitAbility
            .determine_available_actions_for_tile(&map, red, pos)
            .into_iter()
            .find(|a| matches!(a, Action::ConstructUnit(c) if c.unit_type == "Tank"))
            .unwrap();
        ConstructUnitAbility.validate(&map, &action).unwrap();

        let mut outcome = ActionOutcome::new(AbilityKind::ConstructUnit, action.unit());
        ConstructUnitAbility.apply(&mut map, &action, &mut outcome).unwrap();

        let created = outcome.created.unwrap();
        assert_eq!(map.faction(red).unwrap().funds(), 300);
        assert_eq!(map.unit_at(pos).map(|u| u.id), Some(created));
        assert!(!map.unit(created).unwrap().active);
        assert!(map.check_invariants().is_ok());
    }

    #[test]
    fn test_occupied_or_foreign_tiles_offer_nothing() {
        let (mut map, red, pos) = factory_map();
        map.set_funds(red, 5000).unwrap();
        let blue = FactionId(1);
        assert!(ConstructUnitAbility
            .determine_available_actions_for_tile(&map, blue, pos)
            .is_empty());

        spawn(&mut map, "Infantry", red, 2, 2);
        assert!(ConstructUnitAbility
            .determine_available_actions_for_tile(&map, red, pos)
            .is_empty());
    }

    #[test]
    fn test_stale_unit_id_rejected() {
        let (mut map, red, pos) = factory_map();
        map.set_funds(red, 1000).unwrap();
        let action = ConstructUnitAbility
            .determine_available_actions_for_tile(&map, red, pos)
            .remove(0);

        spawn(&mut map, "Infantry", red, 0, 0);
        assert!(matches!(
            ConstructUnitAbility.validate(&map, &action),
            Err(EngineError::IllegalAction(_))
        ));
    }
}
