//! Merge a unit into a damaged unit of the same type

use tracing::debug;

use crate::abilities::ability::{mismatched, ActionOutcome, UnitAbility};
use crate::abilities::action::{AbilityKind, Action, ReinforceAction};
use crate::core::error::{EngineError, Result};
use crate::map::{Map, Unit};
use crate::pathfinding::Path;

#[derive(Debug, Default, Clone, Copy)]
pub struct ReinforceAbility;

/// Health, supplies and ammo after merging, each capped at the type maximum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Combined {
    health: i32,
    supplies: i32,
    ammo: i32,
}

/// `path_cost` is what the mover pays to reach the target's tile
fn combine(map: &Map, unit: &Unit, target: &Unit, path_cost: u32) -> Result<Combined> {
    if target.id == unit.id {
        return Err(EngineError::illegal(format!("{} cannot reinforce itself", unit.id)));
    }
    if target.owner != unit.owner {
        return Err(EngineError::illegal(format!("{} belongs to another faction", target.id)));
    }
    if target.unit_type != unit.unit_type {
        return Err(EngineError::illegal(format!(
            "{} and {} are different unit types",
            unit.id, target.id
        )));
    }
    let ty = map.unit_type_of(target);
    if !target.is_damaged(ty) {
        return Err(EngineError::illegal(format!("{} is at full health", target.id)));
    }

    let mut carried = unit.supplies();
    if map.scenario().movement_type_of(unit.unit_type).consumes_supplies {
        carried = carried.saturating_sub(i32::try_from(path_cost).unwrap_or(i32::MAX)).max(0);
    }

    Ok(Combined {
        health: (unit.health() + target.health()).min(ty.max_health),
        supplies: (carried + target.supplies()).min(ty.max_supplies),
        ammo: (unit.ammo() + target.ammo()).min(ty.max_ammo),
    })
}

/// The path is legal and ends on the target's tile; returns its cost
fn check_approach(map: &Map, unit: &Unit, target: &Unit, path: &Path) -> Result<u32> {
    let cost = map.validate_path(unit, path)?;
    if path.destination() != Some(target.position) {
        return Err(EngineError::illegal(format!(
            "path of {} does not end on {}",
            unit.id, target.id
        )));
    }
    Ok(cost)
}

impl UnitAbility for ReinforceAbility {
    fn kind(&self) -> AbilityKind {
        AbilityKind::Reinforce
    }

    fn determine_available_actions(&self, map: &Map, unit: &Unit, path: &Path) -> Vec<Action> {
        let Some(target) = path.destination().and_then(|dest| map.unit_at(dest)) else {
            return Vec::new();
        };
        let combined = check_approach(map, unit, target, path).and_then(|cost| combine(map, unit, target, cost));
        match combined {
            Ok(combined) => vec![Action::Reinforce(ReinforceAction {
                unit: unit.id,
                target: target.id,
                movement_path: path.clone(),
                combined_health: combined.health,
                combined_supplies: combined.supplies,
                combined_ammo: combined.ammo,
            })],
            Err(_) => Vec::new(),
        }
    }

    fn validate(&self, map: &Map, action: &Action) -> Result<()> {
        let Action::Reinforce(reinforce) = action else {
            return Err(mismatched(self.kind(), action));
        };
        let unit = map.require_unit(reinforce.unit)?;
        let target = map.require_unit(reinforce.target)?;
        let cost = check_approach(map, unit, target, &reinforce.movement_path)?;

        let combined = combine(map, unit, target, cost)?;
        let claimed = Combined {
            health: reinforce.combined_health,
            supplies: reinforce.combined_supplies,
            ammo: reinforce.combined_ammo,
        };
        if combined != claimed {
            return Err(EngineError::illegal(format!(
                "combined values {:?} do not match the current state {:?}",
                claimed, combined
            )));
        }
        Ok(())
    }

    /// The mover never stands on the target's tile; it is removed instead
    fn moves_unit(&self) -> bool {
        false
    }

    fn apply(&self, map: &mut Map, action: &Action, outcome: &mut ActionOutcome) -> Result<()> {
        let Action::Reinforce(reinforce) = action else {
            return Err(mismatched(self.kind(), action));
        };
        map.set_unit_stats(
            reinforce.target,
            reinforce.combined_health,
            reinforce.combined_ammo,
            reinforce.combined_supplies,
        )?;
        map.set_unit_active(reinforce.target, false)?;
        map.destroy_unit(reinforce.unit)?;
        outcome.destroyed.push(reinforce.unit);

        debug!(unit = %reinforce.unit, target = %reinforce.target, "Units merged");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::PrimaryDirection::*;
    use crate::test_support::{duel_map, spawn};

    #[test]
    fn test_reinforce_caps_at_type_maximum() {
        let (mut map, red, _) = duel_map(6, 6);
        let mover = spawn(&mut map, "Infantry", red, 0, 0);
        let target = spawn(&mut map, "Infantry", red, 2, 0);
        map.set_unit_stats(mover, 7, 0, 60).unwrap();
        map.set_unit_stats(target, 4, 0, 50).unwrap();

        let unit = map.unit(mover).unwrap().clone();
        let path = Path::with_directions(unit.position, vec![East, East]);
        let actions = ReinforceAbility.determine_available_actions(&map, &unit, &path);
        assert_eq!(actions.len(), 1);
        let Action::Reinforce(reinforce) = &actions[0] else {
            panic!("expected a reinforce action");
        };
        assert_eq!(reinforce.combined_health, 10);
        assert_eq!(reinforce.combined_supplies, 99);

        ReinforceAbility.validate(&map, &actions[0]).unwrap();
        let before = map.unit_count();
        let mut outcome = ActionOutcome::new(AbilityKind::Reinforce, mover);
        ReinforceAbility.apply(&mut map, &actions[0], &mut outcome).unwrap();

        assert_eq!(map.unit_count(), before - 1);
        let survivor = map.unit(target).unwrap();
        assert_eq!(survivor.health(), 10);
        assert!(!survivor.active);
        assert!(map.check_invariants().is_ok());
    }

    #[test]
    fn test_reinforce_requires_damaged_same_type() {
        let (mut map, red, _) = duel_map(6, 6);
        let mover = spawn(&mut map, "Infantry", red, 0, 0);
        spawn(&mut map, "Infantry", red, 1, 0);
        let tank = spawn(&mut map, "Tank", red, 0, 1);
        map.set_unit_stats(tank, 3, 9, 70).unwrap();
        let unit = map.unit(mover).unwrap().clone();

        let onto_full = Path::with_directions(unit.position, vec![East]);
        assert!(ReinforceAbility.determine_available_actions(&map, &unit, &onto_full).is_empty());

        let onto_tank = Path::with_directions(unit.position, vec![South]);
        assert!(ReinforceAbility.determine_available_actions(&map, &unit, &onto_tank).is_empty());
    }

    #[test]
    fn test_stale_combined_values_rejected() {
        let (mut map, red, _) = duel_map(6, 6);
        let mover = spawn(&mut map, "Infantry", red, 0, 0);
        let target = spawn(&mut map, "Infantry", red, 1, 0);
        map.set_unit_stats(target, 5, 0, 99).unwrap();

        let unit = map.unit(mover).unwrap().clone();
        let path = Path::with_directions(unit.position, vec![East]);
        let action = ReinforceAbility.determine_available_actions(&map, &unit, &path).remove(0);

        map.set_unit_stats(target, 2, 0, 99).unwrap();
        map.set_unit_stats(mover, 2, 0, 99).unwrap();
        assert!(matches!(
            ReinforceAbility.validate(&map, &action),
            Err(EngineError::IllegalAction(_))
        ));
    }

    #[test]
    fn test_mover_pays_supplies_before_merging() {
        let (mut map, red, _) = duel_map(6, 6);
        let mover = spawn(&mut map, "Tank", red, 0, 0);
        let target = spawn(&mut map, "Tank", red, 3, 0);
        map.set_unit_stats(mover, 10, 9, 3).unwrap();
        map.set_unit_stats(target, 4, 0, 0).unwrap();

        let unit = map.unit(mover).unwrap().clone();
        let path = Path::with_directions(unit.position, vec![East, East, East]);
        let action = ReinforceAbility.determine_available_actions(&map, &unit, &path).remove(0);
        let Action::Reinforce(reinforce) = &action else {
            panic!("expected a reinforce action");
        };
        assert_eq!(reinforce.combined_supplies, 0);
        assert_eq!(reinforce.combined_ammo, 9);
        ReinforceAbility.validate(&map, &action).unwrap();

        let mut stale = reinforce.clone();
        stale.combined_supplies = 3;
        assert!(ReinforceAbility.validate(&map, &Action::Reinforce(stale)).is_err());
    }
}
