//! Attack with counter-attack

use tracing::debug;

use crate::abilities::ability::{check_move, mismatched, ActionOutcome, UnitAbility};
use crate::abilities::action::{AbilityKind, Action, AttackAction};
use crate::abilities::combat::plan_strike;
use crate::core::error::{EngineError, Result};
use crate::map::{Map, Unit};
use crate::pathfinding::Path;

#[derive(Debug, Default, Clone, Copy)]
pub struct AttackAbility;

impl UnitAbility for AttackAbility {
    fn kind(&self) -> AbilityKind {
        AbilityKind::Attack
    }

    fn determine_available_actions(&self, map: &Map, unit: &Unit, path: &Path) -> Vec<Action> {
        if !map.unit_type_of(unit).has_weapons() {
            return Vec::new();
        }
        let Ok(dest) = check_move(map, unit, path) else {
            return Vec::new();
        };

        map.units()
            .filter(|target| plan_strike(map, unit, target, dest).is_some())
            .map(|target| {
                Action::Attack(AttackAction {
                    unit: unit.id,
                    target: target.id,
                    movement_path: path.clone(),
                })
            })
            .collect()
    }

    fn validate(&self, map: &Map, action: &Action) -> Result<()> {
        let Action::Attack(attack) = action else {
            return Err(mismatched(self.kind(), action));
        };
        let unit = map.require_unit(attack.unit)?;
        let target = map.require_unit(attack.target)?;
        if target.owner == unit.owner {
            return Err(EngineError::illegal(format!(
                "{} and {} are on the same side",
                unit.id, target.id
            )));
        }
        let dest = check_move(map, unit, &attack.movement_path)?;
        if plan_strike(map, unit, target, dest).is_none() {
            return Err(EngineError::illegal(format!(
                "{} cannot hit {} from {}",
                unit.id, target.id, dest
            )));
        }
        Ok(())
    }

    fn apply(&self, map: &mut Map, action: &Action, outcome: &mut ActionOutcome) -> Result<()> {
        let Action::Attack(attack) = action else {
            return Err(mismatched(self.kind(), action));
        };
        let attacker = map.require_unit(attack.unit)?.clone();
        let defender = map.require_unit(attack.target)?.clone();
        let strike = plan_strike(map, &attacker, &defender, attacker.position).ok_or_else(|| {
            EngineError::illegal(format!("{} cannot hit {}", attacker.id, defender.id))
        })?;

        map.spend_ammo(attacker.id, strike.ammo_cost)?;
        let remaining = map.damage_unit(defender.id, strike.damage)?;
        outcome.damage_dealt = defender.health() - remaining;
        debug!(
            attacker = %attacker.id,
            defender = %defender.id,
            damage = outcome.damage_dealt,
            remaining,
            "Attack resolved"
        );
        if remaining == 0 {
            outcome.destroyed.push(defender.id);
            return Ok(());
        }

        // Surviving defender fires back with its reduced health
        let defender = map.require_unit(defender.id)?.clone();
        let attacker = map.require_unit(attacker.id)?.clone();
        if let Some(counter) = plan_strike(map, &defender, &attacker, defender.position) {
            map.spend_ammo(defender.id, counter.ammo_cost)?;
            let remaining = map.damage_unit(attacker.id, counter.damage)?;
            outcome.damage_taken = attacker.health() - remaining;
            debug!(
                attacker = %defender.id,
                defender = %attacker.id,
                damage = outcome.damage_taken,
                remaining,
                "Counter-attack resolved"
            );
            if remaining == 0 {
                outcome.destroyed.push(attacker.id);
            }
        }
        Ok(())
    }
}
