use crate::abilities::ability::{check_move, mismatched, ActionOutcome, UnitAbility};
use crate::abilities::action::{AbilityKind, Action, MoveAction};
use crate::core::error::Result;
use crate::map::{Map, Unit};
use crate::pathfinding::Path;

/// Move and end the unit's turn
#[derive(Debug, Default, Clone, Copy)]
pub struct WaitAbility;

impl UnitAbility for WaitAbility {
    fn kind(&self) -> AbilityKind {
        AbilityKind::Wait
    }

    fn determine_available_actions(&self, map: &Map, unit: &Unit, path: &Path) -> Vec<Action> {
        match check_move(map, unit, path) {
            Ok(_) => vec![Action::Wait(MoveAction {
                unit: unit.id,
                movement_path: path.clone(),
            })],
            Err(_) => Vec::new(),
        }
    }

    fn validate(&self, map: &Map, action: &Action) -> Result<()> {
        let Action::Wait(wait) = action else {
            return Err(mismatched(self.kind(), action));
        };
        let unit = map.require_unit(wait.unit)?;
        check_move(map, unit, &wait.movement_path)?;
        Ok(())
    }

    fn apply(&self, _map: &mut Map, _action: &Action, _outcome: &mut ActionOutcome) -> Result<()> {
        Ok(())
    }
}
