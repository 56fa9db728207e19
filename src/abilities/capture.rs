use tracing::debug;

use crate::abilities::ability::{check_move, mismatched, ActionOutcome, UnitAbility};
use crate::abilities::action::{AbilityKind, Action, CaptureAction};
use crate::core::error::{EngineError, Result};
use crate::grid::TilePos;
use crate::map::{Map, Unit};
use crate::pathfinding::Path;

/// Take ownership of a capturable tile in a single action
#[derive(Debug, Default, Clone, Copy)]
pub struct CaptureAbility;

fn check_capture(map: &Map, unit: &Unit, dest: TilePos) -> Result<()> {
    let tile = map.require_tile(dest)?;
    if !map.scenario().terrain(tile.terrain).capturable {
        return Err(EngineError::illegal(format!("{} is not capturable", dest)));
    }
    if tile.owner == Some(unit.owner) {
        return Err(EngineError::illegal(format!("{} already owns {}", unit.owner, dest)));
    }
    Ok(())
}

impl UnitAbility for CaptureAbility {
    fn kind(&self) -> AbilityKind {
        AbilityKind::Capture
    }

    fn determine_available_actions(&self, map: &Map, unit: &Unit, path: &Path) -> Vec<Action> {
        let legal = check_move(map, unit, path).and_then(|dest| check_capture(map, unit, dest));
        if legal.is_err() {
            return Vec::new();
        }
        vec![Action::Capture(CaptureAction {
            unit: unit.id,
            movement_path: path.clone(),
            capture_points_remaining: 0,
        })]
    }

    fn validate(&self, map: &Map, action: &Action) -> Result<()> {
        let Action::Capture(capture) = action else {
            return Err(mismatched(self.kind(), action));
        };
        let unit = map.require_unit(capture.unit)?;
        let dest = check_move(map, unit, &capture.movement_path)?;
        check_capture(map, unit, dest)
    }

    fn apply(&self, map: &mut Map, action: &Action, outcome: &mut ActionOutcome) -> Result<()> {
        let Action::Capture(capture) = action else {
            return Err(mismatched(self.kind(), action));
        };
        let unit = map.require_unit(capture.unit)?;
        let (pos, owner) = (unit.position, unit.owner);
        let previous = map.require_tile(pos)?.owner;

        map.set_tile_owner(pos, Some(owner))?;
        outcome.captured = Some(pos);
        debug!(unit = %capture.unit, %pos, ?previous, "Tile captured");
        Ok(())
    }
}
