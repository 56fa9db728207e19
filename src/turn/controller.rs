use serde::{Deserialize, Serialize};
use tracing::info;

use crate::core::error::{EngineError, Result};
use crate::core::types::{FactionId, TurnIndex, UnitId};
use crate::map::{Map, MapEvent};

/// What happened when a faction's turn began
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnSummary {
    pub faction: FactionId,
    pub turn: TurnIndex,
    pub income: i32,
    pub activated: Vec<UnitId>,
    pub resupplied: Vec<UnitId>,
}

/// Drives the faction rotation on a map
///
/// Factions move in registration order. The turn index counts full
/// rotations and increases when play wraps back to an earlier faction.
/// Defeated factions are skipped.
#[derive(Debug, Default, Clone, Copy)]
pub struct TurnController;

impl TurnController {
    pub fn new() -> Self {
        Self
    }

    /// Give turn 0 to the first undefeated faction
    pub fn start_match(&self, map: &mut Map) -> Result<TurnSummary> {
        let first = map
            .factions()
            .iter()
            .find(|f| !f.defeated)
            .map(|f| f.id)
            .ok_or_else(|| EngineError::illegal("no faction can take a turn"))?;
        map.set_turn_state(Some(first), 0);
        self.on_turn_start(map, first)
    }

    /// Finish the current faction's turn and start the next one
    ///
    /// Returns `None` once no undefeated faction is left.
    pub fn end_turn(&self, map: &mut Map) -> Result<Option<TurnSummary>> {
        let current = map
            .current_faction()
            .ok_or_else(|| EngineError::illegal("the match has not started"))?;
        self.on_turn_end(map, current)?;

        let Some(next) = next_faction(map, current) else {
            map.set_turn_state(None, map.turn_index());
            info!(turn = map.turn_index(), "No faction left to play");
            return Ok(None);
        };
        let turn = if next <= current {
            map.turn_index() + 1
        } else {
            map.turn_index()
        };
        map.set_turn_state(Some(next), turn);
        self.on_turn_start(map, next).map(Some)
    }

    /// Collect income, then activate (and resupply) every unit of the faction
    pub fn on_turn_start(&self, map: &mut Map, faction: FactionId) -> Result<TurnSummary> {
        let income = map.calculate_income(faction)?;
        map.add_funds(faction, income)?;

        let owned: Vec<UnitId> = map.require_faction(faction)?.units().iter().copied().collect();
        let resupply = map.config().resupply_on_owned_tiles;
        let mut resupplied = Vec::new();
        for &id in &owned {
            map.set_unit_active(id, true)?;
            let position = map.require_unit(id)?.position;
            if resupply && map.require_tile(position)?.is_owned_by(faction) {
                map.resupply_unit(id)?;
                resupplied.push(id);
            }
        }

        let turn = map.turn_index();
        map.push_event(MapEvent::TurnStarted { faction, turn });
        info!(%faction, turn, income, units = owned.len(), "Turn started");

        Ok(TurnSummary {
            faction,
            turn,
            income,
            activated: owned,
            resupplied,
        })
    }

    pub fn on_turn_end(&self, map: &mut Map, faction: FactionId) -> Result<()> {
        let owned: Vec<UnitId> = map.require_faction(faction)?.units().iter().copied().collect();
        for id in owned {
            map.set_unit_active(id, false)?;
        }
        Ok(())
    }
}

/// Next undefeated faction after `current`, wrapping around (may be `current`)
fn next_faction(map: &Map, current: FactionId) -> Option<FactionId> {
    let factions = map.factions();
    let count = factions.len();
    (1..=count)
        .map(|step| &factions[(current.index() + step) % count])
        .find(|f| !f.defeated)
        .map(|f| f.id)
}
