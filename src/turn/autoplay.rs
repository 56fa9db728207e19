//! Seeded random play, for headless matches and replay tests

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::abilities::{AbilityEngine, AbilityKind, Action};
use crate::core::error::Result;
use crate::core::types::{FactionId, TurnIndex};
use crate::map::Map;
use crate::turn::controller::TurnController;

/// Upper bound on actions a commander takes in one turn
pub const MAX_ACTIONS_PER_TURN: usize = 256;

/// Picks uniformly among legal actions
///
/// An ability kind is drawn first and then an action of that kind, so the
/// many Wait destinations do not drown out attacks and captures.
pub struct RandomCommander {
    rng: ChaCha8Rng,
}

impl RandomCommander {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn choose(&mut self, actions: &[Action]) -> Option<Action> {
        let mut kinds: Vec<AbilityKind> = actions.iter().map(Action::kind).collect();
        kinds.sort();
        kinds.dedup();
        let kind = *kinds.choose(&mut self.rng)?;
        let of_kind: Vec<&Action> = actions.iter().filter(|a| a.kind() == kind).collect();
        of_kind.choose(&mut self.rng).map(|a| (*a).clone())
    }

    /// Act until the faction to move has nothing left to do
    pub fn play_turn(&mut self, map: &mut Map, engine: &mut AbilityEngine) -> Result<Vec<Action>> {
        let mut taken = Vec::new();
        while taken.len() < MAX_ACTIONS_PER_TURN {
            let actions = engine.enumerate_actions(map)?;
            let Some(action) = self.choose(&actions) else {
                break;
            };
            engine.process_action(map, &action)?;
            taken.push(action);
            if map.winner().is_some() {
                break;
            }
        }
        debug!(faction = ?map.current_faction(), actions = taken.len(), "Commander finished");
        Ok(taken)
    }
}

/// Result of a headless match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchReport {
    pub seed: u64,
    pub turns_played: u32,
    pub final_turn: TurnIndex,
    pub winner: Option<FactionId>,
    pub actions: Vec<Action>,
}

/// Play up to `max_turns` faction turns with one seeded commander
pub fn run_match(map: &mut Map, seed: u64, max_turns: u32) -> Result<MatchReport> {
    let turns = TurnController::new();
    let mut engine = AbilityEngine::new();
    let mut commander = RandomCommander::with_seed(seed);
    let mut report = MatchReport {
        seed,
        turns_played: 0,
        final_turn: 0,
        winner: None,
        actions: Vec::new(),
    };

    if map.current_faction().is_none() {
        turns.start_match(map)?;
    }
    while report.turns_played < max_turns && map.winner().is_none() {
        let taken = commander.play_turn(map, &mut engine)?;
        report.actions.extend(taken);
        report.turns_played += 1;
        if map.winner().is_some() || turns.end_turn(map)?.is_none() {
            break;
        }
    }

    report.final_turn = map.turn_index();
    report.winner = map.winner();
    Ok(report)
}
