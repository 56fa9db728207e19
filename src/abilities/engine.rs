//! Ability registry and action processing
//!
//! Processing is validate-then-apply: every check an action can fail runs
//! against the untouched map before the first mutation, so a rejected action
//! leaves no trace (not even a queued event).

use tracing::{debug, warn};

use crate::abilities::ability::{ActionOutcome, UnitAbility};
use crate::abilities::action::{AbilityKind, Action};
use crate::abilities::attack::AttackAbility;
use crate::abilities::capture::CaptureAbility;
use crate::abilities::construct::ConstructUnitAbility;
use crate::abilities::reinforce::ReinforceAbility;
use crate::abilities::wait::WaitAbility;
use crate::core::error::{EngineError, Result};
use crate::core::types::{FactionId, UnitId};
use crate::grid::TilePos;
use crate::map::Map;
use crate::pathfinding::{Path, Pathfinder};

pub struct AbilityEngine {
    abilities: Vec<Box<dyn UnitAbility>>,
    pathfinder: Pathfinder,
}

impl Default for AbilityEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for AbilityEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AbilityEngine")
            .field("abilities", &self.kinds())
            .finish()
    }
}

impl AbilityEngine {
    /// Engine with every built-in ability registered
    pub fn new() -> Self {
        let mut engine = Self::empty();
        engine.register(Box::new(WaitAbility));
        engine.register(Box::new(AttackAbility));
        engine.register(Box::new(CaptureAbility));
        engine.register(Box::new(ReinforceAbility));
        engine.register(Box::new(ConstructUnitAbility));
        engine
    }

    pub fn empty() -> Self {
        Self {
            abilities: Vec::new(),
            pathfinder: Pathfinder::new(),
        }
    }

    /// Add an ability; a later registration of the same kind replaces the earlier one
    pub fn register(&mut self, ability: Box<dyn UnitAbility>) {
        let kind = ability.kind();
        self.abilities.retain(|existing| existing.kind() != kind);
        self.abilities.push(ability);
    }

    pub fn kinds(&self) -> Vec<AbilityKind> {
        self.abilities.iter().map(|a| a.kind()).collect()
    }

    pub fn ability(&self, kind: AbilityKind) -> Option<&dyn UnitAbility> {
        self.abilities
            .iter()
            .find(|a| a.kind() == kind)
            .map(|a| a.as_ref())
    }

    pub fn pathfinder_mut(&mut self) -> &mut Pathfinder {
        &mut self.pathfinder
    }

    /// Every action `unit` could take after following `path`
    ///
    /// Empty unless the unit is active and its faction is the one to move.
    pub fn determine_available_actions(&self, map: &Map, unit: UnitId, path: &Path) -> Vec<Action> {
        let Some(unit) = map.unit(unit) else {
            return Vec::new();
        };
        if !unit.active || map.current_faction() != Some(unit.owner) {
            return Vec::new();
        }
        self.abilities
            .iter()
            .flat_map(|ability| ability.determine_available_actions(map, unit, path))
            .collect()
    }

    /// Tile-level actions (construction) for the faction to move
    pub fn determine_available_actions_for_tile(&self, map: &Map, pos: TilePos) -> Vec<Action> {
        let Some(faction) = map.current_faction() else {
            return Vec::new();
        };
        self.abilities
            .iter()
            .flat_map(|ability| ability.determine_available_actions_for_tile(map, faction, pos))
            .collect()
    }

    /// All legal actions for the faction to move, units first (by id, then
    /// by destination), then owned tiles in position order
    pub fn enumerate_actions(&mut self, map: &Map) -> Result<Vec<Action>> {
        let Some(faction) = map.current_faction() else {
            return Ok(Vec::new());
        };
        let movers: Vec<UnitId> = map
            .units()
            .filter(|u| u.owner == faction && u.active)
            .map(|u| u.id)
            .collect();

        let mut actions = Vec::new();
        for id in movers {
            let reachable = self.pathfinder.find_reachable_tiles(map, id)?;
            for pos in reachable.iter() {
                if let Some(path) = reachable.path_to(pos) {
                    actions.extend(self.determine_available_actions(map, id, &path));
                }
            }
        }

        let owned: Vec<TilePos> = map.require_faction(faction)?.tiles().iter().copied().collect();
        for pos in owned {
            actions.extend(self.determine_available_actions_for_tile(map, pos));
        }
        Ok(actions)
    }

    /// Validate and carry out `action` for the faction to move
    pub fn process_action(&self, map: &mut Map, action: &Action) -> Result<ActionOutcome> {
        match self.process(map, action) {
            Ok(outcome) => {
                debug!(
                    kind = %outcome.kind,
                    unit = %outcome.unit,
                    path_cost = outcome.path_cost,
                    "Action processed"
                );
                Ok(outcome)
            }
            Err(err) => {
                warn!(kind = %action.kind(), unit = %action.unit(), error = %err, "Action rejected");
                Err(err)
            }
        }
    }

    fn process(&self, map: &mut Map, action: &Action) -> Result<ActionOutcome> {
        let current = map
            .current_faction()
            .ok_or_else(|| EngineError::illegal("no faction has the turn"))?;
        let ability = self.ability(action.kind()).ok_or_else(|| {
            EngineError::illegal(format!("{} is not registered", action.kind()))
        })?;

        let mover = match action {
            Action::ConstructUnit(order) => {
                map.require_faction(order.faction)?;
                check_turn(current, order.faction)?;
                None
            }
            _ => {
                let unit = map.require_unit(action.unit())?;
                check_turn(current, unit.owner)?;
                if !unit.active {
                    return Err(EngineError::illegal(format!("{} has already acted", unit.id)));
                }
                Some(unit.id)
            }
        };
        if let Some(target) = action.target() {
            map.require_unit(target)?;
        }
        ability.validate(map, action)?;

        let mut outcome = ActionOutcome::new(action.kind(), action.unit());
        if let (Some(id), Some(path)) = (mover, action.movement_path()) {
            outcome.path_cost = if ability.moves_unit() {
                map.move_unit_along_path(id, path)?
            } else {
                let unit = map.require_unit(id)?;
                map.path_cost(unit, path)?
            };
            map.set_unit_active(id, false)?;
        }
        ability.apply(map, action, &mut outcome)?;
        outcome.defeated = map.update_defeats();
        Ok(outcome)
    }
}

fn check_turn(current: FactionId, owner: FactionId) -> Result<()> {
    if owner != current {
        return Err(EngineError::illegal(format!(
            "it is {}'s turn, not {}'s",
            current, owner
        )));
    }
    Ok(())
}
