use crate::abilities::action::{AbilityKind, Action};
use crate::core::error::{EngineError, Result};
use crate::core::types::{FactionId, UnitId};
use crate::grid::TilePos;
use crate::map::{Map, Unit};
use crate::pathfinding::Path;

/// What processing an action did to the map
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionOutcome {
    pub kind: AbilityKind,
    pub unit: UnitId,
    /// Terrain-entry cost of the movement path
    pub path_cost: u32,
    pub damage_dealt: i32,
    pub damage_taken: i32,
    pub destroyed: Vec<UnitId>,
    pub captured: Option<TilePos>,
    pub created: Option<UnitId>,
    pub defeated: Vec<FactionId>,
}

impl ActionOutcome {
    pub fn new(kind: AbilityKind, unit: UnitId) -> Self {
        Self {
            kind,
            unit,
            path_cost: 0,
            damage_dealt: 0,
            damage_taken: 0,
            destroyed: Vec::new(),
            captured: None,
            created: None,
            defeated: Vec::new(),
        }
    }
}

/// A verb a unit (or a faction, for construction) can perform
///
/// `determine_*` never mutate and only return actions `validate` accepts.
/// `validate` runs against the state before any movement; `apply` runs after
/// the engine moved and deactivated the unit and may assume `validate` passed.
pub trait UnitAbility: Send + Sync {
    fn kind(&self) -> AbilityKind;

    /// Candidate actions for `unit` ending its move at `path`'s destination
    fn determine_available_actions(&self, _map: &Map, _unit: &Unit, _path: &Path) -> Vec<Action> {
        Vec::new()
    }

    /// Candidate actions a faction can take on a tile without moving a unit
    fn determine_available_actions_for_tile(&self, _map: &Map, _faction: FactionId, _pos: TilePos) -> Vec<Action> {
        Vec::new()
    }

    fn validate(&self, map: &Map, action: &Action) -> Result<()>;

    /// Whether the engine moves the unit along its path before `apply`
    fn moves_unit(&self) -> bool {
        true
    }

    fn apply(&self, map: &mut Map, action: &Action, outcome: &mut ActionOutcome) -> Result<()>;
}

/// Path is legal for the unit and ends on a tile it can stop on
pub(crate) fn check_move(map: &Map, unit: &Unit, path: &Path) -> Result<TilePos> {
    map.validate_path(unit, path)?;
    let dest = path
        .destination()
        .ok_or_else(|| EngineError::illegal("path has no origin"))?;
    if !map.can_unit_occupy_tile(unit, dest) {
        return Err(EngineError::illegal(format!("{} cannot stop at {}", unit.id, dest)));
    }
    Ok(dest)
}

pub(crate) fn mismatched(expected: AbilityKind, action: &Action) -> EngineError {
    EngineError::illegal(format!(
        "{} ability cannot process a {} action",
        expected,
        action.kind()
    ))
}
