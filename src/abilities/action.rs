//! Actions: fully specified, serializable instances of an ability
//!
//! Actions name units and factions by id so they can cross a network
//! boundary or be replayed from a log.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::types::{FactionId, UnitId};
use crate::grid::TilePos;
use crate::pathfinding::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AbilityKind {
    Wait,
    Attack,
    Capture,
    Reinforce,
    ConstructUnit,
}

impl AbilityKind {
    pub fn name(&self) -> &'static str {
        match self {
            AbilityKind::Wait => "Wait",
            AbilityKind::Attack => "Attack",
            AbilityKind::Capture => "Capture",
            AbilityKind::Reinforce => "Reinforce",
            AbilityKind::ConstructUnit => "ConstructUnit",
        }
    }
}

impl fmt::Display for AbilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveAction {
    pub unit: UnitId,
    pub movement_path: Path,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttackAction {
    pub unit: UnitId,
    pub target: UnitId,
    pub movement_path: Path,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureAction {
    pub unit: UnitId,
    pub movement_path: Path,
    /// Reserved for multi-turn captures; captures currently complete in one action
    #[serde(default)]
    pub capture_points_remaining: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReinforceAction {
    pub unit: UnitId,
    pub target: UnitId,
    pub movement_path: Path,
    pub combined_health: i32,
    pub combined_supplies: i32,
    pub combined_ammo: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstructUnitAction {
    /// Id the new unit will receive
    pub unit_id: UnitId,
    pub faction: FactionId,
    pub unit_type: String,
    pub tile_pos: TilePos,
    pub build_cost: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Action {
    Wait(MoveAction),
    Attack(AttackAction),
    Capture(CaptureAction),
    Reinforce(ReinforceAction),
    ConstructUnit(ConstructUnitAction),
}

impl Action {
    pub fn kind(&self) -> AbilityKind {
        match self {
            Action::Wait(_) => AbilityKind::Wait,
            Action::Attack(_) => AbilityKind::Attack,
            Action::Capture(_) => AbilityKind::Capture,
            Action::Reinforce(_) => AbilityKind::Reinforce,
            Action::ConstructUnit(_) => AbilityKind::ConstructUnit,
        }
    }

    /// Acting unit; for construction, the unit being built
    pub fn unit(&self) -> UnitId {
        match self {
            Action::Wait(a) => a.unit,
            Action::Attack(a) => a.unit,
            Action::Capture(a) => a.unit,
            Action::Reinforce(a) => a.unit,
            Action::ConstructUnit(a) => a.unit_id,
        }
    }

    pub fn target(&self) -> Option<UnitId> {
        match self {
            Action::Attack(a) => Some(a.target),
            Action::Reinforce(a) => Some(a.target),
            _ => None,
        }
    }

    /// `None` for actions that do not move an existing unit
    pub fn movement_path(&self) -> Option<&Path> {
        match self {
            Action::Wait(a) => Some(&a.movement_path),
            Action::Attack(a) => Some(&a.movement_path),
            Action::Capture(a) => Some(&a.movement_path),
            Action::Reinforce(a) => Some(&a.movement_path),
            Action::ConstructUnit(_) => None,
        }
    }

    /// Tile the action takes effect on
    pub fn destination(&self) -> Option<TilePos> {
        match self {
            Action::ConstructUnit(a) => Some(a.tile_pos),
            _ => self.movement_path().and_then(Path::destination),
        }
    }

    pub fn to_json(&self) -> crate::core::error::Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> crate::core::error::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::PrimaryDirection;

    #[test]
    fn test_attack_json_shape() {
        let action = Action::Attack(AttackAction {
            unit: UnitId(3),
            target: UnitId(7),
            movement_path: Path::with_directions(TilePos::new(1, 2), vec![PrimaryDirection::East]),
        });
        let json = action.to_json().unwrap();
        assert_eq!(
            json,
            r#"{"type":"Attack","unit":3,"target":7,"movementPath":{"origin":[1,2],"directions":["East"]}}"#
        );
        assert_eq!(Action::from_json(&json).unwrap(), action);
    }

    #[test]
    fn test_reinforce_carries_combined_values() {
        let json = r#"{"type":"Reinforce","unit":1,"target":2,
            "movementPath":{"origin":[0,0],"directions":["South"]},
            "combinedHealth":10,"combinedSupplies":80,"combinedAmmo":3}"#;
        let action = Action::from_json(json).unwrap();
        assert_eq!(action.kind(), AbilityKind::Reinforce);
        assert_eq!(action.target(), Some(UnitId(2)));
        assert_eq!(action.destination(), Some(TilePos::new(0, 1)));
    }

    #[test]
    fn test_construct_has_no_path() {
        let action = Action::ConstructUnit(ConstructUnitAction {
            unit_id: UnitId(9),
            faction: FactionId(1),
            unit_type: "Tank".to_string(),
            tile_pos: TilePos::new(4, 4),
            build_cost: 700,
        });
        assert!(action.movement_path().is_none());
        assert_eq!(action.unit(), UnitId(9));
        assert_eq!(action.destination(), Some(TilePos::new(4, 4)));
        assert!(action.to_json().unwrap().contains(r#""tilePos":[4,4]"#));
    }
}
