use crate::core::types::{FactionId, UnitId};
use crate::rules::TerrainTypeId;

/// One map cell
///
/// `owner` is only ever set on capturable terrain. Both `owner` and `unit`
/// are handles into the owning `Map`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    pub terrain: TerrainTypeId,
    pub owner: Option<FactionId>,
    pub unit: Option<UnitId>,
}

impl Tile {
    pub fn new(terrain: TerrainTypeId) -> Self {
        Self {
            terrain,
            owner: None,
            unit: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.unit.is_none()
    }

    pub fn is_owned_by(&self, faction: FactionId) -> bool {
        self.owner == Some(faction)
    }
}
