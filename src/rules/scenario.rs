//! Scenario: the rule context every simulation call works against

use crate::rules::movement::{MovementType, MovementTypeId};
use crate::rules::table::Table;
use crate::rules::terrain::{TerrainType, TerrainTypeId};
use crate::rules::unit_type::{UnitType, UnitTypeId};

/// Immutable rule tables for one match
#[derive(Debug, Clone, Default)]
pub struct Scenario {
    pub name: String,
    /// Terrain used for freshly created tiles
    pub default_terrain: Option<TerrainTypeId>,
    pub terrain_types: Table<TerrainType>,
    pub movement_types: Table<MovementType>,
    pub unit_types: Table<UnitType>,
}

impl Scenario {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn terrain(&self, id: TerrainTypeId) -> &TerrainType {
        &self.terrain_types[id]
    }

    pub fn unit_type(&self, id: UnitTypeId) -> &UnitType {
        &self.unit_types[id]
    }

    pub fn movement_type(&self, id: MovementTypeId) -> &MovementType {
        &self.movement_types[id]
    }

    pub fn movement_type_of(&self, unit_type: UnitTypeId) -> &MovementType {
        self.movement_type(self.unit_type(unit_type).movement_type)
    }

    /// Cost for `unit_type` to enter `terrain`, `None` if impassable
    pub fn entry_cost(&self, unit_type: UnitTypeId, terrain: TerrainTypeId) -> Option<u32> {
        self.movement_type_of(unit_type).cost_across_terrain(terrain)
    }

    pub fn find_terrain(&self, name: &str) -> Option<TerrainTypeId> {
        self.terrain_types.id_of(name)
    }

    pub fn find_unit_type(&self, name: &str) -> Option<UnitTypeId> {
        self.unit_types.id_of(name)
    }

    /// Default terrain, or the first terrain if none is configured
    pub fn fallback_terrain(&self) -> Option<TerrainTypeId> {
        self.default_terrain.or_else(|| self.terrain_types.ids().next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_cost_goes_through_movement_type() {
        let mut scenario = Scenario::new("Test");
        let plains = scenario.terrain_types.insert(TerrainType::new("Plains")).unwrap();
        let mountain = scenario.terrain_types.insert(TerrainType::new("Mountain")).unwrap();

        let mut foot = MovementType::new("Foot");
        foot.set_cost(plains, 1).unwrap();
        foot.set_cost(mountain, 3).unwrap();
        let foot = scenario.movement_types.insert(foot).unwrap();
        let infantry = scenario.unit_types.insert(UnitType::new("Infantry", foot)).unwrap();

        assert_eq!(scenario.entry_cost(infantry, mountain), Some(3));
        assert_eq!(scenario.find_unit_type("infantry"), Some(infantry));
        assert_eq!(scenario.fallback_terrain(), Some(plains));
    }
}
