//! Movement types: per-terrain entry costs

use crate::core::error::{EngineError, Result};
use crate::rules::table::{Record, RecordId};
use crate::rules::terrain::TerrainTypeId;

pub type MovementTypeId = RecordId<MovementType>;

/// Cost value used by rule data to mark a terrain as impassable
pub const IMPASSABLE_COST: i32 = -1;

#[derive(Debug, Clone, PartialEq)]
pub struct MovementType {
    pub name: String,
    /// Moving spends supplies equal to the path's entry cost
    pub consumes_supplies: bool,
    /// Entry cost indexed by terrain id; `None` is impassable
    costs: Vec<Option<u32>>,
}

impl MovementType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            consumes_supplies: false,
            costs: Vec::new(),
        }
    }

    /// Set the raw cost of entering `terrain`
    ///
    /// `-1` marks the terrain impassable; any other value must be positive.
    pub fn set_cost(&mut self, terrain: TerrainTypeId, cost: i32) -> Result<()> {
        let value = match cost {
            IMPASSABLE_COST => None,
            c if c > 0 => Some(c as u32),
            c => {
                return Err(EngineError::configuration(
                    format!("MovementType \"{}\"", self.name),
                    format!("cost {} is neither positive nor {}", c, IMPASSABLE_COST),
                ))
            }
        };

        let index = terrain.index();
        if self.costs.len() <= index {
            self.costs.resize(index + 1, None);
        }
        self.costs[index] = value;
        Ok(())
    }

    /// Entry cost, or `None` when the terrain cannot be crossed
    pub fn cost_across_terrain(&self, terrain: TerrainTypeId) -> Option<u32> {
        self.costs.get(terrain.index()).copied().flatten()
    }

    pub fn can_move_across(&self, terrain: TerrainTypeId) -> bool {
        self.cost_across_terrain(terrain).is_some()
    }
}

impl Record for MovementType {
    const KIND: &'static str = "MovementType";

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::table::Table;
    use crate::rules::terrain::TerrainType;

    fn terrains() -> (Table<TerrainType>, TerrainTypeId, TerrainTypeId) {
        let mut table = Table::new();
        let plains = table.insert(TerrainType::new("Plains")).unwrap();
        let sea = table.insert(TerrainType::new("Sea")).unwrap();
        (table, plains, sea)
    }

    #[test]
    fn test_absent_cost_is_impassable() {
        let (_, plains, sea) = terrains();
        let mut foot = MovementType::new("Foot");
        foot.set_cost(plains, 1).unwrap();

        assert_eq!(foot.cost_across_terrain(plains), Some(1));
        assert_eq!(foot.cost_across_terrain(sea), None);
        assert!(!foot.can_move_across(sea));
    }

    #[test]
    fn test_sentinel_and_invalid_costs() {
        let (_, plains, sea) = terrains();
        let mut boat = MovementType::new("Boat");
        boat.set_cost(sea, 2).unwrap();
        boat.set_cost(plains, IMPASSABLE_COST).unwrap();
        assert!(!boat.can_move_across(plains));

        assert!(boat.set_cost(plains, 0).is_err());
        assert!(boat.set_cost(plains, -3).is_err());
        assert_eq!(boat.cost_across_terrain(sea), Some(2));
    }
}
