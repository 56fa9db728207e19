//! Terrain types and their economic/defensive properties

use crate::rules::table::{Record, RecordId};

pub type TerrainTypeId = RecordId<TerrainType>;

/// Static per-tile rule data
#[derive(Debug, Clone, PartialEq)]
pub struct TerrainType {
    pub name: String,
    pub display_name: String,
    /// Funds per turn for the faction owning a tile of this type
    pub income: i32,
    /// Percentage of incoming damage absorbed by a unit standing here (0..=100)
    pub cover_bonus: i32,
    pub capturable: bool,
    /// Unit type names the owner can construct on this terrain
    pub constructible_unit_types: Vec<String>,
}

impl TerrainType {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            display_name: name.clone(),
            name,
            income: 0,
            cover_bonus: 0,
            capturable: false,
            constructible_unit_types: Vec::new(),
        }
    }

    pub fn with_income(mut self, income: i32) -> Self {
        self.income = income;
        self
    }

    pub fn with_cover(mut self, cover_bonus: i32) -> Self {
        self.cover_bonus = cover_bonus.clamp(0, 100);
        self
    }

    pub fn capturable(mut self) -> Self {
        self.capturable = true;
        self
    }

    pub fn constructs(mut self, unit_type: impl Into<String>) -> Self {
        self.constructible_unit_types.push(unit_type.into());
        self
    }

    pub fn can_construct(&self, unit_type: &str) -> bool {
        self.constructible_unit_types
            .iter()
            .any(|name| name.eq_ignore_ascii_case(unit_type))
    }

    /// Apply cover to raw damage; never reduces below zero
    pub fn apply_cover(&self, damage: i32) -> i32 {
        (damage * (100 - self.cover_bonus) / 100).max(0)
    }
}

impl Record for TerrainType {
    const KIND: &'static str = "TerrainType";

    fn name(&self) -> &str {
        &self.name
    }
}
