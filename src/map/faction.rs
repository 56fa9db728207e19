//! Factions: funds and ownership bookkeeping
//!
//! The unit and tile sets are caches of `Unit::owner` / `Tile::owner`. Only
//! the `Map` updates them, at the same time as the authoritative field.

use std::collections::BTreeSet;

use crate::core::types::{Color, FactionId, UnitId};
use crate::grid::TilePos;

#[derive(Debug, Clone, PartialEq)]
pub struct Faction {
    pub id: FactionId,
    pub name: String,
    funds: i32,
    units: BTreeSet<UnitId>,
    tiles: BTreeSet<TilePos>,
    headquarters: Option<TilePos>,
    color: Color,
    /// Driven by a local player rather than AI or network
    pub controllable: bool,
    pub defeated: bool,
}

impl Faction {
    pub fn new(id: FactionId, name: impl Into<String>, color: Color) -> Self {
        Self {
            id,
            name: name.into(),
            funds: 0,
            units: BTreeSet::new(),
            tiles: BTreeSet::new(),
            headquarters: None,
            color,
            controllable: true,
            defeated: false,
        }
    }

    pub fn funds(&self) -> i32 {
        self.funds
    }

    /// Set funds; negative values clamp to zero
    pub fn set_funds(&mut self, funds: i32) {
        self.funds = funds.max(0);
    }

    pub fn add_funds(&mut self, delta: i32) {
        self.set_funds(self.funds.saturating_add(delta));
    }

    pub fn can_afford(&self, cost: i32) -> bool {
        self.funds >= cost
    }

    pub fn units(&self) -> &BTreeSet<UnitId> {
        &self.units
    }

    pub fn tiles(&self) -> &BTreeSet<TilePos> {
        &self.tiles
    }

    pub fn owns_unit(&self, unit: UnitId) -> bool {
        self.units.contains(&unit)
    }

    pub fn owns_tile(&self, pos: TilePos) -> bool {
        self.tiles.contains(&pos)
    }

    pub fn headquarters(&self) -> Option<TilePos> {
        self.headquarters
    }

    pub fn color(&self) -> Color {
        self.color
    }

    /// Color used to draw units that already acted this turn
    pub fn inactive_color(&self) -> Color {
        self.color.darkened(0.5)
    }

    /// No units left and no headquarters to rebuild from
    pub fn is_eliminated(&self) -> bool {
        self.units.is_empty() && self.headquarters.is_none()
    }

    pub(crate) fn unit_gained(&mut self, unit: UnitId) {
        self.units.insert(unit);
    }

    pub(crate) fn unit_lost(&mut self, unit: UnitId) {
        self.units.remove(&unit);
    }

    pub(crate) fn tile_gained(&mut self, pos: TilePos) {
        self.tiles.insert(pos);
    }

    pub(crate) fn tile_lost(&mut self, pos: TilePos) {
        self.tiles.remove(&pos);
        if self.headquarters == Some(pos) {
            self.headquarters = None;
        }
    }

    pub(crate) fn set_headquarters(&mut self, pos: Option<TilePos>) {
        self.headquarters = pos;
    }

    pub(crate) fn set_color(&mut self, color: Color) {
        self.color = color;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_funds_never_negative() {
        let mut faction = Faction::new(FactionId(0), "Red", Color::RED);
        faction.add_funds(500);
        faction.add_funds(-2_000);
        assert_eq!(faction.funds(), 0);

        faction.set_funds(-1);
        assert_eq!(faction.funds(), 0);

        faction.set_funds(i32::MAX);
        faction.add_funds(i32::MAX);
        assert_eq!(faction.funds(), i32::MAX);
    }

    #[test]
    fn test_tile_lost_removes_and_clears_headquarters() {
        let mut faction = Faction::new(FactionId(0), "Red", Color::RED);
        let hq = TilePos::new(1, 1);
        faction.tile_gained(hq);
        faction.set_headquarters(Some(hq));

        faction.tile_lost(hq);
        assert!(!faction.owns_tile(hq));
        assert_eq!(faction.headquarters(), None);
        assert!(faction.is_eliminated());
    }
}
