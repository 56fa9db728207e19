//! Units on the map

use crate::core::types::{FactionId, UnitId};
use crate::grid::TilePos;
use crate::rules::{UnitType, UnitTypeId};

/// A unit instance
///
/// Health, ammo and supplies stay within `[0, type maximum]`; every setter
/// takes the unit's `UnitType` to clamp against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unit {
    pub id: UnitId,
    pub unit_type: UnitTypeId,
    pub owner: FactionId,
    pub position: TilePos,
    health: i32,
    ammo: i32,
    supplies: i32,
    pub active: bool,
}

impl Unit {
    /// Fully stocked, inactive unit
    pub fn new(id: UnitId, unit_type: UnitTypeId, ty: &UnitType, owner: FactionId, position: TilePos) -> Self {
        Self {
            id,
            unit_type,
            owner,
            position,
            health: ty.max_health,
            ammo: ty.max_ammo,
            supplies: ty.max_supplies,
            active: false,
        }
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    pub fn ammo(&self) -> i32 {
        self.ammo
    }

    pub fn supplies(&self) -> i32 {
        self.supplies
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    pub fn set_health(&mut self, ty: &UnitType, health: i32) {
        self.health = health.clamp(0, ty.max_health);
    }

    pub fn set_ammo(&mut self, ty: &UnitType, ammo: i32) {
        self.ammo = ammo.clamp(0, ty.max_ammo);
    }

    pub fn set_supplies(&mut self, ty: &UnitType, supplies: i32) {
        self.supplies = supplies.clamp(0, ty.max_supplies);
    }

    /// Lose up to `amount` health; returns the health actually lost
    pub fn take_damage(&mut self, amount: i32) -> i32 {
        let lost = amount.clamp(0, self.health);
        self.health -= lost;
        lost
    }

    pub fn spend_ammo(&mut self, amount: i32) {
        self.ammo = (self.ammo - amount.max(0)).max(0);
    }

    pub fn spend_supplies(&mut self, amount: i32) {
        self.supplies = (self.supplies - amount.max(0)).max(0);
    }

    pub fn resupply(&mut self, ty: &UnitType) {
        self.ammo = ty.max_ammo;
        self.supplies = ty.max_supplies;
    }

    pub fn is_damaged(&self, ty: &UnitType) -> bool {
        self.health < ty.max_health
    }
}
