//! Unit types and the weapons they carry

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::rules::movement::MovementTypeId;
use crate::rules::table::{name_key, Record, RecordId};

pub type UnitTypeId = RecordId<UnitType>;

/// Weapon with a per-target damage table
#[derive(Debug, Clone, PartialEq)]
pub struct Weapon {
    pub name: String,
    /// Lowercased target unit-type name -> damage percentage (always > 0)
    damage_percentages: AHashMap<String, i32>,
    /// Ammo spent per shot; 0 means the weapon never runs dry
    pub ammo_per_shot: i32,
}

impl Weapon {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            damage_percentages: AHashMap::new(),
            ammo_per_shot: 0,
        }
    }

    pub fn with_ammo_per_shot(mut self, ammo: i32) -> Self {
        self.ammo_per_shot = ammo.max(0);
        self
    }

    /// Record a damage percentage; entries <= 0 are dropped
    pub fn set_damage_percentage(&mut self, unit_type: &str, percentage: i32) {
        let key = name_key(unit_type);
        if percentage > 0 {
            self.damage_percentages.insert(key, percentage);
        } else {
            self.damage_percentages.remove(&key);
        }
    }

    pub fn with_damage(mut self, unit_type: &str, percentage: i32) -> Self {
        self.set_damage_percentage(unit_type, percentage);
        self
    }

    pub fn damage_percentage_against(&self, unit_type: &str) -> i32 {
        self.damage_percentages
            .get(&name_key(unit_type))
            .copied()
            .unwrap_or(0)
    }

    pub fn can_target(&self, unit_type: &str) -> bool {
        self.damage_percentage_against(unit_type) > 0
    }

    pub fn consumes_ammo(&self) -> bool {
        self.ammo_per_shot > 0
    }

    pub fn has_ammo_for_shot(&self, ammo: i32) -> bool {
        !self.consumes_ammo() || ammo >= self.ammo_per_shot
    }
}

/// Inclusive Manhattan-distance band a unit can fire into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[u32; 2]", into = "[u32; 2]")]
pub struct AttackRange {
    pub min: u32,
    pub max: u32,
}

impl AttackRange {
    pub fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, distance: u32) -> bool {
        distance >= self.min && distance <= self.max
    }
}

impl Default for AttackRange {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

impl From<[u32; 2]> for AttackRange {
    fn from([min, max]: [u32; 2]) -> Self {
        Self::new(min, max)
    }
}

impl From<AttackRange> for [u32; 2] {
    fn from(range: AttackRange) -> Self {
        [range.min, range.max]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnitType {
    pub name: String,
    pub display_name: String,
    pub movement_range: u32,
    pub movement_type: MovementTypeId,
    pub attack_range: AttackRange,
    pub weapons: Vec<Weapon>,
    pub max_health: i32,
    pub max_ammo: i32,
    pub max_supplies: i32,
    /// Funds needed to construct one
    pub build_cost: i32,
}

impl UnitType {
    pub fn new(name: impl Into<String>, movement_type: MovementTypeId) -> Self {
        let name = name.into();
        Self {
            display_name: name.clone(),
            name,
            movement_range: 0,
            movement_type,
            attack_range: AttackRange::default(),
            weapons: Vec::new(),
            max_health: 10,
            max_ammo: 0,
            max_supplies: 99,
            build_cost: 0,
        }
    }

    pub fn has_weapons(&self) -> bool {
        !self.weapons.is_empty()
    }

    /// Highest-damage weapon usable against `target` with the given ammo
    ///
    /// Returns the weapon index and its damage percentage. Earlier weapons
    /// win ties.
    pub fn best_weapon_against(&self, target: &str, ammo: i32) -> Option<(usize, i32)> {
        let mut best: Option<(usize, i32)> = None;
        for (index, weapon) in self.weapons.iter().enumerate() {
            if !weapon.has_ammo_for_shot(ammo) {
                continue;
            }
            let pct = weapon.damage_percentage_against(target);
            if pct > 0 && best.map_or(true, |(_, b)| pct > b) {
                best = Some((index, pct));
            }
        }
        best
    }

    pub fn can_target(&self, target: &str, ammo: i32) -> bool {
        self.best_weapon_against(target, ammo).is_some()
    }
}

impl Record for UnitType {
    const KIND: &'static str = "UnitType";

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::movement::MovementType;
    use crate::rules::table::Table;

    fn tank() -> UnitType {
        let mut movement = Table::new();
        let treads = movement.insert(MovementType::new("Treads")).unwrap();
        let mut tank = UnitType::new("Tank", treads);
        tank.max_ammo = 3;
        tank.weapons.push(
            Weapon::new("Cannon")
                .with_ammo_per_shot(1)
                .with_damage("Tank", 55)
                .with_damage("Infantry", 0),
        );
        tank.weapons.push(Weapon::new("Machine Gun").with_damage("Infantry", 75));
        tank
    }

    #[test]
    fn test_weapon_ignores_non_positive_entries() {
        let gun = Weapon::new("Gun").with_damage("Infantry", 0).with_damage("Tank", -5);
        assert!(!gun.can_target("Infantry"));
        assert!(!gun.can_target("Tank"));
        assert_eq!(gun.damage_percentage_against("Tank"), 0);
    }

    #[test]
    fn test_best_weapon_respects_ammo() {
        let tank = tank();
        assert_eq!(tank.best_weapon_against("tank", 3), Some((0, 55)));
        assert_eq!(tank.best_weapon_against("Tank", 0), None);
        assert_eq!(tank.best_weapon_against("Infantry", 0), Some((1, 75)));
        assert!(!tank.can_target("Artillery", 3));
    }

    #[test]
    fn test_attack_range_band() {
        let range = AttackRange::new(2, 3);
        assert!(!range.contains(1));
        assert!(range.contains(2));
        assert!(range.contains(3));
        assert!(!range.contains(4));
    }
}
