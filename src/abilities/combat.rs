//! Damage resolution shared by attacks and counter-attacks

use crate::grid::TilePos;
use crate::map::{Map, Unit};

/// A planned shot from one unit at another
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Strike {
    pub weapon: usize,
    pub percentage: i32,
    pub damage: i32,
    pub ammo_cost: i32,
}

/// Raw damage before cover: `base × pct / 100`, rounded half up
///
/// The shooter's remaining health does not weaken the shot.
pub fn base_damage(base: i32, percentage: i32) -> i32 {
    let numerator = i64::from(base) * i64::from(percentage.max(0));
    ((numerator + 50) / 100) as i32
}

/// Plan a shot fired from `from`; `None` if out of range or no usable weapon
pub fn plan_strike(map: &Map, attacker: &Unit, defender: &Unit, from: TilePos) -> Option<Strike> {
    if !attacker.is_alive() || attacker.owner == defender.owner {
        return None;
    }
    let attacker_type = map.unit_type_of(attacker);
    if !attacker_type
        .attack_range
        .contains(from.manhattan_distance(&defender.position))
    {
        return None;
    }

    let defender_type = map.unit_type_of(defender);
    let (weapon, percentage) = attacker_type.best_weapon_against(&defender_type.name, attacker.ammo())?;
    let raw = base_damage(map.config().base_damage, percentage);
    let damage = match map.terrain_at(defender.position) {
        Some(terrain) => terrain.apply_cover(raw),
        None => raw,
    };

    Some(Strike {
        weapon,
        percentage,
        damage,
        ammo_cost: attacker_type.weapons[weapon].ammo_per_shot,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_damage_is_base_times_percentage() {
        assert_eq!(base_damage(5, 100), 5);
        assert_eq!(base_damage(5, 50), 3);
        assert_eq!(base_damage(5, 55), 3);
        assert_eq!(base_damage(5, 15), 1);
        assert_eq!(base_damage(5, 0), 0);
        assert_eq!(base_damage(5, -20), 0);
    }

    #[test]
    fn test_wounded_shooter_hits_as_hard() {
        let (mut map, red, blue) = crate::test_support::duel_map(4, 4);
        let a = crate::test_support::spawn(&mut map, "Infantry", red, 0, 0);
        let b = crate::test_support::spawn(&mut map, "Infantry", blue, 1, 0);
        let healthy = plan_strike(&map, map.unit(a).unwrap(), map.unit(b).unwrap(), TilePos::new(0, 0)).unwrap();
        map.set_unit_stats(a, 2, 0, 99).unwrap();
        let wounded = plan_strike(&map, map.unit(a).unwrap(), map.unit(b).unwrap(), TilePos::new(0, 0)).unwrap();
        assert_eq!(healthy.damage, 3);
        assert_eq!(wounded, healthy);
    }
}
