//! Engine configuration with documented constants
//!
//! All magic numbers are collected here. A config is passed explicitly to
//! the `Map` that uses it; there is no process-wide instance.

use serde::{Deserialize, Serialize};

use crate::core::error::{EngineError, Result};

/// Configuration for the simulation rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // === GRID ===
    /// Power-of-two exponent of the grid's maximum side length
    ///
    /// The backing array holds `(1 << max_size_exponent)²` tiles and is
    /// addressed by `(y << max_size_exponent) + x`. At 6 a map can be at most
    /// 64x64 tiles.
    pub max_size_exponent: u32,

    // === UNITS ===
    /// Health of a unit type that does not specify its own maximum
    pub max_health: i32,

    /// Supplies of a unit type that does not specify its own maximum
    pub default_max_supplies: i32,

    // === COMBAT ===
    /// Damage dealt by a full-health attacker with a 100% weapon
    ///
    /// At 5 against 10 health, a full-health unit needs two clean hits to
    /// destroy an equal target, which leaves room for a counter-attack.
    pub base_damage: i32,

    // === ECONOMY ===
    /// Refill ammo and supplies for units standing on their faction's tiles
    /// at the start of the faction's turn
    pub resupply_on_owned_tiles: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_size_exponent: 6,
            max_health: 10,
            default_max_supplies: 99,
            base_damage: 5,
            resupply_on_owned_tiles: true,
        }
    }
}

impl EngineConfig {
    /// Largest exponent accepted (1024x1024 tiles)
    pub const MAX_SIZE_EXPONENT_LIMIT: u32 = 10;

    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML; missing keys keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.max_size_exponent == 0 || self.max_size_exponent > Self::MAX_SIZE_EXPONENT_LIMIT {
            return Err(EngineError::configuration(
                "EngineConfig",
                format!(
                    "max_size_exponent ({}) must be in 1..={}",
                    self.max_size_exponent,
                    Self::MAX_SIZE_EXPONENT_LIMIT
                ),
            ));
        }

        if self.max_health <= 0 {
            return Err(EngineError::configuration(
                "EngineConfig",
                format!("max_health ({}) must be positive", self.max_health),
            ));
        }

        if self.base_damage < 0 || self.default_max_supplies < 0 {
            return Err(EngineError::configuration(
                "EngineConfig",
                "base_damage and default_max_supplies must not be negative",
            ));
        }

        Ok(())
    }

    /// Side length of the largest grid this config allows
    pub fn max_map_size(&self) -> i32 {
        1 << self.max_size_exponent
    }
}
