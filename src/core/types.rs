//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier for units
///
/// Ids are handed out by the owning `Map` in increasing order and are never
/// reused, so iteration by id is iteration by creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitId(pub u32);

impl UnitId {
    pub fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// The id after this one, or `None` once the id space is exhausted
    pub fn next(&self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unit#{}", self.0)
    }
}

/// Faction identifier (registration index on the map)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FactionId(pub u32);

impl FactionId {
    pub fn new(index: usize) -> Self {
        Self(index as u32)
    }

    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for FactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "faction#{}", self.0)
    }
}

/// Turn counter (one full rotation through every faction)
pub type TurnIndex = u32;

/// RGBA display color, packed as 0xRRGGBBAA
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(pub u32);

impl Color {
    pub const WHITE: Color = Color(0xFFFF_FFFF);
    pub const RED: Color = Color(0xFF00_00FF);
    pub const BLUE: Color = Color(0x0000_FFFF);
    pub const GREEN: Color = Color(0x00FF_00FF);
    pub const YELLOW: Color = Color(0xFFFF_00FF);

    pub fn from_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self(u32::from_be_bytes([r, g, b, a]))
    }

    pub fn rgba(&self) -> [u8; 4] {
        self.0.to_be_bytes()
    }

    /// Same hue, each channel scaled by `factor` (alpha kept)
    pub fn darkened(&self, factor: f32) -> Self {
        let [r, g, b, a] = self.rgba();
        let scale = |c: u8| (f32::from(c) * factor.clamp(0.0, 1.0)).round() as u8;
        Self::from_rgba(scale(r), scale(g), scale(b), a)
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_id_ordering() {
        let a = UnitId::new(1);
        assert!(Some(a) < a.next());
        assert_eq!(a.next(), Some(UnitId(2)));
    }

    #[test]
    fn test_last_unit_id_has_no_successor() {
        assert_eq!(UnitId(u32::MAX).next(), None);
    }

    #[test]
    fn test_color_channels() {
        let c = Color::from_rgba(10, 20, 30, 40);
        assert_eq!(c.rgba(), [10, 20, 30, 40]);
    }

    #[test]
    fn test_darkened_keeps_alpha() {
        let c = Color::from_rgba(200, 100, 50, 255).darkened(0.5);
        assert_eq!(c.rgba(), [100, 50, 25, 255]);
    }

    #[test]
    fn test_ids_serialize_as_numbers() {
        assert_eq!(serde_json::to_string(&UnitId(7)).unwrap(), "7");
        assert_eq!(serde_json::to_string(&FactionId(1)).unwrap(), "1");
    }
}
