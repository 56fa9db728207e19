//! Movement paths: an origin plus a sequence of steps

use serde::{Deserialize, Serialize};

use crate::grid::{PrimaryDirection, TilePos};

/// A movement path
///
/// A path with no origin is the "unreachable" result of a search and must
/// not be treated as staying in place. A path with an origin and no
/// directions stays in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Path {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<TilePos>,
    #[serde(default)]
    pub directions: Vec<PrimaryDirection>,
}

impl Path {
    /// Path that starts (and so far ends) at `origin`
    pub fn new(origin: TilePos) -> Self {
        Self {
            origin: Some(origin),
            directions: Vec::new(),
        }
    }

    /// The unreachable path
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_directions(origin: TilePos, directions: Vec<PrimaryDirection>) -> Self {
        Self {
            origin: Some(origin),
            directions,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.origin.is_some()
    }

    pub fn push(&mut self, direction: PrimaryDirection) {
        self.directions.push(direction);
    }

    /// Number of steps
    pub fn len(&self) -> usize {
        self.directions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.directions.is_empty()
    }

    /// Every tile visited after the origin, in order
    pub fn waypoints(&self) -> Vec<TilePos> {
        let Some(mut pos) = self.origin else {
            return Vec::new();
        };
        self.directions
            .iter()
            .map(|&direction| {
                pos = pos.offset(direction);
                pos
            })
            .collect()
    }

    pub fn destination(&self) -> Option<TilePos> {
        let origin = self.origin?;
        Some(self.directions.iter().fold(origin, |pos, &d| pos.offset(d)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use PrimaryDirection::{East, North, South};

    #[test]
    fn test_destination_replays_steps() {
        let path = Path::with_directions(TilePos::new(2, 2), vec![East, East, North]);
        assert_eq!(path.destination(), Some(TilePos::new(4, 1)));
        assert_eq!(
            path.waypoints(),
            vec![TilePos::new(3, 2), TilePos::new(4, 2), TilePos::new(4, 1)]
        );
        assert_eq!(path.len(), 3);
    }

    #[test]
    fn test_empty_path_is_invalid() {
        let path = Path::empty();
        assert!(!path.is_valid());
        assert_eq!(path.destination(), None);

        let stay = Path::new(TilePos::new(0, 0));
        assert!(stay.is_valid());
        assert_eq!(stay.destination(), Some(TilePos::new(0, 0)));
    }

    #[test]
    fn test_path_json_shape() {
        let path = Path::with_directions(TilePos::new(1, 0), vec![South]);
        let json = serde_json::to_string(&path).unwrap();
        assert_eq!(json, r#"{"origin":[1,0],"directions":["South"]}"#);
    }
}
