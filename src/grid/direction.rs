//! Tile positions, rectangles and the eight primary directions
//!
//! Screen convention: x grows east, y grows south, so North is `(0, -1)`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Integer tile coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(from = "(i16, i16)", into = "(i16, i16)")]
pub struct TilePos {
    pub x: i16,
    pub y: i16,
}

impl TilePos {
    pub const fn new(x: i16, y: i16) -> Self {
        Self { x, y }
    }

    /// Position one step away in `direction` (no bounds check)
    pub fn offset(&self, direction: PrimaryDirection) -> Self {
        let (dx, dy) = direction.offset();
        Self::new(self.x.wrapping_add(dx), self.y.wrapping_add(dy))
    }

    /// Manhattan distance (sum of axis deltas)
    pub fn manhattan_distance(&self, other: &Self) -> u32 {
        let dx = (i32::from(self.x) - i32::from(other.x)).unsigned_abs();
        let dy = (i32::from(self.y) - i32::from(other.y)).unsigned_abs();
        dx + dy
    }
}

impl From<(i16, i16)> for TilePos {
    fn from((x, y): (i16, i16)) -> Self {
        Self::new(x, y)
    }
}

impl From<TilePos> for (i16, i16) {
    fn from(pos: TilePos) -> Self {
        (pos.x, pos.y)
    }
}

impl fmt::Display for TilePos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// Half-open rectangle of tiles: `left <= x < right`, `top <= y < bottom`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub left: i16,
    pub top: i16,
    pub right: i16,
    pub bottom: i16,
}

impl Rect {
    pub fn new(left: i16, top: i16, right: i16, bottom: i16) -> Self {
        Self { left, top, right, bottom }
    }

    /// Rectangle anchored at the origin
    pub fn with_size(width: i16, height: i16) -> Self {
        Self::new(0, 0, width, height)
    }

    pub fn is_valid(&self) -> bool {
        self.left <= self.right && self.top <= self.bottom
    }

    pub fn width(&self) -> i16 {
        self.right - self.left
    }

    pub fn height(&self) -> i16 {
        self.bottom - self.top
    }

    pub fn contains(&self, pos: TilePos) -> bool {
        pos.x >= self.left && pos.x < self.right && pos.y >= self.top && pos.y < self.bottom
    }

    pub fn intersect(&self, other: &Rect) -> Rect {
        let left = self.left.max(other.left);
        let top = self.top.max(other.top);
        Rect::new(
            left,
            top,
            self.right.min(other.right).max(left),
            self.bottom.min(other.bottom).max(top),
        )
    }

    /// Row-major iteration over every position in the rectangle
    pub fn positions(&self) -> impl Iterator<Item = TilePos> {
        let Rect { left, top, right, bottom } = *self;
        (top..bottom).flat_map(move |y| (left..right).map(move |x| TilePos::new(x, y)))
    }
}

/// One of the eight compass directions, or `None`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum PrimaryDirection {
    #[default]
    None,
    East,
    NorthEast,
    North,
    NorthWest,
    West,
    SouthWest,
    South,
    SouthEast,
}

/// The four directions used for movement
pub const CARDINAL_DIRECTIONS: [PrimaryDirection; 4] = [
    PrimaryDirection::East,
    PrimaryDirection::North,
    PrimaryDirection::West,
    PrimaryDirection::South,
];

/// The four diagonals
pub const ORDINAL_DIRECTIONS: [PrimaryDirection; 4] = [
    PrimaryDirection::NorthEast,
    PrimaryDirection::NorthWest,
    PrimaryDirection::SouthWest,
    PrimaryDirection::SouthEast,
];

/// All eight valid directions, counter-clockwise from East
pub const PRIMARY_DIRECTIONS: [PrimaryDirection; 8] = [
    PrimaryDirection::East,
    PrimaryDirection::NorthEast,
    PrimaryDirection::North,
    PrimaryDirection::NorthWest,
    PrimaryDirection::West,
    PrimaryDirection::SouthWest,
    PrimaryDirection::South,
    PrimaryDirection::SouthEast,
];

impl PrimaryDirection {
    /// Tile offset `(dx, dy)` for this direction
    pub fn offset(&self) -> (i16, i16) {
        match self {
            PrimaryDirection::None => (0, 0),
            PrimaryDirection::East => (1, 0),
            PrimaryDirection::NorthEast => (1, -1),
            PrimaryDirection::North => (0, -1),
            PrimaryDirection::NorthWest => (-1, -1),
            PrimaryDirection::West => (-1, 0),
            PrimaryDirection::SouthWest => (-1, 1),
            PrimaryDirection::South => (0, 1),
            PrimaryDirection::SouthEast => (1, 1),
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            PrimaryDirection::None => PrimaryDirection::None,
            PrimaryDirection::East => PrimaryDirection::West,
            PrimaryDirection::NorthEast => PrimaryDirection::SouthWest,
            PrimaryDirection::North => PrimaryDirection::South,
            PrimaryDirection::NorthWest => PrimaryDirection::SouthEast,
            PrimaryDirection::West => PrimaryDirection::East,
            PrimaryDirection::SouthWest => PrimaryDirection::NorthEast,
            PrimaryDirection::South => PrimaryDirection::North,
            PrimaryDirection::SouthEast => PrimaryDirection::NorthWest,
        }
    }

    pub fn is_valid(&self) -> bool {
        *self != PrimaryDirection::None
    }

    pub fn is_cardinal(&self) -> bool {
        CARDINAL_DIRECTIONS.contains(self)
    }

    pub fn is_ordinal(&self) -> bool {
        ORDINAL_DIRECTIONS.contains(self)
    }

    pub fn name(&self) -> &'static str {
        match self {
            PrimaryDirection::None => "None",
            PrimaryDirection::East => "East",
            PrimaryDirection::NorthEast => "NorthEast",
            PrimaryDirection::North => "North",
            PrimaryDirection::NorthWest => "NorthWest",
            PrimaryDirection::West => "West",
            PrimaryDirection::SouthWest => "SouthWest",
            PrimaryDirection::South => "South",
            PrimaryDirection::SouthEast => "SouthEast",
        }
    }

    /// Case-insensitive lookup by name
    pub fn from_name(name: &str) -> Option<Self> {
        std::iter::once(PrimaryDirection::None)
            .chain(PRIMARY_DIRECTIONS)
            .find(|d| d.name().eq_ignore_ascii_case(name))
    }
}
