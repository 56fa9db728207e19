//! Tile grid: positions, directions and fixed-capacity storage

pub mod direction;
pub mod tile_grid;

pub use direction::{
    PrimaryDirection, Rect, TilePos, CARDINAL_DIRECTIONS, ORDINAL_DIRECTIONS, PRIMARY_DIRECTIONS,
};
pub use tile_grid::{Grid, GridResize, TileCursor, TileCursorMut};
