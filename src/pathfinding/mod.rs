//! Movement search over the tile grid
//!
//! Costs come from each unit's movement type; occupancy rules come from
//! `Map::can_unit_enter_tile`.

pub mod heap;
pub mod path;
pub mod search;

pub use heap::MinHeap;
pub use path::Path;
pub use search::{Pathfinder, ReachableTiles};
