//! Battle state: tiles, units, factions and the map that owns them

pub mod battle_map;
pub mod events;
pub mod faction;
pub mod layout;
pub mod snapshot;
pub mod tile;
pub mod unit;

pub use battle_map::Map;
pub use events::{EventQueue, MapEvent};
pub use faction::Faction;
pub use layout::skirmish_map;
pub use snapshot::{FactionSnapshot, MapSnapshot, TileOwnerSnapshot, UnitSnapshot};
pub use tile::Tile;
pub use unit::Unit;
