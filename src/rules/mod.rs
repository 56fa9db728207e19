//! Rule tables: terrain, movement, unit types and weapons
//!
//! Tables are immutable once a `Scenario` is loaded and are looked up by
//! case-insensitive name or by typed id.

pub mod loader;
pub mod movement;
pub mod presets;
pub mod records;
pub mod scenario;
pub mod table;
pub mod terrain;
pub mod unit_type;

pub use loader::{load_scenario, load_scenario_json, LoadedScenario};
pub use movement::{MovementType, MovementTypeId, IMPASSABLE_COST};
pub use presets::{skirmish_scenario, SKIRMISH_RULES};
pub use records::{MovementTypeRecord, ScenarioRecords, TerrainTypeRecord, UnitTypeRecord, WeaponRecord};
pub use scenario::Scenario;
pub use table::{Record, RecordId, Table};
pub use terrain::{TerrainType, TerrainTypeId};
pub use unit_type::{AttackRange, UnitType, UnitTypeId, Weapon};
