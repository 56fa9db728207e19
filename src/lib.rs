//! Grid Tactics - turn-based tactical battle engine
//!
//! A headless rules core: tile grid, data-driven unit and terrain rules,
//! movement search, and an ability engine that enumerates and processes
//! serializable actions.

pub mod abilities;
pub mod core;
pub mod grid;
pub mod map;
pub mod pathfinding;
pub mod rules;
pub mod turn;

#[cfg(test)]
mod test_support;

pub use crate::abilities::{AbilityEngine, AbilityKind, Action, ActionOutcome};
pub use crate::core::{EngineConfig, EngineError, Result};
pub use crate::map::{Map, MapEvent, MapSnapshot};
pub use crate::pathfinding::{Path, Pathfinder};
pub use crate::rules::{load_scenario, load_scenario_json, LoadedScenario, Scenario, ScenarioRecords};
pub use crate::turn::{run_match, MatchReport, TurnController, TurnSummary};
