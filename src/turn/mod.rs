//! Turn rotation between factions and seeded headless play

pub mod autoplay;
pub mod controller;

pub use autoplay::{run_match, MatchReport, RandomCommander, MAX_ACTIONS_PER_TURN};
pub use controller::{TurnController, TurnSummary};
