//! Unit abilities and the engine that enumerates and processes actions

pub mod ability;
pub mod action;
pub mod attack;
pub mod capture;
pub mod combat;
pub mod construct;
pub mod engine;
pub mod reinforce;
pub mod wait;

pub use ability::{ActionOutcome, UnitAbility};
pub use action::{
    AbilityKind, Action, AttackAction, CaptureAction, ConstructUnitAction, MoveAction, ReinforceAction,
};
pub use attack::AttackAbility;
pub use capture::CaptureAbility;
pub use combat::{plan_strike, Strike};
pub use construct::ConstructUnitAbility;
pub use engine::AbilityEngine;
pub use reinforce::ReinforceAbility;
pub use wait::WaitAbility;
