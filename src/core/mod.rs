pub mod config;
pub mod error;
pub mod types;

pub use config::EngineConfig;
pub use error::{EngineError, Reference, Result};
pub use types::{Color, FactionId, TurnIndex, UnitId};
