use thiserror::Error;

use crate::core::types::{FactionId, UnitId};
use crate::grid::TilePos;

/// Something an action or lookup referred to that does not exist
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reference {
    Unit(UnitId),
    Faction(FactionId),
    Tile(TilePos),
}

impl std::fmt::Display for Reference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Reference::Unit(id) => write!(f, "{}", id),
            Reference::Faction(id) => write!(f, "{}", id),
            Reference::Tile(pos) => write!(f, "tile {}", pos),
        }
    }
}

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Configuration error in {record}: {reason}")]
    Configuration { record: String, reason: String },

    #[error("Invalid reference: {0}")]
    InvalidReference(Reference),

    #[error("Illegal action: {0}")]
    IllegalAction(String),

    #[error("No path from {from} to {to}")]
    PathNotFound { from: TilePos, to: TilePos },

    #[error("Invalid map size {width}x{height} (max {max})")]
    InvalidMapSize { width: i32, height: i32, max: i32 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl EngineError {
    pub fn configuration(record: impl Into<String>, reason: impl Into<String>) -> Self {
        EngineError::Configuration {
            record: record.into(),
            reason: reason.into(),
        }
    }

    pub fn illegal(reason: impl Into<String>) -> Self {
        EngineError::IllegalAction(reason.into())
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = EngineError::InvalidReference(Reference::Unit(UnitId(4)));
        assert_eq!(err.to_string(), "Invalid reference: unit#4");

        let err = EngineError::configuration("UnitType \"Tank\"", "unknown movement type");
        assert!(err.to_string().contains("Tank"));
    }
}
