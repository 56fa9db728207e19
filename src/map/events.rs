//! Outbound notifications for view and network layers
//!
//! The map queues events as it mutates; callers drain the queue once per
//! simulation step. Nothing in the engine reads them back.

use serde::{Deserialize, Serialize};

use crate::core::types::{Color, FactionId, TurnIndex, UnitId};
use crate::grid::TilePos;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum MapEvent {
    /// Terrain or owner of a tile changed
    TileChanged { pos: TilePos },
    UnitCreated { unit: UnitId, pos: TilePos },
    UnitDestroyed { unit: UnitId, pos: TilePos },
    UnitMoved { unit: UnitId, from: TilePos, to: TilePos },
    UnitDamaged { unit: UnitId, amount: i32, health: i32 },
    FactionColorChanged { faction: FactionId, color: Color },
    FundsChanged { faction: FactionId, funds: i32 },
    FactionDefeated { faction: FactionId },
    GridResized { old_size: (i16, i16), new_size: (i16, i16) },
    TurnStarted { faction: FactionId, turn: TurnIndex },
}

/// Pending events in emission order
#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    events: Vec<MapEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: MapEvent) {
        self.events.push(event);
    }

    pub fn drain(&mut self) -> Vec<MapEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn pending(&self) -> &[MapEvent] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
