//! Event Types
//!
//! Every notification the core emits toward presentation collaborators.
//! Events are plain data; the core never waits on a consumer.

use serde::{Deserialize, Serialize};

use crate::action_kind::ActionKind;
use crate::cell::GridCell;
use crate::ids::{Side, UnitId};
use crate::timestamp::TurnStamp;

/// Primary event categories, used for filtering and summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    ActionStarted,
    ActionCompleted,
    UnitSpawned,
    UnitDied,
    UnitDamaged,
    UnitMovedCell,
    ShotFired,
    SwordHit,
    GrenadeExploded,
    TurnChanged,
    ActionPointsChanged,
    BusyChanged,
}

impl EventType {
    /// Returns all event type variants.
    pub fn all() -> &'static [EventType] {
        &[
            EventType::ActionStarted,
            EventType::ActionCompleted,
            EventType::UnitSpawned,
            EventType::UnitDied,
            EventType::UnitDamaged,
            EventType::UnitMovedCell,
            EventType::ShotFired,
            EventType::SwordHit,
            EventType::GrenadeExploded,
            EventType::TurnChanged,
            EventType::ActionPointsChanged,
            EventType::BusyChanged,
        ]
    }
}

/// Payload of a single notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    ActionStarted {
        unit: UnitId,
        action: ActionKind,
        target: GridCell,
    },
    ActionCompleted {
        unit: UnitId,
        action: ActionKind,
    },
    UnitSpawned {
        unit: UnitId,
        side: Side,
        cell: GridCell,
    },
    UnitDied {
        unit: UnitId,
        side: Side,
        cell: GridCell,
    },
    UnitDamaged {
        unit: UnitId,
        amount: i32,
        health_normalized: f32,
    },
    /// A unit crossed into a different cell; the grid store changed.
    UnitMovedCell {
        unit: UnitId,
        from: GridCell,
        to: GridCell,
    },
    ShotFired {
        shooter: UnitId,
        target: UnitId,
    },
    SwordHit {
        attacker: UnitId,
        target: UnitId,
    },
    GrenadeExploded {
        thrower: UnitId,
        cell: GridCell,
        units_hit: u32,
    },
    TurnChanged {
        stamp: TurnStamp,
    },
    ActionPointsChanged {
        unit: UnitId,
        action_points: u32,
        move_points: u32,
    },
    BusyChanged {
        busy: bool,
    },
}

impl GameEvent {
    pub fn event_type(&self) -> EventType {
        match self {
            GameEvent::ActionStarted { .. } => EventType::ActionStarted,
            GameEvent::ActionCompleted { .. } => EventType::ActionCompleted,
            GameEvent::UnitSpawned { .. } => EventType::UnitSpawned,
            GameEvent::UnitDied { .. } => EventType::UnitDied,
            GameEvent::UnitDamaged { .. } => EventType::UnitDamaged,
            GameEvent::UnitMovedCell { .. } => EventType::UnitMovedCell,
            GameEvent::ShotFired { .. } => EventType::ShotFired,
            GameEvent::SwordHit { .. } => EventType::SwordHit,
            GameEvent::GrenadeExploded { .. } => EventType::GrenadeExploded,
            GameEvent::TurnChanged { .. } => EventType::TurnChanged,
            GameEvent::ActionPointsChanged { .. } => EventType::ActionPointsChanged,
            GameEvent::BusyChanged { .. } => EventType::BusyChanged,
        }
    }

    /// The unit this event is primarily about, if any.
    pub fn primary_unit(&self) -> Option<UnitId> {
        match self {
            GameEvent::ActionStarted { unit, .. }
            | GameEvent::ActionCompleted { unit, .. }
            | GameEvent::UnitSpawned { unit, .. }
            | GameEvent::UnitDied { unit, .. }
            | GameEvent::UnitDamaged { unit, .. }
            | GameEvent::UnitMovedCell { unit, .. }
            | GameEvent::ActionPointsChanged { unit, .. } => Some(*unit),
            GameEvent::ShotFired { shooter, .. } => Some(*shooter),
            GameEvent::SwordHit { attacker, .. } => Some(*attacker),
            GameEvent::GrenadeExploded { thrower, .. } => Some(*thrower),
            GameEvent::TurnChanged { .. } | GameEvent::BusyChanged { .. } => None,
        }
    }
}

/// A sequenced, timestamped event as written to the event log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub event_id: String,
    pub timestamp: TurnStamp,
    #[serde(flatten)]
    pub payload: GameEvent,
}

impl Event {
    pub fn new(sequence: u64, timestamp: TurnStamp, payload: GameEvent) -> Self {
        Self {
            event_id: generate_event_id(sequence),
            timestamp,
            payload,
        }
    }

    pub fn event_type(&self) -> EventType {
        self.payload.event_type()
    }

    /// Serializes the event as a single JSONL line (no trailing newline).
    pub fn to_jsonl(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parses an event from a single JSONL line.
    pub fn from_jsonl(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }
}

/// Formats an event id from its sequence number.
pub fn generate_event_id(sequence: u64) -> String {
    format!("evt_{:08}", sequence)
}
