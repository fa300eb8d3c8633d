//! Event Queue and Combat Log
//!
//! Notifications raised during a tick are queued here and drained once per
//! tick by whoever presents or records them.

use tactics_events::{Event, GameEvent, TurnStamp};

/// Pending events for the current tick.
#[derive(Debug, Clone)]
pub struct EventQueue {
    events: Vec<Event>,
    stamp: TurnStamp,
    next_sequence: u64,
}

impl Default for EventQueue {
    fn default() -> Self {
        Self {
            events: Vec::new(),
            stamp: TurnStamp::start(),
            next_sequence: 1,
        }
    }
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp applied to events published from now on.
    pub fn set_stamp(&mut self, stamp: TurnStamp) {
        self.stamp = stamp;
    }

    pub fn publish(&mut self, payload: GameEvent) {
        let event = Event::new(self.next_sequence, self.stamp, payload);
        self.next_sequence += 1;
        self.events.push(event);
    }

    pub fn drain(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }
}

/// Append-only human-readable battle log.
#[derive(Debug, Clone, Default)]
pub struct CombatLog {
    lines: Vec<String>,
}

impl CombatLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, line: impl Into<String>) {
        let line = line.into();
        tracing::debug!("combat log: {}", line);
        self.lines.push(line);
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}
