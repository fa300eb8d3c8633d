//! Turn-based timestamp attached to every event.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ids::Side;

/// Which turn an event happened in, and whose turn it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnStamp {
    pub turn: u32,
    pub active: Side,
}

impl TurnStamp {
    pub fn new(turn: u32, active: Side) -> Self {
        Self { turn, active }
    }

    /// The opening turn of every battle: turn 1, player first.
    pub fn start() -> Self {
        Self::new(1, Side::Player)
    }
}

impl fmt::Display for TurnStamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "turn_{}.{}", self.turn, self.active)
    }
}
