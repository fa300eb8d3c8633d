//! Turn Scheduler
//!
//! Alternates the active side. The counter ticks up on every hand-over, so
//! turn 1 is the player's, turn 2 the opponent's, and so on.

use tactics_events::{Side, TurnStamp};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnScheduler {
    turn: u32,
    active: Side,
}

impl Default for TurnScheduler {
    fn default() -> Self {
        let start = TurnStamp::start();
        Self {
            turn: start.turn,
            active: start.active,
        }
    }
}

impl TurnScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn active(&self) -> Side {
        self.active
    }

    pub fn is_active(&self, side: Side) -> bool {
        self.active == side
    }

    pub fn stamp(&self) -> TurnStamp {
        TurnStamp::new(self.turn, self.active)
    }

    /// Hands the turn to the other side.
    pub fn advance(&mut self) -> TurnStamp {
        self.turn += 1;
        self.active = self.active.other();
        tracing::info!("Turn {} begins ({})", self.turn, self.active);
        self.stamp()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_with_player_on_turn_one() {
        let turns = TurnScheduler::new();
        assert_eq!(turns.turn(), 1);
        assert!(turns.is_active(Side::Player));
    }

    #[test]
    fn test_advance_alternates_sides() {
        let mut turns = TurnScheduler::new();
        assert_eq!(turns.advance(), TurnStamp::new(2, Side::Opponent));
        assert_eq!(turns.advance(), TurnStamp::new(3, Side::Player));
        assert_eq!(turns.stamp(), TurnStamp::new(3, Side::Player));
    }
}
