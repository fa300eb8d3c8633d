//! Resource Ledger
//!
//! Per-unit action and move point balances, refreshed when the unit's side
//! becomes active. Move is paid in move points, never action points.

use serde::{Deserialize, Serialize};

use tactics_events::ActionKind;

use crate::actions::{ActionError, ActionSpec};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    action_points: u32,
    move_points: u32,
    max_action_points: u32,
    max_move_points: u32,
}

impl Ledger {
    /// A full ledger.
    pub fn new(max_action_points: u32, max_move_points: u32) -> Self {
        Self {
            action_points: max_action_points,
            move_points: max_move_points,
            max_action_points,
            max_move_points,
        }
    }

    pub fn action_points(&self) -> u32 {
        self.action_points
    }

    pub fn move_points(&self) -> u32 {
        self.move_points
    }

    pub fn max_action_points(&self) -> u32 {
        self.max_action_points
    }

    pub fn max_move_points(&self) -> u32 {
        self.max_move_points
    }

    pub fn can_afford(&self, spec: &ActionSpec) -> bool {
        spec.kind() == ActionKind::Move || self.action_points >= spec.point_cost()
    }

    /// Deducts the action's cost, or denies without changing anything.
    pub fn try_spend(&mut self, spec: &ActionSpec) -> Result<(), ActionError> {
        if spec.kind() == ActionKind::Move {
            return Ok(());
        }
        let cost = spec.point_cost();
        if self.action_points < cost {
            return Err(ActionError::InsufficientPoints {
                needed: cost,
                available: self.action_points,
            });
        }
        self.action_points -= cost;
        Ok(())
    }

    pub fn can_move(&self, steps: u32) -> bool {
        self.move_points >= steps
    }

    pub fn spend_move_points(&mut self, steps: u32) -> Result<(), ActionError> {
        if !self.can_move(steps) {
            return Err(ActionError::InsufficientPoints {
                needed: steps,
                available: self.move_points,
            });
        }
        self.move_points -= steps;
        Ok(())
    }

    pub fn refresh(&mut self) {
        self.action_points = self.max_action_points;
        self.move_points = self.max_move_points;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Tuning;

    fn melee() -> ActionSpec {
        ActionSpec::from_tuning(ActionKind::MeleeAttack, &Tuning::default())
    }

    fn movement() -> ActionSpec {
        ActionSpec::from_tuning(ActionKind::Move, &Tuning::default())
    }

    #[test]
    fn test_two_actions_then_denied() {
        let mut ledger = Ledger::new(2, 4);
        let sword = melee();
        assert!(ledger.try_spend(&sword).is_ok());
        assert!(ledger.try_spend(&sword).is_ok());
        assert!(!ledger.can_afford(&sword));
        assert_eq!(
            ledger.try_spend(&sword),
            Err(ActionError::InsufficientPoints { needed: 1, available: 0 })
        );
        assert_eq!(ledger.action_points(), 0);
    }

    #[test]
    fn test_move_is_exempt_from_action_points() {
        let mut ledger = Ledger::new(0, 4);
        let step = movement();
        assert!(ledger.can_afford(&step));
        assert!(ledger.try_spend(&step).is_ok());
        assert_eq!(ledger.action_points(), 0);
    }

    #[test]
    fn test_move_points_never_negative() {
        let mut ledger = Ledger::new(2, 4);
        assert!(ledger.spend_move_points(3).is_ok());
        assert!(ledger.spend_move_points(2).is_err());
        assert_eq!(ledger.move_points(), 1);
    }

    #[test]
    fn test_refresh_restores_maxima() {
        let mut ledger = Ledger::new(2, 4);
        ledger.try_spend(&melee()).unwrap();
        ledger.spend_move_points(4).unwrap();
        ledger.refresh();
        assert_eq!(ledger.action_points(), 2);
        assert_eq!(ledger.move_points(), 4);
    }
}
