//! Action Runner
//!
//! Owns every running action state machine. A unit has at most one running
//! action; a finished action hands back its completion exactly once.

use tactics_events::{ActionKind, GameEvent, GridCell, UnitId};

use super::{ActionError, ActionStatus, ActiveAction, Completion, TickContext};
use crate::events::EventQueue;

#[derive(Debug, Clone, PartialEq)]
pub struct RunningAction {
    pub unit: UnitId,
    pub target: GridCell,
    pub completion: Completion,
    pub active: ActiveAction,
}

impl RunningAction {
    pub fn kind(&self) -> ActionKind {
        self.active.kind()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ActionRunner {
    running: Vec<RunningAction>,
}

impl ActionRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self, unit: UnitId) -> bool {
        self.running.iter().any(|r| r.unit == unit)
    }

    pub fn is_idle(&self) -> bool {
        self.running.is_empty()
    }

    pub fn running(&self) -> &[RunningAction] {
        &self.running
    }

    pub fn start(
        &mut self,
        unit: UnitId,
        target: GridCell,
        active: ActiveAction,
        completion: Completion,
        events: &mut EventQueue,
    ) -> Result<(), ActionError> {
        if self.is_busy(unit) {
            return Err(ActionError::Busy(unit));
        }
        let action = active.kind();
        tracing::debug!("{} starts {:?} at {}", unit, action, target);
        events.publish(GameEvent::ActionStarted {
            unit,
            action,
            target,
        });
        self.running.push(RunningAction {
            unit,
            target,
            completion,
            active,
        });
        Ok(())
    }

    /// Advances every running action once, in start order.
    ///
    /// Returns the completions of the actions that finished this tick.
    pub fn tick(&mut self, dt: f32, tcx: &mut TickContext<'_>) -> Vec<(UnitId, Completion)> {
        let mut finished = Vec::new();
        self.running.retain_mut(|run| {
            if run.active.tick(run.unit, dt, tcx) == ActionStatus::Running {
                return true;
            }
            let action = run.active.kind();
            tracing::debug!("{} completed {:?}", run.unit, action);
            tcx.events.publish(GameEvent::ActionCompleted {
                unit: run.unit,
                action,
            });
            finished.push((run.unit, run.completion));
            false
        });
        finished
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::Field;
    use super::*;
    use tactics_events::{EventType, Side};

    #[test]
    fn test_second_start_refused_while_running() {
        let mut field = Field::open(5);
        let shooter = field.spawn(Side::Player, GridCell::new(0, 0, 0), &[ActionKind::RangedAttack]);
        let target = GridCell::new(2, 0, 0);
        field.spawn(Side::Opponent, target, &[]);

        let mut runner = ActionRunner::new();
        let first = field.begin(shooter, ActionKind::RangedAttack, target);
        let second = first.clone();
        runner
            .start(shooter, target, first, Completion::ReleasePlayer, &mut field.events)
            .unwrap();
        assert!(runner.is_busy(shooter));
        assert_eq!(
            runner.start(shooter, target, second, Completion::None, &mut field.events),
            Err(ActionError::Busy(shooter))
        );
        assert_eq!(runner.running().len(), 1);
    }

    #[test]
    fn test_completion_returned_exactly_once() {
        let mut field = Field::open(5);
        let shooter = field.spawn(Side::Player, GridCell::new(0, 0, 0), &[ActionKind::RangedAttack]);
        let target = GridCell::new(2, 0, 0);
        field.spawn(Side::Opponent, target, &[]);

        let mut runner = ActionRunner::new();
        let action = field.begin(shooter, ActionKind::RangedAttack, target);
        runner
            .start(shooter, target, action, Completion::ResumeAi, &mut field.events)
            .unwrap();

        let mut completions = Vec::new();
        for _ in 0..100 {
            let mut tcx = field.tcx();
            completions.extend(runner.tick(0.1, &mut tcx));
        }
        assert_eq!(completions, vec![(shooter, Completion::ResumeAi)]);
        assert!(runner.is_idle());

        let events = field.events.drain();
        assert_eq!(events.first().map(|e| e.event_type()), Some(EventType::ActionStarted));
        assert_eq!(events.last().map(|e| e.event_type()), Some(EventType::ActionCompleted));
    }

    #[test]
    fn test_actions_of_different_units_run_together() {
        let mut field = Field::open(6);
        let a = field.spawn(Side::Player, GridCell::new(0, 0, 0), &[ActionKind::Move]);
        let b = field.spawn(Side::Player, GridCell::new(0, 4, 0), &[ActionKind::Move]);

        let mut runner = ActionRunner::new();
        let move_a = field.begin(a, ActionKind::Move, GridCell::new(2, 0, 0));
        let move_b = field.begin(b, ActionKind::Move, GridCell::new(2, 4, 0));
        runner.start(a, GridCell::new(2, 0, 0), move_a, Completion::None, &mut field.events).unwrap();
        runner.start(b, GridCell::new(2, 4, 0), move_b, Completion::None, &mut field.events).unwrap();

        let mut done = 0;
        for _ in 0..200 {
            let mut tcx = field.tcx();
            done += runner.tick(0.05, &mut tcx).len();
        }
        assert_eq!(done, 2);
        assert_eq!(field.units.get(a).unwrap().cell, GridCell::new(2, 0, 0));
        assert_eq!(field.units.get(b).unwrap().cell, GridCell::new(2, 4, 0));
    }
}
