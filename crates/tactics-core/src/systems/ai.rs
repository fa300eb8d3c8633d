//! Opponent AI
//!
//! Waits out a short delay, then lets each controlled unit in spawn order
//! try its best-scoring (action, cell) pair. One action at a time; once it
//! completes the controller waits again and re-evaluates. When no unit can
//! act the turn is handed over.

use tactics_events::{ActionKind, GridCell, Side};

use crate::actions::ActionContext;
use crate::components::Unit;
use crate::config::AiConfig;

/// A scored (action, target) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandidateAction {
    pub kind: ActionKind,
    pub cell: GridCell,
    pub score: i32,
}

/// The highest-scoring affordable candidate for `unit`.
///
/// Actions are visited in the unit's action order and cells in enumeration
/// order; on equal scores the first one seen wins.
pub fn best_candidate(ctx: &mut ActionContext<'_>, unit: &Unit) -> Option<CandidateAction> {
    let mut best: Option<CandidateAction> = None;
    for spec in &unit.actions {
        if !unit.ledger.can_afford(spec) {
            continue;
        }
        for cell in spec.valid_targets(ctx, unit) {
            let score = spec.score(ctx, unit, cell);
            if best.map_or(true, |b| score > b.score) {
                best = Some(CandidateAction {
                    kind: spec.kind(),
                    cell,
                    score,
                });
            }
        }
    }
    best
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AiState {
    WaitingForTurn,
    TakingTurn { timer: f32 },
    Busy,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AiController {
    sides: Vec<Side>,
    state: AiState,
    initial_delay: f32,
    chain_delay: f32,
}

impl AiController {
    pub fn new(sides: Vec<Side>, config: &AiConfig) -> Self {
        Self {
            sides,
            state: AiState::WaitingForTurn,
            initial_delay: config.initial_delay,
            chain_delay: config.chain_delay,
        }
    }

    pub fn controls(&self, side: Side) -> bool {
        self.sides.contains(&side)
    }

    pub fn sides(&self) -> &[Side] {
        &self.sides
    }

    pub fn state(&self) -> AiState {
        self.state
    }

    pub fn on_turn_changed(&mut self, active: Side) {
        self.state = if self.controls(active) {
            AiState::TakingTurn {
                timer: self.initial_delay,
            }
        } else {
            AiState::WaitingForTurn
        };
    }

    /// An action this controller started has finished.
    pub fn on_action_complete(&mut self) {
        self.state = AiState::TakingTurn {
            timer: self.chain_delay,
        };
    }

    pub fn mark_busy(&mut self) {
        self.state = AiState::Busy;
    }

    /// Counts down. True when it is time to pick the next action.
    pub fn tick(&mut self, dt: f32, active: Side) -> bool {
        if !self.controls(active) {
            return false;
        }
        if let AiState::TakingTurn { timer } = self.state {
            let timer = timer - dt;
            self.state = AiState::TakingTurn { timer };
            return timer <= 0.0;
        }
        false
    }
}
