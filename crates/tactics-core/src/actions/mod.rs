//! Action Catalog
//!
//! The four capabilities a unit can carry, their target rules and AI scores,
//! and the timed state machines that execute them.

pub mod area;
pub mod melee;
pub mod move_action;
pub mod ranged;
pub mod runner;

use glam::Vec3;
use thiserror::Error;

use tactics_events::{ActionKind, GameEvent, GridCell, Side, UnitId};

use crate::components::{DamageOutcome, Unit, UnitRegistry};
use crate::config::Tuning;
use crate::events::{CombatLog, EventQueue};
use crate::grid::{GridStore, HexLayout, Pathfinder, SightLine};

pub use area::{AreaSpec, Projectile};
pub use melee::{MeleePhase, MeleeRun, MeleeSpec};
pub use move_action::{MoveSpec, Traversal, TraversalState};
pub use ranged::{RangedPhase, RangedRun, RangedSpec};
pub use runner::{ActionRunner, RunningAction};

/// Why an action request was denied. Denials never change battle state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("{action:?} cannot target {target}")]
    InvalidTarget { action: ActionKind, target: GridCell },
    #[error("needs {needed} points, has {available}")]
    InsufficientPoints { needed: u32, available: u32 },
    #[error("{0} is already performing an action")]
    Busy(UnitId),
    #[error("no living unit {0}")]
    UnknownUnit(UnitId),
    #[error("{unit} belongs to {side}, which is not active")]
    NotYourTurn { unit: UnitId, side: Side },
    #[error("{unit} has no {action:?} action")]
    NotAvailable { unit: UnitId, action: ActionKind },
    #[error("no path from {from} to {to}")]
    NoPath { from: GridCell, to: GridCell },
    #[error("no unit or action selected")]
    NothingSelected,
}

/// What happens once a started action finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Completion {
    #[default]
    None,
    /// Hand control back to the opponent controller after its chain delay.
    ResumeAi,
    /// Clear the player controller's busy flag.
    ReleasePlayer,
}

/// Whether a state machine needs more ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionStatus {
    Running,
    Done,
}

/// Read-only battle state used for target enumeration and scoring.
///
/// The pathfinder is mutable because queries reuse its node scratch space.
pub struct ActionContext<'a> {
    pub layout: &'a HexLayout,
    pub grid: &'a GridStore,
    pub pathfinder: &'a mut Pathfinder,
    pub sight: &'a SightLine,
    pub units: &'a UnitRegistry,
}

/// Mutable battle state handed to running actions each tick.
pub struct TickContext<'a> {
    pub layout: &'a HexLayout,
    pub grid: &'a mut GridStore,
    pub units: &'a mut UnitRegistry,
    pub events: &'a mut EventQueue,
    pub log: &'a mut CombatLog,
}

impl TickContext<'_> {
    pub fn position_of(&self, unit: UnitId) -> Option<Vec3> {
        self.units.get(unit).map(|u| u.position)
    }

    pub fn face(&mut self, unit: UnitId, point: Vec3) {
        if let Some(u) = self.units.get_mut(unit) {
            u.face_towards(point);
        }
    }

    /// Places a unit at a world position and refiles it in the grid store
    /// when it has crossed into another cell.
    pub fn relocate(&mut self, unit: UnitId, position: Vec3) {
        let Some(u) = self.units.get_mut(unit) else {
            return;
        };
        u.position = position;
        let cell = self.layout.nearest_cell(position);
        if cell != u.cell {
            let from = u.cell;
            u.cell = cell;
            let change = self.grid.move_unit(unit, from, cell);
            self.events.publish(GameEvent::UnitMovedCell {
                unit: change.unit,
                from: change.from,
                to: change.to,
            });
        }
    }

    /// Damages a unit. Returns false when the unit no longer exists.
    ///
    /// A lethal hit removes the unit from the grid and the registry.
    pub fn apply_damage(&mut self, target: UnitId, amount: i32) -> bool {
        let Some(unit) = self.units.get_mut(target) else {
            return false;
        };
        let outcome = unit.health.damage(amount);
        let normalized = unit.health.normalized();
        self.events.publish(GameEvent::UnitDamaged {
            unit: target,
            amount,
            health_normalized: normalized,
        });

        if outcome == DamageOutcome::Died {
            if let Some(dead) = self.units.remove(target) {
                self.grid.remove_unit(dead.cell, target);
                tracing::info!("{} ({}) died at {}", dead.name, target, dead.cell);
                self.log.append(format!("{} has fallen.", dead.name));
                self.events.publish(GameEvent::UnitDied {
                    unit: target,
                    side: dead.side,
                    cell: dead.cell,
                });
            }
        }
        true
    }

    pub fn name_of(&self, unit: UnitId) -> String {
        self.units
            .get(unit)
            .map_or_else(|| unit.to_string(), |u| u.name.clone())
    }
}

/// One capability a unit carries, with its tuned parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionSpec {
    Move(MoveSpec),
    RangedAttack(RangedSpec),
    MeleeAttack(MeleeSpec),
    AreaAttack(AreaSpec),
}

impl ActionSpec {
    pub fn from_tuning(kind: ActionKind, tuning: &Tuning) -> Self {
        match kind {
            ActionKind::Move => ActionSpec::Move(MoveSpec::from_tuning(tuning)),
            ActionKind::RangedAttack => ActionSpec::RangedAttack(RangedSpec::from_tuning(tuning)),
            ActionKind::MeleeAttack => ActionSpec::MeleeAttack(MeleeSpec::from_tuning(tuning)),
            ActionKind::AreaAttack => ActionSpec::AreaAttack(AreaSpec::from_tuning(tuning)),
        }
    }

    pub fn kind(&self) -> ActionKind {
        match self {
            ActionSpec::Move(_) => ActionKind::Move,
            ActionSpec::RangedAttack(_) => ActionKind::RangedAttack,
            ActionSpec::MeleeAttack(_) => ActionKind::MeleeAttack,
            ActionSpec::AreaAttack(_) => ActionKind::AreaAttack,
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind().display_name()
    }

    /// Action points spent to start this action. Move is paid in move points.
    pub fn point_cost(&self) -> u32 {
        match self {
            ActionSpec::Move(_) => 0,
            ActionSpec::RangedAttack(spec) => spec.point_cost,
            ActionSpec::MeleeAttack(spec) => spec.point_cost,
            ActionSpec::AreaAttack(spec) => spec.point_cost,
        }
    }

    /// Radius in hex steps, for range highlighting.
    pub fn range(&self) -> i32 {
        match self {
            ActionSpec::Move(spec) => spec.range,
            ActionSpec::RangedAttack(spec) => spec.range,
            ActionSpec::MeleeAttack(spec) => spec.range,
            ActionSpec::AreaAttack(spec) => spec.range,
        }
    }

    /// Cells `unit` may target with this action from where it stands.
    pub fn valid_targets(&self, ctx: &mut ActionContext<'_>, unit: &Unit) -> Vec<GridCell> {
        match self {
            ActionSpec::Move(spec) => spec.valid_targets(ctx, unit),
            ActionSpec::RangedAttack(spec) => spec.targets_from(ctx, unit, unit.cell),
            ActionSpec::MeleeAttack(spec) => spec.valid_targets(ctx, unit),
            ActionSpec::AreaAttack(spec) => spec.valid_targets(ctx, unit),
        }
    }

    pub fn is_valid_target(&self, ctx: &mut ActionContext<'_>, unit: &Unit, cell: GridCell) -> bool {
        self.valid_targets(ctx, unit).contains(&cell)
    }

    /// AI desirability of targeting `cell`. Higher is better.
    pub fn score(&self, ctx: &mut ActionContext<'_>, unit: &Unit, cell: GridCell) -> i32 {
        match self {
            ActionSpec::Move(spec) => spec.score(ctx, unit, cell),
            ActionSpec::RangedAttack(spec) => spec.score(ctx, cell),
            ActionSpec::MeleeAttack(spec) => spec.score,
            ActionSpec::AreaAttack(spec) => spec.score,
        }
    }

    /// Builds the running state machine for a validated target.
    pub fn begin(
        &self,
        ctx: &mut ActionContext<'_>,
        unit: &Unit,
        target: GridCell,
    ) -> Result<ActiveAction, ActionError> {
        match self {
            ActionSpec::Move(spec) => spec.begin(ctx, unit, target).map(ActiveAction::Move),
            ActionSpec::RangedAttack(spec) => spec.begin(ctx, unit, target).map(ActiveAction::Ranged),
            ActionSpec::MeleeAttack(spec) => spec.begin(ctx, unit, target).map(ActiveAction::Melee),
            ActionSpec::AreaAttack(spec) => Ok(ActiveAction::Area(spec.begin(ctx, unit, target))),
        }
    }
}

/// A running state machine of one of the four kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum ActiveAction {
    Move(Traversal),
    Ranged(RangedRun),
    Melee(MeleeRun),
    Area(Projectile),
}

impl ActiveAction {
    pub fn kind(&self) -> ActionKind {
        match self {
            ActiveAction::Move(_) => ActionKind::Move,
            ActiveAction::Ranged(_) => ActionKind::RangedAttack,
            ActiveAction::Melee(_) => ActionKind::MeleeAttack,
            ActiveAction::Area(_) => ActionKind::AreaAttack,
        }
    }

    pub fn tick(&mut self, owner: UnitId, dt: f32, tcx: &mut TickContext<'_>) -> ActionStatus {
        match self {
            ActiveAction::Move(traversal) => traversal.tick(owner, dt, tcx),
            ActiveAction::Ranged(run) => run.tick(owner, dt, tcx),
            ActiveAction::Melee(run) => run.tick(owner, dt, tcx),
            ActiveAction::Area(projectile) => projectile.tick(owner, dt, tcx),
        }
    }
}
