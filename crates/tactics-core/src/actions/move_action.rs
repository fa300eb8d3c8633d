//! Move Action
//!
//! Walks a unit along an A* path, one waypoint per path cell. Floor changes
//! are bridged by a short pause followed by a snap to the next floor.

use glam::Vec3;

use tactics_events::{ActionKind, GridCell, UnitId};

use super::{ActionContext, ActionError, ActionSpec, ActionStatus, TickContext};
use crate::components::Unit;
use crate::config::Tuning;
use crate::grid::{cube_to_offset, disc_across_floors, offset_to_cube, STEP_COST};

#[derive(Debug, Clone, PartialEq)]
pub struct MoveSpec {
    pub range: i32,
    pub speed: f32,
    pub stop_distance: f32,
    pub teleport_pause: f32,
    /// Score per ranged target visible from a candidate cell.
    pub target_weight: i32,
}

impl MoveSpec {
    pub fn from_tuning(tuning: &Tuning) -> Self {
        Self {
            range: tuning.movement.range,
            speed: tuning.movement.speed,
            stop_distance: tuning.movement.stop_distance,
            teleport_pause: tuning.movement.teleport_pause,
            target_weight: tuning.ai.move_target_weight,
        }
    }

    pub fn valid_targets(&self, ctx: &mut ActionContext<'_>, unit: &Unit) -> Vec<GridCell> {
        let origin = unit.cell;
        let max_length = self.range * STEP_COST;
        let mut targets = Vec::new();

        for cube in disc_across_floors(offset_to_cube(origin), self.range) {
            let cell = cube_to_offset(cube);
            if cell == origin
                || !ctx.grid.is_in_bounds(cell)
                || ctx.grid.has_unit(cell)
                || !ctx.pathfinder.is_walkable(cell)
            {
                continue;
            }
            let Some(path) = ctx.pathfinder.find_path(origin, cell, false) else {
                continue;
            };
            if path.length > max_length || !unit.ledger.can_move(path.steps() as u32) {
                continue;
            }
            targets.push(cell);
        }
        targets
    }

    /// Hostile units a ranged attack would reach from `cell`, weighted.
    pub fn score(&self, ctx: &mut ActionContext<'_>, unit: &Unit, cell: GridCell) -> i32 {
        let reachable = match unit.action(ActionKind::RangedAttack) {
            Some(ActionSpec::RangedAttack(ranged)) => ranged.targets_from(ctx, unit, cell).len(),
            _ => 0,
        };
        reachable as i32 * self.target_weight
    }

    pub fn begin(
        &self,
        ctx: &mut ActionContext<'_>,
        unit: &Unit,
        target: GridCell,
    ) -> Result<Traversal, ActionError> {
        let path = ctx
            .pathfinder
            .find_path(unit.cell, target, false)
            .ok_or(ActionError::NoPath {
                from: unit.cell,
                to: target,
            })?;

        let waypoints = path
            .cells
            .iter()
            .map(|&cell| (cell, ctx.layout.world_position(cell)))
            .collect();
        Ok(Traversal {
            waypoints,
            index: 0,
            state: TraversalState::TraversingSegment,
            speed: self.speed,
            stop_distance: self.stop_distance,
            teleport_pause: self.teleport_pause,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TraversalState {
    TraversingSegment,
    TeleportingBetweenFloors { remaining: f32 },
}

/// A move in progress.
#[derive(Debug, Clone, PartialEq)]
pub struct Traversal {
    waypoints: Vec<(GridCell, Vec3)>,
    index: usize,
    state: TraversalState,
    speed: f32,
    stop_distance: f32,
    teleport_pause: f32,
}

impl Traversal {
    pub fn state(&self) -> TraversalState {
        self.state
    }

    /// Number of cell-to-cell steps on the route.
    pub fn steps(&self) -> usize {
        self.waypoints.len().saturating_sub(1)
    }

    pub fn destination(&self) -> Option<GridCell> {
        self.waypoints.last().map(|&(cell, _)| cell)
    }

    pub fn tick(&mut self, owner: UnitId, dt: f32, tcx: &mut TickContext<'_>) -> ActionStatus {
        let Some(mut position) = tcx.position_of(owner) else {
            return ActionStatus::Done;
        };
        let Some(&(_, target)) = self.waypoints.get(self.index) else {
            return ActionStatus::Done;
        };

        match self.state {
            TraversalState::TeleportingBetweenFloors { remaining } => {
                let remaining = remaining - dt;
                if remaining < 0.0 {
                    self.state = TraversalState::TraversingSegment;
                    position = target;
                } else {
                    self.state = TraversalState::TeleportingBetweenFloors { remaining };
                }
            }
            TraversalState::TraversingSegment => {
                let offset = target - position;
                let distance = offset.length();
                if distance > 0.0 {
                    position += offset / distance * (self.speed * dt).min(distance);
                    tcx.face(owner, target);
                }
            }
        }
        tcx.relocate(owner, position);

        if position.distance(target) < self.stop_distance {
            self.index += 1;
            let Some(&(next_cell, _)) = self.waypoints.get(self.index) else {
                return ActionStatus::Done;
            };
            let (arrived_cell, _) = self.waypoints[self.index - 1];
            if next_cell.floor != arrived_cell.floor {
                self.state = TraversalState::TeleportingBetweenFloors {
                    remaining: self.teleport_pause,
                };
            }
        }
        ActionStatus::Running
    }
}
