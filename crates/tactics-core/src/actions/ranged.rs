//! Ranged Attack
//!
//! Aim, fire once, cool down. Targets need a clear line of sight between
//! shoulder heights.

use glam::Vec3;

use tactics_events::{ActionKind, GameEvent, GridCell, UnitId};

use super::{ActionContext, ActionError, ActionStatus, TickContext};
use crate::components::Unit;
use crate::config::Tuning;
use crate::grid::{cube_to_offset, disc_across_floors, offset_to_cube};

#[derive(Debug, Clone, PartialEq)]
pub struct RangedSpec {
    pub range: i32,
    pub damage: i32,
    pub point_cost: u32,
    pub aim_time: f32,
    pub fire_time: f32,
    pub cooldown_time: f32,
    pub shoulder_height: f32,
    pub base_score: i32,
    /// Extra score for a target at zero health, scaled down linearly.
    pub wounded_bonus: f32,
}

impl RangedSpec {
    pub fn from_tuning(tuning: &Tuning) -> Self {
        Self {
            range: tuning.ranged.range,
            damage: tuning.ranged.damage,
            point_cost: tuning.ranged.point_cost,
            aim_time: tuning.ranged.aim_time,
            fire_time: tuning.ranged.fire_time,
            cooldown_time: tuning.ranged.cooldown_time,
            shoulder_height: tuning.sight.shoulder_height,
            base_score: tuning.ai.ranged_base_score,
            wounded_bonus: tuning.ai.ranged_wounded_bonus,
        }
    }

    /// Cells holding a hostile unit that `unit` could shoot if it stood at `origin`.
    pub fn targets_from(&self, ctx: &ActionContext<'_>, unit: &Unit, origin: GridCell) -> Vec<GridCell> {
        let eye = ctx.layout.world_position(origin) + Vec3::Y * self.shoulder_height;

        disc_across_floors(offset_to_cube(origin), self.range)
            .map(cube_to_offset)
            .filter(|&cell| ctx.grid.is_in_bounds(cell))
            .filter(|&cell| {
                let Some(target) = ctx.grid.unit_at(cell).and_then(|id| ctx.units.get(id)) else {
                    return false;
                };
                let aim = target.position + Vec3::Y * self.shoulder_height;
                unit.is_hostile_to(target) && !ctx.sight.is_blocked(eye, aim)
            })
            .collect()
    }

    /// Prefers finishing off wounded targets.
    pub fn score(&self, ctx: &ActionContext<'_>, cell: GridCell) -> i32 {
        let health = ctx
            .grid
            .unit_at(cell)
            .and_then(|id| ctx.units.get(id))
            .map_or(1.0, |u| u.health.normalized());
        self.base_score + ((1.0 - health) * self.wounded_bonus).round() as i32
    }

    pub fn begin(&self, ctx: &ActionContext<'_>, _unit: &Unit, target: GridCell) -> Result<RangedRun, ActionError> {
        let target_unit = ctx.grid.unit_at(target).ok_or(ActionError::InvalidTarget {
            action: ActionKind::RangedAttack,
            target,
        })?;
        Ok(RangedRun {
            target: target_unit,
            phase: RangedPhase::Aiming {
                remaining: self.aim_time,
            },
            damage: self.damage,
            fire_time: self.fire_time,
            cooldown_time: self.cooldown_time,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RangedPhase {
    Aiming { remaining: f32 },
    Firing { remaining: f32 },
    Cooldown { remaining: f32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct RangedRun {
    target: UnitId,
    phase: RangedPhase,
    damage: i32,
    fire_time: f32,
    cooldown_time: f32,
}

impl RangedRun {
    pub fn target(&self) -> UnitId {
        self.target
    }

    pub fn phase(&self) -> RangedPhase {
        self.phase
    }

    pub fn tick(&mut self, owner: UnitId, dt: f32, tcx: &mut TickContext<'_>) -> ActionStatus {
        match self.phase {
            RangedPhase::Aiming { remaining } => {
                if let Some(aim) = tcx.position_of(self.target) {
                    tcx.face(owner, aim);
                }
                let remaining = remaining - dt;
                if remaining <= 0.0 {
                    self.phase = RangedPhase::Firing {
                        remaining: self.fire_time,
                    };
                    self.fire(owner, tcx);
                } else {
                    self.phase = RangedPhase::Aiming { remaining };
                }
            }
            RangedPhase::Firing { remaining } => {
                let remaining = remaining - dt;
                self.phase = if remaining <= 0.0 {
                    RangedPhase::Cooldown {
                        remaining: self.cooldown_time,
                    }
                } else {
                    RangedPhase::Firing { remaining }
                };
            }
            RangedPhase::Cooldown { remaining } => {
                let remaining = remaining - dt;
                if remaining <= 0.0 {
                    return ActionStatus::Done;
                }
                self.phase = RangedPhase::Cooldown { remaining };
            }
        }
        ActionStatus::Running
    }

    fn fire(&self, owner: UnitId, tcx: &mut TickContext<'_>) {
        if !tcx.units.contains(owner) || !tcx.units.contains(self.target) {
            return;
        }
        let line = format!(
            "{} shoots {} for {} damage.",
            tcx.name_of(owner),
            tcx.name_of(self.target),
            self.damage
        );
        tcx.log.append(line);
        tcx.events.publish(GameEvent::ShotFired {
            shooter: owner,
            target: self.target,
        });
        tcx.apply_damage(self.target, self.damage);
    }
}
