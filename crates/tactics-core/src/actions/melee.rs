//! Melee Attack

use tactics_events::{ActionKind, GameEvent, GridCell, UnitId};

use super::{ActionContext, ActionError, ActionStatus, TickContext};
use crate::components::Unit;
use crate::config::Tuning;
use crate::grid::{cube_to_offset, disc_across_floors, offset_to_cube};

#[derive(Debug, Clone, PartialEq)]
pub struct MeleeSpec {
    pub range: i32,
    pub damage: i32,
    pub point_cost: u32,
    pub wind_up_time: f32,
    pub recovery_time: f32,
    pub score: i32,
}

impl MeleeSpec {
    pub fn from_tuning(tuning: &Tuning) -> Self {
        Self {
            range: tuning.melee.range,
            damage: tuning.melee.damage,
            point_cost: tuning.melee.point_cost,
            wind_up_time: tuning.melee.wind_up_time,
            recovery_time: tuning.melee.recovery_time,
            score: tuning.ai.melee_score,
        }
    }

    pub fn valid_targets(&self, ctx: &ActionContext<'_>, unit: &Unit) -> Vec<GridCell> {
        disc_across_floors(offset_to_cube(unit.cell), self.range)
            .map(cube_to_offset)
            .filter(|&cell| ctx.grid.is_in_bounds(cell))
            .filter(|&cell| {
                ctx.grid
                    .unit_at(cell)
                    .and_then(|id| ctx.units.get(id))
                    .is_some_and(|target| unit.is_hostile_to(target))
            })
            .collect()
    }

    pub fn begin(&self, ctx: &ActionContext<'_>, _unit: &Unit, target: GridCell) -> Result<MeleeRun, ActionError> {
        let target_unit = ctx.grid.unit_at(target).ok_or(ActionError::InvalidTarget {
            action: ActionKind::MeleeAttack,
            target,
        })?;
        Ok(MeleeRun {
            target: target_unit,
            phase: MeleePhase::WindUp {
                remaining: self.wind_up_time,
            },
            damage: self.damage,
            recovery_time: self.recovery_time,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MeleePhase {
    WindUp { remaining: f32 },
    Recovery { remaining: f32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct MeleeRun {
    target: UnitId,
    phase: MeleePhase,
    damage: i32,
    recovery_time: f32,
}

impl MeleeRun {
    pub fn target(&self) -> UnitId {
        self.target
    }

    pub fn phase(&self) -> MeleePhase {
        self.phase
    }

    pub fn tick(&mut self, owner: UnitId, dt: f32, tcx: &mut TickContext<'_>) -> ActionStatus {
        match self.phase {
            MeleePhase::WindUp { remaining } => {
                if let Some(aim) = tcx.position_of(self.target) {
                    tcx.face(owner, aim);
                }
                let remaining = remaining - dt;
                if remaining <= 0.0 {
                    self.strike(owner, tcx);
                    self.phase = MeleePhase::Recovery {
                        remaining: self.recovery_time,
                    };
                } else {
                    self.phase = MeleePhase::WindUp { remaining };
                }
            }
            MeleePhase::Recovery { remaining } => {
                let remaining = remaining - dt;
                if remaining <= 0.0 {
                    return ActionStatus::Done;
                }
                self.phase = MeleePhase::Recovery { remaining };
            }
        }
        ActionStatus::Running
    }

    fn strike(&self, owner: UnitId, tcx: &mut TickContext<'_>) {
        if !tcx.units.contains(owner) || !tcx.units.contains(self.target) {
            return;
        }
        let line = format!(
            "{} strikes {} for {} damage.",
            tcx.name_of(owner),
            tcx.name_of(self.target),
            self.damage
        );
        tcx.log.append(line);
        tcx.events.publish(GameEvent::SwordHit {
            attacker: owner,
            target: self.target,
        });
        tcx.apply_damage(self.target, self.damage);
    }
}
