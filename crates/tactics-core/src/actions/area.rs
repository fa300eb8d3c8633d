//! Area Attack
//!
//! Lobs a projectile at a ground cell. On arrival every unit within the blast
//! radius of the impact point is damaged once.

use glam::Vec3;

use tactics_events::{GameEvent, GridCell, UnitId};

use super::{ActionContext, ActionStatus, TickContext};
use crate::components::Unit;
use crate::config::Tuning;
use crate::grid::{cube_to_offset, disc, offset_to_cube};

#[derive(Debug, Clone, PartialEq)]
pub struct AreaSpec {
    pub range: i32,
    pub damage: i32,
    pub point_cost: u32,
    pub projectile_speed: f32,
    pub reach_distance: f32,
    pub blast_radius: f32,
    pub score: i32,
}

impl AreaSpec {
    pub fn from_tuning(tuning: &Tuning) -> Self {
        Self {
            range: tuning.area.range,
            damage: tuning.area.damage,
            point_cost: tuning.area.point_cost,
            projectile_speed: tuning.area.projectile_speed,
            reach_distance: tuning.area.reach_distance,
            blast_radius: tuning.area.blast_radius,
            score: tuning.ai.area_score,
        }
    }

    /// Walkable ground on the thrower's floor; occupancy and sight do not matter.
    pub fn valid_targets(&self, ctx: &ActionContext<'_>, unit: &Unit) -> Vec<GridCell> {
        disc(offset_to_cube(unit.cell), self.range)
            .map(cube_to_offset)
            .filter(|&cell| ctx.grid.is_in_bounds(cell) && ctx.pathfinder.is_walkable(cell))
            .collect()
    }

    pub fn begin(&self, ctx: &ActionContext<'_>, unit: &Unit, target: GridCell) -> Projectile {
        let impact = ctx.layout.world_position(target);
        Projectile {
            target,
            impact,
            position: unit.position,
            total_distance: unit.position.distance(impact),
            speed: self.projectile_speed,
            reach_distance: self.reach_distance,
            blast_radius: self.blast_radius,
            damage: self.damage,
        }
    }
}

/// A thrown projectile in flight.
#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    target: GridCell,
    impact: Vec3,
    position: Vec3,
    total_distance: f32,
    speed: f32,
    reach_distance: f32,
    blast_radius: f32,
    damage: i32,
}

impl Projectile {
    pub fn target(&self) -> GridCell {
        self.target
    }

    /// Position along the straight throw line.
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Presentation-only height above the throw line: a parabola peaking at a
    /// quarter of the throw distance.
    pub fn arc_height(&self) -> f32 {
        if self.total_distance <= f32::EPSILON {
            return 0.0;
        }
        let progress = 1.0 - self.position.distance(self.impact) / self.total_distance;
        let max_height = self.total_distance / 4.0;
        4.0 * progress * (1.0 - progress) * max_height
    }

    pub fn tick(&mut self, owner: UnitId, dt: f32, tcx: &mut TickContext<'_>) -> ActionStatus {
        let offset = self.impact - self.position;
        let distance = offset.length();
        if distance > 0.0 {
            self.position += offset / distance * (self.speed * dt).min(distance);
        }

        if self.position.distance(self.impact) < self.reach_distance {
            self.detonate(owner, tcx);
            return ActionStatus::Done;
        }
        ActionStatus::Running
    }

    fn detonate(&self, owner: UnitId, tcx: &mut TickContext<'_>) {
        let caught: Vec<UnitId> = tcx
            .units
            .iter()
            .filter(|u| u.position.distance(self.impact) <= self.blast_radius)
            .map(|u| u.id)
            .collect();

        tcx.log.append(format!(
            "{}'s grenade explodes at {}, catching {} unit(s).",
            tcx.name_of(owner),
            self.target,
            caught.len()
        ));
        for &unit in &caught {
            tcx.apply_damage(unit, self.damage);
        }
        tcx.events.publish(GameEvent::GrenadeExploded {
            thrower: owner,
            cell: self.target,
            units_hit: caught.len() as u32,
        });
    }
}
