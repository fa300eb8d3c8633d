//! Terrain Probes, Floor Links and Line of Sight
//!
//! Static level information supplied once at setup.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use tactics_events::GridCell;

use super::hex::HexLayout;

/// Answers floor/obstacle questions about the authored level.
pub trait TerrainProbe {
    /// True when there is ground to stand on at `cell`.
    fn has_floor(&self, cell: GridCell) -> bool;

    /// True when an obstacle occupies `cell`.
    fn has_obstacle(&self, cell: GridCell) -> bool;

    fn is_walkable(&self, cell: GridCell) -> bool {
        self.has_floor(cell) && !self.has_obstacle(cell)
    }
}

/// A traversable connection outside normal hex adjacency (ladder, ramp).
///
/// Links are symmetric: either endpoint reaches the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FloorLink {
    pub a: GridCell,
    pub b: GridCell,
}

impl FloorLink {
    pub fn new(a: GridCell, b: GridCell) -> Self {
        Self { a, b }
    }

    /// The other endpoint when `cell` is one end of this link.
    pub fn partner_of(&self, cell: GridCell) -> Option<GridCell> {
        if self.a == cell {
            Some(self.b)
        } else if self.b == cell {
            Some(self.a)
        } else {
            None
        }
    }
}

/// Straight-line occlusion test against the obstacle cells of a level.
#[derive(Debug, Clone)]
pub struct SightLine {
    layout: HexLayout,
    obstacles: HashSet<GridCell>,
    obstacle_height: f32,
    sample_step: f32,
}

impl SightLine {
    pub fn new(
        layout: HexLayout,
        obstacles: impl IntoIterator<Item = GridCell>,
        obstacle_height: f32,
        sample_step: f32,
    ) -> Self {
        Self {
            layout,
            obstacles: obstacles.into_iter().collect(),
            obstacle_height,
            sample_step: sample_step.max(0.01),
        }
    }

    /// Builds the obstacle set by probing every cell in the given list.
    pub fn from_probe(
        layout: HexLayout,
        probe: &impl TerrainProbe,
        cells: impl IntoIterator<Item = GridCell>,
        obstacle_height: f32,
        sample_step: f32,
    ) -> Self {
        let obstacles = cells.into_iter().filter(|&c| probe.has_obstacle(c));
        Self::new(layout, obstacles, obstacle_height, sample_step)
    }

    pub fn obstacle_count(&self) -> usize {
        self.obstacles.len()
    }

    /// The obstacle cell containing `point`, if the point is inside an obstacle's volume.
    fn blocking_cell(&self, point: Vec3) -> Option<GridCell> {
        let floor = (point.y / self.layout.floor_height).floor() as i32;
        let base = floor as f32 * self.layout.floor_height;
        let cell = self
            .layout
            .nearest_cell(Vec3::new(point.x, base, point.z))
            .on_floor(floor);
        let inside = self.obstacles.contains(&cell) && point.y - base < self.obstacle_height;
        inside.then_some(cell)
    }

    /// True when any obstacle lies on the segment between `from` and `to`.
    pub fn is_blocked(&self, from: Vec3, to: Vec3) -> bool {
        let length = from.distance(to);
        if length <= f32::EPSILON {
            return false;
        }
        let samples = (length / self.sample_step).ceil() as usize;
        (0..=samples).any(|i| {
            let t = i as f32 / samples as f32;
            self.blocking_cell(from.lerp(to, t)).is_some()
        })
    }
}
