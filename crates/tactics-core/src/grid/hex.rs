//! Hex Coordinate System
//!
//! Conversions between odd-r offset cells, cube coordinates and world space.
//! Everything here is pure math with no state.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

use tactics_events::GridCell;

/// Row spacing as a fraction of the cell size.
pub const ROW_SPACING: f32 = 0.75;

/// Horizontal shift applied to odd rows, as a fraction of the cell size.
pub const ODD_ROW_SHIFT: f32 = 0.5;

/// Cube hex coordinate on a floor. Always satisfies `q + r + s == 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CubeCoord {
    q: i32,
    r: i32,
    s: i32,
    floor: i32,
}

impl CubeCoord {
    /// Creates a cube coordinate, deriving `s` from `q` and `r`.
    pub const fn new(q: i32, r: i32, floor: i32) -> Self {
        Self {
            q,
            r,
            s: -q - r,
            floor,
        }
    }

    pub fn q(&self) -> i32 {
        self.q
    }

    pub fn r(&self) -> i32 {
        self.r
    }

    pub fn s(&self) -> i32 {
        self.s
    }

    pub fn floor(&self) -> i32 {
        self.floor
    }
}

impl Add for CubeCoord {
    type Output = CubeCoord;

    fn add(self, rhs: CubeCoord) -> CubeCoord {
        CubeCoord::new(self.q + rhs.q, self.r + rhs.r, self.floor + rhs.floor)
    }
}

impl Sub for CubeCoord {
    type Output = CubeCoord;

    fn sub(self, rhs: CubeCoord) -> CubeCoord {
        CubeCoord::new(self.q - rhs.q, self.r - rhs.r, self.floor - rhs.floor)
    }
}

impl fmt::Display for CubeCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q: {}; r: {}; s: {}; floor: {}", self.q, self.r, self.s, self.floor)
    }
}

pub fn offset_to_cube(cell: GridCell) -> CubeCoord {
    CubeCoord::new(cell.col - (cell.row - (cell.row % 2)) / 2, cell.row, cell.floor)
}

pub fn cube_to_offset(cube: CubeCoord) -> GridCell {
    GridCell::new(cube.q + (cube.r - (cube.r % 2)) / 2, cube.r, cube.floor)
}

/// Planar hex distance in steps, ignoring floors.
pub fn cube_distance(a: CubeCoord, b: CubeCoord) -> i32 {
    let d = a - b;
    d.q.abs().max(d.r.abs()).max(d.s.abs())
}

/// Every cube coordinate within `radius` of `center` on the center's floor.
///
/// Yields exactly `3R² + 3R + 1` coordinates.
pub fn disc(center: CubeCoord, radius: i32) -> impl Iterator<Item = CubeCoord> {
    (-radius..=radius).flat_map(move |q| {
        let r_min = (-radius).max(-q - radius);
        let r_max = radius.min(-q + radius);
        (r_min..=r_max).map(move |r| center + CubeCoord::new(q, r, 0))
    })
}

/// The disc around `center`, repeated on every floor offset in `[-radius, radius]`.
pub fn disc_across_floors(center: CubeCoord, radius: i32) -> impl Iterator<Item = CubeCoord> {
    (-radius..=radius).flat_map(move |df| {
        let layer = CubeCoord::new(center.q, center.r, center.floor + df);
        disc(layer, radius)
    })
}

/// The six same-floor neighbours of an offset cell. Bounds are not checked.
pub fn neighbors(cell: GridCell) -> [GridCell; 6] {
    let diagonal = if cell.is_odd_row() { 1 } else { -1 };
    [
        cell + GridCell::new(-1, 0, 0),
        cell + GridCell::new(1, 0, 0),
        cell + GridCell::new(0, -1, 0),
        cell + GridCell::new(0, 1, 0),
        cell + GridCell::new(diagonal, -1, 0),
        cell + GridCell::new(diagonal, 1, 0),
    ]
}

/// Flat-top world layout of the hex grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HexLayout {
    pub cell_size: f32,
    pub floor_height: f32,
}

impl Default for HexLayout {
    fn default() -> Self {
        Self {
            cell_size: 1.0,
            floor_height: 3.0,
        }
    }
}

impl HexLayout {
    pub fn new(cell_size: f32, floor_height: f32) -> Self {
        Self {
            cell_size,
            floor_height,
        }
    }

    pub fn world_position(&self, cell: GridCell) -> Vec3 {
        let shift = if cell.is_odd_row() {
            self.cell_size * ODD_ROW_SHIFT
        } else {
            0.0
        };
        Vec3::new(
            cell.col as f32 * self.cell_size + shift,
            cell.floor as f32 * self.floor_height,
            cell.row as f32 * self.cell_size * ROW_SPACING,
        )
    }

    /// Floor index a world height belongs to, by rounding.
    pub fn floor_at(&self, height: f32) -> i32 {
        (height / self.floor_height).round() as i32
    }

    /// The cell whose centre is closest to `point`.
    ///
    /// Rounding alone picks the wrong cell near the sheared row boundaries, so
    /// the rough guess is compared against its six neighbours.
    pub fn nearest_cell(&self, point: Vec3) -> GridCell {
        let rough = GridCell::new(
            (point.x / self.cell_size).round() as i32,
            (point.z / self.cell_size / ROW_SPACING).round() as i32,
            self.floor_at(point.y),
        );

        let mut closest = rough;
        let mut closest_distance = point.distance(self.world_position(rough));
        for candidate in neighbors(rough) {
            let distance = point.distance(self.world_position(candidate));
            if distance < closest_distance {
                closest = candidate;
                closest_distance = distance;
            }
        }
        closest
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_offset_cube_round_trip() {
        let mut rng = SmallRng::seed_from_u64(42);
        for _ in 0..500 {
            let cell = GridCell::new(rng.gen_range(0..40), rng.gen_range(0..40), rng.gen_range(0..4));
            let cube = offset_to_cube(cell);
            assert_eq!(cube_to_offset(cube), cell);
            assert_eq!(offset_to_cube(cube_to_offset(cube)), cube);
        }
    }

    #[test]
    fn test_cube_invariant_survives_arithmetic() {
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..500 {
            let a = CubeCoord::new(rng.gen_range(-20..20), rng.gen_range(-20..20), 0);
            let b = CubeCoord::new(rng.gen_range(-20..20), rng.gen_range(-20..20), 1);
            for c in [a + b, a - b, b - a, a + b - a] {
                assert_eq!(c.q() + c.r() + c.s(), 0);
            }
        }
    }

    #[test]
    fn test_disc_sizes() {
        for radius in 0..6 {
            let count = disc(CubeCoord::new(0, 0, 0), radius).count() as i32;
            assert_eq!(count, 3 * radius * radius + 3 * radius + 1);
        }
    }

    #[test]
    fn test_disc_stays_within_radius() {
        let center = offset_to_cube(GridCell::new(5, 5, 0));
        for cube in disc(center, 3) {
            assert!(cube_distance(center, cube) <= 3);
            assert_eq!(cube.floor(), 0);
        }
    }

    #[test]
    fn test_disc_across_floors_spans_layers() {
        let floors: std::collections::HashSet<i32> = disc_across_floors(CubeCoord::new(0, 0, 1), 1)
            .map(|c| c.floor())
            .collect();
        assert_eq!(floors.len(), 3);
        assert!(floors.contains(&0) && floors.contains(&2));
    }

    #[test]
    fn test_neighbors_are_one_step_away() {
        for cell in [GridCell::new(3, 3, 0), GridCell::new(3, 4, 0)] {
            let center = offset_to_cube(cell);
            for neighbor in neighbors(cell) {
                assert_eq!(cube_distance(center, offset_to_cube(neighbor)), 1, "{} -> {}", cell, neighbor);
            }
        }
    }

    #[test]
    fn test_world_position_layout() {
        let layout = HexLayout::new(2.0, 3.0);
        assert_eq!(layout.world_position(GridCell::new(0, 0, 0)), Vec3::ZERO);
        assert_eq!(layout.world_position(GridCell::new(1, 0, 0)), Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(layout.world_position(GridCell::new(0, 1, 0)), Vec3::new(1.0, 0.0, 1.5));
        assert_eq!(layout.world_position(GridCell::new(0, 0, 2)), Vec3::new(0.0, 6.0, 0.0));
    }

    #[test]
    fn test_nearest_cell_inverts_world_position() {
        let layout = HexLayout::new(2.0, 3.0);
        for col in 0..8 {
            for row in 0..8 {
                for floor in 0..2 {
                    let cell = GridCell::new(col, row, floor);
                    assert_eq!(layout.nearest_cell(layout.world_position(cell)), cell);
                }
            }
        }
    }

    #[test]
    fn test_nearest_cell_near_sheared_boundary() {
        let layout = HexLayout::new(1.0, 3.0);
        // Slightly right of the odd-row cell (2, 1): rounding x alone would pick column 3.
        let cell = GridCell::new(2, 1, 0);
        let point = layout.world_position(cell) + Vec3::new(0.1, 0.0, 0.05);
        assert_eq!(layout.nearest_cell(point), cell);
    }
}
