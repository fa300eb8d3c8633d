//! Offset grid address.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

/// A discrete (column, row, floor) address on the tactical grid.
///
/// Rows use the "odd-r" offset layout: odd rows sit half a cell to the right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCell {
    pub col: i32,
    pub row: i32,
    pub floor: i32,
}

impl GridCell {
    pub const fn new(col: i32, row: i32, floor: i32) -> Self {
        Self { col, row, floor }
    }

    /// True when this cell sits on a shifted (odd) row.
    pub fn is_odd_row(&self) -> bool {
        self.row % 2 == 1
    }

    /// Same column and row, different floor.
    pub fn on_floor(self, floor: i32) -> Self {
        Self { floor, ..self }
    }
}

impl Add for GridCell {
    type Output = GridCell;

    fn add(self, rhs: GridCell) -> GridCell {
        GridCell::new(self.col + rhs.col, self.row + rhs.row, self.floor + rhs.floor)
    }
}

impl Sub for GridCell {
    type Output = GridCell;

    fn sub(self, rhs: GridCell) -> GridCell {
        GridCell::new(self.col - rhs.col, self.row - rhs.row, self.floor - rhs.floor)
    }
}

impl fmt::Display for GridCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, floor {})", self.col, self.row, self.floor)
    }
}
