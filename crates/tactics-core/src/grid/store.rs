//! Grid Store
//!
//! Per-floor occupancy of the tactical grid. One `GridCellContents` exists for
//! every in-bounds cell for the whole battle.

use tactics_events::{GridCell, UnitId};

/// Units standing on one cell, in arrival order.
#[derive(Debug, Clone, Default)]
pub struct GridCellContents {
    units: Vec<UnitId>,
}

impl GridCellContents {
    pub fn units(&self) -> &[UnitId] {
        &self.units
    }

    pub fn has_any(&self) -> bool {
        !self.units.is_empty()
    }

    pub fn first(&self) -> Option<UnitId> {
        self.units.first().copied()
    }
}

/// A unit changed cells; consumed by presentation as the "grid changed" signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridChange {
    pub unit: UnitId,
    pub from: GridCell,
    pub to: GridCell,
}

/// Dense occupancy store for `floors` layers of `width × height` cells.
#[derive(Debug, Clone)]
pub struct GridStore {
    width: i32,
    height: i32,
    floors: i32,
    cells: Vec<GridCellContents>,
}

impl GridStore {
    pub fn new(width: i32, height: i32, floors: i32) -> Self {
        let count = (width.max(0) * height.max(0) * floors.max(0)) as usize;
        Self {
            width,
            height,
            floors,
            cells: vec![GridCellContents::default(); count],
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn floors(&self) -> i32 {
        self.floors
    }

    pub fn is_in_bounds(&self, cell: GridCell) -> bool {
        cell.col >= 0
            && cell.col < self.width
            && cell.row >= 0
            && cell.row < self.height
            && cell.floor >= 0
            && cell.floor < self.floors
    }

    fn index(&self, cell: GridCell) -> Option<usize> {
        if !self.is_in_bounds(cell) {
            return None;
        }
        Some(((cell.floor * self.height + cell.row) * self.width + cell.col) as usize)
    }

    pub fn contents(&self, cell: GridCell) -> Option<&GridCellContents> {
        self.index(cell).map(|i| &self.cells[i])
    }

    pub fn add_unit(&mut self, cell: GridCell, unit: UnitId) {
        match self.index(cell) {
            Some(i) => self.cells[i].units.push(unit),
            None => tracing::warn!("Ignoring add of {} at out-of-bounds cell {}", unit, cell),
        }
    }

    /// Removes `unit` from `cell`. Does nothing if it is not there.
    pub fn remove_unit(&mut self, cell: GridCell, unit: UnitId) {
        if let Some(i) = self.index(cell) {
            self.cells[i].units.retain(|&u| u != unit);
        }
    }

    pub fn has_unit(&self, cell: GridCell) -> bool {
        self.contents(cell).is_some_and(GridCellContents::has_any)
    }

    /// First unit that arrived on `cell`, if any.
    pub fn unit_at(&self, cell: GridCell) -> Option<UnitId> {
        self.contents(cell).and_then(GridCellContents::first)
    }

    pub fn units_at(&self, cell: GridCell) -> &[UnitId] {
        self.contents(cell).map(GridCellContents::units).unwrap_or(&[])
    }

    pub fn move_unit(&mut self, unit: UnitId, from: GridCell, to: GridCell) -> GridChange {
        self.remove_unit(from, unit);
        self.add_unit(to, unit);
        GridChange { unit, from, to }
    }

    /// Every in-bounds cell, floor by floor, row by row.
    pub fn cells(&self) -> impl Iterator<Item = GridCell> {
        let (width, height, floors) = (self.width, self.height, self.floors);
        (0..floors).flat_map(move |floor| {
            (0..height).flat_map(move |row| (0..width).map(move |col| GridCell::new(col, row, floor)))
        })
    }
}
