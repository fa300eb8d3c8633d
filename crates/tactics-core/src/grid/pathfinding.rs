//! Pathfinding Engine
//!
//! A* over a parallel node grid covering every floor. Walkability is fixed at
//! setup; search scratch state is reset at the start of every query.

use serde::{Deserialize, Serialize};

use tactics_events::GridCell;

use super::hex::{neighbors, HexLayout};
use super::terrain::{FloorLink, TerrainProbe};

/// Cost of one step between adjacent or linked cells.
pub const STEP_COST: i32 = 10;

/// How a tentative cost is compared before a neighbour is updated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AcceptanceRule {
    /// Standard A*: accept when the tentative g beats the neighbour's g.
    #[default]
    AccumulatedCost,
    /// Accept when the tentative g beats the neighbour's f. Coarser; lets
    /// open nodes be re-parented onto longer routes.
    CombinedCost,
}

/// Per-cell search record.
#[derive(Debug, Clone)]
pub struct PathNode {
    cell: GridCell,
    g: i32,
    h: i32,
    f: i32,
    came_from: Option<usize>,
    walkable: bool,
}

impl PathNode {
    fn new(cell: GridCell, walkable: bool) -> Self {
        Self {
            cell,
            g: i32::MAX,
            h: 0,
            f: i32::MAX,
            came_from: None,
            walkable,
        }
    }

    fn reset(&mut self) {
        self.g = i32::MAX;
        self.h = 0;
        self.f = self.g;
        self.came_from = None;
    }

    fn set_costs(&mut self, g: i32, h: i32) {
        self.g = g;
        self.h = h;
        self.f = g.saturating_add(h);
    }

    pub fn cell(&self) -> GridCell {
        self.cell
    }

    pub fn is_walkable(&self) -> bool {
        self.walkable
    }
}

/// A found route. `costs[i]` is the accumulated cost on arrival at `cells[i]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    pub cells: Vec<GridCell>,
    pub costs: Vec<i32>,
    pub length: i32,
}

impl Path {
    /// Number of moves, not counting the start cell.
    pub fn steps(&self) -> usize {
        self.cells.len().saturating_sub(1)
    }
}

#[derive(Debug, Clone)]
pub struct Pathfinder {
    width: i32,
    height: i32,
    floors: i32,
    layout: HexLayout,
    nodes: Vec<PathNode>,
    links: Vec<FloorLink>,
    rule: AcceptanceRule,
}

impl Pathfinder {
    /// Builds the node grid and seeds walkability from the terrain probe.
    pub fn new(
        width: i32,
        height: i32,
        floors: i32,
        layout: HexLayout,
        probe: &impl TerrainProbe,
        links: Vec<FloorLink>,
    ) -> Self {
        let mut nodes = Vec::with_capacity((width * height * floors).max(0) as usize);
        for floor in 0..floors {
            for row in 0..height {
                for col in 0..width {
                    let cell = GridCell::new(col, row, floor);
                    nodes.push(PathNode::new(cell, probe.is_walkable(cell)));
                }
            }
        }

        let walkable = nodes.iter().filter(|n| n.walkable).count();
        tracing::debug!(
            "Pathfinder ready: {} nodes ({} walkable), {} floor links",
            nodes.len(),
            walkable,
            links.len()
        );

        Self {
            width,
            height,
            floors,
            layout,
            nodes,
            links,
            rule: AcceptanceRule::default(),
        }
    }

    pub fn with_rule(mut self, rule: AcceptanceRule) -> Self {
        self.rule = rule;
        self
    }

    pub fn rule(&self) -> AcceptanceRule {
        self.rule
    }

    pub fn links(&self) -> &[FloorLink] {
        &self.links
    }

    fn index(&self, cell: GridCell) -> Option<usize> {
        let in_bounds = cell.col >= 0
            && cell.col < self.width
            && cell.row >= 0
            && cell.row < self.height
            && cell.floor >= 0
            && cell.floor < self.floors;
        in_bounds.then(|| ((cell.floor * self.height + cell.row) * self.width + cell.col) as usize)
    }

    /// Static walkability; `false` for out-of-bounds cells.
    pub fn is_walkable(&self, cell: GridCell) -> bool {
        self.index(cell).is_some_and(|i| self.nodes[i].walkable)
    }

    /// Straight-line world distance scaled by the step cost.
    pub fn heuristic(&self, a: GridCell, b: GridCell) -> i32 {
        let distance = self
            .layout
            .world_position(a)
            .distance(self.layout.world_position(b));
        (distance * STEP_COST as f32).round() as i32
    }

    /// In-bounds hex neighbours plus every floor-link partner of `cell`.
    fn neighbor_indices(&self, cell: GridCell) -> Vec<usize> {
        let adjacent = neighbors(cell).into_iter();
        let linked = self.links.iter().filter_map(|link| link.partner_of(cell));
        adjacent
            .chain(linked)
            .filter_map(|c| self.index(c))
            .collect()
    }

    pub fn find_path(&mut self, start: GridCell, goal: GridCell, ignore_terrain: bool) -> Option<Path> {
        let start_index = self.index(start)?;
        let goal_index = self.index(goal)?;

        for node in &mut self.nodes {
            node.reset();
        }
        let start_h = self.heuristic(start, goal);
        self.nodes[start_index].set_costs(0, start_h);

        let mut open: Vec<usize> = vec![start_index];
        let mut in_open = vec![false; self.nodes.len()];
        let mut closed = vec![false; self.nodes.len()];
        in_open[start_index] = true;

        while !open.is_empty() {
            let mut best = 0;
            for (i, &candidate) in open.iter().enumerate() {
                if self.nodes[candidate].f < self.nodes[open[best]].f {
                    best = i;
                }
            }
            let current = open.swap_remove(best);
            in_open[current] = false;

            if current == goal_index {
                return Some(self.build_path(goal_index));
            }
            closed[current] = true;

            let current_cell = self.nodes[current].cell;
            let current_g = self.nodes[current].g;
            for neighbor in self.neighbor_indices(current_cell) {
                if closed[neighbor] {
                    continue;
                }
                if !ignore_terrain && !self.nodes[neighbor].walkable {
                    closed[neighbor] = true;
                    continue;
                }

                let tentative_g = current_g + STEP_COST;
                let threshold = match self.rule {
                    AcceptanceRule::AccumulatedCost => self.nodes[neighbor].g,
                    AcceptanceRule::CombinedCost => self.nodes[neighbor].f,
                };
                if tentative_g < threshold {
                    let h = if ignore_terrain {
                        0
                    } else {
                        self.heuristic(self.nodes[neighbor].cell, goal)
                    };
                    let node = &mut self.nodes[neighbor];
                    node.came_from = Some(current);
                    node.set_costs(tentative_g, h);

                    if !in_open[neighbor] {
                        in_open[neighbor] = true;
                        open.push(neighbor);
                    }
                }
            }
        }

        None
    }

    fn build_path(&self, goal_index: usize) -> Path {
        let mut indices = vec![goal_index];
        let mut current = goal_index;
        while let Some(previous) = self.nodes[current].came_from {
            indices.push(previous);
            current = previous;
        }
        indices.reverse();

        Path {
            cells: indices.iter().map(|&i| self.nodes[i].cell).collect(),
            costs: indices.iter().map(|&i| self.nodes[i].g).collect(),
            length: self.nodes[goal_index].f,
        }
    }

    pub fn has_path(&mut self, start: GridCell, goal: GridCell) -> bool {
        self.find_path(start, goal, false).is_some()
    }

    pub fn has_path_ignoring_terrain(&mut self, start: GridCell, goal: GridCell) -> bool {
        self.find_path(start, goal, true).is_some()
    }

    /// Cost of the route, or 0 when there is none.
    pub fn path_length(&mut self, start: GridCell, goal: GridCell) -> i32 {
        self.find_path(start, goal, false).map_or(0, |p| p.length)
    }

    pub fn path_length_ignoring_terrain(&mut self, start: GridCell, goal: GridCell) -> i32 {
        self.find_path(start, goal, true).map_or(0, |p| p.length)
    }
}
