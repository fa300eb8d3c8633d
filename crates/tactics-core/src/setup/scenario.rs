//! Scenario Files
//!
//! A battle map authored in TOML: grid size, walkable floor areas, obstacles,
//! floor links and the starting units.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;

use tactics_events::{ActionKind, GridCell, Side};

use crate::grid::{FloorLink, TerrainProbe};

/// Inclusive rectangle of ground on one floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FloorArea {
    pub floor: i32,
    pub min_col: i32,
    pub min_row: i32,
    pub max_col: i32,
    pub max_row: i32,
}

impl FloorArea {
    pub fn contains(&self, cell: GridCell) -> bool {
        cell.floor == self.floor
            && (self.min_col..=self.max_col).contains(&cell.col)
            && (self.min_row..=self.max_row).contains(&cell.row)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitSpawn {
    pub name: String,
    pub side: Side,
    pub cell: GridCell,
    #[serde(default = "default_health")]
    pub health: i32,
    /// Action tags or display names, e.g. "move", "shoot".
    pub actions: Vec<String>,
}

fn default_health() -> i32 {
    100
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub width: i32,
    pub height: i32,
    #[serde(default = "default_floors")]
    pub floors: i32,
    /// Ground regions. Without any, the whole ground floor is walkable.
    #[serde(default)]
    pub floor_areas: Vec<FloorArea>,
    #[serde(default)]
    pub obstacles: Vec<GridCell>,
    /// Must be present, even if empty.
    pub floor_links: Option<Vec<FloorLink>>,
    #[serde(default)]
    pub units: Vec<UnitSpawn>,
}

fn default_floors() -> i32 {
    1
}

/// Errors that stop a battle from being set up.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("grid must have positive dimensions, got {width}x{height}x{floors}")]
    InvalidDimensions { width: i32, height: i32, floors: i32 },
    #[error("scenario has no floor link configuration")]
    MissingFloorLinks,
    #[error("{what} at {cell} is outside the grid")]
    OutOfBounds { what: String, cell: GridCell },
    #[error("unit {unit} spawns on unwalkable cell {cell}")]
    NotWalkable { unit: String, cell: GridCell },
    #[error("two units spawn on {0}")]
    DuplicateSpawn(GridCell),
    #[error("unit {unit} has unknown action {name:?}")]
    UnknownAction { unit: String, name: String },
    #[error("unit {unit} must start with positive health")]
    InvalidHealth { unit: String },
}

impl Scenario {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SetupError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, SetupError> {
        let scenario: Scenario = toml::from_str(content)?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn is_in_bounds(&self, cell: GridCell) -> bool {
        (0..self.width).contains(&cell.col)
            && (0..self.height).contains(&cell.row)
            && (0..self.floors).contains(&cell.floor)
    }

    /// The configured floor links. Empty only if `validate` was skipped.
    pub fn links(&self) -> &[FloorLink] {
        self.floor_links.as_deref().unwrap_or(&[])
    }

    pub fn validate(&self) -> Result<(), SetupError> {
        if self.width <= 0 || self.height <= 0 || self.floors <= 0 {
            return Err(SetupError::InvalidDimensions {
                width: self.width,
                height: self.height,
                floors: self.floors,
            });
        }

        let links = self.floor_links.as_ref().ok_or(SetupError::MissingFloorLinks)?;
        for link in links {
            for cell in [link.a, link.b] {
                self.check_bounds("floor link", cell)?;
            }
        }
        for &cell in &self.obstacles {
            self.check_bounds("obstacle", cell)?;
        }

        let mut occupied = HashSet::new();
        for spawn in &self.units {
            self.check_bounds(&format!("unit {}", spawn.name), spawn.cell)?;
            if !self.is_walkable(spawn.cell) {
                return Err(SetupError::NotWalkable {
                    unit: spawn.name.clone(),
                    cell: spawn.cell,
                });
            }
            if !occupied.insert(spawn.cell) {
                return Err(SetupError::DuplicateSpawn(spawn.cell));
            }
            if spawn.health <= 0 {
                return Err(SetupError::InvalidHealth {
                    unit: spawn.name.clone(),
                });
            }
            spawn.action_kinds()?;
        }
        Ok(())
    }

    fn check_bounds(&self, what: &str, cell: GridCell) -> Result<(), SetupError> {
        if self.is_in_bounds(cell) {
            Ok(())
        } else {
            Err(SetupError::OutOfBounds {
                what: what.to_string(),
                cell,
            })
        }
    }
}

impl UnitSpawn {
    /// Parses the action names in order, dropping repeats.
    pub fn action_kinds(&self) -> Result<Vec<ActionKind>, SetupError> {
        let mut kinds = Vec::new();
        for name in &self.actions {
            let kind: ActionKind = name.parse().map_err(|_| SetupError::UnknownAction {
                unit: self.name.clone(),
                name: name.clone(),
            })?;
            if !kinds.contains(&kind) {
                kinds.push(kind);
            }
        }
        Ok(kinds)
    }
}

impl TerrainProbe for Scenario {
    fn has_floor(&self, cell: GridCell) -> bool {
        if !self.is_in_bounds(cell) {
            return false;
        }
        if self.floor_areas.is_empty() {
            cell.floor == 0
        } else {
            self.floor_areas.iter().any(|area| area.contains(cell))
        }
    }

    fn has_obstacle(&self, cell: GridCell) -> bool {
        self.obstacles.contains(&cell)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_FLOORS: &str = r#"
name = "Test"
width = 6
height = 5
floors = 2
obstacles = [{ col = 2, row = 2, floor = 0 }]
floor_links = [{ a = { col = 0, row = 0, floor = 0 }, b = { col = 0, row = 0, floor = 1 } }]

[[floor_areas]]
floor = 0
min_col = 0
min_row = 0
max_col = 5
max_row = 4

[[floor_areas]]
floor = 1
min_col = 0
min_row = 0
max_col = 2
max_row = 1

[[units]]
name = "Ada"
side = "player"
cell = { col = 1, row = 1, floor = 0 }
actions = ["move", "Shoot"]

[[units]]
name = "Grunt"
side = "opponent"
cell = { col = 1, row = 1, floor = 1 }
health = 60
actions = ["move", "sword", "move"]
"#;

    #[test]
    fn test_parse_scenario() {
        let scenario = Scenario::from_toml_str(TWO_FLOORS).unwrap();
        assert_eq!(scenario.units.len(), 2);
        assert_eq!(scenario.units[0].health, 100);
        assert_eq!(scenario.links().len(), 1);
        assert_eq!(
            scenario.units[1].action_kinds().unwrap(),
            vec![ActionKind::Move, ActionKind::MeleeAttack]
        );
    }

    #[test]
    fn test_floor_areas_define_ground() {
        let scenario = Scenario::from_toml_str(TWO_FLOORS).unwrap();
        assert!(scenario.is_walkable(GridCell::new(5, 4, 0)));
        assert!(!scenario.is_walkable(GridCell::new(2, 2, 0)));
        assert!(scenario.is_walkable(GridCell::new(2, 1, 1)));
        assert!(!scenario.is_walkable(GridCell::new(3, 1, 1)));
    }

    #[test]
    fn test_missing_floor_links_is_fatal() {
        let text = TWO_FLOORS.replace(
            "floor_links = [{ a = { col = 0, row = 0, floor = 0 }, b = { col = 0, row = 0, floor = 1 } }]",
            "",
        );
        assert!(matches!(
            Scenario::from_toml_str(&text),
            Err(SetupError::MissingFloorLinks)
        ));
    }

    #[test]
    fn test_empty_floor_links_allowed() {
        let text = "name = \"Flat\"\nwidth = 3\nheight = 3\nfloor_links = []\n";
        let scenario = Scenario::from_toml_str(text).unwrap();
        assert!(scenario.links().is_empty());
        assert!(scenario.is_walkable(GridCell::new(2, 2, 0)));
    }

    #[test]
    fn test_unknown_action_rejected() {
        let text = TWO_FLOORS.replace("\"sword\"", "\"laser\"");
        assert!(matches!(
            Scenario::from_toml_str(&text),
            Err(SetupError::UnknownAction { name, .. }) if name == "laser"
        ));
    }

    #[test]
    fn test_spawn_on_obstacle_rejected() {
        let text = TWO_FLOORS.replacen(
            "cell = { col = 1, row = 1, floor = 0 }",
            "cell = { col = 2, row = 2, floor = 0 }",
            1,
        );
        assert!(matches!(
            Scenario::from_toml_str(&text),
            Err(SetupError::NotWalkable { .. })
        ));
    }

    #[test]
    fn test_out_of_bounds_obstacle_rejected() {
        let text = TWO_FLOORS.replace("{ col = 2, row = 2, floor = 0 }]", "{ col = 9, row = 2, floor = 0 }]");
        assert!(matches!(
            Scenario::from_toml_str(&text),
            Err(SetupError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("map.toml");
        fs::write(&path, TWO_FLOORS).unwrap();
        let scenario = Scenario::load(&path).unwrap();
        assert_eq!(scenario.name, "Test");
    }
}
