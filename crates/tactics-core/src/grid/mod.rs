//! Hex Grid
//!
//! Coordinates, occupancy, static terrain and pathfinding.

pub mod hex;
pub mod pathfinding;
pub mod store;
pub mod terrain;

pub use hex::{cube_distance, disc, disc_across_floors, neighbors, offset_to_cube, cube_to_offset, CubeCoord, HexLayout};
pub use pathfinding::{AcceptanceRule, Path, Pathfinder, STEP_COST};
pub use store::{GridCellContents, GridChange, GridStore};
pub use terrain::{FloorLink, SightLine, TerrainProbe};
