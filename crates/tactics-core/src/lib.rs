//! Hex-grid tactical combat core.
//!
//! Coordinates and pathfinding over a multi-floor hex grid, timed action state
//! machines, a per-unit point ledger, turn order and a scoring AI. The
//! presentation layer talks to a [`Battle`] and consumes its event stream.

pub mod actions;
pub mod battle;
pub mod components;
pub mod config;
pub mod events;
pub mod grid;
pub mod setup;
pub mod systems;

pub use actions::{ActionError, ActionSpec, Completion};
pub use battle::Battle;
pub use config::{ConfigError, Tuning};
pub use setup::{Scenario, SetupError};
