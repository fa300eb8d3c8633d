//! Battle Setup
//!
//! Scenario loading and validation.

pub mod scenario;

pub use scenario::{FloorArea, Scenario, SetupError, UnitSpawn};
