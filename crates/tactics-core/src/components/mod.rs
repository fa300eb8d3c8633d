//! Unit Components
//!
//! Health, the resource ledger and the unit registry.

pub mod health;
pub mod ledger;
pub mod unit;

pub use health::{DamageOutcome, Health};
pub use ledger::Ledger;
pub use unit::{Unit, UnitRegistry};
