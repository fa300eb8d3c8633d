//! Battle Events
//!
//! Per-tick notification queue, the combat log and the JSONL event logger.

pub mod logger;
pub mod queue;

pub use logger::EventLogger;
pub use queue::{CombatLog, EventQueue};
