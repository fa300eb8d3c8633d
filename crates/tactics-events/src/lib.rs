//! Shared event types and identifiers for the hex tactics simulation.
//!
//! This crate contains pure data structures with no simulation logic.
//! Presentation layers depend on it to consume the event stream without
//! pulling in the core.

pub mod action_kind;
pub mod cell;
pub mod event;
pub mod ids;
pub mod timestamp;

pub use action_kind::{ActionKind, CameraFraming, HighlightTint};
pub use cell::GridCell;
pub use event::*;
pub use ids::{Side, UnitId};
pub use timestamp::TurnStamp;
