//! Battle Systems
//!
//! Turn order, opponent AI, player selection and the ECS tick loop.

pub mod ai;
pub mod player;
pub mod tick;
pub mod turn;

pub use ai::{best_candidate, AiController, AiState, CandidateAction};
pub use player::PlayerController;
pub use tick::{advance_battle, build_schedule, flush_events, insert_battle, BattleClock, TickEvents};
pub use turn::TurnScheduler;
