//! Player Controller
//!
//! Selection state for a human-driven side: which unit, which action, and
//! whether an action is currently playing out.

use tactics_events::{ActionKind, GameEvent, Side, UnitId};

use crate::events::EventQueue;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerController {
    side: Side,
    selected_unit: Option<UnitId>,
    selected_action: Option<ActionKind>,
    busy: bool,
}

impl PlayerController {
    pub fn new(side: Side) -> Self {
        Self {
            side,
            selected_unit: None,
            selected_action: None,
            busy: false,
        }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn selected_unit(&self) -> Option<UnitId> {
        self.selected_unit
    }

    pub fn selected_action(&self) -> Option<ActionKind> {
        self.selected_action
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn select(&mut self, unit: UnitId, action: Option<ActionKind>) {
        self.selected_unit = Some(unit);
        self.selected_action = action;
    }

    pub fn select_action(&mut self, action: ActionKind) {
        self.selected_action = Some(action);
    }

    pub fn clear_selection(&mut self) {
        self.selected_unit = None;
        self.selected_action = None;
    }

    /// Drops the selection if it points at `unit`.
    pub fn forget(&mut self, unit: UnitId) {
        if self.selected_unit == Some(unit) {
            self.clear_selection();
        }
    }

    /// Publishes BusyChanged when the flag actually changes.
    pub fn set_busy(&mut self, busy: bool, events: &mut EventQueue) {
        if self.busy != busy {
            self.busy = busy;
            events.publish(GameEvent::BusyChanged { busy });
        }
    }
}
