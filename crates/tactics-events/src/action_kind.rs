//! Action capability tags.
//!
//! Presentation layers dispatch on these tags through the lookup tables below
//! instead of inspecting concrete action types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed set of actions a unit can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Move,
    RangedAttack,
    MeleeAttack,
    AreaAttack,
}

/// How the camera should frame an action while it runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraFraming {
    /// Keep the overview camera.
    Overview,
    /// Over-the-shoulder shot from the actor toward its target.
    OverShoulder,
}

/// Tint used when highlighting an action's valid target cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HighlightTint {
    White,
    Red,
    RedSoft,
    Yellow,
}

impl ActionKind {
    /// Display name shown in action buttons and the combat log.
    pub fn display_name(self) -> &'static str {
        match self {
            ActionKind::Move => "Move",
            ActionKind::RangedAttack => "Shoot",
            ActionKind::MeleeAttack => "Sword",
            ActionKind::AreaAttack => "Grenade",
        }
    }

    pub fn camera_framing(self) -> CameraFraming {
        match self {
            ActionKind::RangedAttack => CameraFraming::OverShoulder,
            ActionKind::Move | ActionKind::MeleeAttack | ActionKind::AreaAttack => {
                CameraFraming::Overview
            }
        }
    }

    pub fn highlight_tint(self) -> HighlightTint {
        match self {
            ActionKind::Move => HighlightTint::White,
            ActionKind::RangedAttack => HighlightTint::Red,
            ActionKind::MeleeAttack => HighlightTint::RedSoft,
            ActionKind::AreaAttack => HighlightTint::Yellow,
        }
    }

    /// True for actions that target units rather than ground.
    pub fn targets_units(self) -> bool {
        matches!(self, ActionKind::RangedAttack | ActionKind::MeleeAttack)
    }

    pub fn all() -> &'static [ActionKind] {
        &[
            ActionKind::Move,
            ActionKind::RangedAttack,
            ActionKind::MeleeAttack,
            ActionKind::AreaAttack,
        ]
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Error returned when an action name in a scenario is not recognised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownActionKind(pub String);

impl fmt::Display for UnknownActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown action kind: {}", self.0)
    }
}

impl std::error::Error for UnknownActionKind {}

impl FromStr for ActionKind {
    type Err = UnknownActionKind;

    /// Accepts both the snake_case tag and the display name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "move" => Ok(ActionKind::Move),
            "ranged_attack" | "shoot" => Ok(ActionKind::RangedAttack),
            "melee_attack" | "sword" => Ok(ActionKind::MeleeAttack),
            "area_attack" | "grenade" => Ok(ActionKind::AreaAttack),
            _ => Err(UnknownActionKind(s.to_string())),
        }
    }
}
