//! Health Component

use serde::{Deserialize, Serialize};

/// Outcome of applying damage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    Survived,
    /// Health reached zero with this hit. Reported once per unit.
    Died,
    /// The unit was already dead; nothing changed.
    AlreadyDead,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    current: i32,
    max: i32,
}

impl Health {
    pub fn new(max: i32) -> Self {
        let max = max.max(1);
        Self { current: max, max }
    }

    pub fn current(&self) -> i32 {
        self.current
    }

    pub fn max(&self) -> i32 {
        self.max
    }

    pub fn is_dead(&self) -> bool {
        self.current == 0
    }

    /// Current health as a fraction of max, in `[0, 1]`.
    pub fn normalized(&self) -> f32 {
        self.current as f32 / self.max as f32
    }

    pub fn damage(&mut self, amount: i32) -> DamageOutcome {
        if self.is_dead() {
            return DamageOutcome::AlreadyDead;
        }
        self.current = (self.current - amount.max(0)).max(0);
        if self.is_dead() {
            DamageOutcome::Died
        } else {
            DamageOutcome::Survived
        }
    }
}
