//! Shared helpers for battle integration tests.

#![allow(dead_code)]

use tactics_core::{Battle, Scenario, Tuning};

pub const FRAME: f32 = 0.05;

/// Builds a battle from an inline list of `[[units]]` tables.
pub fn battle(width: i32, height: i32, units: &str) -> Battle {
    let text = format!(
        "name = \"Test\"\nwidth = {}\nheight = {}\nfloor_links = []\n{}",
        width, height, units
    );
    let scenario = Scenario::from_toml_str(&text).expect("valid scenario");
    Battle::from_scenario(&scenario, &Tuning::default()).expect("battle builds")
}

/// Ticks until no action is running.
pub fn settle(battle: &mut Battle) {
    for _ in 0..10_000 {
        if battle.is_idle() {
            return;
        }
        battle.tick(FRAME);
    }
    panic!("actions never finished");
}
