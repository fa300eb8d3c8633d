//! Tick Loop
//!
//! Bevy ECS resources and systems that drive a battle headlessly: advance the
//! battle by one frame, then hand the frame's events to the logger.

use bevy_ecs::prelude::*;

use tactics_events::Event;

use crate::battle::Battle;
use crate::events::EventLogger;

/// Fixed frame step and running totals.
#[derive(Resource, Debug, Clone)]
pub struct BattleClock {
    pub frame_dt: f32,
    pub ticks: u64,
    pub elapsed: f32,
}

impl BattleClock {
    pub fn new(frame_dt: f32) -> Self {
        Self {
            frame_dt,
            ticks: 0,
            elapsed: 0.0,
        }
    }
}

/// Events drained during the last frame.
#[derive(Resource, Debug, Default)]
pub struct TickEvents {
    pub events: Vec<Event>,
}

pub fn advance_battle(mut battle: ResMut<Battle>, mut clock: ResMut<BattleClock>) {
    let dt = clock.frame_dt;
    battle.tick(dt);
    clock.ticks += 1;
    clock.elapsed += dt;
}

pub fn flush_events(
    mut battle: ResMut<Battle>,
    mut logger: ResMut<EventLogger>,
    mut tick_events: ResMut<TickEvents>,
) {
    let drained = battle.drain_events();
    if let Err(e) = logger.log_batch(&drained) {
        tracing::warn!("Could not write events: {}", e);
    }
    tick_events.events = drained;
}

/// Inserts the resources the battle systems need.
pub fn insert_battle(world: &mut World, battle: Battle, frame_dt: f32, logger: EventLogger) {
    world.insert_resource(battle);
    world.insert_resource(BattleClock::new(frame_dt));
    world.insert_resource(TickEvents::default());
    world.insert_resource(logger);
}

pub fn build_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.add_systems((advance_battle, flush_events).chain());
    schedule
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Tuning;
    use crate::setup::Scenario;
    use tactics_events::{EventType, Side};

    fn standoff() -> Battle {
        let scenario = Scenario::from_toml_str(
            r#"
name = "Standoff"
width = 6
height = 6
floor_links = []

[[units]]
name = "Ada"
side = "player"
cell = { col = 0, row = 0, floor = 0 }
actions = ["shoot"]

[[units]]
name = "Grunt"
side = "opponent"
cell = { col = 4, row = 0, floor = 0 }
actions = ["shoot"]
"#,
        )
        .unwrap();
        Battle::from_scenario(&scenario, &Tuning::default()).unwrap()
    }

    #[test]
    fn test_schedule_advances_clock_and_flushes() {
        let mut world = World::new();
        insert_battle(&mut world, standoff(), 0.1, EventLogger::null());
        let mut schedule = build_schedule();

        schedule.run(&mut world);
        assert_eq!(world.resource::<BattleClock>().ticks, 1);
        // Spawn events from setup are flushed on the first frame
        let flushed = &world.resource::<TickEvents>().events;
        assert_eq!(flushed.len(), 2);
        assert!(flushed.iter().all(|e| e.event_type() == EventType::UnitSpawned));
        assert_eq!(world.resource::<EventLogger>().event_count(), 2);

        schedule.run(&mut world);
        assert!(world.resource::<TickEvents>().events.is_empty());
    }

    #[test]
    fn test_auto_play_reaches_a_winner() {
        let battle = standoff().with_ai_sides(vec![Side::Player, Side::Opponent]);
        let mut world = World::new();
        insert_battle(&mut world, battle, 0.1, EventLogger::null());
        let mut schedule = build_schedule();

        for _ in 0..2_000 {
            schedule.run(&mut world);
            if world.resource::<Battle>().winner().is_some() {
                break;
            }
        }
        // The player shoots first, so lands the third hit first
        assert_eq!(world.resource::<Battle>().winner(), Some(Side::Player));
    }
}
