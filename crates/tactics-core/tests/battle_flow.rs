//! Battle flow integration tests
//!
//! Exercises the point ledger, turn refresh, damage and death, area damage,
//! the player controller and the opponent AI through the public `Battle` API.

mod common;

use common::{battle, settle, FRAME};
use glam::Vec3;
use tactics_core::{ActionError, Battle, Completion};
use tactics_events::{ActionKind, EventType, GameEvent, GridCell, Side, TurnStamp};

const DUEL: &str = r#"
[[units]]
name = "Ada"
side = "player"
cell = { col = 1, row = 1, floor = 0 }
actions = ["move", "shoot"]

[[units]]
name = "Grunt"
side = "opponent"
cell = { col = 5, row = 1, floor = 0 }
actions = ["shoot"]
"#;

const GRUNT_CELL: GridCell = GridCell {
    col: 5,
    row: 1,
    floor: 0,
};

fn shoot_grunt(battle: &mut Battle) {
    let ada = battle.units().ids_of(Side::Player)[0];
    battle
        .start_action(ada, ActionKind::RangedAttack, GRUNT_CELL, Completion::None)
        .unwrap();
    settle(battle);
}

/// Two one-point actions drain the ledger; the third is refused.
#[test]
fn test_two_actions_then_third_denied() {
    let mut battle = battle(8, 8, DUEL);
    let ada = battle.units().ids_of(Side::Player)[0];

    shoot_grunt(&mut battle);
    shoot_grunt(&mut battle);

    assert_eq!(
        battle.start_action(ada, ActionKind::RangedAttack, GRUNT_CELL, Completion::None),
        Err(ActionError::InsufficientPoints {
            needed: 1,
            available: 0
        })
    );
    assert!(battle.is_idle());
}

/// Points come back when the side's turn comes around again.
#[test]
fn test_refresh_after_advancing_twice() {
    let mut battle = battle(8, 8, DUEL);
    let ada = battle.units().ids_of(Side::Player)[0];

    battle
        .start_action(ada, ActionKind::Move, GridCell::new(3, 1, 0), Completion::None)
        .unwrap();
    settle(&mut battle);
    shoot_grunt(&mut battle);

    let spent = battle.unit(ada).unwrap().ledger;
    assert_eq!((spent.action_points(), spent.move_points()), (1, 2));

    battle.drain_events();
    assert_eq!(battle.advance_turn(), TurnStamp::new(2, Side::Opponent));
    assert_eq!(battle.advance_turn(), TurnStamp::new(3, Side::Player));

    let refreshed = battle.unit(ada).unwrap().ledger;
    assert_eq!((refreshed.action_points(), refreshed.move_points()), (2, 4));

    let events = battle.drain_events();
    let turn_changes = events
        .iter()
        .filter(|e| e.event_type() == EventType::TurnChanged)
        .count();
    assert_eq!(turn_changes, 2);
    assert!(events.iter().any(|e| matches!(
        e.payload,
        GameEvent::ActionPointsChanged { unit, action_points: 2, move_points: 4 } if unit == ada
    )));
}

/// 100 HP against 40-damage shots: 0.6, then 0.2, then dead exactly once.
#[test]
fn test_three_shots_kill_with_one_death_event() {
    let mut battle = battle(8, 8, DUEL);
    let grunt = battle.units().ids_of(Side::Opponent)[0];

    shoot_grunt(&mut battle);
    let health = battle.unit_health_normalized(grunt).unwrap();
    assert!((health - 0.6).abs() < 1e-6);

    shoot_grunt(&mut battle);
    battle.advance_turn();
    battle.advance_turn();
    shoot_grunt(&mut battle);

    assert!(battle.unit(grunt).is_none());
    assert!(battle.unit_health_normalized(grunt).is_none());
    assert!(!battle.grid().has_unit(GRUNT_CELL));
    assert_eq!(battle.winner(), Some(Side::Player));

    let deaths: Vec<_> = battle
        .drain_events()
        .into_iter()
        .filter(|e| e.event_type() == EventType::UnitDied)
        .collect();
    assert_eq!(deaths.len(), 1);
    assert_eq!(deaths[0].payload.primary_unit(), Some(grunt));
    assert!(battle
        .log()
        .lines()
        .iter()
        .any(|l| l.contains("Grunt has fallen")));
}

/// A grenade thrown through the player controller hits everything within one
/// world unit of the impact, boundary included.
#[test]
fn test_grenade_through_player_controller() {
    let mut battle = battle(
        10,
        10,
        r#"
[[units]]
name = "Brand"
side = "player"
cell = { col = 0, row = 4, floor = 0 }
actions = ["move", "grenade"]

[[units]]
name = "Centre"
side = "opponent"
cell = { col = 4, row = 4, floor = 0 }
actions = []

[[units]]
name = "Edge"
side = "opponent"
cell = { col = 5, row = 4, floor = 0 }
actions = []

[[units]]
name = "Diagonal"
side = "opponent"
cell = { col = 4, row = 5, floor = 0 }
actions = []

[[units]]
name = "Outside"
side = "opponent"
cell = { col = 6, row = 4, floor = 0 }
actions = []
"#,
    );
    let brand = battle.units().ids_of(Side::Player)[0];
    let opponents = battle.units().ids_of(Side::Opponent);
    let impact = GridCell::new(4, 4, 0);

    battle.select_unit(brand).unwrap();
    assert_eq!(battle.player().selected_action(), Some(ActionKind::Move));
    battle.select_action(ActionKind::AreaAttack).unwrap();
    assert!(battle.selected_valid_targets().contains(&impact));

    battle.try_perform(impact).unwrap();
    assert!(battle.player().is_busy());
    assert_eq!(battle.try_perform(impact), Err(ActionError::Busy(brand)));
    settle(&mut battle);
    assert!(!battle.player().is_busy());

    let health: Vec<i32> = opponents
        .iter()
        .map(|&id| battle.unit(id).unwrap().health.current())
        .collect();
    assert_eq!(health, vec![70, 70, 70, 100]);

    let events = battle.drain_events();
    let busy: Vec<bool> = events
        .iter()
        .filter_map(|e| match e.payload {
            GameEvent::BusyChanged { busy } => Some(busy),
            _ => None,
        })
        .collect();
    assert_eq!(busy, vec![true, false]);
    assert!(events.iter().any(|e| matches!(
        e.payload,
        GameEvent::GrenadeExploded { units_hit: 3, .. }
    )));
}

#[test]
fn test_pick_by_world_point() {
    let mut battle = battle(8, 8, DUEL);
    let ada = battle.units().ids_of(Side::Player)[0];
    battle.select_unit(ada).unwrap();

    // Slightly off the centre of (3, 2)
    let target = GridCell::new(3, 2, 0);
    let point = battle.layout().world_position(target) + Vec3::new(0.2, 0.0, -0.1);
    battle.try_perform_at_point(point).unwrap();
    settle(&mut battle);

    assert_eq!(battle.unit(ada).unwrap().cell, target);
    assert_eq!(battle.grid().unit_at(target), Some(ada));
}

#[test]
fn test_selecting_opponent_unit_is_refused() {
    let mut battle = battle(8, 8, DUEL);
    let grunt = battle.units().ids_of(Side::Opponent)[0];
    assert!(matches!(
        battle.select_unit(grunt),
        Err(ActionError::NotYourTurn { .. })
    ));
    assert_eq!(
        battle.try_perform(GridCell::new(2, 2, 0)),
        Err(ActionError::NothingSelected)
    );
}

/// The opponent AI spends both points, then hands the turn back.
#[test]
fn test_ai_chains_actions_then_ends_turn() {
    let mut battle = battle(
        8,
        8,
        r#"
[[units]]
name = "Ada"
side = "player"
cell = { col = 1, row = 1, floor = 0 }
health = 200
actions = ["move", "shoot"]

[[units]]
name = "Grunt"
side = "opponent"
cell = { col = 5, row = 1, floor = 0 }
actions = ["shoot"]
"#,
    );
    let ada = battle.units().ids_of(Side::Player)[0];
    let grunt = battle.units().ids_of(Side::Opponent)[0];
    assert_eq!(battle.end_turn(), Some(TurnStamp::new(2, Side::Opponent)));
    assert_eq!(battle.end_turn(), None);

    let mut events = Vec::new();
    for _ in 0..2_000 {
        battle.tick(FRAME);
        events.extend(battle.drain_events());
        if battle.turns().is_active(Side::Player) {
            break;
        }
    }

    assert_eq!(battle.turns().stamp(), TurnStamp::new(3, Side::Player));
    let grunt_actions = events
        .iter()
        .filter(|e| matches!(e.payload, GameEvent::ActionStarted { unit, .. } if unit == grunt))
        .count();
    assert_eq!(grunt_actions, 2);
    let health = battle.unit_health_normalized(ada).unwrap();
    assert!((health - 0.6).abs() < 1e-6);
}

#[test]
fn test_ai_waits_initial_delay() {
    let mut battle = battle(8, 8, DUEL);
    battle.end_turn();

    // 1.5 s into the opponent's turn
    for _ in 0..30 {
        battle.tick(FRAME);
    }
    assert!(battle.is_idle());

    for _ in 0..20 {
        battle.tick(FRAME);
    }
    assert!(!battle.is_idle());
}
