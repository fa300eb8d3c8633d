//! Headless Tactics Simulator
//!
//! Loads a scenario and lets the AI play both sides until one is wiped out or
//! a turn/tick limit is reached. Events are written as JSON lines.

use bevy_ecs::prelude::*;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use tactics_core::config::DEFAULT_TUNING_PATH;
use tactics_core::events::EventLogger;
use tactics_core::systems::{build_schedule, insert_battle, BattleClock, TickEvents};
use tactics_core::{Battle, Scenario, Tuning};
use tactics_events::{GameEvent, Side};

/// Command line arguments for the simulator
#[derive(Parser, Debug)]
#[command(name = "tactics_sim")]
#[command(about = "Auto-plays a hex-grid tactics battle")]
struct Args {
    /// Scenario file to load
    #[arg(long, default_value = "scenarios/skirmish.toml")]
    scenario: PathBuf,

    /// Tuning file; compiled-in defaults are used if it cannot be read
    #[arg(long, default_value = DEFAULT_TUNING_PATH)]
    tuning: PathBuf,

    /// Write the event stream here as JSONL
    #[arg(long)]
    events_out: Option<PathBuf>,

    /// Simulated milliseconds per frame
    #[arg(long, default_value_t = 50)]
    frame_ms: u64,

    /// Stop after this many turns
    #[arg(long, default_value_t = 40)]
    max_turns: u32,

    /// Hard cap on frames
    #[arg(long, default_value_t = 100_000)]
    max_ticks: u64,

    /// Log action-level detail
    #[arg(long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    let tuning = Tuning::load_or_default(&args.tuning);
    let scenario = match Scenario::load(&args.scenario) {
        Ok(scenario) => scenario,
        Err(e) => {
            tracing::error!("Could not load scenario {}: {}", args.scenario.display(), e);
            return ExitCode::FAILURE;
        }
    };
    let battle = match Battle::from_scenario(&scenario, &tuning) {
        Ok(battle) => battle.with_ai_sides(vec![Side::Player, Side::Opponent]),
        Err(e) => {
            tracing::error!("Could not set up {}: {}", scenario.name, e);
            return ExitCode::FAILURE;
        }
    };
    let logger = match &args.events_out {
        Some(path) => match EventLogger::new(path) {
            Ok(logger) => logger,
            Err(e) => {
                tracing::error!("Could not open {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => EventLogger::null(),
    };

    println!("Hex Tactics Simulator");
    println!("=====================");
    println!("Scenario: {}", scenario.name);
    println!("Units: {}", scenario.units.len());
    println!("Frame: {} ms", args.frame_ms);
    println!();

    let mut world = World::new();
    insert_battle(&mut world, battle, args.frame_ms as f32 / 1000.0, logger);
    let mut schedule = build_schedule();

    for _ in 0..args.max_ticks {
        schedule.run(&mut world);

        for event in &world.resource::<TickEvents>().events {
            match &event.payload {
                GameEvent::TurnChanged { stamp } => println!("--- {} ---", stamp),
                GameEvent::UnitDied { unit, side, cell } => {
                    println!("[{}] {} ({}) died at {}", event.timestamp, unit, side, cell)
                }
                _ => {}
            }
        }

        let battle = world.resource::<Battle>();
        if battle.winner().is_some() && battle.is_idle() {
            break;
        }
        if battle.turns().turn() > args.max_turns {
            tracing::warn!("Turn limit {} reached", args.max_turns);
            break;
        }
    }

    if let Err(e) = world.resource_mut::<EventLogger>().flush() {
        tracing::warn!("Could not flush event log: {}", e);
    }

    let battle = world.resource::<Battle>();
    let clock = world.resource::<BattleClock>();
    println!();
    println!("Combat log:");
    for line in battle.log().lines() {
        println!("  {}", line);
    }
    println!();
    match battle.winner() {
        Some(side) => println!("{} wins on turn {}.", side, battle.turns().turn()),
        None => println!("No winner after {} turns.", battle.turns().turn()),
    }
    let logger = world.resource::<EventLogger>();
    println!(
        "Simulated {:.1} s over {} frames; {} events logged.",
        clock.elapsed,
        clock.ticks,
        logger.event_count()
    );
    for (name, count) in logger.tally() {
        println!("  {:<24} {}", name, count);
    }
    if let Some(path) = logger.path() {
        println!("Event log written to {}", path.display());
    }
    ExitCode::SUCCESS
}
