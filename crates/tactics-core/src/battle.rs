//! Battle
//!
//! Composition root. Builds every service from a scenario and tuning, then
//! routes requests from the player and the AI through the ledger and the
//! action runner. All mutation happens inside `tick` or a request call.

use bevy_ecs::prelude::*;
use glam::Vec3;

use tactics_events::{ActionKind, Event, GameEvent, GridCell, Side, TurnStamp, UnitId};

use crate::actions::{
    ActionContext, ActionError, ActionRunner, ActionSpec, ActiveAction, Completion, TickContext,
};
use crate::components::{Health, Ledger, Unit, UnitRegistry};
use crate::config::Tuning;
use crate::events::{CombatLog, EventQueue};
use crate::grid::{GridStore, HexLayout, Path, Pathfinder, SightLine};
use crate::setup::{Scenario, SetupError, UnitSpawn};
use crate::systems::ai::{best_candidate, AiController};
use crate::systems::player::PlayerController;
use crate::systems::turn::TurnScheduler;

/// Full state of one battle.
#[derive(Resource, Debug)]
pub struct Battle {
    name: String,
    tuning: Tuning,
    layout: HexLayout,
    grid: GridStore,
    pathfinder: Pathfinder,
    sight: SightLine,
    units: UnitRegistry,
    runner: ActionRunner,
    turns: TurnScheduler,
    ai: AiController,
    player: PlayerController,
    events: EventQueue,
    log: CombatLog,
}

impl Battle {
    /// Builds a battle with the opponent under AI control.
    pub fn from_scenario(scenario: &Scenario, tuning: &Tuning) -> Result<Self, SetupError> {
        scenario.validate()?;

        let layout = tuning.grid.layout();
        let grid = GridStore::new(scenario.width, scenario.height, scenario.floors);
        let pathfinder = Pathfinder::new(
            scenario.width,
            scenario.height,
            scenario.floors,
            layout,
            scenario,
            scenario.links().to_vec(),
        )
        .with_rule(tuning.pathfinding.acceptance);
        let sight = SightLine::from_probe(
            layout,
            scenario,
            grid.cells(),
            tuning.sight.obstacle_height,
            tuning.sight.sample_step,
        );

        let mut battle = Self {
            name: scenario.name.clone(),
            tuning: tuning.clone(),
            layout,
            grid,
            pathfinder,
            sight,
            units: UnitRegistry::new(),
            runner: ActionRunner::new(),
            turns: TurnScheduler::new(),
            ai: AiController::new(vec![Side::Opponent], &tuning.ai),
            player: PlayerController::new(Side::Player),
            events: EventQueue::new(),
            log: CombatLog::new(),
        };
        for spawn in &scenario.units {
            battle.spawn_unit(spawn)?;
        }
        battle.ai.on_turn_changed(battle.turns.active());

        tracing::info!(
            "Battle '{}' ready: {}x{}x{} grid, {} units, {} obstacles",
            battle.name,
            scenario.width,
            scenario.height,
            scenario.floors,
            battle.units.len(),
            battle.sight.obstacle_count()
        );
        Ok(battle)
    }

    /// Replaces the set of sides driven by the AI.
    pub fn with_ai_sides(mut self, sides: Vec<Side>) -> Self {
        self.ai = AiController::new(sides, &self.tuning.ai);
        self.ai.on_turn_changed(self.turns.active());
        self
    }

    pub fn spawn_unit(&mut self, spawn: &UnitSpawn) -> Result<UnitId, SetupError> {
        let cell = spawn.cell;
        if !self.grid.is_in_bounds(cell) {
            return Err(SetupError::OutOfBounds {
                what: format!("unit {}", spawn.name),
                cell,
            });
        }
        if !self.pathfinder.is_walkable(cell) {
            return Err(SetupError::NotWalkable {
                unit: spawn.name.clone(),
                cell,
            });
        }
        if self.grid.has_unit(cell) {
            return Err(SetupError::DuplicateSpawn(cell));
        }
        if spawn.health <= 0 {
            return Err(SetupError::InvalidHealth {
                unit: spawn.name.clone(),
            });
        }

        let actions = spawn
            .action_kinds()?
            .into_iter()
            .map(|kind| ActionSpec::from_tuning(kind, &self.tuning))
            .collect();
        let id = self.units.allocate_id();
        self.units.insert(Unit {
            id,
            name: spawn.name.clone(),
            side: spawn.side,
            cell,
            position: self.layout.world_position(cell),
            facing: Vec3::Z,
            health: Health::new(spawn.health),
            ledger: Ledger::new(
                self.tuning.economy.action_points,
                self.tuning.economy.move_points,
            ),
            actions,
        });
        self.grid.add_unit(cell, id);
        self.events.publish(GameEvent::UnitSpawned {
            unit: id,
            side: spawn.side,
            cell,
        });
        tracing::debug!("Spawned {} ({}) for {} at {}", spawn.name, id, spawn.side, cell);
        Ok(id)
    }

    /// Advances running actions, routes their completions, then lets the AI act.
    pub fn tick(&mut self, dt: f32) {
        let completions = {
            let mut tcx = TickContext {
                layout: &self.layout,
                grid: &mut self.grid,
                units: &mut self.units,
                events: &mut self.events,
                log: &mut self.log,
            };
            self.runner.tick(dt, &mut tcx)
        };
        for (unit, completion) in completions {
            self.complete(unit, completion);
        }

        if let Some(selected) = self.player.selected_unit() {
            if !self.units.contains(selected) {
                self.player.forget(selected);
            }
        }

        if self.winner().is_none() && self.ai.tick(dt, self.turns.active()) {
            self.take_ai_action();
        }
    }

    fn complete(&mut self, unit: UnitId, completion: Completion) {
        match completion {
            Completion::None => {}
            Completion::ResumeAi => self.ai.on_action_complete(),
            Completion::ReleasePlayer => self.player.set_busy(false, &mut self.events),
        }
        tracing::trace!("Completion {:?} for {}", completion, unit);
    }

    fn take_ai_action(&mut self) {
        let active = self.turns.active();
        for id in self.units.ids_of(active) {
            if self.runner.is_busy(id) {
                continue;
            }
            let candidate = {
                let Some(unit) = self.units.get(id) else {
                    continue;
                };
                let mut ctx = ActionContext {
                    layout: &self.layout,
                    grid: &self.grid,
                    pathfinder: &mut self.pathfinder,
                    sight: &self.sight,
                    units: &self.units,
                };
                best_candidate(&mut ctx, unit)
            };
            let Some(candidate) = candidate else {
                continue;
            };

            match self.start_action(id, candidate.kind, candidate.cell, Completion::ResumeAi) {
                Ok(()) => {
                    tracing::info!(
                        "AI: {} uses {} on {} (score {})",
                        id,
                        candidate.kind,
                        candidate.cell,
                        candidate.score
                    );
                    self.ai.mark_busy();
                    return;
                }
                Err(e) => tracing::debug!("AI: {} could not act: {}", id, e),
            }
        }

        tracing::info!("AI: no {} unit can act, ending turn", active);
        self.advance_turn();
    }

    /// Validates, pays for and starts an action.
    ///
    /// Denials leave the battle untouched.
    pub fn start_action(
        &mut self,
        unit_id: UnitId,
        kind: ActionKind,
        target: GridCell,
        completion: Completion,
    ) -> Result<(), ActionError> {
        let (spec, active) = {
            let unit = self.units.get(unit_id).ok_or(ActionError::UnknownUnit(unit_id))?;
            if !self.turns.is_active(unit.side) {
                return Err(ActionError::NotYourTurn {
                    unit: unit_id,
                    side: unit.side,
                });
            }
            if self.runner.is_busy(unit_id) {
                return Err(ActionError::Busy(unit_id));
            }
            let spec = unit
                .action(kind)
                .ok_or(ActionError::NotAvailable {
                    unit: unit_id,
                    action: kind,
                })?
                .clone();
            if !unit.ledger.can_afford(&spec) {
                return Err(ActionError::InsufficientPoints {
                    needed: spec.point_cost(),
                    available: unit.ledger.action_points(),
                });
            }

            let mut ctx = ActionContext {
                layout: &self.layout,
                grid: &self.grid,
                pathfinder: &mut self.pathfinder,
                sight: &self.sight,
                units: &self.units,
            };
            if !spec.is_valid_target(&mut ctx, unit, target) {
                return Err(ActionError::InvalidTarget {
                    action: kind,
                    target,
                });
            }
            let active = spec.begin(&mut ctx, unit, target)?;
            (spec, active)
        };

        let unit = self
            .units
            .get_mut(unit_id)
            .ok_or(ActionError::UnknownUnit(unit_id))?;
        unit.ledger.try_spend(&spec)?;
        if let ActiveAction::Move(traversal) = &active {
            unit.ledger.spend_move_points(traversal.steps() as u32)?;
        }
        self.events.publish(GameEvent::ActionPointsChanged {
            unit: unit_id,
            action_points: unit.ledger.action_points(),
            move_points: unit.ledger.move_points(),
        });

        tracing::info!("{} ({}) starts {} at {}", unit.name, unit_id, kind, target);
        self.runner
            .start(unit_id, target, active, completion, &mut self.events)
    }

    /// Hands the turn over and refreshes the newly active side.
    pub fn advance_turn(&mut self) -> TurnStamp {
        let stamp = self.turns.advance();
        self.events.set_stamp(stamp);
        self.events.publish(GameEvent::TurnChanged { stamp });

        for unit in self.units.iter_mut() {
            if unit.side != stamp.active {
                continue;
            }
            unit.ledger.refresh();
            self.events.publish(GameEvent::ActionPointsChanged {
                unit: unit.id,
                action_points: unit.ledger.action_points(),
                move_points: unit.ledger.move_points(),
            });
        }
        self.ai.on_turn_changed(stamp.active);
        stamp
    }

    // Player-facing selection and targeting.

    pub fn select_unit(&mut self, unit_id: UnitId) -> Result<(), ActionError> {
        let unit = self.units.get(unit_id).ok_or(ActionError::UnknownUnit(unit_id))?;
        if unit.side != self.player.side() {
            return Err(ActionError::NotYourTurn {
                unit: unit_id,
                side: unit.side,
            });
        }
        if self.player.is_busy() {
            return Err(ActionError::Busy(unit_id));
        }
        let default_action = unit
            .action(ActionKind::Move)
            .or_else(|| unit.actions.first())
            .map(ActionSpec::kind);
        self.player.select(unit_id, default_action);
        Ok(())
    }

    pub fn select_action(&mut self, kind: ActionKind) -> Result<(), ActionError> {
        let unit_id = self.player.selected_unit().ok_or(ActionError::NothingSelected)?;
        let unit = self.units.get(unit_id).ok_or(ActionError::UnknownUnit(unit_id))?;
        if !unit.has_action(kind) {
            return Err(ActionError::NotAvailable {
                unit: unit_id,
                action: kind,
            });
        }
        self.player.select_action(kind);
        Ok(())
    }

    /// Targets for the selected unit's selected action.
    pub fn selected_valid_targets(&mut self) -> Vec<GridCell> {
        match (self.player.selected_unit(), self.player.selected_action()) {
            (Some(unit), Some(kind)) => self.valid_targets(unit, kind),
            _ => Vec::new(),
        }
    }

    pub fn try_perform(&mut self, target: GridCell) -> Result<(), ActionError> {
        let unit = self.player.selected_unit().ok_or(ActionError::NothingSelected)?;
        let kind = self.player.selected_action().ok_or(ActionError::NothingSelected)?;
        if self.player.is_busy() {
            return Err(ActionError::Busy(unit));
        }
        self.start_action(unit, kind, target, Completion::ReleasePlayer)?;
        self.player.set_busy(true, &mut self.events);
        Ok(())
    }

    /// Resolves a world-space pick to a cell, then performs on it.
    pub fn try_perform_at_point(&mut self, point: Vec3) -> Result<(), ActionError> {
        let cell = self.pick_cell(point);
        self.try_perform(cell)
    }

    /// Cell under a world-space pick for the selected action.
    ///
    /// Unit-targeting actions snap to the unit whose body (ground to shoulder)
    /// passes within half a cell of the point. Other actions, and picks that
    /// miss every body, use the nearest cell.
    pub fn pick_cell(&self, point: Vec3) -> GridCell {
        let targets_units = self
            .player
            .selected_action()
            .is_some_and(ActionKind::targets_units);
        if targets_units {
            let height = self.tuning.sight.shoulder_height;
            let body_distance = |unit: &Unit| {
                let y = point.y.clamp(unit.position.y, unit.position.y + height);
                point.distance(Vec3::new(unit.position.x, y, unit.position.z))
            };
            let hit = self
                .units
                .iter()
                .map(|unit| (unit.cell, body_distance(unit)))
                .filter(|&(_, d)| d <= self.layout.cell_size * 0.5)
                .min_by(|a, b| a.1.total_cmp(&b.1));
            if let Some((cell, _)) = hit {
                return cell;
            }
        }
        self.layout.nearest_cell(point)
    }

    /// Ends the player's turn. `None` when it is not theirs to end or an
    /// action is still playing out.
    pub fn end_turn(&mut self) -> Option<TurnStamp> {
        if !self.turns.is_active(self.player.side()) || self.player.is_busy() {
            return None;
        }
        Some(self.advance_turn())
    }

    // Read-only queries.

    pub fn valid_targets(&mut self, unit_id: UnitId, kind: ActionKind) -> Vec<GridCell> {
        let Some(unit) = self.units.get(unit_id) else {
            return Vec::new();
        };
        let Some(spec) = unit.action(kind) else {
            return Vec::new();
        };
        let mut ctx = ActionContext {
            layout: &self.layout,
            grid: &self.grid,
            pathfinder: &mut self.pathfinder,
            sight: &self.sight,
            units: &self.units,
        };
        spec.valid_targets(&mut ctx, unit)
    }

    pub fn action_name(&self, unit: UnitId, kind: ActionKind) -> Option<&'static str> {
        self.units.get(unit)?.action(kind).map(ActionSpec::name)
    }

    pub fn action_range(&self, unit: UnitId, kind: ActionKind) -> Option<i32> {
        self.units.get(unit)?.action(kind).map(ActionSpec::range)
    }

    pub fn unit_health_normalized(&self, unit: UnitId) -> Option<f32> {
        self.units.get(unit).map(|u| u.health.normalized())
    }

    pub fn unit_position(&self, unit: UnitId) -> Option<Vec3> {
        self.units.get(unit).map(|u| u.position)
    }

    pub fn find_path(&mut self, from: GridCell, to: GridCell) -> Option<Path> {
        self.pathfinder.find_path(from, to, false)
    }

    /// The only side with units left, once the other has none.
    pub fn winner(&self) -> Option<Side> {
        let players = self.units.count_of(Side::Player);
        let opponents = self.units.count_of(Side::Opponent);
        match (players, opponents) {
            (0, n) if n > 0 => Some(Side::Opponent),
            (n, 0) if n > 0 => Some(Side::Player),
            _ => None,
        }
    }

    pub fn drain_events(&mut self) -> Vec<Event> {
        self.events.drain()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn layout(&self) -> &HexLayout {
        &self.layout
    }

    pub fn grid(&self) -> &GridStore {
        &self.grid
    }

    pub fn units(&self) -> &UnitRegistry {
        &self.units
    }

    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.get(id)
    }

    pub fn runner(&self) -> &ActionRunner {
        &self.runner
    }

    pub fn turns(&self) -> &TurnScheduler {
        &self.turns
    }

    pub fn ai(&self) -> &AiController {
        &self.ai
    }

    pub fn player(&self) -> &PlayerController {
        &self.player
    }

    pub fn log(&self) -> &CombatLog {
        &self.log
    }

    pub fn is_idle(&self) -> bool {
        self.runner.is_idle()
    }
}
