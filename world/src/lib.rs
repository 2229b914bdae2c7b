#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative defense state management for Tile Siege.
//!
//! The [`DefenseCoordinator`] exclusively owns the grid, enemies, towers,
//! resources and the objective. Systems borrow the grid during a tick and hand
//! their results back; only the coordinator mutates it.

mod objective;
mod setup;
mod towers;

use std::time::Duration;

use glam::Vec2;
use tile_siege_core::{
    config::DefenseConfig,
    diagnostics::{Diagnostic, DiagnosticsHandle},
    grid::{Grid, TileKind},
    CellCoord, Command, ConfigurationError, EnemyId, EnemyKind, Event, PlacementError, TowerId,
    WavePlan, WELCOME_BANNER,
};
use tile_siege_system_builder::{PlacementPreview, PlacementValidator};
use tile_siege_system_movement::{Agent, AgentOutcome, Movement, MovementReport};
use tile_siege_system_pathfinding::Pathfinder;
use tile_siege_system_spawning::{SpawnOrder, WaveSpawner};
use tile_siege_system_tower_combat::{Shot, TargetCandidate, Tower, TowerCombat};

pub use objective::Objective;

use setup::Setup;
use towers::TowerRegistry;

/// Authoritative owner of a defense session.
#[derive(Debug)]
pub struct DefenseCoordinator {
    banner: &'static str,
    config: DefenseConfig,
    diagnostics: DiagnosticsHandle,
    pathfinder: Pathfinder,
    movement: Movement,
    combat: TowerCombat,
    spawner: WaveSpawner,
    setup: Option<Setup>,
    agents: Vec<Agent>,
    towers: TowerRegistry,
    objective: Objective,
    resources: u32,
    next_enemy_id: u32,
    events: Vec<Event>,
    spawn_orders: Vec<SpawnOrder>,
    movement_reports: Vec<MovementReport>,
    shots: Vec<Shot>,
}

impl DefenseCoordinator {
    /// Creates an unconfigured coordinator.
    #[must_use]
    pub fn new(config: DefenseConfig, diagnostics: DiagnosticsHandle) -> Self {
        Self {
            banner: WELCOME_BANNER,
            pathfinder: Pathfinder::new(diagnostics.clone()),
            movement: Movement::new(config.speed_multiplier),
            combat: TowerCombat::new(),
            spawner: WaveSpawner::new(config.spawn_seed),
            setup: None,
            agents: Vec::new(),
            towers: TowerRegistry::new(),
            objective: Objective::new(config.objective_health),
            resources: config.starting_resources,
            next_enemy_id: 0,
            events: Vec::new(),
            spawn_orders: Vec::new(),
            movement_reports: Vec::new(),
            shots: Vec::new(),
            diagnostics,
            config,
        }
    }

    /// Validates and adopts a playing field, resetting the session.
    ///
    /// The grid is copied and the goal tile becomes the core. On failure the
    /// coordinator is left unconfigured and an error diagnostic is reported.
    pub fn initialize(
        &mut self,
        grid: &Grid,
        spawns: &[CellCoord],
        goal: Option<CellCoord>,
    ) -> Result<(), ConfigurationError> {
        self.reset();
        match Setup::new(grid, spawns, goal) {
            Ok(setup) => {
                self.setup = Some(setup);
                Ok(())
            }
            Err(error) => {
                self.diagnostics
                    .report(Diagnostic::InvalidGridConfiguration(error.clone()));
                Err(error)
            }
        }
    }

    /// Attempts to build an obstacle at the pixel position and reports success.
    pub fn place_obstacle(&mut self, position: Vec2) -> bool {
        self.try_place_obstacle(position).is_ok()
    }

    /// Attempts to build an obstacle at the pixel position.
    ///
    /// Rejections leave everything but the event log untouched.
    pub fn try_place_obstacle(&mut self, position: Vec2) -> Result<TowerId, PlacementError> {
        let cell = self
            .setup
            .as_ref()
            .and_then(|setup| setup.grid.cell_at(position));
        match self.build(position) {
            Ok((tower, cell)) => {
                let cost = self.config.tower.cost;
                let enemies = Movement::invalidate_paths(&mut self.agents);
                self.events.push(Event::ObstaclePlaced { tower, cell, cost });
                self.events.push(Event::PathsInvalidated { enemies });
                Ok(tower)
            }
            Err(reason) => {
                self.events.push(Event::PlacementRejected { cell, reason });
                Err(reason)
            }
        }
    }

    fn build(&mut self, position: Vec2) -> Result<(TowerId, CellCoord), PlacementError> {
        let Some(setup) = self.setup.as_mut() else {
            self.diagnostics.report(Diagnostic::NotConfigured {
                operation: "place_obstacle",
            });
            return Err(PlacementError::NotConfigured);
        };
        let cell = setup
            .grid
            .cell_at(position)
            .ok_or(PlacementError::InvalidCoordinate)?;

        if self
            .agents
            .iter()
            .any(|agent| agent.is_active() && agent.cell(&setup.grid) == Some(cell))
        {
            return Err(PlacementError::OccupiedByEnemy);
        }

        let cost = self.config.tower.cost;
        if self.resources < cost {
            return Err(PlacementError::InsufficientResources {
                required: cost,
                available: self.resources,
            });
        }

        let Setup { grid, spawns, goal } = setup;
        let _ = PlacementValidator::new(&self.pathfinder, spawns, *goal).check(grid, cell)?;

        let _ = grid.set(cell, TileKind::OccupiedTurretSlot);
        self.resources -= cost;

        let id = self.towers.allocate();
        self.towers.insert(Tower::new(
            id,
            cell,
            grid.cell_center(cell),
            self.config.tower,
            grid.tile_size(),
        ));
        Ok((id, cell))
    }

    /// Describes what a placement at the pixel position would do without performing it.
    ///
    /// Returns `None` when the coordinator is unconfigured or the position lies
    /// off the grid.
    pub fn preview_placement(&mut self, position: Vec2) -> Option<PlacementPreview> {
        let setup = self.setup.as_mut()?;
        let cell = setup.grid.cell_at(position)?;
        let cost = self.config.tower.cost;

        let occupied = self
            .agents
            .iter()
            .any(|agent| agent.is_active() && agent.cell(&setup.grid) == Some(cell));
        let Setup { grid, spawns, goal } = setup;
        let placeable = !occupied
            && self.resources >= cost
            && PlacementValidator::new(&self.pathfinder, spawns, *goal).can_place(grid, cell);

        Some(PlacementPreview::new(
            cell,
            grid.cell_center(cell),
            cost,
            placeable,
        ))
    }

    /// Begins timed spawning of a wave.
    ///
    /// Rejected while unconfigured, after the objective fell, or while the
    /// previous wave still has enemies to spawn or on the field.
    pub fn start_wave(
        &mut self,
        wave: u32,
        count: u32,
        spawn_interval: Duration,
        kinds: Vec<EnemyKind>,
    ) -> bool {
        self.start_wave_plan(WavePlan::new(wave, count, spawn_interval, kinds))
    }

    fn start_wave_plan(&mut self, plan: WavePlan) -> bool {
        if self.setup.is_none() {
            self.diagnostics.report(Diagnostic::NotConfigured {
                operation: "start_wave",
            });
            return false;
        }
        if self.objective.is_destroyed() || self.spawner.is_active() {
            return false;
        }

        self.events.push(Event::WaveStarted {
            wave: plan.wave,
            count: plan.count,
        });
        self.spawner.start(plan);
        true
    }

    /// Advances the session by one tick.
    pub fn update(&mut self, dt: Duration) {
        if self.setup.is_none() || self.objective.is_destroyed() {
            return;
        }

        self.spawn_due_enemies(dt);
        self.advance_agents();
        if self.objective.is_destroyed() {
            return;
        }
        self.resolve_combat(dt);
        self.complete_wave();
    }

    /// Removes and returns every event buffered since the last drain.
    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    fn reset(&mut self) {
        self.setup = None;
        self.agents.clear();
        self.towers = TowerRegistry::new();
        self.objective = Objective::new(self.config.objective_health);
        self.resources = self.config.starting_resources;
        self.next_enemy_id = 0;
        self.spawner = WaveSpawner::new(self.config.spawn_seed);
        self.events.clear();
    }

    fn spawn_due_enemies(&mut self, dt: Duration) {
        let Some(setup) = self.setup.as_ref() else {
            return;
        };
        self.spawn_orders.clear();
        self.spawner.advance(dt, &setup.spawns, &mut self.spawn_orders);

        for order in &self.spawn_orders {
            let enemy = EnemyId::new(self.next_enemy_id);
            self.next_enemy_id = self.next_enemy_id.saturating_add(1);
            self.agents.push(Agent::spawn(
                enemy,
                order.kind,
                self.config.enemies.stats(order.kind),
                order.spawn,
                &setup.grid,
            ));
            self.events.push(Event::EnemySpawned {
                enemy,
                kind: order.kind,
                cell: order.spawn,
            });
        }
    }

    fn advance_agents(&mut self) {
        let Some(setup) = self.setup.as_ref() else {
            return;
        };
        self.movement_reports.clear();
        self.movement.handle(
            &mut self.agents,
            &setup.grid,
            &self.pathfinder,
            setup.goal,
            &*self.diagnostics,
            &mut self.movement_reports,
        );

        for report in &self.movement_reports {
            match report.outcome {
                AgentOutcome::Stranded => {
                    self.events.push(Event::EnemyStranded {
                        enemy: report.enemy,
                    });
                }
                AgentOutcome::ReachedGoal { damage } => {
                    self.events.push(Event::EnemyReachedGoal {
                        enemy: report.enemy,
                        damage,
                    });
                    if let Some(agent) = self
                        .agents
                        .iter_mut()
                        .find(|agent| agent.id() == report.enemy)
                    {
                        agent.retire();
                    }
                    if self.objective.notify(damage) {
                        self.events.push(Event::ObjectiveDestroyed);
                    }
                }
                AgentOutcome::Moved | AgentOutcome::Idle | AgentOutcome::Inactive => {}
            }
        }

        self.agents.retain(Agent::is_active);
    }

    fn resolve_combat(&mut self, dt: Duration) {
        let candidates: Vec<TargetCandidate> = self
            .agents
            .iter()
            .filter(|agent| agent.is_active())
            .map(|agent| TargetCandidate {
                enemy: agent.id(),
                position: agent.position(),
                health: agent.health(),
            })
            .collect();

        self.shots.clear();
        self.combat
            .handle(dt, self.towers.towers_mut(), &candidates, &mut self.shots);

        for shot in &self.shots {
            self.events.push(Event::TowerFired {
                tower: shot.tower,
                enemy: shot.enemy,
            });
            let Some(agent) = self
                .agents
                .iter_mut()
                .find(|agent| agent.id() == shot.enemy)
            else {
                continue;
            };
            if agent.take_damage(shot.damage) {
                let reward = agent.reward();
                self.resources = self.resources.saturating_add(reward);
                self.events.push(Event::EnemyDestroyed {
                    enemy: shot.enemy,
                    reward,
                });
            }
        }

        self.agents.retain(Agent::is_active);
    }

    fn complete_wave(&mut self) {
        let Some(progress) = self.spawner.progress() else {
            return;
        };
        if progress.all_spawned() && self.agents.is_empty() {
            let _ = self.spawner.finish();
            self.events.push(Event::WaveCompleted {
                wave: progress.wave,
            });
        }
    }
}

/// Applies the provided command to the coordinator and collects the resulting events.
pub fn apply(coordinator: &mut DefenseCoordinator, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::PlaceObstacle { position } => {
            let _ = coordinator.place_obstacle(position);
        }
        Command::StartWave { plan } => {
            let _ = coordinator.start_wave_plan(plan);
        }
        Command::Tick { dt } => coordinator.update(dt),
    }
    out_events.append(&mut coordinator.events);
}

/// Query functions that provide read-only access to the coordinator state.
pub mod query {
    use super::{DefenseCoordinator, Movement, Objective};
    use tile_siege_core::{grid::Grid, AgentView, CellCoord, TowerView};
    use tile_siege_system_spawning::WaveProgress;

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(coordinator: &DefenseCoordinator) -> &'static str {
        coordinator.banner
    }

    /// Reports whether the coordinator holds a valid configuration.
    #[must_use]
    pub fn is_configured(coordinator: &DefenseCoordinator) -> bool {
        coordinator.setup.is_some()
    }

    /// Provides read-only access to the grid, if configured.
    #[must_use]
    pub fn grid(coordinator: &DefenseCoordinator) -> Option<&Grid> {
        coordinator.setup.as_ref().map(|setup| &setup.grid)
    }

    /// Spawn points of the configured field.
    #[must_use]
    pub fn spawns(coordinator: &DefenseCoordinator) -> &[CellCoord] {
        coordinator
            .setup
            .as_ref()
            .map_or(&[], |setup| setup.spawns.as_slice())
    }

    /// Goal tile of the configured field.
    #[must_use]
    pub fn goal(coordinator: &DefenseCoordinator) -> Option<CellCoord> {
        coordinator.setup.as_ref().map(|setup| setup.goal)
    }

    /// Resources available for placements.
    #[must_use]
    pub fn resources(coordinator: &DefenseCoordinator) -> u32 {
        coordinator.resources
    }

    /// Defended objective.
    #[must_use]
    pub fn objective(coordinator: &DefenseCoordinator) -> &Objective {
        &coordinator.objective
    }

    /// Captures a read-only view of the live enemies.
    #[must_use]
    pub fn agent_view(coordinator: &DefenseCoordinator) -> AgentView {
        match coordinator.setup.as_ref() {
            Some(setup) => Movement::view(&coordinator.agents, &setup.grid),
            None => AgentView::default(),
        }
    }

    /// Captures a read-only view of the placed towers.
    #[must_use]
    pub fn tower_view(coordinator: &DefenseCoordinator) -> TowerView {
        coordinator.towers.view()
    }

    /// Progress of the running wave, if any.
    #[must_use]
    pub fn wave_progress(coordinator: &DefenseCoordinator) -> Option<WaveProgress> {
        coordinator.spawner.progress()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tile_siege_core::diagnostics::{RecordingDiagnostics, TracingDiagnostics};

    fn configured() -> DefenseCoordinator {
        let mut coordinator =
            DefenseCoordinator::new(DefenseConfig::default(), TracingDiagnostics::handle());
        coordinator
            .initialize(
                &Grid::new(4, 4, 32.0),
                &[CellCoord::new(0, 0)],
                Some(CellCoord::new(3, 3)),
            )
            .expect("valid setup");
        coordinator
    }

    #[test]
    fn unconfigured_coordinator_ignores_operations() {
        let recorder = RecordingDiagnostics::new();
        let mut coordinator = DefenseCoordinator::new(DefenseConfig::default(), recorder.clone());

        assert_eq!(
            coordinator.try_place_obstacle(Vec2::new(10.0, 10.0)),
            Err(PlacementError::NotConfigured)
        );
        assert!(!coordinator.start_wave(1, 3, Duration::from_millis(10), Vec::new()));
        coordinator.update(Duration::from_secs(1));

        assert_eq!(
            recorder.take(),
            vec![
                Diagnostic::NotConfigured {
                    operation: "place_obstacle"
                },
                Diagnostic::NotConfigured {
                    operation: "start_wave"
                },
            ]
        );
        assert!(coordinator.preview_placement(Vec2::ZERO).is_none());
    }

    #[test]
    fn apply_forwards_buffered_events() {
        let mut coordinator = configured();
        let mut events = Vec::new();

        apply(
            &mut coordinator,
            Command::PlaceObstacle {
                position: Vec2::new(48.0, 16.0),
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![
                Event::ObstaclePlaced {
                    tower: TowerId::new(0),
                    cell: CellCoord::new(0, 1),
                    cost: 25,
                },
                Event::PathsInvalidated { enemies: 0 },
            ]
        );
        assert!(coordinator.drain_events().is_empty());
    }

    #[test]
    fn preview_reports_cost_and_validity_without_building() {
        let mut coordinator = configured();

        let preview = coordinator
            .preview_placement(Vec2::new(50.0, 50.0))
            .expect("on grid");

        assert_eq!(preview.cell, CellCoord::new(1, 1));
        assert_eq!(preview.position, Vec2::new(48.0, 48.0));
        assert_eq!(preview.cost, 25);
        assert!(preview.placeable);
        assert!(query::tower_view(&coordinator).is_empty());
        assert_eq!(
            query::grid(&coordinator).and_then(|grid| grid.tile(CellCoord::new(1, 1))),
            Some(TileKind::Empty)
        );
    }
}
