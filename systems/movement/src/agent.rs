//! Per-enemy path-following state machine.

use glam::Vec2;
use tile_siege_core::{
    config::EnemyStats,
    diagnostics::{Diagnostic, Diagnostics},
    grid::Grid,
    AgentSnapshot, AgentState, CellCoord, EnemyId, EnemyKind, Health, Path,
};
use tile_siege_system_pathfinding::Pathfinder;

/// Read-only collaborators an agent consults during its update.
#[derive(Clone, Copy, Debug)]
pub struct AgentContext<'a> {
    /// Shared tile grid.
    pub grid: &'a Grid,
    /// Shared pathfinder.
    pub pathfinder: &'a Pathfinder,
    /// Goal tile every agent travels to.
    pub goal: CellCoord,
    /// Factor applied to each agent's per-tick speed.
    pub speed_multiplier: f32,
    /// Sink for recoverable conditions.
    pub diagnostics: &'a dyn Diagnostics,
}

/// Result of a single agent update.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AgentOutcome {
    /// The agent advanced along its route.
    Moved,
    /// The agent found no route on this tick and stopped.
    Stranded,
    /// The agent is waiting for the grid to change.
    Idle,
    /// The agent arrived at the goal; reported exactly once.
    ReachedGoal {
        /// Damage the agent deals to the objective.
        damage: u32,
    },
    /// The agent already left play.
    Inactive,
}

/// Mobile enemy following a computed route toward the goal.
#[derive(Clone, Debug)]
pub struct Agent {
    id: EnemyId,
    kind: EnemyKind,
    position: Vec2,
    speed: f32,
    health: Health,
    max_health: Health,
    damage: u32,
    reward: u32,
    path: Path,
    waypoint: usize,
    needs_recalculation: bool,
    state: AgentState,
}

impl Agent {
    /// Creates an agent standing on the pixel centre of the spawn tile.
    #[must_use]
    pub fn spawn(
        id: EnemyId,
        kind: EnemyKind,
        stats: EnemyStats,
        spawn: CellCoord,
        grid: &Grid,
    ) -> Self {
        Self {
            id,
            kind,
            position: grid.cell_center(spawn),
            speed: stats.speed.max(0.0),
            health: Health::new(stats.max_health),
            max_health: Health::new(stats.max_health),
            damage: stats.damage,
            reward: stats.reward,
            path: Path::empty(),
            waypoint: 0,
            needs_recalculation: true,
            state: AgentState::Spawning,
        }
    }

    /// Identifier of the agent.
    #[must_use]
    pub const fn id(&self) -> EnemyId {
        self.id
    }

    /// Kind of the agent.
    #[must_use]
    pub const fn kind(&self) -> EnemyKind {
        self.kind
    }

    /// Continuous pixel position.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Remaining health.
    #[must_use]
    pub const fn health(&self) -> Health {
        self.health
    }

    /// Resources awarded when the agent is destroyed by a tower.
    #[must_use]
    pub const fn reward(&self) -> u32 {
        self.reward
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> AgentState {
        self.state
    }

    /// Route currently held by the agent.
    #[must_use]
    pub const fn path(&self) -> &Path {
        &self.path
    }

    /// Index of the waypoint the agent is heading to.
    #[must_use]
    pub const fn waypoint(&self) -> usize {
        self.waypoint
    }

    /// Indicates whether the next update recomputes the route.
    #[must_use]
    pub const fn needs_recalculation(&self) -> bool {
        self.needs_recalculation
    }

    /// Reports whether the agent still takes part in the simulation.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        !matches!(self.state, AgentState::ReachedGoal | AgentState::Destroyed)
    }

    /// Tile beneath the agent, if it lies on the grid.
    #[must_use]
    pub fn cell(&self, grid: &Grid) -> Option<CellCoord> {
        grid.cell_at(self.position)
    }

    /// Flags the route as stale; the search runs on the agent's next update.
    pub fn trigger_path_recalculation(&mut self) {
        if self.is_active() {
            self.needs_recalculation = true;
        }
    }

    /// Applies damage and reports whether this hit destroyed the agent.
    pub fn take_damage(&mut self, amount: u32) -> bool {
        if !self.is_active() {
            return false;
        }
        self.health = self.health.saturating_sub(amount);
        if self.health.is_zero() {
            self.state = AgentState::Destroyed;
            return true;
        }
        false
    }

    /// Marks an agent that reached the goal as removed from play.
    pub fn retire(&mut self) {
        self.state = AgentState::Destroyed;
    }

    /// Advances the agent by one tick.
    pub fn update(&mut self, context: &AgentContext<'_>) -> AgentOutcome {
        if !self.is_active() {
            return AgentOutcome::Inactive;
        }

        if self.needs_recalculation && !self.recalculate(context) {
            return AgentOutcome::Stranded;
        }

        if self.state == AgentState::Stranded {
            return AgentOutcome::Idle;
        }

        self.travel(context)
    }

    /// Captures a read-only snapshot of the agent.
    #[must_use]
    pub fn snapshot(&self, grid: &Grid) -> AgentSnapshot {
        AgentSnapshot {
            id: self.id,
            kind: self.kind,
            position: self.position,
            cell: self.cell(grid),
            health: self.health,
            max_health: self.max_health,
            state: self.state,
            needs_recalculation: self.needs_recalculation,
        }
    }

    fn recalculate(&mut self, context: &AgentContext<'_>) -> bool {
        self.state = AgentState::Recalculating;
        self.needs_recalculation = false;
        self.waypoint = 0;

        let Some(current) = self.cell(context.grid) else {
            context
                .diagnostics
                .report(Diagnostic::AgentOffGrid { enemy: self.id });
            self.path = Path::empty();
            self.state = AgentState::Stranded;
            return false;
        };

        self.path = context
            .pathfinder
            .find_path(context.grid, current, context.goal);
        if self.path.is_empty() {
            self.state = AgentState::Stranded;
            return false;
        }

        // The first tile is the one the agent already stands on.
        if self.path.len() > 1 {
            self.waypoint = 1;
        }
        self.state = AgentState::Traveling;
        true
    }

    fn travel(&mut self, context: &AgentContext<'_>) -> AgentOutcome {
        let Some(mut target) = self.waypoint_center(context.grid) else {
            return self.arrive();
        };

        if self.position.distance(target) <= 2.0 * self.speed {
            self.waypoint += 1;
            match self.waypoint_center(context.grid) {
                Some(next) => target = next,
                None => return self.arrive(),
            }
        }

        let step = self.speed * context.speed_multiplier;
        let delta = target - self.position;
        let distance = delta.length();
        if distance <= step {
            self.position = target;
        } else if distance > 0.0 {
            self.position += delta / distance * step;
        }
        AgentOutcome::Moved
    }

    fn waypoint_center(&self, grid: &Grid) -> Option<Vec2> {
        self.path
            .get(self.waypoint)
            .map(|cell| grid.cell_center(cell))
    }

    fn arrive(&mut self) -> AgentOutcome {
        self.state = AgentState::ReachedGoal;
        AgentOutcome::ReachedGoal {
            damage: self.damage,
        }
    }
}
