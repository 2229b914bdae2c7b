#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic movement system that steers agents along their routes.

mod agent;

use tile_siege_core::{diagnostics::Diagnostics, grid::Grid, AgentView, CellCoord, EnemyId};
use tile_siege_system_pathfinding::Pathfinder;

pub use agent::{Agent, AgentContext, AgentOutcome};

/// Outcome of one agent's update worth reporting to the coordinator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MovementReport {
    /// Agent the report concerns.
    pub enemy: EnemyId,
    /// What happened during the update.
    pub outcome: AgentOutcome,
}

/// Pure system advancing every active agent once per tick.
#[derive(Clone, Copy, Debug)]
pub struct Movement {
    speed_multiplier: f32,
}

impl Default for Movement {
    fn default() -> Self {
        Self::new(2.0)
    }
}

impl Movement {
    /// Creates a movement system applying the provided speed multiplier.
    #[must_use]
    pub const fn new(speed_multiplier: f32) -> Self {
        Self { speed_multiplier }
    }

    /// Multiplier applied to every agent's base speed.
    #[must_use]
    pub const fn speed_multiplier(&self) -> f32 {
        self.speed_multiplier
    }

    /// Updates every agent in slice order and reports stranding and arrivals.
    ///
    /// Routine movement and idle ticks are not reported.
    pub fn handle(
        &self,
        agents: &mut [Agent],
        grid: &Grid,
        pathfinder: &Pathfinder,
        goal: CellCoord,
        diagnostics: &dyn Diagnostics,
        out: &mut Vec<MovementReport>,
    ) {
        let context = AgentContext {
            grid,
            pathfinder,
            goal,
            speed_multiplier: self.speed_multiplier,
            diagnostics,
        };

        for agent in agents.iter_mut() {
            let outcome = agent.update(&context);
            if matches!(
                outcome,
                AgentOutcome::Stranded | AgentOutcome::ReachedGoal { .. }
            ) {
                out.push(MovementReport {
                    enemy: agent.id(),
                    outcome,
                });
            }
        }
    }

    /// Flags every active agent for route recalculation and returns how many were flagged.
    pub fn invalidate_paths(agents: &mut [Agent]) -> usize {
        let mut flagged = 0;
        for agent in agents.iter_mut().filter(|agent| agent.is_active()) {
            agent.trigger_path_recalculation();
            flagged += 1;
        }
        flagged
    }

    /// Builds a read-only view over every agent.
    #[must_use]
    pub fn view(agents: &[Agent], grid: &Grid) -> AgentView {
        AgentView::from_snapshots(agents.iter().map(|agent| agent.snapshot(grid)).collect())
    }
}
