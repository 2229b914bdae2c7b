//! Validation of the grid, spawn points and goal handed to the coordinator.

use tile_siege_core::{
    grid::{Grid, TileKind},
    CellCoord, ConfigurationError,
};

/// Validated playing field owned by a configured coordinator.
#[derive(Clone, Debug)]
pub(crate) struct Setup {
    pub(crate) grid: Grid,
    pub(crate) spawns: Vec<CellCoord>,
    pub(crate) goal: CellCoord,
}

impl Setup {
    /// Checks the configuration and marks the goal tile as the core.
    pub(crate) fn new(
        grid: &Grid,
        spawns: &[CellCoord],
        goal: Option<CellCoord>,
    ) -> Result<Self, ConfigurationError> {
        let goal = goal.ok_or(ConfigurationError::MissingGoal)?;
        match grid.tile(goal) {
            None => return Err(ConfigurationError::GoalOutOfBounds(goal)),
            Some(TileKind::Wall | TileKind::OccupiedTurretSlot) => {
                return Err(ConfigurationError::GoalBlocked(goal))
            }
            Some(_) => {}
        }

        if spawns.is_empty() {
            return Err(ConfigurationError::MissingSpawns);
        }
        if let Some(spawn) = spawns.iter().find(|spawn| !grid.is_valid(**spawn)) {
            return Err(ConfigurationError::SpawnOutOfBounds(*spawn));
        }
        if let Some(spawn) = spawns.iter().find(|spawn| !grid.is_walkable(**spawn)) {
            return Err(ConfigurationError::SpawnBlocked(*spawn));
        }
        if let Some(core) = grid.core_cells().into_iter().find(|cell| *cell != goal) {
            return Err(ConfigurationError::DuplicateCore(core));
        }

        let mut grid = grid.clone();
        let _ = grid.set(goal, TileKind::Core);
        Ok(Self {
            grid,
            spawns: spawns.to_vec(),
            goal,
        })
    }
}
