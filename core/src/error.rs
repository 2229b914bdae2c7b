//! Failure taxonomy reported by the placement and configuration entry points.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::CellCoord;

/// Reasons an obstacle placement request may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum PlacementError {
    /// The requested position does not map onto the grid.
    #[error("placement position lies outside the grid")]
    InvalidCoordinate,
    /// The requested tile is a wall or already hosts a tower.
    #[error("tile is not walkable")]
    NotWalkable,
    /// Blocking the tile would cut a spawn off from the goal.
    #[error("placement would block every route to the goal")]
    WouldBlockPath,
    /// The player cannot afford the placement.
    #[error("insufficient resources: need {required}, have {available}")]
    InsufficientResources {
        /// Cost of the placement.
        required: u32,
        /// Resources currently available.
        available: u32,
    },
    /// A live enemy currently stands on the tile.
    #[error("tile is occupied by an enemy")]
    OccupiedByEnemy,
    /// The coordinator has no valid grid configuration.
    #[error("defense grid is not configured")]
    NotConfigured,
}

/// Reasons a grid configuration is rejected during initialisation.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Error)]
pub enum ConfigurationError {
    /// No goal tile was supplied.
    #[error("grid configuration has no goal")]
    MissingGoal,
    /// The goal lies outside the grid.
    #[error("goal {0:?} lies outside the grid")]
    GoalOutOfBounds(CellCoord),
    /// The goal sits on a wall or occupied tile.
    #[error("goal {0:?} is not walkable")]
    GoalBlocked(CellCoord),
    /// No spawn points were supplied.
    #[error("grid configuration has no spawn points")]
    MissingSpawns,
    /// A spawn point lies outside the grid.
    #[error("spawn {0:?} lies outside the grid")]
    SpawnOutOfBounds(CellCoord),
    /// A spawn point sits on a wall or occupied tile.
    #[error("spawn {0:?} is not walkable")]
    SpawnBlocked(CellCoord),
    /// The grid already contains a core tile other than the goal.
    #[error("grid contains a second core tile at {0:?}")]
    DuplicateCore(CellCoord),
}
