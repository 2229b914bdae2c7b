//! Connectivity-preserving placement validation.

use tile_siege_core::{
    grid::{Grid, TileKind},
    CellCoord, PlacementError,
};
use tile_siege_system_pathfinding::Pathfinder;

/// Kind of tile a successful placement lands on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlacementSite {
    /// A level-designated turret slot, accepted without a connectivity check.
    DesignatedSlot,
    /// Open floor whose blocking keeps every connected spawn connected.
    Open,
}

/// Decides whether blocking a tile keeps the goal reachable.
///
/// Designated turret slots bypass the connectivity probe entirely. Level
/// layouts are trusted to keep those slots non-blocking; an adversarial layout
/// can use them to disconnect a spawn.
#[derive(Clone, Copy, Debug)]
pub struct PlacementValidator<'a> {
    pathfinder: &'a Pathfinder,
    spawns: &'a [CellCoord],
    goal: CellCoord,
}

impl<'a> PlacementValidator<'a> {
    /// Creates a validator for the provided spawn points and goal.
    #[must_use]
    pub const fn new(pathfinder: &'a Pathfinder, spawns: &'a [CellCoord], goal: CellCoord) -> Self {
        Self {
            pathfinder,
            spawns,
            goal,
        }
    }

    /// Reports whether an obstacle may be placed on the tile.
    ///
    /// The grid is only borrowed mutably for the speculative probe and always
    /// ends up exactly as it was passed in.
    #[must_use]
    pub fn can_place(&self, grid: &mut Grid, cell: CellCoord) -> bool {
        self.check(grid, cell).is_ok()
    }

    /// Validates a placement and reports why it failed.
    pub fn check(&self, grid: &mut Grid, cell: CellCoord) -> Result<PlacementSite, PlacementError> {
        let tile = grid.tile(cell).ok_or(PlacementError::InvalidCoordinate)?;

        if tile == TileKind::TurretSlot {
            return Ok(PlacementSite::DesignatedSlot);
        }
        if !tile.is_walkable() {
            return Err(PlacementError::NotWalkable);
        }

        let connected_before = self.connected_spawns(grid);
        let connected_after = {
            let probe = Probe::block(grid, cell).ok_or(PlacementError::InvalidCoordinate)?;
            self.connected_spawns(probe.grid())
        };

        let any_connected = connected_after.iter().any(|connected| *connected);
        let none_lost = connected_before
            .iter()
            .zip(&connected_after)
            .all(|(before, after)| !before || *after);

        if any_connected && none_lost {
            Ok(PlacementSite::Open)
        } else {
            Err(PlacementError::WouldBlockPath)
        }
    }

    fn connected_spawns(&self, grid: &Grid) -> Vec<bool> {
        self.spawns
            .iter()
            .map(|spawn| !self.pathfinder.find_path(grid, *spawn, self.goal).is_empty())
            .collect()
    }
}

/// Temporarily blocks a tile and restores it when dropped.
struct Probe<'g> {
    grid: &'g mut Grid,
    cell: CellCoord,
    original: TileKind,
}

impl<'g> Probe<'g> {
    fn block(grid: &'g mut Grid, cell: CellCoord) -> Option<Self> {
        let original = grid.set(cell, TileKind::OccupiedTurretSlot)?;
        Some(Self {
            grid,
            cell,
            original,
        })
    }

    fn grid(&self) -> &Grid {
        self.grid
    }
}

impl Drop for Probe<'_> {
    fn drop(&mut self) {
        let _ = self.grid.set(self.cell, self.original);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tile_siege_core::diagnostics::TracingDiagnostics;

    #[test]
    fn probe_restores_original_tile_on_drop() {
        let mut grid = Grid::new(2, 2, 1.0);
        let cell = CellCoord::new(1, 1);
        let _ = grid.set(cell, TileKind::Core);

        {
            let probe = Probe::block(&mut grid, cell).expect("in bounds");
            assert!(!probe.grid().is_walkable(cell));
        }

        assert_eq!(grid.tile(cell), Some(TileKind::Core));
    }

    #[test]
    fn probe_rejects_out_of_bounds_cells() {
        let mut grid = Grid::new(1, 1, 1.0);
        assert!(Probe::block(&mut grid, CellCoord::new(4, 4)).is_none());
    }

    #[test]
    fn spawn_without_prior_route_does_not_veto_placement() {
        let pathfinder = Pathfinder::new(TracingDiagnostics::handle());
        let mut grid = Grid::new(3, 4, 1.0);
        for cell in [
            CellCoord::new(1, 0),
            CellCoord::new(1, 1),
            CellCoord::new(1, 2),
            CellCoord::new(2, 1),
        ] {
            let _ = grid.set(cell, TileKind::Wall);
        }
        let goal = CellCoord::new(2, 3);
        let _ = grid.set(goal, TileKind::Core);
        let spawns = [CellCoord::new(0, 0), CellCoord::new(2, 0)];
        let validator = PlacementValidator::new(&pathfinder, &spawns, goal);

        assert_eq!(
            validator.check(&mut grid, CellCoord::new(2, 2)),
            Ok(PlacementSite::Open)
        );
        assert_eq!(
            validator.check(&mut grid, CellCoord::new(0, 1)),
            Err(PlacementError::WouldBlockPath)
        );
    }
}
