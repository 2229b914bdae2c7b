#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic A* pathfinding over the shared tile grid.

use std::{cell::RefCell, cmp::Reverse, collections::BinaryHeap};

use tile_siege_core::{
    diagnostics::{Diagnostic, DiagnosticsHandle},
    grid::Grid,
    CellCoord, Path,
};

/// Shortest-path search shared by the placement validator and every enemy.
///
/// The frontier is a binary heap keyed by `f = g + h` with the Manhattan
/// distance as heuristic and a uniform edge cost of one. Entries with equal
/// `f` pop in insertion order, which together with the grid's fixed neighbour
/// order makes every search reproducible. Superseded heap entries are never
/// removed eagerly; an open-set membership check skips them when they surface.
#[derive(Debug)]
pub struct Pathfinder {
    diagnostics: DiagnosticsHandle,
    workspace: RefCell<SearchWorkspace>,
}

impl Pathfinder {
    /// Creates a pathfinder that reports failed searches to the provided sink.
    #[must_use]
    pub fn new(diagnostics: DiagnosticsHandle) -> Self {
        Self {
            diagnostics,
            workspace: RefCell::new(SearchWorkspace::default()),
        }
    }

    /// Computes the shortest route from `start` to `goal`, both inclusive.
    ///
    /// Returns an empty path and reports a warning when either endpoint is not
    /// walkable or when the goal cannot be reached.
    #[must_use]
    pub fn find_path(&self, grid: &Grid, start: CellCoord, goal: CellCoord) -> Path {
        if !grid.is_walkable(start) || !grid.is_walkable(goal) {
            self.diagnostics
                .report(Diagnostic::BlockedEndpoint { start, goal });
            return Path::empty();
        }

        if start == goal {
            return Path::new(vec![start]);
        }

        let (Some(start_index), Some(goal_index)) = (grid.index(start), grid.index(goal)) else {
            return Path::empty();
        };

        let mut workspace = self.workspace.borrow_mut();
        match workspace.search(grid, start_index, goal_index, goal) {
            Some(path) => path,
            None => {
                self.diagnostics
                    .report(Diagnostic::Unreachable { start, goal });
                Path::empty()
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct FrontierEntry {
    priority: u32,
    sequence: u64,
    index: usize,
}

/// Scratch buffers reused across searches to avoid repeated allocations.
#[derive(Debug, Default)]
struct SearchWorkspace {
    g_score: Vec<u32>,
    came_from: Vec<Option<usize>>,
    open: Vec<bool>,
    closed: Vec<bool>,
    frontier: BinaryHeap<Reverse<FrontierEntry>>,
    sequence: u64,
}

impl SearchWorkspace {
    fn reset(&mut self, cell_count: usize) {
        self.g_score.clear();
        self.g_score.resize(cell_count, u32::MAX);
        self.came_from.clear();
        self.came_from.resize(cell_count, None);
        self.open.clear();
        self.open.resize(cell_count, false);
        self.closed.clear();
        self.closed.resize(cell_count, false);
        self.frontier.clear();
        self.sequence = 0;
    }

    fn push(&mut self, priority: u32, index: usize) {
        self.frontier.push(Reverse(FrontierEntry {
            priority,
            sequence: self.sequence,
            index,
        }));
        self.sequence += 1;
    }

    fn search(
        &mut self,
        grid: &Grid,
        start_index: usize,
        goal_index: usize,
        goal: CellCoord,
    ) -> Option<Path> {
        self.reset(grid.len());

        let start = grid.coord(start_index)?;
        self.g_score[start_index] = 0;
        self.open[start_index] = true;
        self.push(start.manhattan_distance(goal), start_index);

        while let Some(Reverse(entry)) = self.frontier.pop() {
            let current_index = entry.index;
            if !self.open[current_index] {
                continue;
            }
            self.open[current_index] = false;

            if current_index == goal_index {
                return Some(self.reconstruct(grid, goal_index));
            }
            self.closed[current_index] = true;

            let Some(current) = grid.coord(current_index) else {
                continue;
            };
            let tentative = self.g_score[current_index].saturating_add(1);

            for neighbor in grid.neighbors(current) {
                let Some(neighbor_index) = grid.index(neighbor) else {
                    continue;
                };
                if self.closed[neighbor_index] || tentative >= self.g_score[neighbor_index] {
                    continue;
                }

                self.came_from[neighbor_index] = Some(current_index);
                self.g_score[neighbor_index] = tentative;
                self.open[neighbor_index] = true;
                self.push(tentative + neighbor.manhattan_distance(goal), neighbor_index);
            }
        }

        None
    }

    fn reconstruct(&self, grid: &Grid, goal_index: usize) -> Path {
        let mut cells = Vec::new();
        let mut cursor = Some(goal_index);
        while let Some(index) = cursor {
            if let Some(cell) = grid.coord(index) {
                cells.push(cell);
            }
            cursor = self.came_from[index];
        }
        cells.reverse();
        Path::new(cells)
    }
}
