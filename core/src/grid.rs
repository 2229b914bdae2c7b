//! Shared tile grid model.
//!
//! The grid stores one [`TileKind`] per tile in row-major order and exposes the
//! pixel transforms used by agents and placement requests. It performs no
//! legality checks beyond bounds; callers decide whether a mutation is allowed.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::CellCoord;

/// Semantic type of a single tile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    /// Open floor that enemies may traverse.
    #[default]
    Empty,
    /// Impassable terrain.
    Wall,
    /// Designated tower position that is still free.
    TurretSlot,
    /// Designated or ad-hoc position that hosts a tower.
    OccupiedTurretSlot,
    /// The defended objective and pathfinding goal.
    Core,
}

impl TileKind {
    /// Reports whether enemies may traverse tiles of this kind.
    #[must_use]
    pub const fn is_walkable(self) -> bool {
        !matches!(self, Self::Wall | Self::OccupiedTurretSlot)
    }
}

/// Dense tile grid addressed by `(row, column)`.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    rows: u32,
    columns: u32,
    tile_size: f32,
    offset: Vec2,
    tiles: Vec<TileKind>,
}

impl Grid {
    /// Creates a grid of empty tiles with explicit dimensions.
    #[must_use]
    pub fn new(rows: u32, columns: u32, tile_size: f32) -> Self {
        let capacity_u64 = u64::from(rows) * u64::from(columns);
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);
        Self {
            rows,
            columns,
            tile_size,
            offset: Vec2::ZERO,
            tiles: vec![TileKind::Empty; capacity],
        }
    }

    /// Creates a grid that covers a display of the provided pixel size.
    ///
    /// Partial tiles along the right and bottom edges are dropped. A
    /// non-positive tile size produces an empty grid.
    #[must_use]
    pub fn from_display(width: f32, height: f32, tile_size: f32) -> Self {
        if tile_size <= 0.0 || width <= 0.0 || height <= 0.0 {
            return Self::new(0, 0, tile_size.max(0.0));
        }
        let rows = (height / tile_size) as u32;
        let columns = (width / tile_size) as u32;
        Self::new(rows, columns, tile_size)
    }

    /// Shifts the grid's pixel origin by the provided offset.
    #[must_use]
    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }

    /// Number of rows contained in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of columns contained in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Side length of a single square tile expressed in pixels.
    #[must_use]
    pub const fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// Pixel position of the grid's top-left corner.
    #[must_use]
    pub const fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Total number of tiles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Reports whether the grid has no tiles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Reports whether the coordinate lies within the grid bounds.
    #[must_use]
    pub const fn is_valid(&self, cell: CellCoord) -> bool {
        cell.row() < self.rows && cell.column() < self.columns
    }

    /// Reports whether enemies may stand on the tile.
    ///
    /// Out-of-bounds coordinates are never walkable.
    #[must_use]
    pub fn is_walkable(&self, cell: CellCoord) -> bool {
        self.tile(cell).is_some_and(TileKind::is_walkable)
    }

    /// Tile stored at the coordinate, if it lies within the grid.
    #[must_use]
    pub fn tile(&self, cell: CellCoord) -> Option<TileKind> {
        self.index(cell)
            .and_then(|index| self.tiles.get(index).copied())
    }

    /// Overwrites a single tile, returning the previous value.
    ///
    /// Returns `None` and leaves the grid untouched when the coordinate is out
    /// of bounds.
    pub fn set(&mut self, cell: CellCoord, kind: TileKind) -> Option<TileKind> {
        let index = self.index(cell)?;
        let slot = self.tiles.get_mut(index)?;
        Some(std::mem::replace(slot, kind))
    }

    /// Walkable orthogonal neighbours in the fixed order +column, -column,
    /// +row, -row.
    pub fn neighbors(&self, cell: CellCoord) -> impl Iterator<Item = CellCoord> + '_ {
        let mut candidates = [None; 4];

        if let Some(column) = cell.column().checked_add(1) {
            candidates[0] = Some(CellCoord::new(cell.row(), column));
        }
        if let Some(column) = cell.column().checked_sub(1) {
            candidates[1] = Some(CellCoord::new(cell.row(), column));
        }
        if let Some(row) = cell.row().checked_add(1) {
            candidates[2] = Some(CellCoord::new(row, cell.column()));
        }
        if let Some(row) = cell.row().checked_sub(1) {
            candidates[3] = Some(CellCoord::new(row, cell.column()));
        }

        candidates
            .into_iter()
            .flatten()
            .filter(move |candidate| self.is_walkable(*candidate))
    }

    /// Pixel centre of the tile.
    #[must_use]
    pub fn cell_center(&self, cell: CellCoord) -> Vec2 {
        let half = self.tile_size / 2.0;
        Vec2::new(
            cell.column() as f32 * self.tile_size + half + self.offset.x,
            cell.row() as f32 * self.tile_size + half + self.offset.y,
        )
    }

    /// Tile containing the pixel position, truncating toward the tile origin.
    #[must_use]
    pub fn cell_at(&self, pixel: Vec2) -> Option<CellCoord> {
        if self.tile_size <= 0.0 || !pixel.is_finite() {
            return None;
        }
        let local = (pixel - self.offset) / self.tile_size;
        if local.x < 0.0 || local.y < 0.0 {
            return None;
        }
        let cell = CellCoord::new(local.y as u32, local.x as u32);
        self.is_valid(cell).then_some(cell)
    }

    /// Coordinates of every tile currently marked as [`TileKind::Core`].
    #[must_use]
    pub fn core_cells(&self) -> Vec<CellCoord> {
        self.cells()
            .filter(|(_, kind)| *kind == TileKind::Core)
            .map(|(cell, _)| cell)
            .collect()
    }

    /// Number of walkable tiles.
    #[must_use]
    pub fn walkable_count(&self) -> usize {
        self.tiles.iter().filter(|kind| kind.is_walkable()).count()
    }

    /// Iterator over every tile in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (CellCoord, TileKind)> + '_ {
        let columns = self.columns.max(1);
        self.tiles.iter().enumerate().map(move |(index, kind)| {
            let index = index as u32;
            (CellCoord::new(index / columns, index % columns), *kind)
        })
    }

    /// Dense row-major index of the coordinate, if it lies within the grid.
    #[must_use]
    pub fn index(&self, cell: CellCoord) -> Option<usize> {
        if !self.is_valid(cell) {
            return None;
        }
        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let width = usize::try_from(self.columns).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }

    /// Coordinate stored at the dense row-major index.
    #[must_use]
    pub fn coord(&self, index: usize) -> Option<CellCoord> {
        if index >= self.tiles.len() || self.columns == 0 {
            return None;
        }
        let index = u32::try_from(index).ok()?;
        Some(CellCoord::new(index / self.columns, index % self.columns))
    }
}
