//! ASCII level layouts.
//!
//! A layout is a list of equally wide rows using one character per tile:
//!
//! | glyph | meaning                         |
//! |-------|---------------------------------|
//! | `.`   | empty floor                     |
//! | `#`   | wall                            |
//! | `T`   | free turret slot                |
//! | `X`   | occupied turret slot            |
//! | `C`   | core (goal)                     |
//! | `S`   | spawn point on empty floor      |

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    grid::{Grid, TileKind},
    CellCoord,
};

/// Errors raised while parsing an ASCII layout.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// The layout contains no rows.
    #[error("layout contains no rows")]
    Empty,
    /// A row's width differs from the first row.
    #[error("row {row} has {found} tiles, expected {expected}")]
    RaggedRow {
        /// Zero-based row index.
        row: usize,
        /// Width of the first row.
        expected: usize,
        /// Width of the offending row.
        found: usize,
    },
    /// A glyph outside the layout alphabet was encountered.
    #[error("unknown glyph '{glyph}' at row {row}, column {column}")]
    UnknownGlyph {
        /// Offending character.
        glyph: char,
        /// Zero-based row index.
        row: usize,
        /// Zero-based column index.
        column: usize,
    },
    /// The layout does not contain exactly one core tile.
    #[error("layout must contain exactly one core tile, found {0}")]
    CoreCount(usize),
}

/// Level description combining the tile grid with its spawn points and goal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct LevelLayout {
    rows: Vec<String>,
}

impl LevelLayout {
    /// Parses and validates a layout from its textual rows.
    ///
    /// Leading and trailing whitespace on each row is ignored, as are blank
    /// rows.
    pub fn parse<S: AsRef<str>>(rows: &[S]) -> Result<Self, LayoutError> {
        let rows: Vec<String> = rows
            .iter()
            .map(|row| row.as_ref().trim().to_owned())
            .filter(|row| !row.is_empty())
            .collect();
        let layout = Self { rows };
        layout.validate()?;
        Ok(layout)
    }

    /// Parses a layout from a newline-separated block of text.
    pub fn from_text(text: &str) -> Result<Self, LayoutError> {
        let rows: Vec<&str> = text.lines().collect();
        Self::parse(&rows)
    }

    /// Textual rows of the layout.
    #[must_use]
    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    /// Number of tile rows.
    #[must_use]
    pub fn row_count(&self) -> u32 {
        self.rows.len() as u32
    }

    /// Number of tile columns.
    #[must_use]
    pub fn column_count(&self) -> u32 {
        self.rows
            .first()
            .map_or(0, |row| row.chars().count() as u32)
    }

    /// Builds the tile grid with the provided tile size.
    ///
    /// Spawn glyphs become empty floor.
    #[must_use]
    pub fn to_grid(&self, tile_size: f32) -> Grid {
        let mut grid = Grid::new(self.row_count(), self.column_count(), tile_size);
        for (cell, glyph) in self.glyphs() {
            if let Some(kind) = tile_for(glyph) {
                let _ = grid.set(cell, kind);
            }
        }
        grid
    }

    /// Spawn points in row-major order.
    #[must_use]
    pub fn spawns(&self) -> Vec<CellCoord> {
        self.glyphs()
            .filter(|(_, glyph)| *glyph == 'S')
            .map(|(cell, _)| cell)
            .collect()
    }

    /// Location of the core tile.
    #[must_use]
    pub fn goal(&self) -> Option<CellCoord> {
        self.glyphs()
            .find(|(_, glyph)| *glyph == 'C')
            .map(|(cell, _)| cell)
    }

    fn glyphs(&self) -> impl Iterator<Item = (CellCoord, char)> + '_ {
        self.rows.iter().enumerate().flat_map(|(row, text)| {
            text.chars()
                .enumerate()
                .map(move |(column, glyph)| (CellCoord::new(row as u32, column as u32), glyph))
        })
    }

    fn validate(&self) -> Result<(), LayoutError> {
        let Some(first) = self.rows.first() else {
            return Err(LayoutError::Empty);
        };
        let expected = first.chars().count();
        let mut cores = 0;

        for (row, text) in self.rows.iter().enumerate() {
            let found = text.chars().count();
            if found != expected {
                return Err(LayoutError::RaggedRow {
                    row,
                    expected,
                    found,
                });
            }
            for (column, glyph) in text.chars().enumerate() {
                if tile_for(glyph).is_none() {
                    return Err(LayoutError::UnknownGlyph { glyph, row, column });
                }
                if glyph == 'C' {
                    cores += 1;
                }
            }
        }

        if cores != 1 {
            return Err(LayoutError::CoreCount(cores));
        }
        Ok(())
    }
}

impl TryFrom<Vec<String>> for LevelLayout {
    type Error = LayoutError;

    fn try_from(rows: Vec<String>) -> Result<Self, Self::Error> {
        Self::parse(&rows)
    }
}

impl From<LevelLayout> for Vec<String> {
    fn from(layout: LevelLayout) -> Self {
        layout.rows
    }
}

fn tile_for(glyph: char) -> Option<TileKind> {
    match glyph {
        '.' | 'S' => Some(TileKind::Empty),
        '#' => Some(TileKind::Wall),
        'T' => Some(TileKind::TurretSlot),
        'X' => Some(TileKind::OccupiedTurretSlot),
        'C' => Some(TileKind::Core),
        _ => None,
    }
}
