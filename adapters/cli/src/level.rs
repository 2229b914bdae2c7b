use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use tile_siege_core::{config::DisplayConfig, grid::Grid, layout::LevelLayout};

use crate::layout_transfer::LevelTransfer;

/// Level used when no `--level` argument is provided.
const BUILT_IN_LEVEL: &[&str] = &[
    "S.......................S",
    ".........................",
    "..####.........T....####.",
    ".....#..............#....",
    ".....#....T....T....#....",
    ".....#..............#....",
    ".........................",
    "..T.......#####.......T..",
    ".........................",
    "............C............",
    ".........................",
    "..T.......#####.......T..",
    ".........................",
    ".....#..............#....",
    ".....#....T....T....#....",
    ".....#..............#....",
    "..####.........T....####.",
    ".........................",
    "S.......................S",
];

/// Level layout together with an optional tile size override.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Level {
    pub(crate) layout: LevelLayout,
    pub(crate) tile_size: Option<f32>,
}

impl Level {
    /// Layout bundled with the binary.
    pub(crate) fn built_in() -> Result<Self> {
        let layout = LevelLayout::parse(BUILT_IN_LEVEL).context("built-in level is malformed")?;
        Ok(Self {
            layout,
            tile_size: None,
        })
    }

    /// Resolves a `--level` argument that is either a transfer string or a path to an ASCII file.
    pub(crate) fn resolve(argument: Option<&str>) -> Result<Self> {
        let Some(argument) = argument else {
            return Self::built_in();
        };

        if LevelTransfer::is_transfer_string(argument) {
            let transfer =
                LevelTransfer::decode(argument).context("failed to decode level string")?;
            return Ok(Self {
                layout: transfer.layout,
                tile_size: transfer.tile_size,
            });
        }

        let path = Path::new(argument);
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read level file {}", path.display()))?;
        let layout = LevelLayout::from_text(&text)
            .with_context(|| format!("failed to parse level file {}", path.display()))?;
        Ok(Self {
            layout,
            tile_size: None,
        })
    }

    /// Lays the level out on the display, failing when it does not fit.
    ///
    /// A tile size carried by the level overrides the display's.
    pub(crate) fn to_grid(&self, display: DisplayConfig) -> Result<Grid> {
        let display = DisplayConfig {
            tile_size: self.tile_size.unwrap_or(display.tile_size),
            ..display
        };
        let field = display.empty_grid();
        let (columns, rows) = (self.layout.column_count(), self.layout.row_count());
        if columns > field.columns() || rows > field.rows() {
            bail!(
                "level is {columns}x{rows} tiles but a {}x{} display only fits {}x{}",
                display.width,
                display.height,
                field.columns(),
                field.rows()
            );
        }
        Ok(self
            .layout
            .to_grid(display.tile_size)
            .with_offset(display.offset()))
    }
}
