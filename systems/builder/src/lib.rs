#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Placement validation and the builder system that emits placement commands.

mod validator;

use glam::Vec2;
use tile_siege_core::{CellCoord, Command, Event};

pub use validator::{PlacementSite, PlacementValidator};

/// Declarative placement preview describing a potential obstacle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacementPreview {
    /// Tile the obstacle would occupy.
    pub cell: CellCoord,
    /// Pixel position the preview was resolved from.
    pub position: Vec2,
    /// Resources the placement would cost.
    pub cost: u32,
    /// Indicates whether the preview represents a valid placement location.
    pub placeable: bool,
}

impl PlacementPreview {
    /// Creates a new placement preview descriptor.
    #[must_use]
    pub const fn new(cell: CellCoord, position: Vec2, cost: u32, placeable: bool) -> Self {
        Self {
            cell,
            position,
            cost,
            placeable,
        }
    }
}

/// Input snapshot distilled from adapter-provided frame input data.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BuilderInput {
    /// Indicates whether the player confirmed a placement on this frame.
    pub confirm_action: bool,
    /// Cursor position in display pixels, if the cursor is over the field.
    pub cursor_position: Option<Vec2>,
}

impl BuilderInput {
    /// Creates a new input descriptor with explicit field values.
    #[must_use]
    pub const fn new(confirm_action: bool, cursor_position: Option<Vec2>) -> Self {
        Self {
            confirm_action,
            cursor_position,
        }
    }
}

/// Builder system that translates preview + input into placement commands.
#[derive(Debug, Clone)]
pub struct Builder {
    enabled: bool,
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

impl Builder {
    /// Creates a new builder system instance.
    #[must_use]
    pub const fn new() -> Self {
        Self { enabled: true }
    }

    /// Consumes coordinator events and adapter-derived input to emit commands.
    ///
    /// Building stops for good once the objective is destroyed.
    pub fn handle(
        &mut self,
        events: &[Event],
        preview: Option<PlacementPreview>,
        input: BuilderInput,
        out: &mut Vec<Command>,
    ) {
        if events
            .iter()
            .any(|event| matches!(event, Event::ObjectiveDestroyed))
        {
            self.enabled = false;
        }

        if !self.enabled || !input.confirm_action {
            return;
        }

        let Some(preview) = preview else {
            return;
        };
        if !preview.placeable {
            return;
        }

        let position = input.cursor_position.unwrap_or(preview.position);
        out.push(Command::PlaceObstacle { position });
    }
}
