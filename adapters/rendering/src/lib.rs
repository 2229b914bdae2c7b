#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Tile Siege adapters.
//!
//! The simulation never talks to a graphics or audio backend directly. Adapters
//! implement the [`AssetProvider`], [`SoundSink`], [`ScreenQuery`] and
//! [`DrawSink`] contracts, and the [`Presenter`] turns a [`Scene`] into
//! backend-neutral [`DrawCall`]s.

mod presenter;
mod sound;

use anyhow::Result as AnyResult;
use glam::Vec2;
use tile_siege_core::{grid::Grid, grid::TileKind, AgentView, CellCoord, EnemyKind, TowerView};

pub use presenter::{Palette, Presenter};
pub use sound::{play_event_sounds, sound_for, SoundKey};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

/// Image looked up through the asset provider.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ImageKey {
    /// Floor or structure tile.
    Tile(TileKind),
    /// Placed tower.
    Tower,
    /// Enemy body.
    Enemy(EnemyKind),
}

impl ImageKey {
    /// Stable asset name of the image.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Tile(TileKind::Empty) => "tile_floor",
            Self::Tile(TileKind::Wall) => "tile_wall",
            Self::Tile(TileKind::TurretSlot) => "tile_slot",
            Self::Tile(TileKind::OccupiedTurretSlot) => "tile_slot_occupied",
            Self::Tile(TileKind::Core) => "tile_core",
            Self::Tower => "tower",
            Self::Enemy(EnemyKind::Grunt) => "enemy_grunt",
            Self::Enemy(EnemyKind::Runner) => "enemy_runner",
            Self::Enemy(EnemyKind::Brute) => "enemy_brute",
        }
    }
}

/// Opaque handle to an image resolved by an asset provider.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ImageHandle(pub u32);

/// Opaque handle to a sound resolved by an asset provider.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SoundHandle(pub u32);

/// Opaque handle to a font resolved by an asset provider.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FontHandle(pub u32);

/// Lookup of images, sounds and fonts by key.
///
/// Every lookup may miss; callers fall back to placeholders or silence.
pub trait AssetProvider {
    /// Resolves an image scaled to the requested pixel size.
    fn image(&self, key: ImageKey, size: Vec2) -> Option<ImageHandle>;

    /// Resolves a sound effect.
    fn sound(&self, key: SoundKey) -> Option<SoundHandle>;

    /// Resolves a font at the requested point size.
    fn font(&self, name: &str, size: u16) -> Option<FontHandle>;
}

/// Provider that never resolves anything, so every draw uses placeholders.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlaceholderAssets;

impl AssetProvider for PlaceholderAssets {
    fn image(&self, _key: ImageKey, _size: Vec2) -> Option<ImageHandle> {
        None
    }

    fn sound(&self, _key: SoundKey) -> Option<SoundHandle> {
        None
    }

    fn font(&self, _name: &str, _size: u16) -> Option<FontHandle> {
        None
    }
}

/// Audio backend that plays sound effects.
pub trait SoundSink {
    /// Plays the sound registered under the key.
    fn play_sound(&mut self, key: SoundKey) -> AnyResult<()>;
}

/// Screen currently shown by the host application.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Screen {
    /// Title or menu screen.
    Menu,
    /// A playable chapter.
    Chapter(u32),
    /// Defeat screen shown after the objective fell.
    GameOver,
}

impl Screen {
    /// Reports whether the screen shows the playing field.
    #[must_use]
    pub const fn shows_field(self) -> bool {
        matches!(self, Self::Chapter(_))
    }
}

/// Query for the screen the host application currently shows.
pub trait ScreenQuery {
    /// Screen currently on display.
    fn current_screen(&self) -> Screen;
}

/// Backend-neutral primitive emitted by the presenter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DrawCall {
    /// Draws an image with its top-left corner at `position`.
    Image {
        /// Image to draw.
        handle: ImageHandle,
        /// Top-left corner in display pixels.
        position: Vec2,
        /// Size in display pixels.
        size: Vec2,
    },
    /// Fills a rectangle with its top-left corner at `position`.
    Rect {
        /// Top-left corner in display pixels.
        position: Vec2,
        /// Size in display pixels.
        size: Vec2,
        /// Fill color.
        color: Color,
    },
}

/// Backend receiving draw calls in painter's order.
pub trait DrawSink {
    /// Submits a single draw call.
    fn submit(&mut self, call: DrawCall) -> AnyResult<()>;
}

impl DrawSink for Vec<DrawCall> {
    fn submit(&mut self, call: DrawCall) -> AnyResult<()> {
        self.push(call);
        Ok(())
    }
}

/// Placement cursor shown over the field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlacementHighlight {
    /// Tile under the cursor.
    pub cell: CellCoord,
    /// Whether a placement there would succeed.
    pub placeable: bool,
}

/// Scene description combining the grid and its inhabitants.
#[derive(Clone, Debug)]
pub struct Scene {
    /// Tile grid that composes the play area.
    pub grid: Grid,
    /// Live enemies.
    pub agents: AgentView,
    /// Placed towers.
    pub towers: TowerView,
    /// Optional placement cursor.
    pub highlight: Option<PlacementHighlight>,
}

impl Scene {
    /// Creates a new scene descriptor.
    #[must_use]
    pub fn new(
        grid: Grid,
        agents: AgentView,
        towers: TowerView,
        highlight: Option<PlacementHighlight>,
    ) -> Self {
        Self {
            grid,
            agents,
            towers,
            highlight,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lighten_moves_channels_towards_white() {
        let color = Color::new(0.0, 0.5, 1.0, 0.25).lighten(0.5);
        assert_eq!(color, Color::new(0.5, 0.75, 1.0, 0.25));
    }

    #[test]
    fn image_names_are_unique() {
        let keys = [
            ImageKey::Tile(TileKind::Empty),
            ImageKey::Tile(TileKind::Wall),
            ImageKey::Tile(TileKind::TurretSlot),
            ImageKey::Tile(TileKind::OccupiedTurretSlot),
            ImageKey::Tile(TileKind::Core),
            ImageKey::Tower,
            ImageKey::Enemy(EnemyKind::Grunt),
            ImageKey::Enemy(EnemyKind::Runner),
            ImageKey::Enemy(EnemyKind::Brute),
        ];
        let mut names: Vec<_> = keys.iter().map(|key| key.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), keys.len());
    }

    #[test]
    fn only_chapters_show_the_field() {
        assert!(Screen::Chapter(2).shows_field());
        assert!(!Screen::Menu.shows_field());
        assert!(!Screen::GameOver.shows_field());
    }
}
