use anyhow::{Context, Result as AnyResult};
use glam::Vec2;
use tile_siege_core::{grid::TileKind, AgentSnapshot, EnemyKind};

use crate::{AssetProvider, Color, DrawCall, DrawSink, ImageKey, Scene, ScreenQuery};

const AGENT_SCALE: f32 = 0.75;
const HEALTH_BAR_HEIGHT: f32 = 4.0;
const HEALTH_BAR_GAP: f32 = 2.0;
const RELOAD_FADE: f32 = 0.35;

/// Placeholder colors used when an image is missing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    /// Open floor.
    pub floor: Color,
    /// Walls.
    pub wall: Color,
    /// Empty turret slots.
    pub slot: Color,
    /// Turret slots holding a tower.
    pub occupied_slot: Color,
    /// The defended core.
    pub core: Color,
    /// Towers.
    pub tower: Color,
    /// Grunt enemies.
    pub grunt: Color,
    /// Runner enemies.
    pub runner: Color,
    /// Brute enemies.
    pub brute: Color,
    /// Missing health behind the health bar.
    pub health_back: Color,
    /// Remaining health.
    pub health_fill: Color,
    /// Highlight over a tile that accepts a tower.
    pub placeable: Color,
    /// Highlight over a tile that rejects a tower.
    pub blocked: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            floor: Color::from_rgb_u8(0x2b, 0x2f, 0x3a),
            wall: Color::from_rgb_u8(0x5a, 0x5f, 0x6e),
            slot: Color::from_rgb_u8(0x3d, 0x56, 0x4a),
            occupied_slot: Color::from_rgb_u8(0x24, 0x3a, 0x30),
            core: Color::from_rgb_u8(0x3f, 0x8c, 0xff),
            tower: Color::from_rgb_u8(0xd8, 0xc0, 0x5a),
            grunt: Color::from_rgb_u8(0xc8, 0x2a, 0x36),
            runner: Color::from_rgb_u8(0xff, 0xc1, 0x07),
            brute: Color::from_rgb_u8(0x58, 0x47, 0xff),
            health_back: Color::from_rgb_u8(0x40, 0x10, 0x10),
            health_fill: Color::from_rgb_u8(0x2f, 0x95, 0x32),
            placeable: Color::new(0.2, 0.9, 0.3, 0.35),
            blocked: Color::new(0.9, 0.2, 0.2, 0.35),
        }
    }
}

impl Palette {
    fn tile(&self, kind: TileKind) -> Color {
        match kind {
            TileKind::Empty => self.floor,
            TileKind::Wall => self.wall,
            TileKind::TurretSlot => self.slot,
            TileKind::OccupiedTurretSlot => self.occupied_slot,
            TileKind::Core => self.core,
        }
    }

    fn enemy(&self, kind: EnemyKind) -> Color {
        match kind {
            EnemyKind::Grunt => self.grunt,
            EnemyKind::Runner => self.runner,
            EnemyKind::Brute => self.brute,
        }
    }
}

/// Converts scenes into draw calls.
#[derive(Clone, Copy, Debug, Default)]
pub struct Presenter {
    palette: Palette,
}

impl Presenter {
    /// Creates a presenter with the provided placeholder palette.
    #[must_use]
    pub const fn new(palette: Palette) -> Self {
        Self { palette }
    }

    /// Draws the scene when the host shows the playing field.
    ///
    /// Returns the number of submitted draw calls.
    pub fn present(
        &self,
        screen: &dyn ScreenQuery,
        scene: &Scene,
        assets: &dyn AssetProvider,
        sink: &mut dyn DrawSink,
    ) -> AnyResult<usize> {
        if !screen.current_screen().shows_field() {
            return Ok(0);
        }
        self.draw(scene, assets, sink)
    }

    /// Draws tiles, towers, enemies with their health bars, and the placement highlight.
    ///
    /// Missing images fall back to filled rectangles in the palette color.
    pub fn draw(
        &self,
        scene: &Scene,
        assets: &dyn AssetProvider,
        sink: &mut dyn DrawSink,
    ) -> AnyResult<usize> {
        let mut submitted = 0;
        let grid = &scene.grid;
        let tile = grid.tile_size();
        let tile_size = Vec2::splat(tile);

        for (cell, kind) in grid.cells() {
            let origin = grid.cell_center(cell) - tile_size * 0.5;
            let call = image_or_rect(
                assets,
                ImageKey::Tile(kind),
                origin,
                tile_size,
                self.palette.tile(kind),
            );
            sink.submit(call).with_context(|| {
                format!("failed to draw tile ({}, {})", cell.row(), cell.column())
            })?;
            submitted += 1;
        }

        for tower in scene.towers.iter() {
            // Reloading towers are washed out.
            let color = if tower.ready_in.is_zero() {
                self.palette.tower
            } else {
                self.palette.tower.lighten(RELOAD_FADE)
            };
            let call = image_or_rect(
                assets,
                ImageKey::Tower,
                tower.center - tile_size * 0.5,
                tile_size,
                color,
            );
            sink.submit(call).context("failed to draw tower")?;
            submitted += 1;
        }

        for agent in scene.agents.iter() {
            for call in self.agent_calls(agent, assets, tile) {
                sink.submit(call).context("failed to draw enemy")?;
                submitted += 1;
            }
        }

        if let Some(highlight) = scene.highlight {
            let color = if highlight.placeable {
                self.palette.placeable
            } else {
                self.palette.blocked
            };
            sink.submit(DrawCall::Rect {
                position: grid.cell_center(highlight.cell) - tile_size * 0.5,
                size: tile_size,
                color,
            })
            .context("failed to draw placement highlight")?;
            submitted += 1;
        }

        Ok(submitted)
    }

    fn agent_calls(
        &self,
        agent: &AgentSnapshot,
        assets: &dyn AssetProvider,
        tile: f32,
    ) -> [DrawCall; 3] {
        let size = Vec2::splat(tile * AGENT_SCALE);
        let origin = agent.position - size * 0.5;
        let body = image_or_rect(
            assets,
            ImageKey::Enemy(agent.kind),
            origin,
            size,
            self.palette.enemy(agent.kind),
        );

        let bar_origin = origin - Vec2::new(0.0, HEALTH_BAR_HEIGHT + HEALTH_BAR_GAP);
        let fraction = if agent.max_health.is_zero() {
            0.0
        } else {
            agent.health.get() as f32 / agent.max_health.get() as f32
        };
        let back = DrawCall::Rect {
            position: bar_origin,
            size: Vec2::new(size.x, HEALTH_BAR_HEIGHT),
            color: self.palette.health_back,
        };
        let fill = DrawCall::Rect {
            position: bar_origin,
            size: Vec2::new(size.x * fraction.clamp(0.0, 1.0), HEALTH_BAR_HEIGHT),
            color: self.palette.health_fill,
        };
        [body, back, fill]
    }
}

fn image_or_rect(
    assets: &dyn AssetProvider,
    key: ImageKey,
    position: Vec2,
    size: Vec2,
    placeholder: Color,
) -> DrawCall {
    match assets.image(key, size) {
        Some(handle) => DrawCall::Image {
            handle,
            position,
            size,
        },
        None => DrawCall::Rect {
            position,
            size,
            color: placeholder,
        },
    }
}
