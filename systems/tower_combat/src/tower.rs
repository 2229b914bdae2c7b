use std::time::Duration;

use glam::Vec2;
use tile_siege_core::{config::TowerStats, CellCoord, TowerId, TowerSnapshot};

/// Defender built on a placed obstacle.
#[derive(Clone, Debug, PartialEq)]
pub struct Tower {
    id: TowerId,
    cell: CellCoord,
    center: Vec2,
    range: f32,
    damage: u32,
    cooldown: Duration,
    ready_in: Duration,
}

impl Tower {
    /// Creates a tower that is ready to fire immediately.
    #[must_use]
    pub fn new(
        id: TowerId,
        cell: CellCoord,
        center: Vec2,
        stats: TowerStats,
        tile_size: f32,
    ) -> Self {
        Self {
            id,
            cell,
            center,
            range: stats.range_pixels(tile_size),
            damage: stats.damage,
            cooldown: stats.cooldown(),
            ready_in: Duration::ZERO,
        }
    }

    /// Identifier of the tower.
    #[must_use]
    pub const fn id(&self) -> TowerId {
        self.id
    }

    /// Tile the tower occupies.
    #[must_use]
    pub const fn cell(&self) -> CellCoord {
        self.cell
    }

    /// Pixel centre of the tower.
    #[must_use]
    pub const fn center(&self) -> Vec2 {
        self.center
    }

    /// Targeting radius in pixels.
    #[must_use]
    pub const fn range(&self) -> f32 {
        self.range
    }

    /// Reports whether the tower may fire on this tick.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        self.ready_in.is_zero()
    }

    /// Captures a read-only snapshot of the tower.
    #[must_use]
    pub const fn snapshot(&self) -> TowerSnapshot {
        TowerSnapshot {
            id: self.id,
            cell: self.cell,
            center: self.center,
            range: self.range,
            ready_in: self.ready_in,
        }
    }

    pub(crate) fn cool_down(&mut self, dt: Duration) {
        self.ready_in = self.ready_in.saturating_sub(dt);
    }

    pub(crate) fn fire(&mut self) -> u32 {
        self.ready_in = self.cooldown;
        self.damage
    }
}
