//! Typed configuration for the defense simulation.
//!
//! Every struct deserialises with `#[serde(default)]`, so configuration files
//! only need to name the fields they override.

use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::{grid::Grid, EnemyKind};

/// Top-level configuration consumed by the defense coordinator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefenseConfig {
    /// Display geometry the grid is laid out on.
    pub display: DisplayConfig,
    /// Resources available before the first placement.
    pub starting_resources: u32,
    /// Health of the defended objective.
    pub objective_health: u32,
    /// Factor applied to every enemy's per-tick speed.
    pub speed_multiplier: f32,
    /// Seed for spawn point selection.
    pub spawn_seed: u64,
    /// Per-kind enemy statistics.
    pub enemies: EnemyRoster,
    /// Statistics shared by every placed tower.
    pub tower: TowerStats,
}

impl Default for DefenseConfig {
    fn default() -> Self {
        Self {
            display: DisplayConfig::default(),
            starting_resources: 100,
            objective_health: 20,
            speed_multiplier: 2.0,
            spawn_seed: 0x5eed_0f_5e1e,
            enemies: EnemyRoster::default(),
            tower: TowerStats::default(),
        }
    }
}

/// Pixel geometry of the playing field.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Width of the playing field in pixels.
    pub width: f32,
    /// Height of the playing field in pixels.
    pub height: f32,
    /// Side length of a tile in pixels.
    pub tile_size: f32,
    /// Horizontal pixel offset of the grid origin.
    pub offset_x: f32,
    /// Vertical pixel offset of the grid origin.
    pub offset_y: f32,
}

impl DisplayConfig {
    /// Pixel offset of the grid origin.
    #[must_use]
    pub fn offset(&self) -> Vec2 {
        Vec2::new(self.offset_x, self.offset_y)
    }

    /// Builds an empty grid covering the display.
    #[must_use]
    pub fn empty_grid(&self) -> Grid {
        Grid::from_display(self.width, self.height, self.tile_size).with_offset(self.offset())
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 608.0,
            tile_size: 32.0,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }
}

/// Statistics of a single enemy kind.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyStats {
    /// Base movement in pixels per tick, before the global multiplier.
    pub speed: f32,
    /// Health at spawn.
    pub max_health: u32,
    /// Damage dealt to the objective on arrival.
    pub damage: u32,
    /// Resources awarded when a tower destroys the enemy.
    pub reward: u32,
}

impl Default for EnemyStats {
    fn default() -> Self {
        Self {
            speed: 1.0,
            max_health: 30,
            damage: 1,
            reward: 5,
        }
    }
}

/// Statistics for every enemy kind.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyRoster {
    /// Balanced baseline enemy.
    pub grunt: EnemyStats,
    /// Fast enemy with little health.
    pub runner: EnemyStats,
    /// Slow enemy with a large health pool.
    pub brute: EnemyStats,
}

impl EnemyRoster {
    /// Statistics for the provided kind.
    #[must_use]
    pub const fn stats(&self, kind: EnemyKind) -> EnemyStats {
        match kind {
            EnemyKind::Grunt => self.grunt,
            EnemyKind::Runner => self.runner,
            EnemyKind::Brute => self.brute,
        }
    }
}

impl Default for EnemyRoster {
    fn default() -> Self {
        Self {
            grunt: EnemyStats::default(),
            runner: EnemyStats {
                speed: 2.0,
                max_health: 15,
                damage: 1,
                reward: 4,
            },
            brute: EnemyStats {
                speed: 0.5,
                max_health: 90,
                damage: 3,
                reward: 12,
            },
        }
    }
}

/// Statistics shared by every tower.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TowerStats {
    /// Resources deducted per placement.
    pub cost: u32,
    /// Targeting radius measured in tiles.
    pub range_tiles: f32,
    /// Damage dealt per shot.
    pub damage: u32,
    /// Milliseconds between consecutive shots.
    pub cooldown_ms: u64,
}

impl TowerStats {
    /// Targeting radius converted into pixels.
    #[must_use]
    pub fn range_pixels(&self, tile_size: f32) -> f32 {
        (self.range_tiles * tile_size).max(0.0)
    }

    /// Time between consecutive shots.
    #[must_use]
    pub const fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }
}

impl Default for TowerStats {
    fn default() -> Self {
        Self {
            cost: 25,
            range_tiles: 2.5,
            damage: 10,
            cooldown_ms: 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_display_covers_whole_tiles() {
        let grid = DisplayConfig::default().empty_grid();
        assert_eq!(grid.columns(), 25);
        assert_eq!(grid.rows(), 19);
    }

    #[test]
    fn roster_selects_stats_by_kind() {
        let roster = EnemyRoster::default();
        assert_eq!(roster.stats(EnemyKind::Runner).max_health, 15);
        assert_eq!(roster.stats(EnemyKind::Brute).damage, 3);
    }

    #[test]
    fn tower_range_scales_with_tile_size() {
        let stats = TowerStats::default();
        assert!((stats.range_pixels(32.0) - 80.0).abs() < f32::EPSILON);
        assert_eq!(stats.cooldown(), Duration::from_millis(500));
    }
}
