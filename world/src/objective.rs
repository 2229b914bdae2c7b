//! Health pool of the defended core.

use tile_siege_core::Health;

/// Defended core that enemies damage by reaching the goal tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Objective {
    health: Health,
    max_health: Health,
}

impl Objective {
    /// Creates an objective at full health.
    #[must_use]
    pub const fn new(max_health: u32) -> Self {
        Self {
            health: Health::new(max_health),
            max_health: Health::new(max_health),
        }
    }

    /// Remaining health.
    #[must_use]
    pub const fn health(&self) -> Health {
        self.health
    }

    /// Health at the start of the session.
    #[must_use]
    pub const fn max_health(&self) -> Health {
        self.max_health
    }

    /// Reports whether the objective ran out of health.
    #[must_use]
    pub const fn is_destroyed(&self) -> bool {
        self.health.is_zero()
    }

    /// Applies damage from an arriving enemy.
    ///
    /// Returns `true` only for the notification that destroyed the objective.
    pub fn notify(&mut self, damage: u32) -> bool {
        if self.is_destroyed() {
            return false;
        }
        self.health = self.health.saturating_sub(damage);
        self.is_destroyed()
    }
}
