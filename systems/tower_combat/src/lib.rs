#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that selects targets for ready towers and emits shots.

mod tower;

use std::time::Duration;

use glam::Vec2;
use tile_siege_core::{EnemyId, Health, TowerId};

pub use tower::Tower;

/// Enemy position offered to the towers as a potential target.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TargetCandidate {
    /// Identifier of the enemy.
    pub enemy: EnemyId,
    /// Pixel position of the enemy.
    pub position: Vec2,
    /// Health left before this tick's shots land.
    pub health: Health,
}

/// Damage a tower deals to an enemy on this tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Shot {
    /// Tower that fired.
    pub tower: TowerId,
    /// Enemy that was hit.
    pub enemy: EnemyId,
    /// Damage dealt by the shot.
    pub damage: u32,
}

/// Tower combat system that reuses a scratch buffer between ticks.
#[derive(Debug, Default)]
pub struct TowerCombat {
    candidates: Vec<TargetCandidate>,
}

impl TowerCombat {
    /// Creates a new tower combat system with an empty scratch buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cools every tower down by `dt` and fires the ready ones at their nearest target.
    ///
    /// Towers fire in id order. Equidistant targets resolve to the lower enemy
    /// id. An enemy already finished off by an earlier shot this tick is no
    /// longer a target. A ready tower with nothing in range stays ready.
    pub fn handle(
        &mut self,
        dt: Duration,
        towers: &mut [Tower],
        candidates: &[TargetCandidate],
        out: &mut Vec<Shot>,
    ) {
        for tower in towers.iter_mut() {
            tower.cool_down(dt);
        }

        if candidates.is_empty() {
            return;
        }

        self.candidates.clear();
        self.candidates.extend_from_slice(candidates);
        self.candidates.sort_by_key(|candidate| candidate.enemy);

        towers.sort_by_key(Tower::id);
        for tower in towers.iter_mut().filter(|tower| tower.is_ready()) {
            let Some(target) = nearest_in_range(tower, &self.candidates) else {
                continue;
            };
            let damage = tower.fire();
            if let Some(candidate) = self
                .candidates
                .iter_mut()
                .find(|candidate| candidate.enemy == target)
            {
                candidate.health = candidate.health.saturating_sub(damage);
            }
            out.push(Shot {
                tower: tower.id(),
                enemy: target,
                damage,
            });
        }
    }
}

fn nearest_in_range(tower: &Tower, candidates: &[TargetCandidate]) -> Option<EnemyId> {
    let range_sq = tower.range() * tower.range();
    let mut best: Option<(f32, EnemyId)> = None;

    for candidate in candidates {
        let distance_sq = candidate.position.distance_squared(tower.center());
        if candidate.health.is_zero() || distance_sq > range_sq {
            continue;
        }
        // Candidates arrive sorted by id, so only a strictly closer enemy wins.
        match best {
            Some((closest, _)) if distance_sq >= closest => {}
            _ => best = Some((distance_sq, candidate.enemy)),
        }
    }

    best.map(|(_, enemy)| enemy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tile_siege_core::{config::TowerStats, CellCoord};

    const HEALTH: Health = Health::new(30);

    fn tower(id: u32, center: Vec2) -> Tower {
        Tower::new(
            TowerId::new(id),
            CellCoord::new(0, 0),
            center,
            TowerStats {
                cost: 25,
                range_tiles: 2.0,
                damage: 10,
                cooldown_ms: 500,
            },
            32.0,
        )
    }

    fn candidate(enemy: u32, x: f32, y: f32) -> TargetCandidate {
        TargetCandidate {
            enemy: EnemyId::new(enemy),
            position: Vec2::new(x, y),
            health: HEALTH,
        }
    }

    #[test]
    fn nearest_enemy_in_range_is_targeted() {
        let tower = tower(1, Vec2::ZERO);
        let candidates = [
            candidate(1, 60.0, 0.0),
            candidate(2, 20.0, 0.0),
            candidate(3, 200.0, 0.0),
        ];

        assert_eq!(nearest_in_range(&tower, &candidates), Some(EnemyId::new(2)));
    }

    #[test]
    fn equidistant_enemies_resolve_to_lower_id() {
        let tower = tower(1, Vec2::ZERO);
        let candidates = [candidate(4, 0.0, 30.0), candidate(7, 30.0, 0.0)];

        assert_eq!(nearest_in_range(&tower, &candidates), Some(EnemyId::new(4)));
    }

    #[test]
    fn enemies_beyond_range_are_ignored() {
        let tower = tower(1, Vec2::ZERO);
        assert_eq!(nearest_in_range(&tower, &[candidate(1, 64.5, 0.0)]), None);
        assert_eq!(
            nearest_in_range(&tower, &[candidate(1, 64.0, 0.0)]),
            Some(EnemyId::new(1)),
            "range boundary is inclusive"
        );
    }

    #[test]
    fn finished_enemies_are_skipped() {
        let tower = tower(1, Vec2::ZERO);
        let mut near = candidate(1, 10.0, 0.0);
        near.health = Health::new(0);

        assert_eq!(
            nearest_in_range(&tower, &[near, candidate(2, 50.0, 0.0)]),
            Some(EnemyId::new(2))
        );
    }
}
