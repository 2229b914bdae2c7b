#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic wave spawner that turns elapsed time into spawn orders.

use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tile_siege_core::{CellCoord, EnemyKind, WavePlan};

/// Request to create one enemy at a spawn point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpawnOrder {
    /// Kind of the enemy to create.
    pub kind: EnemyKind,
    /// Spawn tile the enemy starts on.
    pub spawn: CellCoord,
}

/// Progress of the wave currently owned by the spawner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WaveProgress {
    /// Sequential number of the wave.
    pub wave: u32,
    /// Enemies the wave spawns in total.
    pub count: u32,
    /// Enemies spawned so far.
    pub spawned: u32,
}

impl WaveProgress {
    /// Reports whether every enemy of the wave has spawned.
    #[must_use]
    pub const fn all_spawned(&self) -> bool {
        self.spawned >= self.count
    }
}

/// Spawns the enemies of one wave at a fixed cadence.
#[derive(Debug)]
pub struct WaveSpawner {
    rng: ChaCha8Rng,
    plan: Option<WavePlan>,
    accumulator: Duration,
    spawned: u32,
}

impl WaveSpawner {
    /// Creates an idle spawner whose spawn point choices derive from the seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            plan: None,
            accumulator: Duration::ZERO,
            spawned: 0,
        }
    }

    /// Begins a new wave, discarding whatever the spawner tracked before.
    pub fn start(&mut self, plan: WavePlan) {
        self.plan = Some(plan);
        self.accumulator = Duration::ZERO;
        self.spawned = 0;
    }

    /// Reports whether a wave is being tracked.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.plan.is_some()
    }

    /// Progress of the tracked wave.
    #[must_use]
    pub fn progress(&self) -> Option<WaveProgress> {
        self.plan.as_ref().map(|plan| WaveProgress {
            wave: plan.wave,
            count: plan.count,
            spawned: self.spawned,
        })
    }

    /// Stops tracking the current wave and returns its plan.
    pub fn finish(&mut self) -> Option<WavePlan> {
        self.accumulator = Duration::ZERO;
        self.spawned = 0;
        self.plan.take()
    }

    /// Accumulates elapsed time and emits one order per elapsed interval.
    ///
    /// A zero interval releases every remaining enemy at once. Nothing spawns
    /// while no spawn points are available.
    pub fn advance(&mut self, dt: Duration, spawners: &[CellCoord], out: &mut Vec<SpawnOrder>) {
        let Some(plan) = self.plan.as_ref() else {
            return;
        };
        let remaining = plan.count.saturating_sub(self.spawned);
        if remaining == 0 || spawners.is_empty() {
            return;
        }

        let due = if plan.spawn_interval.is_zero() {
            remaining
        } else {
            self.accumulator = self.accumulator.saturating_add(dt);
            let mut due = 0;
            while due < remaining && self.accumulator >= plan.spawn_interval {
                self.accumulator -= plan.spawn_interval;
                due += 1;
            }
            due
        };

        for _ in 0..due {
            let kind = plan.kind_at(self.spawned);
            let spawn = spawners[self.rng.gen_range(0..spawners.len())];
            out.push(SpawnOrder { kind, spawn });
            self.spawned += 1;
        }

        if self.spawned >= plan.count {
            self.accumulator = Duration::ZERO;
        }
    }
}
