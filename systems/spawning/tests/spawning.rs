use std::time::Duration;

use tile_siege_core::{CellCoord, EnemyKind, WavePlan};
use tile_siege_system_spawning::{SpawnOrder, WaveProgress, WaveSpawner};

const TICK: Duration = Duration::from_millis(100);

fn spawners() -> Vec<CellCoord> {
    vec![
        CellCoord::new(0, 0),
        CellCoord::new(0, 4),
        CellCoord::new(3, 0),
    ]
}

#[test]
fn three_enemy_wave_spawns_one_per_tick() {
    let mut spawner = WaveSpawner::new(0x1234_5678);
    spawner.start(WavePlan::new(1, 3, TICK, Vec::new()));
    let mut orders = Vec::new();

    assert_eq!(
        spawner.progress(),
        Some(WaveProgress {
            wave: 1,
            count: 3,
            spawned: 0
        })
    );

    for expected in 1..=3 {
        spawner.advance(TICK, &spawners(), &mut orders);
        assert_eq!(orders.len(), expected);
    }

    spawner.advance(TICK, &spawners(), &mut orders);
    assert_eq!(orders.len(), 3, "no enemies beyond the declared count");
    assert!(spawner.progress().is_some_and(|progress| progress.all_spawned()));
}

#[test]
fn large_step_spawns_every_due_enemy_up_to_count() {
    let mut spawner = WaveSpawner::new(1);
    spawner.start(WavePlan::new(2, 4, Duration::from_millis(500), Vec::new()));
    let mut orders = Vec::new();

    spawner.advance(Duration::from_secs(10), &spawners(), &mut orders);

    assert_eq!(orders.len(), 4);
}

#[test]
fn kinds_cycle_through_the_declared_sequence() {
    let mut spawner = WaveSpawner::new(3);
    spawner.start(WavePlan::new(
        1,
        5,
        TICK,
        vec![EnemyKind::Runner, EnemyKind::Brute],
    ));
    let mut orders = Vec::new();

    spawner.advance(TICK * 5, &spawners(), &mut orders);

    let kinds: Vec<_> = orders.iter().map(|order| order.kind).collect();
    assert_eq!(
        kinds,
        vec![
            EnemyKind::Runner,
            EnemyKind::Brute,
            EnemyKind::Runner,
            EnemyKind::Brute,
            EnemyKind::Runner,
        ]
    );
}

#[test]
fn empty_kind_sequence_spawns_grunts() {
    let mut spawner = WaveSpawner::new(3);
    spawner.start(WavePlan::new(1, 2, TICK, Vec::new()));
    let mut orders = Vec::new();

    spawner.advance(TICK * 2, &spawners(), &mut orders);

    assert!(orders.iter().all(|order| order.kind == EnemyKind::Grunt));
}

#[test]
fn spawn_points_are_reproducible_for_a_seed() {
    let run = |seed: u64| -> Vec<SpawnOrder> {
        let mut spawner = WaveSpawner::new(seed);
        spawner.start(WavePlan::new(1, 32, TICK, Vec::new()));
        let mut orders = Vec::new();
        for _ in 0..32 {
            spawner.advance(TICK, &spawners(), &mut orders);
        }
        orders
    };

    let first = run(0xfeed);
    assert_eq!(first, run(0xfeed));
    assert!(first
        .iter()
        .all(|order| spawners().contains(&order.spawn)));
    assert!(
        spawners()
            .iter()
            .all(|spawn| first.iter().any(|order| order.spawn == *spawn)),
        "every spawn point is used over a long wave"
    );
}

#[test]
fn zero_interval_releases_whole_wave() {
    let mut spawner = WaveSpawner::new(9);
    spawner.start(WavePlan::new(1, 6, Duration::ZERO, Vec::new()));
    let mut orders = Vec::new();

    spawner.advance(Duration::ZERO, &spawners(), &mut orders);

    assert_eq!(orders.len(), 6);
}

#[test]
fn missing_spawn_points_hold_the_wave() {
    let mut spawner = WaveSpawner::new(9);
    spawner.start(WavePlan::new(1, 2, TICK, Vec::new()));
    let mut orders = Vec::new();

    spawner.advance(TICK * 4, &[], &mut orders);
    assert!(orders.is_empty());

    let finished = spawner.finish();
    assert_eq!(finished.map(|plan| plan.wave), Some(1));
    assert!(!spawner.is_active());
}
