use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tile_siege_core::{
    diagnostics::TracingDiagnostics,
    grid::{Grid, TileKind},
    layout::LevelLayout,
    CellCoord, Command, Event, PlacementError,
};
use tile_siege_system_builder::{
    Builder, BuilderInput, PlacementPreview, PlacementSite, PlacementValidator,
};
use tile_siege_system_pathfinding::Pathfinder;

fn pathfinder() -> Pathfinder {
    Pathfinder::new(TracingDiagnostics::handle())
}

fn preview_at(cell: CellCoord, placeable: bool) -> PlacementPreview {
    PlacementPreview::new(cell, Vec2::new(48.0, 48.0), 25, placeable)
}

#[test]
fn confirm_emits_place_command_for_placeable_preview() {
    let mut builder = Builder::default();
    let mut commands = Vec::new();
    let cursor = Vec2::new(50.0, 40.0);

    builder.handle(
        &[],
        Some(preview_at(CellCoord::new(1, 1), true)),
        BuilderInput::new(true, Some(cursor)),
        &mut commands,
    );

    assert_eq!(
        commands,
        vec![Command::PlaceObstacle { position: cursor }],
        "builder should emit a placement command when confirming a valid preview",
    );
}

#[test]
fn confirm_ignored_when_preview_not_placeable() {
    let mut builder = Builder::default();
    let mut commands = Vec::new();

    builder.handle(
        &[],
        Some(preview_at(CellCoord::new(1, 1), false)),
        BuilderInput::new(true, Some(Vec2::new(50.0, 40.0))),
        &mut commands,
    );

    assert!(
        commands.is_empty(),
        "invalid preview must not emit commands"
    );
}

#[test]
fn hovering_without_confirm_emits_nothing() {
    let mut builder = Builder::default();
    let mut commands = Vec::new();

    builder.handle(
        &[],
        Some(preview_at(CellCoord::new(1, 1), true)),
        BuilderInput::new(false, Some(Vec2::new(50.0, 40.0))),
        &mut commands,
    );

    assert!(commands.is_empty());
}

#[test]
fn building_stops_after_objective_destroyed() {
    let mut builder = Builder::default();
    let mut commands = Vec::new();

    builder.handle(
        &[Event::ObjectiveDestroyed],
        Some(preview_at(CellCoord::new(1, 1), true)),
        BuilderInput::new(true, None),
        &mut commands,
    );
    builder.handle(
        &[],
        Some(preview_at(CellCoord::new(1, 1), true)),
        BuilderInput::new(true, None),
        &mut commands,
    );

    assert!(
        commands.is_empty(),
        "no placements once the objective has fallen"
    );
}

#[test]
fn sealing_the_only_corridor_is_rejected_without_mutation() {
    let layout = LevelLayout::parse(&[
        "S.#..", //
        "..#..", //
        ".....", //
        "..#.C",
    ])
    .expect("valid layout");
    let mut grid = layout.to_grid(32.0);
    let before = grid.clone();
    let spawns = layout.spawns();
    let goal = layout.goal().expect("goal");
    let pathfinder = pathfinder();
    let validator = PlacementValidator::new(&pathfinder, &spawns, goal);

    let corridor = CellCoord::new(2, 2);
    assert!(!validator.can_place(&mut grid, corridor));
    assert_eq!(
        validator.check(&mut grid, corridor),
        Err(PlacementError::WouldBlockPath)
    );
    assert_eq!(grid, before, "rejected probe must restore the grid");

    let side = CellCoord::new(2, 0);
    assert!(validator.can_place(&mut grid, side));
    assert_eq!(grid, before, "accepted probe must restore the grid");
}

#[test]
fn designated_slot_bypasses_connectivity_check() {
    let layout = LevelLayout::parse(&[
        "S.#..", //
        "..#..", //
        "..T..", //
        "..#.C",
    ])
    .expect("valid layout");
    let mut grid = layout.to_grid(32.0);
    let spawns = layout.spawns();
    let goal = layout.goal().expect("goal");
    let pathfinder = pathfinder();
    let validator = PlacementValidator::new(&pathfinder, &spawns, goal);

    assert_eq!(
        validator.check(&mut grid, CellCoord::new(2, 2)),
        Ok(PlacementSite::DesignatedSlot),
        "turret slots are accepted even when they seal the corridor"
    );
}

#[test]
fn out_of_bounds_and_blocked_tiles_are_rejected() {
    let layout = LevelLayout::parse(&["S#X.C"]).expect("valid layout");
    let mut grid = layout.to_grid(32.0);
    let spawns = layout.spawns();
    let goal = layout.goal().expect("goal");
    let pathfinder = pathfinder();
    let validator = PlacementValidator::new(&pathfinder, &spawns, goal);

    assert_eq!(
        validator.check(&mut grid, CellCoord::new(0, 9)),
        Err(PlacementError::InvalidCoordinate)
    );
    assert_eq!(
        validator.check(&mut grid, CellCoord::new(0, 1)),
        Err(PlacementError::NotWalkable)
    );
    assert_eq!(
        validator.check(&mut grid, CellCoord::new(0, 2)),
        Err(PlacementError::NotWalkable)
    );
}

#[test]
fn goal_tile_can_never_be_blocked() {
    let grid_layout = LevelLayout::parse(&["S...C"]).expect("valid layout");
    let mut grid = grid_layout.to_grid(32.0);
    let spawns = grid_layout.spawns();
    let goal = grid_layout.goal().expect("goal");
    let pathfinder = pathfinder();
    let validator = PlacementValidator::new(&pathfinder, &spawns, goal);

    assert!(!validator.can_place(&mut grid, goal));
    assert_eq!(grid.tile(goal), Some(TileKind::Core));
}

#[test]
fn random_placements_never_mutate_grid_and_keep_spawns_connected() {
    let mut rng = ChaCha8Rng::seed_from_u64(0x51ee_7e11);
    let pathfinder = pathfinder();

    for _ in 0..40 {
        let mut grid = Grid::new(8, 8, 16.0);
        let goal = CellCoord::new(7, 7);
        let _ = grid.set(goal, TileKind::Core);
        let spawns = vec![CellCoord::new(0, 0), CellCoord::new(0, 7)];

        for _ in 0..30 {
            let cell = CellCoord::new(rng.gen_range(0..8), rng.gen_range(0..8));
            let validator = PlacementValidator::new(&pathfinder, &spawns, goal);
            let before = grid.clone();
            let accepted = validator.can_place(&mut grid, cell);
            assert_eq!(grid, before, "probe must leave the grid untouched");

            if accepted {
                let _ = grid.set(cell, TileKind::OccupiedTurretSlot);
                for spawn in &spawns {
                    assert!(
                        !pathfinder.find_path(&grid, *spawn, goal).is_empty(),
                        "placement at {cell:?} disconnected spawn {spawn:?}"
                    );
                }
            }
        }
    }
}
