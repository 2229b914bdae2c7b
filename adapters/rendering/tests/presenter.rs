use std::time::Duration;

use anyhow::Result as AnyResult;
use glam::Vec2;
use tile_siege_core::{
    grid::{Grid, TileKind},
    AgentSnapshot, AgentState, AgentView, CellCoord, EnemyId, EnemyKind, Event, Health,
    PlacementError, TowerId, TowerSnapshot, TowerView,
};
use tile_siege_rendering::{
    play_event_sounds, sound_for, AssetProvider, DrawCall, FontHandle, ImageHandle, ImageKey,
    Palette, PlaceholderAssets, PlacementHighlight, Presenter, Scene, Screen, ScreenQuery,
    SoundHandle, SoundKey, SoundSink,
};

struct FixedScreen(Screen);

impl ScreenQuery for FixedScreen {
    fn current_screen(&self) -> Screen {
        self.0
    }
}

struct TowerArtOnly;

impl AssetProvider for TowerArtOnly {
    fn image(&self, key: ImageKey, _size: Vec2) -> Option<ImageHandle> {
        (key == ImageKey::Tower).then_some(ImageHandle(7))
    }

    fn sound(&self, key: SoundKey) -> Option<SoundHandle> {
        (key != SoundKey::Shot).then_some(SoundHandle(1))
    }

    fn font(&self, _name: &str, _size: u16) -> Option<FontHandle> {
        None
    }
}

#[derive(Default)]
struct RecordingSink {
    played: Vec<SoundKey>,
}

impl SoundSink for RecordingSink {
    fn play_sound(&mut self, key: SoundKey) -> AnyResult<()> {
        self.played.push(key);
        Ok(())
    }
}

fn scene() -> Scene {
    let mut grid = Grid::new(2, 2, 32.0);
    let _ = grid.set(CellCoord::new(1, 1), TileKind::Core);
    let _ = grid.set(CellCoord::new(0, 1), TileKind::OccupiedTurretSlot);
    let agents = AgentView::from_snapshots(vec![AgentSnapshot {
        id: EnemyId::new(0),
        kind: EnemyKind::Runner,
        position: Vec2::new(16.0, 48.0),
        cell: Some(CellCoord::new(1, 0)),
        health: Health::new(5),
        max_health: Health::new(10),
        state: AgentState::Traveling,
        needs_recalculation: false,
    }]);
    let towers = TowerView::from_snapshots(vec![TowerSnapshot {
        id: TowerId::new(0),
        cell: CellCoord::new(0, 1),
        center: Vec2::new(48.0, 16.0),
        range: 80.0,
        ready_in: Duration::ZERO,
    }]);
    Scene::new(grid, agents, towers, None)
}

#[test]
fn missing_images_fall_back_to_placeholder_rectangles() {
    let palette = Palette::default();
    let presenter = Presenter::new(palette);
    let mut calls: Vec<DrawCall> = Vec::new();

    let submitted = presenter
        .draw(&scene(), &PlaceholderAssets, &mut calls)
        .expect("vector sink never fails");

    assert_eq!(submitted, 8, "four tiles, one tower, body plus two bar layers");
    assert_eq!(calls.len(), 8);
    assert!(calls
        .iter()
        .all(|call| matches!(call, DrawCall::Rect { .. })));
    assert_eq!(
        calls[3],
        DrawCall::Rect {
            position: Vec2::new(32.0, 32.0),
            size: Vec2::splat(32.0),
            color: palette.core,
        }
    );
    assert_eq!(
        calls[5],
        DrawCall::Rect {
            position: Vec2::new(4.0, 36.0),
            size: Vec2::splat(24.0),
            color: palette.runner,
        }
    );
    assert_eq!(
        calls[7],
        DrawCall::Rect {
            position: Vec2::new(4.0, 30.0),
            size: Vec2::new(12.0, 4.0),
            color: palette.health_fill,
        }
    );
}

#[test]
fn resolved_images_are_drawn_as_images() {
    let presenter = Presenter::default();
    let mut calls: Vec<DrawCall> = Vec::new();

    let _ = presenter
        .draw(&scene(), &TowerArtOnly, &mut calls)
        .expect("vector sink never fails");

    assert_eq!(
        calls[4],
        DrawCall::Image {
            handle: ImageHandle(7),
            position: Vec2::new(32.0, 0.0),
            size: Vec2::splat(32.0),
        }
    );
}

#[test]
fn highlight_is_drawn_last() {
    let presenter = Presenter::default();
    let mut scene = scene();
    scene.highlight = Some(PlacementHighlight {
        cell: CellCoord::new(0, 0),
        placeable: false,
    });
    let mut calls: Vec<DrawCall> = Vec::new();

    let submitted = presenter
        .draw(&scene, &PlaceholderAssets, &mut calls)
        .expect("vector sink never fails");

    assert_eq!(submitted, 9);
    assert_eq!(
        calls.last(),
        Some(&DrawCall::Rect {
            position: Vec2::ZERO,
            size: Vec2::splat(32.0),
            color: Palette::default().blocked,
        })
    );
}

#[test]
fn nothing_is_drawn_outside_chapters() {
    let presenter = Presenter::default();
    let mut calls: Vec<DrawCall> = Vec::new();

    let submitted = presenter
        .present(
            &FixedScreen(Screen::Menu),
            &scene(),
            &PlaceholderAssets,
            &mut calls,
        )
        .expect("no draw calls");
    assert_eq!(submitted, 0);
    assert!(calls.is_empty());

    let submitted = presenter
        .present(
            &FixedScreen(Screen::Chapter(1)),
            &scene(),
            &PlaceholderAssets,
            &mut calls,
        )
        .expect("vector sink never fails");
    assert_eq!(submitted, 8);
}

#[test]
fn events_map_to_sounds() {
    assert_eq!(
        sound_for(&Event::ObjectiveDestroyed),
        Some(SoundKey::Defeat)
    );
    assert_eq!(
        sound_for(&Event::PlacementRejected {
            cell: None,
            reason: PlacementError::WouldBlockPath,
        }),
        Some(SoundKey::Denied)
    );
    assert_eq!(sound_for(&Event::PathsInvalidated { enemies: 3 }), None);
}

#[test]
fn sounds_without_assets_are_skipped() {
    let events = [
        Event::TowerFired {
            tower: TowerId::new(0),
            enemy: EnemyId::new(1),
        },
        Event::EnemyDestroyed {
            enemy: EnemyId::new(1),
            reward: 5,
        },
        Event::WaveStarted { wave: 1, count: 1 },
    ];
    let mut sink = RecordingSink::default();

    let played = play_event_sounds(&events, &TowerArtOnly, &mut sink).expect("recording sink");

    assert_eq!(played, 1);
    assert_eq!(sink.played, vec![SoundKey::EnemyDown]);
    assert_eq!(
        play_event_sounds(&events, &PlaceholderAssets, &mut sink).expect("recording sink"),
        0
    );
}

#[test]
fn reloading_towers_are_drawn_lighter() {
    let palette = Palette::default();
    let mut scene = scene();
    scene.towers = TowerView::from_snapshots(vec![TowerSnapshot {
        id: TowerId::new(0),
        cell: CellCoord::new(0, 1),
        center: Vec2::new(48.0, 16.0),
        range: 80.0,
        ready_in: Duration::from_millis(200),
    }]);
    let mut calls: Vec<DrawCall> = Vec::new();

    let _ = Presenter::new(palette)
        .draw(&scene, &PlaceholderAssets, &mut calls)
        .expect("vector sink never fails");

    assert_eq!(
        calls[4],
        DrawCall::Rect {
            position: Vec2::new(32.0, 0.0),
            size: Vec2::splat(32.0),
            color: palette.tower.lighten(0.35),
        }
    );
}
