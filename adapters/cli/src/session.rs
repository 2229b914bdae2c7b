//! Headless session driver.

use std::{fmt, time::Duration};

use anyhow::{Context, Result};
use glam::Vec2;
use tile_siege_core::{CellCoord, Command, Event, WavePlan};
use tile_siege_rendering::{
    play_event_sounds, AssetProvider, DrawCall, FontHandle, ImageHandle, ImageKey, Presenter,
    Scene, Screen, ScreenQuery, SoundHandle, SoundKey, SoundSink,
};
use tile_siege_system_builder::{Builder, BuilderInput};
use tile_siege_world::{self as world, query, DefenseCoordinator};

/// Scripted inputs for one headless run.
#[derive(Clone, Debug)]
pub(crate) struct SessionPlan {
    /// Tiles to build on before the wave, as `(column, row)` pairs.
    pub(crate) placements: Vec<(u32, u32)>,
    /// Wave to start once building is done.
    pub(crate) wave: Option<WavePlan>,
    /// Upper bound on simulated ticks.
    pub(crate) ticks: u32,
    /// Simulated time per tick.
    pub(crate) tick: Duration,
}

/// Totals gathered while a session ran.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Summary {
    pub(crate) ticks_run: u32,
    pub(crate) towers_built: u32,
    pub(crate) placements_skipped: u32,
    pub(crate) spawned: u32,
    pub(crate) destroyed: u32,
    pub(crate) reached_goal: u32,
    pub(crate) rewards: u32,
    pub(crate) sounds_played: usize,
    pub(crate) draw_calls: usize,
    pub(crate) objective_health: u32,
    pub(crate) resources: u32,
    pub(crate) wave_completed: bool,
    pub(crate) defeated: bool,
}

const HEALTH_SCORE: u32 = 10;

impl Summary {
    /// Rewards earned plus a bonus for every point of objective health left.
    pub(crate) fn score(&self) -> u32 {
        self.rewards
            .saturating_add(self.objective_health.saturating_mul(HEALTH_SCORE))
    }

    fn outcome(&self) -> &'static str {
        if self.defeated {
            "defeat"
        } else if self.wave_completed {
            "wave cleared"
        } else {
            "out of ticks"
        }
    }

    fn record(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::EnemySpawned { .. } => self.spawned += 1,
                Event::EnemyDestroyed { reward, .. } => {
                    self.destroyed += 1;
                    self.rewards += reward;
                }
                Event::EnemyReachedGoal { .. } => self.reached_goal += 1,
                Event::ObstaclePlaced { .. } => self.towers_built += 1,
                Event::WaveCompleted { .. } => self.wave_completed = true,
                Event::ObjectiveDestroyed => self.defeated = true,
                Event::EnemyStranded { enemy } => {
                    tracing::warn!(enemy = enemy.get(), "enemy has no route to the core");
                }
                Event::PlacementRejected { cell, reason } => {
                    tracing::warn!(?cell, %reason, "placement rejected");
                }
                Event::TowerFired { .. }
                | Event::PathsInvalidated { .. }
                | Event::WaveStarted { .. } => {}
            }
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "outcome:        {}", self.outcome())?;
        writeln!(f, "ticks:          {}", self.ticks_run)?;
        writeln!(
            f,
            "towers:         {} built, {} skipped",
            self.towers_built, self.placements_skipped
        )?;
        writeln!(
            f,
            "enemies:        {} spawned, {} destroyed, {} reached the core",
            self.spawned, self.destroyed, self.reached_goal
        )?;
        writeln!(f, "core health:    {}", self.objective_health)?;
        writeln!(f, "resources:      {}", self.resources)?;
        write!(f, "score:          {}", self.score())
    }
}

/// Asset provider for headless runs: every sound resolves, images and fonts never do.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct HeadlessAssets;

impl AssetProvider for HeadlessAssets {
    fn image(&self, _key: ImageKey, _size: Vec2) -> Option<ImageHandle> {
        None
    }

    fn sound(&self, key: SoundKey) -> Option<SoundHandle> {
        Some(SoundHandle(key as u32))
    }

    fn font(&self, _name: &str, _size: u16) -> Option<FontHandle> {
        None
    }
}

/// Sound sink that logs every effect instead of playing it.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct LoggingSoundSink;

impl SoundSink for LoggingSoundSink {
    fn play_sound(&mut self, key: SoundKey) -> Result<()> {
        tracing::debug!(sound = key.name(), "play sound");
        Ok(())
    }
}

struct ChapterScreen(u32);

impl ScreenQuery for ChapterScreen {
    fn current_screen(&self) -> Screen {
        Screen::Chapter(self.0)
    }
}

/// Builds the scripted towers, runs the wave and renders the final frame.
pub(crate) fn run(
    coordinator: &mut DefenseCoordinator,
    plan: &SessionPlan,
    sounds: &mut dyn SoundSink,
) -> Result<Summary> {
    let mut summary = Summary::default();
    let mut events = Vec::new();
    let mut builder = Builder::new();
    let mut commands = Vec::new();

    for &(column, row) in &plan.placements {
        let Some(position) = query::grid(coordinator)
            .map(|grid| grid.cell_center(CellCoord::new(row, column)))
        else {
            break;
        };
        let preview = coordinator.preview_placement(position);
        builder.handle(
            &events,
            preview,
            BuilderInput::new(true, Some(position)),
            &mut commands,
        );
        if commands.is_empty() {
            tracing::warn!(column, row, "tile cannot take a tower; skipping");
            summary.placements_skipped += 1;
        }
        events.clear();
        for command in commands.drain(..) {
            world::apply(coordinator, command, &mut events);
        }
        summary.sounds_played += settle(&mut summary, &events, sounds)?;
    }

    let mut chapter = 0;
    if let Some(wave) = plan.wave.clone() {
        chapter = wave.wave;
        events.clear();
        world::apply(coordinator, Command::StartWave { plan: wave }, &mut events);
        summary.sounds_played += settle(&mut summary, &events, sounds)?;
    }

    for _ in 0..plan.ticks {
        events.clear();
        world::apply(coordinator, Command::Tick { dt: plan.tick }, &mut events);
        summary.ticks_run += 1;
        summary.sounds_played += settle(&mut summary, &events, sounds)?;
        if summary.defeated || summary.wave_completed {
            break;
        }
    }

    summary.objective_health = query::objective(coordinator).health().get();
    summary.resources = query::resources(coordinator);
    summary.draw_calls = render(coordinator, chapter)?;
    tracing::info!(
        ticks = summary.ticks_run,
        sounds = summary.sounds_played,
        draw_calls = summary.draw_calls,
        "session finished"
    );
    Ok(summary)
}

fn settle(summary: &mut Summary, events: &[Event], sounds: &mut dyn SoundSink) -> Result<usize> {
    summary.record(events);
    play_event_sounds(events, &HeadlessAssets, sounds).context("failed to play event sounds")
}

fn render(coordinator: &DefenseCoordinator, chapter: u32) -> Result<usize> {
    let Some(grid) = query::grid(coordinator) else {
        return Ok(0);
    };
    let scene = Scene::new(
        grid.clone(),
        query::agent_view(coordinator),
        query::tower_view(coordinator),
        None,
    );
    let mut calls: Vec<DrawCall> = Vec::new();
    Presenter::default()
        .present(&ChapterScreen(chapter), &scene, &HeadlessAssets, &mut calls)
        .context("failed to render final frame")
}

#[cfg(test)]
mod tests {
    use tile_siege_core::{
        config::DefenseConfig, diagnostics::TracingDiagnostics, layout::LevelLayout,
    };

    use super::*;

    const TICK: Duration = Duration::from_millis(100);

    fn coordinator_for(rows: &[&str]) -> DefenseCoordinator {
        let layout = LevelLayout::parse(rows).expect("valid layout");
        let mut coordinator =
            DefenseCoordinator::new(DefenseConfig::default(), TracingDiagnostics::handle());
        coordinator
            .initialize(&layout.to_grid(32.0), &layout.spawns(), layout.goal())
            .expect("valid configuration");
        coordinator
    }

    fn plan(placements: Vec<(u32, u32)>) -> SessionPlan {
        SessionPlan {
            placements,
            wave: Some(WavePlan::new(1, 1, TICK, Vec::new())),
            ticks: 200,
            tick: TICK,
        }
    }

    #[test]
    fn undefended_core_takes_damage_and_scores_remaining_health() {
        let mut coordinator = coordinator_for(&["S...C"]);

        let summary =
            run(&mut coordinator, &plan(Vec::new()), &mut LoggingSoundSink).expect("session runs");

        assert_eq!(summary.spawned, 1);
        assert_eq!(summary.reached_goal, 1);
        assert_eq!(summary.objective_health, 19);
        assert!(summary.wave_completed);
        assert!(!summary.defeated);
        assert!(summary.ticks_run < 200);
        assert_eq!(summary.sounds_played, 3, "spawn, core hit and wave clear");
        assert_eq!(summary.draw_calls, 5, "enemy left the field");
        assert_eq!(summary.score(), 190);
    }

    #[test]
    fn scripted_tower_kills_the_wave() {
        let mut coordinator = coordinator_for(&["S....C", "......"]);

        let summary = run(
            &mut coordinator,
            &plan(vec![(2, 1), (9, 0)]),
            &mut LoggingSoundSink,
        )
        .expect("session runs");

        assert_eq!(summary.towers_built, 1);
        assert_eq!(summary.placements_skipped, 1);
        assert_eq!(summary.destroyed, 1);
        assert_eq!(summary.rewards, 5);
        assert_eq!(summary.resources, 80);
        assert_eq!(summary.objective_health, 20);
        assert_eq!(summary.draw_calls, 13, "twelve tiles and one tower");
        assert_eq!(summary.score(), 205);
        assert!(summary.to_string().contains("wave cleared"));
    }
}
