#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs Tile Siege sessions headlessly.

mod layout_transfer;
mod level;
mod scores;
mod session;

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use clap::Parser;
use tile_siege_core::{
    config::DefenseConfig, diagnostics::TracingDiagnostics, EnemyKind, WavePlan,
};
use tile_siege_system_scoreboard::{HighScoreTable, ScoreRecord, DEFAULT_MAX_ENTRIES};
use tile_siege_world::{query, DefenseCoordinator};
use tracing_subscriber::EnvFilter;

use layout_transfer::LevelTransfer;
use level::Level;
use scores::JsonFileStore;
use session::{LoggingSoundSink, SessionPlan};

/// Headless Tile Siege driver.
#[derive(Debug, Parser)]
#[command(name = "tile-siege", version)]
struct CliArgs {
    /// TOML file overriding the default configuration.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Level transfer string or path to an ASCII level file.
    #[arg(long, value_name = "LEVEL")]
    level: Option<String>,
    /// Maximum number of simulated ticks.
    #[arg(long, default_value_t = 3600)]
    ticks: u32,
    /// Simulated milliseconds per tick.
    #[arg(long, default_value_t = 16)]
    tick_ms: u64,
    /// Tile to build a tower on before the wave starts; repeatable.
    #[arg(long = "place", value_name = "COLUMN,ROW", value_parser = parse_tile)]
    placements: Vec<(u32, u32)>,
    /// Number of enemies in the wave; zero skips the wave.
    #[arg(long, default_value_t = 5)]
    wave: u32,
    /// Wave number, recorded as the level of the high score.
    #[arg(long, default_value_t = 1)]
    wave_number: u32,
    /// Milliseconds between spawns.
    #[arg(long, default_value_t = 1000)]
    interval_ms: u64,
    /// Enemy kinds cycled through the wave.
    #[arg(long, value_delimiter = ',', value_parser = parse_kind)]
    kinds: Vec<EnemyKind>,
    /// JSON file holding the high-score table.
    #[arg(long, value_name = "PATH")]
    scores: Option<PathBuf>,
    /// Name recorded with the score.
    #[arg(long, default_value = "player")]
    player: String,
    /// Print the level as a transfer string and exit.
    #[arg(long)]
    export: bool,
}

fn parse_tile(value: &str) -> Result<(u32, u32), String> {
    let (column, row) = value
        .split_once(',')
        .ok_or_else(|| format!("expected COLUMN,ROW but got '{value}'"))?;
    let column = column
        .trim()
        .parse()
        .map_err(|_| format!("invalid column '{column}'"))?;
    let row = row
        .trim()
        .parse()
        .map_err(|_| format!("invalid row '{row}'"))?;
    Ok((column, row))
}

fn parse_kind(value: &str) -> Result<EnemyKind, String> {
    EnemyKind::from_name(value).ok_or_else(|| format!("unknown enemy kind '{value}'"))
}

fn load_config(path: Option<&Path>) -> Result<DefenseConfig> {
    let Some(path) = path else {
        return Ok(DefenseConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read configuration {}", path.display()))?;
    toml::from_str(&text)
        .with_context(|| format!("failed to parse configuration {}", path.display()))
}

fn record_score(store: &JsonFileStore, player: &str, score: u32, level: u32) -> Result<()> {
    let mut table = HighScoreTable::load(DEFAULT_MAX_ENTRIES, store)
        .with_context(|| format!("failed to load scores from {}", store.path().display()))?;
    match table.submit(ScoreRecord::new(player, score, level)) {
        Some(rank) => {
            table
                .save(store)
                .with_context(|| format!("failed to save scores to {}", store.path().display()))?;
            println!("high score #{} for {player}", rank + 1);
        }
        None => println!("score {score} did not make the high-score table"),
    }
    Ok(())
}

/// Entry point for the Tile Siege command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = CliArgs::parse();
    let config = load_config(args.config.as_deref())?;
    let level = Level::resolve(args.level.as_deref())?;

    if args.export {
        let transfer = LevelTransfer::new(level.layout, level.tile_size);
        println!("{}", transfer.encode().context("failed to encode level")?);
        return Ok(());
    }

    let grid = level.to_grid(config.display)?;
    let mut coordinator = DefenseCoordinator::new(config, TracingDiagnostics::handle());
    coordinator
        .initialize(&grid, &level.layout.spawns(), level.layout.goal())
        .context("level cannot be played")?;
    println!("{}", query::welcome_banner(&coordinator));

    let wave = (args.wave > 0).then(|| {
        WavePlan::new(
            args.wave_number,
            args.wave,
            Duration::from_millis(args.interval_ms),
            args.kinds.clone(),
        )
    });
    let plan = SessionPlan {
        placements: args.placements.clone(),
        wave,
        ticks: args.ticks,
        tick: Duration::from_millis(args.tick_ms),
    };
    let summary = session::run(&mut coordinator, &plan, &mut LoggingSoundSink)?;
    println!("{summary}");

    if let Some(path) = args.scores {
        let store = JsonFileStore::new(path);
        record_score(&store, &args.player, summary.score(), args.wave_number)?;
    }
    Ok(())
}
