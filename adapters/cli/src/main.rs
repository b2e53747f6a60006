#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a headless Lane Defence game.
//!
//! The adapter loads a configuration, drives the world with fixed-size ticks
//! while a scripted player issues commands, and prints the match report once
//! the game ends or the time limit is reached.

mod autoplay;
mod score_store;

use std::{fs, path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use lane_defence_core::{Command, GameState, SimulationConfig};
use lane_defence_system_analytics::Analytics;
use lane_defence_world::{apply, query, World};
use tracing::{info, warn};

use crate::score_store::BestScore;

/// Headless Lane Defence simulation.
#[derive(Debug, Parser)]
#[command(name = "lane-defence", version)]
struct CliArgs {
    /// TOML file overriding the default simulation configuration.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Overrides the configured random seed.
    #[arg(long)]
    seed: Option<u64>,
    /// Simulated seconds to play before stopping.
    #[arg(long, default_value_t = 600)]
    seconds: u64,
    /// Simulated milliseconds advanced by each tick.
    #[arg(long, default_value_t = 16, value_parser = clap::value_parser!(u64).range(1..))]
    tick_ms: u64,
    /// File that keeps the best score across runs.
    #[arg(long, value_name = "PATH", default_value = "lane-defence-best.toml")]
    best_score_file: PathBuf,
    /// Only advance time; the scripted player issues no commands.
    #[arg(long)]
    idle: bool,
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }
}

fn load_config(args: &CliArgs) -> Result<SimulationConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("failed to parse config {}", path.display()))?
        }
        None => SimulationConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    Ok(config)
}

/// Entry point for the Lane Defence command-line interface.
fn main() -> Result<()> {
    init_tracing();
    let args = CliArgs::parse();

    let config = load_config(&args)?;
    let mut world = World::with_config(config).context("invalid simulation configuration")?;
    println!("{}", query::welcome_banner(&world));
    for entry in query::cost_table(&world) {
        println!("  {:<15}{:>4}", entry.kind.label(), entry.cost);
    }

    let mut best = BestScore::load(&args.best_score_file)?;
    let mut analytics = Analytics::new();
    let mut events = Vec::new();

    let _ = apply(&mut world, Command::StartGame, &mut events);
    analytics.handle(&events);
    events.clear();

    let dt = Duration::from_millis(args.tick_ms);
    let frames = args.seconds.saturating_mul(1_000) / args.tick_ms;
    for _ in 0..frames {
        if !args.idle {
            for command in autoplay::plan(&world) {
                let _ = apply(&mut world, command, &mut events);
            }
        }
        let _ = apply(&mut world, Command::Tick { dt }, &mut events);
        analytics.handle(&events);
        events.clear();

        if query::game_state(&world).is_terminal() {
            break;
        }
    }

    let state = query::game_state(&world);
    let score = query::score(&world);
    let progress = query::wave_progress(&world);
    match state {
        GameState::Won => info!(score, "all waves cleared"),
        GameState::GameOver => info!(score, wave = progress.current, "defences breached"),
        _ => warn!(score, wave = progress.current, "time limit reached before the game ended"),
    }

    if best.submit(score) {
        best.save(&args.best_score_file)?;
        info!(best = best.best, "new best score");
    }

    let report = toml::to_string_pretty(analytics.report()).context("failed to encode report")?;
    println!("score = {score}\nbest = {}\n\n{report}", best.best);
    Ok(())
}
