//! Headless match-grid runner (default binary).
//!
//! Plays hinted swaps against a seeded session, resolving every cascade to
//! completion, and prints the board after each move (or one JSON record per
//! line with `--json`). Logs go to stderr; set `RUST_LOG=debug` to see each
//! cascade round.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use match_grid::config::EngineConfig;
use match_grid::core::{GridSnapshot, Hint};
use match_grid::engine::{apply_hint, MoveError};

/// Autoplay a match-3 grid from the command line
#[derive(Parser, Debug)]
#[command(name = "match-grid")]
#[command(about = "Deterministic match-3 grid engine (headless autoplay)", long_about = None)]
#[command(version)]
struct Cli {
    /// TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// RNG seed (random when neither flag nor config sets one)
    #[arg(long)]
    seed: Option<u32>,

    /// Grid side length
    #[arg(long)]
    size: Option<u8>,

    /// Number of tile kinds in the theme
    #[arg(long)]
    kinds: Option<u8>,

    /// Hinted swaps to play
    #[arg(long, default_value_t = 20)]
    moves: u32,

    /// Print one JSON record per move instead of the board
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct MoveRecord<'a> {
    #[serde(rename = "move")]
    index: u32,
    hint: Hint,
    points: u32,
    rounds: usize,
    regenerated: bool,
    snapshot: &'a GridSnapshot,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    run(cli)
}

fn run(cli: Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if let Some(size) = cli.size {
        config.grid_size = size;
    }
    if let Some(kinds) = cli.kinds {
        config.theme.kinds = kinds;
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }

    let valid = config.validate().context("invalid configuration")?;
    let seed = valid.seed.unwrap_or_else(|| fastrand::u32(..));
    let mut session = valid.session(seed);
    info!(
        seed,
        size = valid.grid_size,
        kinds = valid.theme.len(),
        "session started"
    );

    if !cli.json {
        println!("seed {seed}\n{}\n", session.grid());
    }

    let mut snapshot = GridSnapshot::default();
    for index in 1..=cli.moves {
        let (hint, report) = match apply_hint(&mut session) {
            Ok(played) => played,
            Err(MoveError::NoMoves) => {
                warn!(index, "no legal move left");
                break;
            }
            Err(err) => bail!("move {index} failed: {} ({})", err.message(), err.code()),
        };

        if cli.json {
            session.snapshot_into(&mut snapshot);
            let record = MoveRecord {
                index,
                hint,
                points: report.score(),
                rounds: report.rounds(),
                regenerated: report.settlement.regenerated,
                snapshot: &snapshot,
            };
            println!("{}", serde_json::to_string(&record)?);
        } else {
            println!(
                "move {index}: ({},{}) <-> ({},{})  +{} in {} round(s), score {}",
                hint.from.row,
                hint.from.col,
                hint.to.row,
                hint.to.col,
                report.score(),
                report.rounds(),
                session.score()
            );
            println!("{}\n", session.grid());
        }
    }

    info!(
        score = session.score(),
        moves = session.moves(),
        best_combo = session.best_combo(),
        regenerations = session.regenerations(),
        "session finished"
    );
    if !cli.json {
        println!(
            "final score {} after {} moves (best combo {})",
            session.score(),
            session.moves(),
            session.best_combo()
        );
    }
    Ok(())
}
