//! m,n,k engine CLI
//!
//! Plays one engine-vs-engine game on the requested board and reports every
//! move with its search statistics.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use mnk::{Board, Engine, EngineConfig, MnkPlayer};

/// Engine-vs-engine m,n,k game
#[derive(Parser, Debug)]
#[command(name = "mnk")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Board rows
    #[arg(short, long, default_value_t = 9)]
    rows: usize,

    /// Board columns
    #[arg(short, long, default_value_t = 9)]
    cols: usize,

    /// Marks in a row needed to win
    #[arg(short, long, default_value_t = 5)]
    k: usize,

    /// Per-move time limit in seconds
    #[arg(short, long, default_value_t = 1)]
    timeout: u64,

    /// Safety margin kept below the time limit, in milliseconds
    #[arg(long, default_value_t = 250)]
    margin_ms: u64,

    /// Maximum search depth below the root move (unbounded if omitted)
    #[arg(long)]
    max_depth: Option<usize>,

    /// Name both engines report
    #[arg(long, default_value = mnk::engine::DEFAULT_NAME)]
    name: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cli.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    if cli.timeout == 0 {
        bail!("the per-move time limit must be at least one second");
    }

    let config = EngineConfig::default()
        .with_safety_margin(Duration::from_millis(cli.margin_ms))
        .with_max_depth(cli.max_depth)
        .with_name(cli.name.as_str());

    let mut board = Board::new(cli.rows, cli.cols, cli.k).context("invalid board")?;
    let mut players = [
        Engine::with_config(config.clone()),
        Engine::with_config(config),
    ];
    for (i, player) in players.iter_mut().enumerate() {
        player
            .init_player(cli.rows, cli.cols, cli.k, i == 0, cli.timeout)
            .context("failed to initialise player")?;
    }

    println!(
        "{}x{} board, {} in a row, {}s per move",
        cli.rows, cli.cols, cli.k, cli.timeout
    );

    let mut turn = 0;
    while board.state().is_open() {
        let player = &mut players[turn % 2];
        let cell = player
            .select_cell(&board.free_cells(), board.marked_cells())
            .with_context(|| format!("{} failed to move", player.player_name()))?;
        board
            .mark(cell.row, cell.col)
            .with_context(|| format!("illegal move ({}, {})", cell.row, cell.col))?;

        let side = player.me().context("player was not initialised")?;
        let margin = player.time_budget().map_or(0, |time| time.margin().as_millis());
        match player.last_result() {
            Some(result) => println!(
                "{:>3}. {:?} ({}, {})  score {:>8}  depth {:>2}  nodes {:>8}  {}ms  margin {}ms",
                turn + 1,
                side,
                cell.row,
                cell.col,
                result.score,
                result.depth.map_or_else(|| "-".to_string(), |d| d.to_string()),
                result.nodes,
                result.elapsed.as_millis(),
                margin
            ),
            None => println!(
                "{:>3}. {:?} ({}, {})  opening",
                turn + 1,
                side,
                cell.row,
                cell.col
            ),
        }
        turn += 1;
    }

    match board.state().winner() {
        Some(winner) => println!("{:?} wins after {} moves", winner, turn),
        None => println!("Draw after {} moves", turn),
    }
    Ok(())
}
