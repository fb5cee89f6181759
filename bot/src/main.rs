//! nrow-bot - command-line move picker
//!
//! 1. Parses the board and the side to move
//! 2. Resolves win length, iteration budget and search tuning from the CLI
//!    and config.toml
//! 3. Runs the move decider and prints the chosen cell index to stdout
//!
//! Logs go to stderr so stdout carries only the answer.

use anyhow::Result;
use clap::Parser;
use games_nrow::Board;
use mcts::{DecisionError, MoveDecider, PlayoutPolicy, SystemClock, UniformPolicy};
use tracing::{debug, info};

mod config;

use crate::config::{Config, PolicyKind};

fn init_tracing(level: &str) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    Ok(())
}

fn main() -> Result<()> {
    let config = Config::parse();
    config.validate()?;

    init_tracing(&config.log_level)?;
    debug!(?config, "Configuration loaded");

    let board = config.parse_board()?;
    let size = board.size();
    let win_length = config.win_length(size)?;
    let budget = config.iteration_budget(size);
    let search = config.search_config(size)?;
    info!(
        size,
        win_length,
        budget,
        mover = %config.mover,
        policy = ?config.policy,
        "Deciding move"
    );

    let decider = match config.seed {
        Some(seed) => MoveDecider::with_seed(seed),
        None => MoveDecider::new(),
    }
    .with_config(search);

    let cell = match config.policy {
        PolicyKind::Heuristic => decide(
            decider.with_policy(config.heuristic_policy()?),
            &config,
            &board,
            budget,
            win_length,
        ),
        PolicyKind::Uniform => decide(
            decider.with_policy(UniformPolicy::new()),
            &config,
            &board,
            budget,
            win_length,
        ),
    }?;

    if config.show {
        let after = board.with_mark(cell, config.mover)?;
        eprintln!("{after}");
    }
    println!("{cell}");
    Ok(())
}

fn decide<P: PlayoutPolicy>(
    mut decider: MoveDecider<P, SystemClock>,
    config: &Config,
    board: &Board,
    budget: u32,
    win_length: usize,
) -> Result<usize, DecisionError> {
    let cell = decider.decide(board, config.mover, budget, win_length)?;
    info!(cell, "Move chosen");
    Ok(cell)
}
