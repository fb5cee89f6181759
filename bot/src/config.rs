//! Configuration for the nrow-bot command
//!
//! Defaults come from config.toml (with `NROW_*` environment overrides
//! applied by `engine-config`). CLI arguments take highest priority.

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, ValueEnum};
use engine_config::{load_config, CentralConfig, SearchConfig};
use games_nrow::{Board, Mark, WinLength, WinLengthTable};
use mcts::{default_iterations, HeuristicPolicy, MctsConfig, ValueUpdate};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::level_filters::LevelFilter;

// Load central config once at startup
static CENTRAL_CONFIG: Lazy<CentralConfig> = Lazy::new(load_config);

fn default_log_level() -> String {
    CENTRAL_CONFIG.common.log_level.clone()
}

/// Playout policy used by the search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyKind {
    /// Block and centre biased playouts
    Heuristic,
    /// Uniformly random playouts
    Uniform,
}

#[derive(Parser, Debug, Clone, Serialize, Deserialize)]
#[command(name = "nrow-bot")]
#[command(about = "Pick the next move on a k-in-a-row board")]
#[command(
    long_about = "Reads an N×N board, runs Monte Carlo Tree Search for the side to move
and prints the chosen cell index (row-major, 0-based) to stdout.

Board cells are X, O and . (empty); whitespace, / and | are ignored,
so \"XX./OO./...\" is a 3x3 board.

Configuration is loaded from config.toml with environment variable overrides.
CLI arguments take highest priority."
)]
pub struct Config {
    /// Board cells in row-major order
    #[arg(long)]
    pub board: String,

    /// Side to move (X or O)
    #[arg(long)]
    #[serde(with = "mark_serde")]
    pub mover: Mark,

    /// Marks in a row needed to win (default: from the board size table)
    #[arg(long)]
    pub win_length: Option<usize>,

    /// Maximum MCTS iterations (default: from the board size table)
    #[arg(long)]
    pub iterations: Option<u32>,

    /// RNG seed for reproducible decisions
    #[arg(long)]
    pub seed: Option<u64>,

    /// Playout policy
    #[arg(long, value_enum, default_value_t = PolicyKind::Heuristic)]
    pub policy: PolicyKind,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value_t = default_log_level())]
    pub log_level: String,

    /// Print the board with the chosen move to stderr
    #[arg(long)]
    pub show: bool,
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.board.trim().is_empty() {
            return Err(anyhow!("board cannot be empty"));
        }

        if self.iterations == Some(0) {
            return Err(anyhow!("iterations must be greater than 0"));
        }

        if matches!(self.win_length, Some(k) if k < WinLength::MIN) {
            return Err(anyhow!("win_length must be at least {}", WinLength::MIN));
        }

        if self.log_level.parse::<LevelFilter>().is_err() {
            return Err(anyhow!(
                "invalid log level '{}', expected one of trace, debug, info, warn, error",
                self.log_level
            ));
        }

        Ok(())
    }

    pub fn parse_board(&self) -> Result<Board> {
        self.board
            .parse()
            .with_context(|| format!("invalid board '{}'", self.board))
    }

    /// Win length from the CLI, else from the configured size table.
    pub fn win_length(&self, size: usize) -> Result<usize> {
        match self.win_length {
            Some(k) => Ok(k),
            None => {
                let table = win_length_table(&CENTRAL_CONFIG.rules.win_lengths)?;
                Ok(table.lookup(size)?.get())
            }
        }
    }

    /// Iteration budget from the CLI, else config.toml, else the size table.
    pub fn iteration_budget(&self, size: usize) -> u32 {
        self.iterations
            .or(CENTRAL_CONFIG.search.iterations)
            .unwrap_or_else(|| default_iterations(size))
    }

    pub fn search_config(&self, size: usize) -> Result<MctsConfig> {
        mcts_config(&CENTRAL_CONFIG.search, size)
    }

    pub fn heuristic_policy(&self) -> Result<HeuristicPolicy> {
        heuristic_policy(&CENTRAL_CONFIG.search)
    }
}

pub fn win_length_table(entries: &[(usize, usize)]) -> Result<WinLengthTable> {
    WinLengthTable::new(entries.iter().copied()).context("invalid [rules] win_lengths")
}

/// Size-scaled search config with the `[search]` overrides applied.
pub fn mcts_config(search: &SearchConfig, size: usize) -> Result<MctsConfig> {
    let value_update = match search
        .value_update
        .parse::<ValueUpdate>()
        .map_err(|e| anyhow!(e))?
    {
        ValueUpdate::LegacyExponential { .. } => ValueUpdate::LegacyExponential {
            learning_rate: search.learning_rate,
        },
        other => other,
    };

    let mut config = MctsConfig::for_board_size(size)
        .with_value_update(value_update)
        .with_playout_depth(search.max_playout_depth)
        .with_visit_bonus_divisor(search.visit_bonus_divisor);
    if let Some(c) = search.exploration {
        config = config.with_exploration(c);
    }
    if let Some(ms) = search.time_budget_ms {
        config = config.with_time_budget(Duration::from_millis(ms));
    }
    if let Some(n) = search.iterations {
        config = config.with_iterations(n);
    }
    config
        .validate()
        .map_err(|e| anyhow!(e))
        .context("invalid [search] config")?;
    Ok(config)
}

pub fn heuristic_policy(search: &SearchConfig) -> Result<HeuristicPolicy> {
    if !(0.0..=1.0).contains(&search.heuristic_probability) {
        return Err(anyhow!(
            "[search] heuristic_probability must be in [0, 1], got {}",
            search.heuristic_probability
        ));
    }
    Ok(HeuristicPolicy {
        heuristic_probability: search.heuristic_probability,
        top_moves: search.top_moves,
        block_bonus: search.block_bonus,
        center_radius: search.center_radius,
    })
}

mod mark_serde {
    use games_nrow::Mark;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(mark: &Mark, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(mark)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Mark, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
