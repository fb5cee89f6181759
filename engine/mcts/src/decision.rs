//! Move decision: tactical checks, budgeted search and the fallback chain.

use games_nrow::{find_winner, Board, BoardError, Cell, Mark, WinLength};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use thiserror::Error;
use tracing::{debug, warn};

use crate::clock::{Clock, SystemClock};
use crate::config::{default_iterations, MctsConfig};
use crate::playout::{HeuristicPolicy, PlayoutPolicy};
use crate::search::run_mcts;

/// Errors reported to the caller of [`MoveDecider::decide`].
///
/// Internal search faults never show up here; they are logged and replaced
/// by [`fallback_move`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecisionError {
    #[error("Invalid board size: expected {expected} cells, got {actual}")]
    InvalidBoardSize { expected: usize, actual: usize },

    #[error("No legal move: the board is full")]
    NoLegalMove,

    #[error("Iteration budget must be positive")]
    InvalidIterationBudget,

    #[error("Invalid search config: {0}")]
    InvalidConfig(String),

    #[error("Rules error: {0}")]
    Rules(BoardError),
}

impl From<BoardError> for DecisionError {
    fn from(err: BoardError) -> Self {
        match err {
            BoardError::InvalidBoardSize { expected, actual } => {
                DecisionError::InvalidBoardSize { expected, actual }
            }
            other => DecisionError::Rules(other),
        }
    }
}

/// Picks moves for one side of a game.
///
/// Holds the playout policy, the clock used for search deadlines and the
/// random source. A decider is reused across calls; no search tree
/// survives between them.
pub struct MoveDecider<P = HeuristicPolicy, C = SystemClock> {
    policy: P,
    clock: C,
    rng: ChaCha20Rng,
    /// Replaces the size-derived search config when set.
    config: Option<MctsConfig>,
}

impl MoveDecider {
    /// Heuristic playouts, real time, entropy-seeded.
    pub fn new() -> Self {
        Self::from_rng(ChaCha20Rng::from_entropy())
    }

    /// Heuristic playouts, real time, fixed seed.
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(ChaCha20Rng::seed_from_u64(seed))
    }

    fn from_rng(rng: ChaCha20Rng) -> Self {
        Self {
            policy: HeuristicPolicy::default(),
            clock: SystemClock::new(),
            rng,
            config: None,
        }
    }
}

impl Default for MoveDecider {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: PlayoutPolicy, C: Clock> MoveDecider<P, C> {
    /// Builder pattern: swap the playout policy.
    pub fn with_policy<Q: PlayoutPolicy>(self, policy: Q) -> MoveDecider<Q, C> {
        MoveDecider {
            policy,
            clock: self.clock,
            rng: self.rng,
            config: self.config,
        }
    }

    /// Builder pattern: swap the clock.
    pub fn with_clock<D: Clock>(self, clock: D) -> MoveDecider<P, D> {
        MoveDecider {
            policy: self.policy,
            clock,
            rng: self.rng,
            config: self.config,
        }
    }

    /// Builder pattern: use `config` instead of the board-size defaults.
    /// The iteration budget passed to `decide` still caps the iterations.
    pub fn with_config(mut self, config: MctsConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// Choose a cell for `mover`.
    ///
    /// In order: the only legal move, the first winning move, the first
    /// blocking move, then MCTS for at most `iteration_budget` iterations.
    /// A failed search falls back to [`fallback_move`].
    pub fn decide(
        &mut self,
        board: &Board,
        mover: Mark,
        iteration_budget: u32,
        win_length: usize,
    ) -> Result<usize, DecisionError> {
        if iteration_budget == 0 {
            return Err(DecisionError::InvalidIterationBudget);
        }
        if let Some(config) = &self.config {
            config.validate().map_err(DecisionError::InvalidConfig)?;
        }
        let size = board.size();
        let win_length = WinLength::new(win_length, size)?;

        let legal = board.empty_cells();
        match legal.as_slice() {
            [] => return Err(DecisionError::NoLegalMove),
            [only] => {
                debug!(cell = only, "Single legal move");
                return Ok(*only);
            }
            _ => {}
        }

        if let Some(cell) = first_completing_move(board, &legal, mover, win_length) {
            debug!(cell, %mover, "Immediate win");
            return Ok(cell);
        }
        let opponent = mover.opponent();
        if let Some(cell) = first_completing_move(board, &legal, opponent, win_length) {
            debug!(cell, %mover, "Blocking opponent win");
            return Ok(cell);
        }

        let mut config = self
            .config
            .clone()
            .unwrap_or_else(|| MctsConfig::for_board_size(size));
        config.max_iterations = config.max_iterations.min(iteration_budget);

        let searched = run_mcts(
            board.clone(),
            mover,
            win_length,
            &self.policy,
            &self.clock,
            config,
            &mut self.rng,
        );
        match searched {
            Ok(result) if board.is_empty_at(result.action) => Ok(result.action),
            Ok(result) => {
                warn!(
                    cell = result.action,
                    "Search chose an occupied cell, using fallback move"
                );
                fallback_move(board, &mut self.rng).ok_or(DecisionError::NoLegalMove)
            }
            Err(e) => {
                warn!(error = %e, "Search failed, using fallback move");
                fallback_move(board, &mut self.rng).ok_or(DecisionError::NoLegalMove)
            }
        }
    }
}

/// First cell in `legal` that gives `mark` a winning line.
fn first_completing_move(
    board: &Board,
    legal: &[usize],
    mark: Mark,
    win_length: WinLength,
) -> Option<usize> {
    legal.iter().copied().find(|&cell| {
        matches!(
            board.with_mark(cell, mark),
            Ok(next) if find_winner(&next, win_length) == Some(mark)
        )
    })
}

/// Deterministic-first fallback: the centre, then the first free corner,
/// then a random empty cell. `None` only when the board is full.
pub fn fallback_move<R: Rng + ?Sized>(board: &Board, rng: &mut R) -> Option<usize> {
    let center = board.center();
    if board.is_empty_at(center) {
        return Some(center);
    }
    if let Some(corner) = board.corners().into_iter().find(|&c| board.is_empty_at(c)) {
        return Some(corner);
    }
    board.empty_cells().choose(rng).copied()
}

/// Decide a move for a flat row-major board of side `size`.
pub fn decide_move(
    cells: &[Cell],
    size: usize,
    mover: Mark,
    iteration_budget: u32,
    win_length: usize,
) -> Result<usize, DecisionError> {
    let expected = size.checked_mul(size).unwrap_or(usize::MAX);
    if cells.len() != expected {
        return Err(DecisionError::InvalidBoardSize {
            expected,
            actual: cells.len(),
        });
    }
    let board = Board::from_cells(size, cells.to_vec())?;
    MoveDecider::new().decide(&board, mover, iteration_budget, win_length)
}

/// Decide a move with the win length and iteration budget the board size
/// calls for.
pub fn decide_move_for_size(board: &Board, mover: Mark) -> Result<usize, DecisionError> {
    let size = board.size();
    let win_length = WinLength::for_size(size)?;
    MoveDecider::new().decide(board, mover, default_iterations(size), win_length.get())
}
