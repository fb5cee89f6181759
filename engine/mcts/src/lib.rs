//! Monte Carlo Tree Search (MCTS) move engine for k-in-a-row games.
//!
//! This crate decides the next move for one side on an N×N board where K
//! marks in a row, column or diagonal win (see `games-nrow`).
//!
//! # Overview
//!
//! [`MoveDecider::decide`] first looks for answers that need no search:
//! the only legal move, an immediate win, or the one cell that stops the
//! opponent winning next turn. Otherwise it runs MCTS, where each
//! iteration consists of four phases:
//!
//! 1. **Selection**: Descend through fully expanded nodes using UCT to
//!    balance exploration and exploitation
//! 2. **Expansion**: Add one child for a random untried move
//! 3. **Simulation**: Play the game out with a [`PlayoutPolicy`], up to a
//!    depth cap, scoring unfinished positions by near-wins
//! 4. **Backpropagation**: Update visit counts and values along the path
//!    from leaf to root
//!
//! The search stops at the iteration cap or when the [`Clock`] passes the
//! time budget. The root child maximising `mean + ln(visits) / 10` is
//! played. If the search fails, [`fallback_move`] picks the centre, a
//! corner or a random empty cell instead.
//!
//! # Usage
//!
//! ```rust
//! use games_nrow::{Board, Mark};
//! use mcts::MoveDecider;
//!
//! let board: Board = "XX./OO./...".parse().unwrap();
//! let mut decider = MoveDecider::with_seed(42);
//! let cell = decider.decide(&board, Mark::X, 500, 3).unwrap();
//! assert_eq!(cell, 2);
//! ```
//!
//! # Configuration
//!
//! [`MctsConfig::for_board_size`] scales the search with the board:
//!
//! - `exploration`: UCT constant (1.414 for N≤3, 1.5 for N=4, 1.6 above)
//! - `max_iterations`: size table {3: 2000, 4: 3000, 5: 4000, 6: 8000;
//!   else 1000}, ×0.9 for N≥4
//! - `time_budget`: 2000 ms to 3500 ms depending on N
//! - `value_update`: running mean, or the legacy exponential rule
//!
//! # Determinism
//!
//! All randomness comes from a seeded `ChaCha20Rng` and all deadlines from
//! an injected [`Clock`]. A [`SteppedClock`] together with a fixed seed
//! makes a search fully reproducible.

pub mod clock;
pub mod config;
pub mod decision;
pub mod node;
pub mod playout;
pub mod search;
pub mod tree;

// Re-export main types
pub use clock::{Clock, SteppedClock, SystemClock};
pub use config::{
    default_iterations, exploration_for_size, size_scaled_iterations, time_budget_for_size,
    MctsConfig, ValueUpdate,
};
pub use decision::{decide_move, decide_move_for_size, fallback_move, DecisionError, MoveDecider};
pub use node::{MctsNode, NodeId};
pub use playout::{
    near_win_score, simulate, HeuristicPolicy, Playout, PlayoutError, PlayoutPolicy,
    UniformPolicy,
};
pub use search::{outcome_value, run_mcts, MctsSearch, SearchError, SearchResult};
pub use tree::{MctsTree, TreeStats};
