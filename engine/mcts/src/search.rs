//! MCTS search implementation.
//!
//! Implements the core MCTS algorithm:
//! 1. Selection: Traverse fully expanded nodes using UCT to find a leaf
//! 2. Expansion: Add one child for a random untried move
//! 3. Simulation: Play out from the new child with the playout policy
//! 4. Backpropagation: Update statistics along the path
//!
//! The loop stops when the iteration cap is reached or the clock passes
//! the deadline, whichever comes first.

use std::time::Duration;

use games_nrow::{Board, BoardError, Mark, WinLength};
use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha20Rng;
use thiserror::Error;
use tracing::{debug, trace};

use crate::clock::Clock;
use crate::config::MctsConfig;
use crate::node::NodeId;
use crate::playout::{simulate, PlayoutError, PlayoutPolicy};
use crate::tree::MctsTree;

/// Errors that can occur during MCTS search.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Move {action} is not an untried move of node {node:?}")]
    MoveNotUntried { node: NodeId, action: usize },

    #[error("Child {0:?} was selected before being visited")]
    UnvisitedChild(NodeId),

    #[error("No legal moves available")]
    NoLegalMoves,

    #[error("Playout error: {0}")]
    Playout(#[from] PlayoutError),

    #[error("Board error: {0}")]
    Board(#[from] BoardError),
}

/// Result of an MCTS search.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Best cell to play
    pub action: usize,

    /// Mean value at root, from the root mover's perspective
    pub value: f64,

    /// Number of iterations performed
    pub iterations: u32,

    pub elapsed: Duration,

    /// The loop stopped on the time budget rather than the iteration cap.
    pub deadline_reached: bool,

    pub tree_size: usize,
}

/// MCTS search state.
pub struct MctsSearch<'a, P: PlayoutPolicy + ?Sized, C: Clock + ?Sized> {
    tree: MctsTree,
    policy: &'a P,
    clock: &'a C,
    config: MctsConfig,
    root_mover: Mark,
    playout_depth: usize,
}

impl<'a, P: PlayoutPolicy + ?Sized, C: Clock + ?Sized> MctsSearch<'a, P, C> {
    /// Create a new MCTS search for `mover` on `board`.
    pub fn new(
        board: Board,
        mover: Mark,
        win_length: WinLength,
        policy: &'a P,
        clock: &'a C,
        config: MctsConfig,
    ) -> Result<Self, SearchError> {
        if win_length.get() > board.size() {
            return Err(SearchError::InvalidState(format!(
                "win length {} exceeds board size {}",
                win_length.get(),
                board.size()
            )));
        }

        let playout_depth = config.playout_depth(board.size());
        let tree = MctsTree::new(board, mover, win_length);

        let root = tree.get(tree.root());
        if let Some(winner) = root.winner {
            return Err(SearchError::InvalidState(format!(
                "position is already won by {winner}"
            )));
        }
        if root.untried.is_empty() {
            return Err(SearchError::NoLegalMoves);
        }

        Ok(Self {
            tree,
            policy,
            clock,
            config,
            root_mover: mover,
            playout_depth,
        })
    }

    /// Run iterations until the iteration cap or the time budget is spent.
    pub fn run(&mut self, rng: &mut ChaCha20Rng) -> Result<SearchResult, SearchError> {
        let start = self.clock.now();
        let deadline = start + self.config.time_budget;

        let mut iterations = 0;
        let mut deadline_reached = false;
        while iterations < self.config.max_iterations {
            if self.clock.now() >= deadline {
                deadline_reached = true;
                break;
            }
            self.iterate(rng)?;
            iterations += 1;
        }
        let elapsed = self.clock.now().saturating_sub(start);

        let root_id = self.tree.root();
        let action = match self.tree.best_child(self.config.visit_bonus_divisor) {
            Some((action, _)) => action,
            // Nothing was visited: play any untried root move
            None => *self
                .tree
                .get(root_id)
                .untried
                .choose(rng)
                .ok_or(SearchError::NoLegalMoves)?,
        };

        let stats = self.tree.stats();
        debug!(
            action,
            iterations,
            deadline_reached,
            elapsed_ms = elapsed.as_millis() as u64,
            nodes = stats.total_nodes,
            max_depth = stats.max_depth,
            root_value = stats.root_value,
            "MCTS search complete"
        );

        Ok(SearchResult {
            action,
            value: stats.root_value,
            iterations,
            elapsed,
            deadline_reached,
            tree_size: stats.total_nodes,
        })
    }

    /// Run a single iteration (select -> expand -> simulate -> backpropagate).
    fn iterate(&mut self, rng: &mut ChaCha20Rng) -> Result<(), SearchError> {
        // Selection: descend while every move has a child
        let mut current = self.tree.root();
        loop {
            let node = self.tree.get(current);
            if node.is_terminal || !node.is_fully_expanded() {
                break;
            }
            match self.tree.select_child(current, self.config.exploration)? {
                Some(child_id) => current = child_id,
                None => break,
            }
        }

        // Expansion: one random untried move
        let node = self.tree.get(current);
        if !node.is_terminal && !node.untried.is_empty() {
            let action = node.untried[rng.gen_range(0..node.untried.len())];
            current = self.tree.add_child(current, action)?;
        }

        // Simulation
        let leaf = self.tree.get(current);
        let playout = simulate(
            self.policy,
            &leaf.board,
            leaf.to_move,
            self.tree.win_length(),
            self.playout_depth,
            rng,
        )?;
        let outcome = outcome_value(playout.winner, self.root_mover);

        // Backpropagation
        self.tree
            .backpropagate(current, outcome, self.config.value_update);

        trace!(
            leaf = current.0,
            plies = playout.plies,
            depth_capped = playout.reached_depth_cap,
            outcome,
            "MCTS iteration complete"
        );

        Ok(())
    }

    /// Get the search tree (for inspection/debugging).
    pub fn tree(&self) -> &MctsTree {
        &self.tree
    }
}

/// Outcome of a playout for `perspective`: 1 for a win, 0 for a loss,
/// 0.5 for a draw.
#[inline]
pub fn outcome_value(winner: Option<Mark>, perspective: Mark) -> f64 {
    match winner {
        Some(mark) if mark == perspective => 1.0,
        Some(_) => 0.0,
        None => 0.5,
    }
}

/// Convenience function to run a single MCTS search.
pub fn run_mcts<P: PlayoutPolicy + ?Sized, C: Clock + ?Sized>(
    board: Board,
    mover: Mark,
    win_length: WinLength,
    policy: &P,
    clock: &C,
    config: MctsConfig,
    rng: &mut ChaCha20Rng,
) -> Result<SearchResult, SearchError> {
    let mut search = MctsSearch::new(board, mover, win_length, policy, clock, config)?;
    search.run(rng)
}
