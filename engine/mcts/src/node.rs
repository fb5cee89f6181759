//! MCTS tree node representation.
//!
//! Each node owns a copy of the board reached by playing `action` from its
//! parent. Statistics are kept from the perspective of the player who moves
//! at the root of the search.

use games_nrow::{find_winner, is_full, Board, Mark, WinLength};

/// Index into the node arena. Using a newtype for type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const NONE: NodeId = NodeId(u32::MAX);

    pub fn is_none(self) -> bool {
        self == Self::NONE
    }

    pub fn is_some(self) -> bool {
        !self.is_none()
    }
}

/// A node in the MCTS tree.
#[derive(Debug, Clone)]
pub struct MctsNode {
    /// Parent node index (NONE for root)
    pub parent: NodeId,

    /// Cell played from the parent to reach this node (None for root)
    pub action: Option<usize>,

    pub board: Board,

    /// Player about to move at this node
    pub to_move: Mark,

    /// Number of times this node has been visited
    pub visit_count: u32,

    /// Accumulated outcome, folded in by the configured value update rule.
    pub value_sum: f64,

    /// Legal moves not yet expanded, in row-major order.
    pub untried: Vec<usize>,

    /// Children: Vec of (action, NodeId) pairs, in expansion order.
    pub children: Vec<(usize, NodeId)>,

    pub winner: Option<Mark>,

    /// Won or full board
    pub is_terminal: bool,
}

impl MctsNode {
    /// Create a new root node.
    pub fn new_root(board: Board, to_move: Mark, win_length: WinLength) -> Self {
        Self::build(NodeId::NONE, None, board, to_move, win_length)
    }

    /// Create a new child node.
    pub fn new_child(
        parent: NodeId,
        action: usize,
        board: Board,
        to_move: Mark,
        win_length: WinLength,
    ) -> Self {
        Self::build(parent, Some(action), board, to_move, win_length)
    }

    fn build(
        parent: NodeId,
        action: Option<usize>,
        board: Board,
        to_move: Mark,
        win_length: WinLength,
    ) -> Self {
        let winner = find_winner(&board, win_length);
        let is_terminal = winner.is_some() || is_full(&board);
        // Terminal nodes never expand
        let untried = if is_terminal {
            Vec::new()
        } else {
            board.empty_cells()
        };

        Self {
            parent,
            action,
            board,
            to_move,
            visit_count: 0,
            value_sum: 0.0,
            untried,
            children: Vec::new(),
            winner,
            is_terminal,
        }
    }

    /// Mean value `value_sum / visit_count`. Returns 0.0 if never visited.
    #[inline]
    pub fn mean_value(&self) -> f64 {
        if self.visit_count == 0 {
            0.0
        } else {
            self.value_sum / self.visit_count as f64
        }
    }

    /// UCT score `mean + c * sqrt(ln(N_parent) / n)`.
    ///
    /// Takes pre-computed `ln(parent_visits)` to avoid recomputing it for
    /// every sibling. Only meaningful for visited nodes.
    #[inline]
    pub fn uct_score(&self, parent_visits_ln: f64, exploration: f64) -> f64 {
        let n = self.visit_count as f64;
        self.mean_value() + exploration * (parent_visits_ln / n).sqrt()
    }

    /// Final move score `mean + ln(n) / divisor`, favouring well-explored
    /// moves among ones with similar values.
    #[inline]
    pub fn final_score(&self, visit_bonus_divisor: f64) -> f64 {
        self.mean_value() + (self.visit_count as f64).ln() / visit_bonus_divisor
    }

    /// Every legal move has a child.
    #[inline]
    pub fn is_fully_expanded(&self) -> bool {
        self.untried.is_empty()
    }

    #[inline]
    pub fn is_expanded(&self) -> bool {
        !self.children.is_empty()
    }
}
