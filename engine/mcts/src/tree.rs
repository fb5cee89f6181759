//! MCTS tree structure with arena allocation.
//!
//! Nodes are stored in a contiguous Vec and referenced by NodeId indices.
//! The whole tree is dropped when the search that built it finishes.

use games_nrow::{Board, Mark, WinLength};

use crate::config::ValueUpdate;
use crate::node::{MctsNode, NodeId};
use crate::search::SearchError;

/// MCTS tree with arena-based node storage.
#[derive(Debug)]
pub struct MctsTree {
    /// Arena storing all nodes
    nodes: Vec<MctsNode>,

    /// Root node index (always 0 after initialization)
    root: NodeId,

    win_length: WinLength,
}

impl MctsTree {
    /// Create a new tree rooted at `board` with `to_move` about to play.
    pub fn new(board: Board, to_move: Mark, win_length: WinLength) -> Self {
        let root_node = MctsNode::new_root(board, to_move, win_length);
        Self {
            nodes: vec![root_node],
            root: NodeId(0),
            win_length,
        }
    }

    /// Get the root node ID.
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    #[inline]
    pub fn win_length(&self) -> WinLength {
        self.win_length
    }

    /// Get a reference to a node by ID.
    #[inline]
    pub fn get(&self, id: NodeId) -> &MctsNode {
        &self.nodes[id.0 as usize]
    }

    /// Get a mutable reference to a node by ID.
    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut MctsNode {
        &mut self.nodes[id.0 as usize]
    }

    fn allocate(&mut self, node: MctsNode) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Get the total number of nodes in the tree.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree is empty (never true after construction).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Select the child of a fully expanded node with the highest UCT score.
    ///
    /// Ties keep the earliest expanded child. Returns `Ok(None)` when the
    /// node has no children.
    pub fn select_child(
        &self,
        node_id: NodeId,
        exploration: f64,
    ) -> Result<Option<NodeId>, SearchError> {
        let node = self.get(node_id);
        // Pre-compute ln once instead of per-child comparison
        let parent_visits_ln = (node.visit_count as f64).ln();

        let mut best: Option<(NodeId, f64)> = None;
        for &(_, child_id) in &node.children {
            let child = self.get(child_id);
            if child.visit_count == 0 {
                return Err(SearchError::UnvisitedChild(child_id));
            }
            let score = child.uct_score(parent_visits_ln, exploration);
            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((child_id, score));
            }
        }

        Ok(best.map(|(id, _)| id))
    }

    /// Expand `action` from `parent_id`: remove it from the untried list,
    /// play it for the parent's mover and allocate the resulting child.
    pub fn add_child(&mut self, parent_id: NodeId, action: usize) -> Result<NodeId, SearchError> {
        let parent = self.get(parent_id);
        let position = parent
            .untried
            .iter()
            .position(|&m| m == action)
            .ok_or(SearchError::MoveNotUntried {
                node: parent_id,
                action,
            })?;

        let mover = parent.to_move;
        let board = parent.board.with_mark(action, mover)?;
        let child = MctsNode::new_child(
            parent_id,
            action,
            board,
            mover.opponent(),
            self.win_length,
        );
        let child_id = self.allocate(child);

        let parent = self.get_mut(parent_id);
        parent.untried.remove(position);
        parent.children.push((action, child_id));

        Ok(child_id)
    }

    /// Backpropagate an outcome from a leaf to the root.
    ///
    /// The outcome is relative to the root mover and is applied unchanged at
    /// every level.
    pub fn backpropagate(&mut self, leaf_id: NodeId, outcome: f64, update: ValueUpdate) {
        let mut current_id = leaf_id;

        while current_id.is_some() {
            let node = self.get_mut(current_id);
            node.visit_count += 1;
            node.value_sum = update.apply(node.value_sum, node.visit_count, outcome);
            current_id = node.parent;
        }
    }

    /// Root child with the highest final score, ignoring unvisited children.
    /// Returns (action, NodeId) or None if no child has been visited.
    pub fn best_child(&self, visit_bonus_divisor: f64) -> Option<(usize, NodeId)> {
        let root = self.get(self.root);

        let mut best: Option<(usize, NodeId, f64)> = None;
        for &(action, child_id) in &root.children {
            let child = self.get(child_id);
            if child.visit_count == 0 {
                continue;
            }
            let score = child.final_score(visit_bonus_divisor);
            if best.map_or(true, |(_, _, best_score)| score > best_score) {
                best = Some((action, child_id, score));
            }
        }

        best.map(|(action, id, _)| (action, id))
    }

    /// Get statistics about the tree for debugging.
    pub fn stats(&self) -> TreeStats {
        let root = self.get(self.root);
        TreeStats {
            total_nodes: self.nodes.len(),
            root_visits: root.visit_count,
            root_value: root.mean_value(),
            max_depth: self.compute_max_depth(self.root, 0),
        }
    }

    fn compute_max_depth(&self, node_id: NodeId, current_depth: u32) -> u32 {
        let node = self.get(node_id);
        if node.children.is_empty() {
            return current_depth;
        }

        node.children
            .iter()
            .map(|(_, id)| self.compute_max_depth(*id, current_depth + 1))
            .max()
            .unwrap_or(current_depth)
    }
}

/// Statistics about an MCTS tree.
#[derive(Debug, Clone)]
pub struct TreeStats {
    pub total_nodes: usize,
    pub root_visits: u32,
    pub root_value: f64,
    pub max_depth: u32,
}
