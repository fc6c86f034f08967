//! Search tree stored as an arena of nodes.
//!
//! Per-action statistics live in the parent: `child_visits[a]` and
//! `child_value_sums[a]` are the visit count and value sum of the child
//! reached through action `a`. Slot 0 of the arena is a sentinel parent for
//! the root, so the root's own statistics are `sentinel.child_*[0]` and the
//! selection formula never special-cases "no parent".

use crate::game::action::NUM_ACTIONS;
use crate::game::board::Board;
use crate::game::check_end_game::check_end_game;
use crate::game::piece::Player;
use crate::mcts::algorithm::SearchError;
use std::collections::HashMap;

pub type NodeId = usize;

/// Parent of the root; holds the root's statistics in slot 0.
pub const SENTINEL: NodeId = 0;
pub const ROOT: NodeId = 1;

#[derive(Debug, Clone)]
pub struct Node {
    pub parent: Option<NodeId>,
    /// Action that led from `parent` to this node.
    pub action: usize,
    /// Side to move at this node.
    pub turn: Player,
    /// Winner when the position is terminal.
    pub winner: Option<Player>,
    pub is_expanded: bool,
    /// Evaluator priors, empty until expanded.
    pub priors: Vec<f32>,
    pub child_visits: Vec<f32>,
    pub child_value_sums: Vec<f32>,
    /// Lazily materialised children, keyed by action index.
    pub children: HashMap<usize, NodeId>,
}

impl Node {
    pub fn new(board: &Board, parent: Option<NodeId>, action: usize) -> Self {
        Self {
            parent,
            action,
            turn: board.turn(),
            winner: check_end_game(board).winner(),
            is_expanded: false,
            priors: Vec::new(),
            child_visits: Vec::new(),
            child_value_sums: Vec::new(),
            children: HashMap::new(),
        }
    }

    fn sentinel(turn: Player) -> Self {
        Self {
            parent: None,
            action: 0,
            turn,
            winner: None,
            is_expanded: false,
            priors: Vec::new(),
            child_visits: vec![0.0; NUM_ACTIONS],
            child_value_sums: vec![0.0; NUM_ACTIONS],
            children: HashMap::new(),
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.winner.is_some()
    }

    /// Value of a terminal node for its own side to move.
    pub fn terminal_value(&self) -> f32 {
        if self.winner == Some(self.turn) {
            1.0
        } else {
            -1.0
        }
    }
}

/// Tree owned by a single search call.
#[derive(Debug, Clone)]
pub struct SearchTree {
    nodes: Vec<Node>,
}

impl SearchTree {
    pub fn new(root_board: &Board) -> Self {
        let sentinel = Node::sentinel(root_board.turn().opponent());
        let root = Node::new(root_board, Some(SENTINEL), 0);
        Self {
            nodes: vec![sentinel, root],
        }
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id]
    }

    /// Number of nodes, sentinel included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Visit count of `id`, read from its parent.
    pub fn visits(&self, id: NodeId) -> f32 {
        let node = &self.nodes[id];
        match node.parent {
            Some(parent) => self.nodes[parent].child_visits[node.action],
            None => 0.0,
        }
    }

    /// Value sum of `id` from its own side to move, read from its parent.
    pub fn value_sum(&self, id: NodeId) -> f32 {
        let node = &self.nodes[id];
        match node.parent {
            Some(parent) => self.nodes[parent].child_value_sums[node.action],
            None => 0.0,
        }
    }

    pub fn child(&self, id: NodeId, action: usize) -> Option<NodeId> {
        self.nodes[id].children.get(&action).copied()
    }

    /// Materialises the child of `parent` reached through `action`;
    /// `board` is the position after the action.
    pub fn add_child(&mut self, parent: NodeId, action: usize, board: &Board) -> NodeId {
        debug_assert!(self.nodes[parent].is_expanded);
        let id = self.nodes.len();
        self.nodes.push(Node::new(board, Some(parent), action));
        self.nodes[parent].children.insert(action, id);
        id
    }

    /// Stores priors on `id` and allocates its per-action statistics.
    pub fn expand(&mut self, id: NodeId, priors: Vec<f32>) -> Result<(), SearchError> {
        let node = &mut self.nodes[id];
        if node.is_expanded {
            return Err(SearchError::AlreadyExpanded(id));
        }
        node.priors = priors;
        node.child_visits = vec![0.0; NUM_ACTIONS];
        node.child_value_sums = vec![0.0; NUM_ACTIONS];
        node.is_expanded = true;
        Ok(())
    }
}
