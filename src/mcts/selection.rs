//! PUCT selection and backpropagation over a [`SearchTree`].
//!
//! Formula: `-W(a) / (N(a) + 1e-5) + c × P(a) × sqrt(N_parent) / (N(a) + 1)`
//!
//! `W(a)` is stored from the child's point of view, hence the negation.

use crate::mcts::algorithm::SearchError;
use crate::mcts::node::{NodeId, SearchTree};

/// Guards the value term against empty visit counts.
pub const VISIT_EPSILON: f32 = 1e-5;

/// PUCT score of `action` at `node`. The node must be expanded.
pub fn puct_score(tree: &SearchTree, node: NodeId, action: usize, c_puct: f32) -> f32 {
    let parent_visits = tree.visits(node);
    let n = tree.node(node);
    let visits = n.child_visits[action];
    let value = -n.child_value_sums[action] / (visits + VISIT_EPSILON);
    let prior = n.priors.get(action).copied().unwrap_or(0.0);
    value + c_puct * prior * parent_visits.sqrt() / (visits + 1.0)
}

/// Selects the legal action with the highest PUCT score.
///
/// Actions outside `legal` are never considered. Equal scores go to the
/// action with the higher prior, then to the earliest in `legal`.
pub fn select_best_action(
    tree: &SearchTree,
    node: NodeId,
    legal: &[usize],
    c_puct: f32,
) -> Result<usize, SearchError> {
    let priors = &tree.node(node).priors;
    let prior = |a: usize| priors.get(a).copied().unwrap_or(0.0);

    let mut best: Option<(usize, f32)> = None;
    for &action in legal {
        let score = puct_score(tree, node, action, c_puct);
        best = match best {
            None => Some((action, score)),
            Some((best_action, best_score)) => {
                if score > best_score || (score == best_score && prior(action) > prior(best_action))
                {
                    Some((action, score))
                } else {
                    Some((best_action, best_score))
                }
            }
        };
    }

    best.map(|(action, _)| action).ok_or(SearchError::NoLegalActions)
}

/// Adds `value` to `node` and to each ancestor up to the root, flipping the
/// sign at every ply.
pub fn backpropagate(tree: &mut SearchTree, node: NodeId, value: f32) {
    let mut current = node;
    let mut value = value;
    while let Some(parent) = tree.node(current).parent {
        let action = tree.node(current).action;
        let parent_node = tree.node_mut(parent);
        parent_node.child_visits[action] += 1.0;
        parent_node.child_value_sums[action] += value;
        value = -value;
        current = parent;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::action::NUM_ACTIONS;
    use crate::game::apply_move::apply_move;
    use crate::game::board::Board;
    use crate::game::get_legal_moves::legal_actions;
    use crate::game::action::Move;
    use crate::mcts::node::ROOT;

    fn uniform(board: &Board) -> Vec<f32> {
        let legal = legal_actions(board);
        let mut priors = vec![0.0; NUM_ACTIONS];
        for &a in &legal {
            priors[a] = 1.0 / legal.len() as f32;
        }
        priors
    }

    /// root -> child -> grandchild along the first legal action at each ply.
    fn three_level_tree() -> (SearchTree, NodeId, NodeId) {
        let mut board = Board::initial();
        let mut tree = SearchTree::new(&board);
        tree.expand(ROOT, uniform(&board)).unwrap();

        let first = legal_actions(&board)[0];
        apply_move(&mut board, Move::from_action(first).unwrap()).unwrap();
        let child = tree.add_child(ROOT, first, &board);
        tree.expand(child, uniform(&board)).unwrap();

        let second = legal_actions(&board)[0];
        apply_move(&mut board, Move::from_action(second).unwrap()).unwrap();
        let grandchild = tree.add_child(child, second, &board);
        (tree, child, grandchild)
    }

    #[test]
    fn test_backpropagation_alternates_sign() {
        let (mut tree, child, grandchild) = three_level_tree();
        backpropagate(&mut tree, grandchild, 1.0);

        assert_eq!(tree.value_sum(grandchild), 1.0);
        assert_eq!(tree.value_sum(child), -1.0);
        assert_eq!(tree.value_sum(ROOT), 1.0);
        for id in [grandchild, child, ROOT] {
            assert_eq!(tree.visits(id), 1.0);
        }
    }

    #[test]
    fn test_zero_visits_selects_highest_prior() {
        let board = Board::initial();
        let legal = legal_actions(&board);
        let mut priors = vec![0.0; NUM_ACTIONS];
        priors[legal[7]] = 0.6;
        priors[legal[3]] = 0.4;

        let mut tree = SearchTree::new(&board);
        tree.expand(ROOT, priors).unwrap();
        assert_eq!(select_best_action(&tree, ROOT, &legal, 0.0).unwrap(), legal[7]);
        assert_eq!(select_best_action(&tree, ROOT, &legal, 1.0).unwrap(), legal[7]);
    }

    #[test]
    fn test_illegal_actions_are_ignored() {
        let board = Board::initial();
        let legal = legal_actions(&board);
        let illegal = (0..NUM_ACTIONS).find(|a| !legal.contains(a)).unwrap();
        let mut priors = vec![0.0; NUM_ACTIONS];
        priors[illegal] = 1.0;

        let mut tree = SearchTree::new(&board);
        tree.expand(ROOT, priors).unwrap();
        assert_ne!(select_best_action(&tree, ROOT, &legal, 1.0).unwrap(), illegal);
    }

    #[test]
    fn test_no_legal_actions() {
        let board = Board::initial();
        let mut tree = SearchTree::new(&board);
        tree.expand(ROOT, vec![0.0; NUM_ACTIONS]).unwrap();
        assert!(matches!(
            select_best_action(&tree, ROOT, &[], 1.0),
            Err(SearchError::NoLegalActions)
        ));
    }

    #[test]
    fn test_visited_losing_action_is_avoided() {
        let board = Board::initial();
        let legal = legal_actions(&board);
        let mut tree = SearchTree::new(&board);
        tree.expand(ROOT, uniform(&board)).unwrap();
        backpropagate(&mut tree, ROOT, 0.0);

        // the child through legal[0] scored a win for the opponent
        let mut next = board.clone();
        apply_move(&mut next, Move::from_action(legal[0]).unwrap()).unwrap();
        let child = tree.add_child(ROOT, legal[0], &next);
        backpropagate(&mut tree, child, 1.0);

        assert!(puct_score(&tree, ROOT, legal[0], 0.0) < -0.9);
        assert_ne!(select_best_action(&tree, ROOT, &legal, 1.0).unwrap(), legal[0]);
    }
}
