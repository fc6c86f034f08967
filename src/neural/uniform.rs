use crate::game::action::NUM_ACTIONS;
use crate::game::board::Board;
use crate::game::get_legal_moves::legal_actions;
use crate::neural::evaluator::{Evaluation, Evaluator, EvaluatorError};

/// Uniform evaluator that assigns equal probability to all legal moves.
/// Value is always 0.0 (neutral). Useful for testing MCTS without a model.
#[derive(Debug, Clone, Default)]
pub struct UniformEvaluator;

impl UniformEvaluator {
    pub fn new() -> Self {
        Self
    }
}

/// Uniform prior over the legal actions of `board`, zero elsewhere.
pub fn uniform_legal_policy(board: &Board) -> Vec<f32> {
    let mut policy = vec![0.0; NUM_ACTIONS];
    let legal = legal_actions(board);
    if legal.is_empty() {
        return policy;
    }
    let prob = 1.0 / legal.len() as f32;
    for action in legal {
        policy[action] = prob;
    }
    policy
}

impl Evaluator for UniformEvaluator {
    fn evaluate(&mut self, board: &Board) -> Result<Evaluation, EvaluatorError> {
        Ok(Evaluation {
            policy: uniform_legal_policy(board),
            value: 0.0,
        })
    }
}
