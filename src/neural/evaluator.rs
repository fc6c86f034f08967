//! Evaluator trait for position evaluation.
//!
//! The search only needs a policy over the full action space and a scalar
//! value for the side to move. In AlphaZero this is a neural network; the
//! crate also ships a uniform and a rollout evaluator that need no model.

use crate::game::action::NUM_ACTIONS;
use crate::game::board::Board;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum EvaluatorError {
    #[error("evaluation failed: {0}")]
    EvaluationFailed(String),

    #[error("policy has {actual} entries, expected {expected}")]
    MalformedPolicy { expected: usize, actual: usize },

    #[error("prior for action {index} is {value}")]
    InvalidPrior { index: usize, value: f32 },

    #[error("value {0} is not a finite number in [-1, 1]")]
    InvalidValue(f32),

    #[error("model error: {0}")]
    Model(String),
}

/// Output of one evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    /// Prior over all `NUM_ACTIONS` actions, non-negative.
    pub policy: Vec<f32>,
    /// Expected outcome for the side to move, in `[-1, 1]`.
    pub value: f32,
}

impl Evaluation {
    /// Rejects outputs the search cannot safely use.
    pub fn validate(&self) -> Result<(), EvaluatorError> {
        if self.policy.len() != NUM_ACTIONS {
            return Err(EvaluatorError::MalformedPolicy {
                expected: NUM_ACTIONS,
                actual: self.policy.len(),
            });
        }
        if let Some((index, &value)) = self
            .policy
            .iter()
            .enumerate()
            .find(|(_, p)| !p.is_finite() || **p < 0.0)
        {
            return Err(EvaluatorError::InvalidPrior { index, value });
        }
        if !self.value.is_finite() || self.value.abs() > 1.0 {
            return Err(EvaluatorError::InvalidValue(self.value));
        }
        Ok(())
    }
}

/// Trait for position evaluators.
///
/// Implementations receive the board the search is looking at; neural
/// implementations feed it through
/// [`encode_board`](crate::neural::tensor_onehot::encode_board).
pub trait Evaluator {
    fn evaluate(&mut self, board: &Board) -> Result<Evaluation, EvaluatorError>;
}

impl<E: Evaluator + ?Sized> Evaluator for &mut E {
    fn evaluate(&mut self, board: &Board) -> Result<Evaluation, EvaluatorError> {
        (**self).evaluate(board)
    }
}

impl<E: Evaluator + ?Sized> Evaluator for Box<E> {
    fn evaluate(&mut self, board: &Board) -> Result<Evaluation, EvaluatorError> {
        (**self).evaluate(board)
    }
}
