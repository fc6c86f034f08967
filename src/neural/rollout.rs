use crate::game::board::Board;
use crate::game::simulate_game::simulate_random_playout_with_limit;
use crate::neural::evaluator::{Evaluation, Evaluator, EvaluatorError};
use crate::neural::uniform::uniform_legal_policy;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Random rollout evaluator: uniform priors over legal moves, value from a
/// single random playout (+1 if the side to move wins, -1 if it loses,
/// 0 when the ply cap is hit first).
#[derive(Debug, Clone)]
pub struct RolloutEvaluator {
    /// Maximum rollout length to keep shuffling games bounded
    pub max_plies: usize,
    rng: StdRng,
}

impl RolloutEvaluator {
    pub const DEFAULT_MAX_PLIES: usize = 300;

    pub fn new(max_plies: usize) -> Self {
        Self {
            max_plies,
            rng: StdRng::from_os_rng(),
        }
    }

    pub fn with_seed(max_plies: usize, seed: u64) -> Self {
        Self {
            max_plies,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RolloutEvaluator {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_PLIES)
    }
}

impl Evaluator for RolloutEvaluator {
    fn evaluate(&mut self, board: &Board) -> Result<Evaluation, EvaluatorError> {
        let winner = simulate_random_playout_with_limit(board, &mut self.rng, self.max_plies)
            .map_err(|e| EvaluatorError::EvaluationFailed(e.to_string()))?;

        let value = match winner {
            Some(player) if player == board.turn() => 1.0,
            Some(_) => -1.0,
            None => 0.0,
        };

        Ok(Evaluation {
            policy: uniform_legal_policy(board),
            value,
        })
    }
}
