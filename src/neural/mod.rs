pub mod evaluator;
pub mod rollout;
pub mod tensor_onehot;
#[cfg(feature = "torch")]
pub mod torch;
pub mod uniform;

// Re-export key components for convenience
pub use evaluator::{Evaluation, Evaluator, EvaluatorError};
pub use rollout::RolloutEvaluator;
pub use tensor_onehot::encode_board;
#[cfg(feature = "torch")]
pub use torch::TorchEvaluator;
pub use uniform::UniformEvaluator;
