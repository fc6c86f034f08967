//! # Tablut Zero
//!
//! Tablut engine with an AlphaZero-style search.
//!
//! ## Features
//!
//! - **Game Engine**: 9×9 Tablut rules (terrain, custodian captures, king capture variants, terminal detection)
//! - **Action Codec**: bijection between straight-line moves and the 2592 action indices
//! - **Search**: PUCT Monte Carlo Tree Search driven by any [`Evaluator`]
//! - **Evaluators**: uniform, random rollout and (feature `torch`) a libtorch network
//! - **Self-play**: training transitions written as JSON lines
//!
//! ## Usage
//!
//! ```rust
//! use tablut_zero::{Board, MctsEngine, SearchConfig, UniformEvaluator};
//!
//! let config = SearchConfig::for_evaluation().with_budget(16);
//! let mut engine = MctsEngine::new(UniformEvaluator::new(), config).unwrap();
//! let result = engine.search(&Board::initial()).unwrap();
//! println!("{} (win rate {:.2})", result.mv, result.win_rate);
//! ```

// ============================================================================
// PUBLIC API MODULES
// ============================================================================

/// Board, rules and action codec
pub mod game;

/// Monte Carlo Tree Search engine
pub mod mcts;

/// Evaluator boundary and implementations
pub mod neural;

/// Self-play data generation
pub mod training;

/// Logger initialisation for the binaries
pub mod logging;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

pub use game::*;

pub use mcts::*;

pub use neural::*;

pub use training::*;

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Main error type for the Tablut Zero library
#[derive(Debug, thiserror::Error)]
pub enum TablutError {
    #[error("Rule error: {0}")]
    Rule(#[from] RuleError),

    #[error("Action error: {0}")]
    Action(#[from] ActionError),

    #[error("Evaluator error: {0}")]
    Evaluator(#[from] EvaluatorError),

    #[error("Search error: {0}")]
    Search(#[from] SearchError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, TablutError>;

// ============================================================================
// LIBRARY VERSION INFO
// ============================================================================

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Library description
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
