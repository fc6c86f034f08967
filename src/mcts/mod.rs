pub mod algorithm;
pub mod dirichlet;
pub mod hyperparameters;
pub mod mcts_result;
pub mod node;
pub mod selection;

pub use algorithm::{MctsEngine, SearchError};
pub use hyperparameters::SearchConfig;
pub use mcts_result::SearchResult;
