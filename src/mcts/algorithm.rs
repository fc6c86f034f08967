//! AlphaZero-style search driver.
//!
//! One call owns one tree. The root is evaluated once (priors optionally
//! noised) and counted as a visit; each simulation then walks down with PUCT
//! on a private copy of the board, expands one node through the evaluator or
//! scores a terminal node, and backpropagates. The final decision uses the
//! same formula with `c = 0`.
use crate::game::action::{ActionError, Move};
use crate::game::apply_move::apply_move;
use crate::game::board::{Board, RuleError};
use crate::game::check_end_game::check_end_game;
use crate::game::get_legal_moves::legal_actions;
use crate::mcts::dirichlet::apply_root_noise;
use crate::mcts::hyperparameters::SearchConfig;
use crate::mcts::mcts_result::SearchResult;
use crate::mcts::node::{NodeId, SearchTree, ROOT};
use crate::mcts::selection::{backpropagate, select_best_action, VISIT_EPSILON};
use crate::neural::evaluator::{Evaluation, Evaluator, EvaluatorError};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Instant;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum SearchError {
    #[error("search requested on a finished game")]
    GameOver,

    #[error("no legal action at a non-terminal node")]
    NoLegalActions,

    #[error("node {0} is already expanded")]
    AlreadyExpanded(NodeId),

    #[error("invalid search configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Rule(#[from] RuleError),

    #[error(transparent)]
    Action(#[from] ActionError),

    #[error(transparent)]
    Evaluator(#[from] EvaluatorError),
}

pub struct MctsEngine<E: Evaluator> {
    evaluator: E,
    config: SearchConfig,
    rng: StdRng,
}

impl<E: Evaluator> MctsEngine<E> {
    pub fn new(evaluator: E, config: SearchConfig) -> Result<Self, SearchError> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Ok(Self {
            evaluator,
            config,
            rng,
        })
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn evaluator_mut(&mut self) -> &mut E {
        &mut self.evaluator
    }

    pub fn into_evaluator(self) -> E {
        self.evaluator
    }

    /// Searches `board` and returns the chosen move.
    ///
    /// The caller's board is never modified. Fails on an invalid or finished
    /// position, and on any evaluator failure.
    pub fn search(&mut self, board: &Board) -> Result<SearchResult, SearchError> {
        board.validate()?;
        if check_end_game(board).is_terminal() {
            return Err(SearchError::GameOver);
        }

        let start = Instant::now();
        let deadline = self.config.timeout().map(|timeout| start + timeout);
        let root_legal = legal_actions(board);
        if root_legal.is_empty() {
            return Err(SearchError::NoLegalActions);
        }

        let mut tree = SearchTree::new(board);
        let root_eval = self.evaluate(board)?;
        let mut priors = root_eval.policy;
        if self.config.root_noise {
            apply_root_noise(
                &mut priors,
                &root_legal,
                self.config.dirichlet_epsilon,
                self.config.dirichlet_alpha,
                &mut self.rng,
            )?;
        }
        tree.expand(ROOT, priors)?;
        backpropagate(&mut tree, ROOT, root_eval.value);

        let mut simulations = 0;
        while simulations < self.config.budget {
            if deadline.is_some_and(|d| Instant::now() >= d) {
                log::warn!(
                    "⏱️ Search timed out after {}/{} simulations",
                    simulations,
                    self.config.budget
                );
                break;
            }
            self.simulate(&mut tree, board)?;
            simulations += 1;
        }

        let action = select_best_action(&tree, ROOT, &root_legal, 0.0)?;
        let mv = Move::from_action(action)?;
        let root = tree.node(ROOT);
        let win_rate = -root.child_value_sums[action] / (root.child_visits[action] + VISIT_EPSILON);
        let policy = visit_policy(&root.child_visits, &root_legal, action);
        let elapsed = start.elapsed();

        log::debug!(
            "MCTS {} -> {} (win rate {:.3}, {} simulations, {} nodes, {:?})",
            board.turn(),
            mv,
            win_rate,
            simulations,
            tree.len() - 1,
            elapsed
        );

        Ok(SearchResult {
            mv,
            action,
            win_rate,
            policy,
            simulations,
            elapsed,
        })
    }

    /// One select / expand-or-terminal / backpropagate pass.
    fn simulate(&mut self, tree: &mut SearchTree, root_board: &Board) -> Result<(), SearchError> {
        let mut board = root_board.clone();
        let mut node = ROOT;
        let mut depth = 0;

        while tree.node(node).is_expanded {
            let legal = legal_actions(&board);
            let action = select_best_action(tree, node, &legal, self.config.exploration_constant)?;
            apply_move(&mut board, Move::from_action(action)?)?;
            node = match tree.child(node, action) {
                Some(child) => child,
                None => tree.add_child(node, action, &board),
            };
            depth += 1;
        }

        let value = if tree.node(node).is_terminal() {
            tree.node(node).terminal_value()
        } else {
            let eval = self.evaluate(&board)?;
            tree.expand(node, eval.policy)?;
            eval.value
        };

        if log::log_enabled!(log::Level::Trace) {
            log::trace!(
                "simulation: depth={} leaf={} terminal={} value={:.3}",
                depth,
                node,
                tree.node(node).is_terminal(),
                value
            );
        }

        backpropagate(tree, node, value);
        Ok(())
    }

    fn evaluate(&mut self, board: &Board) -> Result<Evaluation, SearchError> {
        let evaluation = self.evaluator.evaluate(board)?;
        evaluation.validate()?;
        Ok(evaluation)
    }
}

/// Visit counts restricted to `legal` and normalised; one-hot on `chosen`
/// when nothing was visited.
fn visit_policy(visits: &[f32], legal: &[usize], chosen: usize) -> Vec<f32> {
    let mut policy = vec![0.0; visits.len()];
    let total: f32 = legal.iter().map(|&a| visits[a]).sum();
    if total > 0.0 {
        for &a in legal {
            policy[a] = visits[a] / total;
        }
    } else {
        policy[chosen] = 1.0;
    }
    policy
}
