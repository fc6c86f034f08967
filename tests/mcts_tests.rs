//! Search driver behaviour through the public API

use tablut_zero::game::get_legal_moves::is_legal;
use tablut_zero::game::square::Terrain;
use tablut_zero::{
    legal_actions, Board, Evaluation, Evaluator, EvaluatorError, MctsEngine, Player, RolloutEvaluator,
    SearchConfig, SearchError, Square, UniformEvaluator, NUM_ACTIONS,
};

fn evaluation_engine<E: Evaluator>(evaluator: E, budget: usize) -> MctsEngine<E> {
    let config = SearchConfig::for_evaluation().with_budget(budget).with_seed(9);
    MctsEngine::new(evaluator, config).unwrap()
}

/// Puts all prior mass on one action.
struct Peaked(usize);

impl Evaluator for Peaked {
    fn evaluate(&mut self, _board: &Board) -> Result<Evaluation, EvaluatorError> {
        let mut policy = vec![0.0; NUM_ACTIONS];
        policy[self.0] = 1.0;
        Ok(Evaluation { policy, value: 0.0 })
    }
}

#[test]
fn test_king_takes_the_escape() {
    let rows = [
        ".........",
        ".........",
        ".K.......",
        ".........",
        ".........",
        ".........",
        "......B..",
        ".........",
        ".........",
    ];
    let board = Board::from_layout(&rows, Player::White).unwrap();
    let result = evaluation_engine(UniformEvaluator::new(), 60).search(&board).unwrap();

    assert_eq!(result.mv.from, Square { x: 1, y: 2 });
    assert_eq!(result.mv.to.terrain(), Terrain::Escape);
    assert!(result.win_rate > 0.99);
}

#[test]
fn test_black_captures_the_king() {
    let rows = [
        ".........",
        ".........",
        ".BK....B.",
        ".........",
        ".........",
        ".........",
        ".........",
        ".........",
        ".........",
    ];
    let board = Board::from_layout(&rows, Player::Black).unwrap();
    let result = evaluation_engine(UniformEvaluator::new(), 60).search(&board).unwrap();

    assert_eq!(result.mv.to_string(), "h3-d3");
    assert!(result.win_rate > 0.99);
}

#[test]
fn test_zero_budget_follows_the_prior() {
    let board = Board::initial();
    let target = legal_actions(&board)[41];
    let result = evaluation_engine(Peaked(target), 0).search(&board).unwrap();
    assert_eq!(result.action, target);
    assert_eq!(result.simulations, 0);
}

#[test]
fn test_noise_keeps_decision_legal() {
    let board = Board::initial();
    let config = SearchConfig::for_training().with_budget(0).with_seed(3);
    let mut engine = MctsEngine::new(UniformEvaluator::new(), config).unwrap();
    let result = engine.search(&board).unwrap();
    assert!(is_legal(&board, result.mv));
}

#[test]
fn test_rollout_search_policy_target() {
    let board = Board::initial();
    let mut engine = evaluation_engine(RolloutEvaluator::with_seed(150, 4), 40);
    let result = engine.search(&board).unwrap();

    assert!(is_legal(&board, result.mv));
    let legal = legal_actions(&board);
    let sum: f32 = result.policy.iter().sum();
    assert!((sum - 1.0).abs() < 1e-4);
    assert!(result
        .policy
        .iter()
        .enumerate()
        .all(|(a, &p)| p == 0.0 || legal.contains(&a)));
}

#[test]
fn test_searches_are_independent() {
    let board = Board::initial();
    let mut engine = evaluation_engine(UniformEvaluator::new(), 25);
    let first = engine.search(&board).unwrap();
    let second = engine.search(&board).unwrap();
    assert_eq!(first.action, second.action);
    assert_eq!(first.policy, second.policy);
}

#[test]
fn test_invalid_board_fails_before_search() {
    let mut board = Board::empty(Player::White);
    board.place(Square { x: 2, y: 2 }, tablut_zero::Piece::WHITE);
    let err = evaluation_engine(UniformEvaluator::new(), 10).search(&board).unwrap_err();
    assert!(matches!(err, SearchError::Rule(_)));
}
