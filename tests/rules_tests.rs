//! Rules engine: move generation, captures and terminal detection

use rand::rngs::StdRng;
use rand::SeedableRng;
use tablut_zero::game::get_legal_moves::piece_destinations;
use tablut_zero::game::square::CASTLE;
use tablut_zero::{
    apply_move, check_end_game, get_legal_moves, simulate_random_playout, Board, GameStatus, Move,
    Player, RuleError, Square,
};

fn sq(x: usize, y: usize) -> Square {
    Square { x, y }
}

#[test]
fn test_initial_white_moves() {
    let board = Board::initial();
    let moves = get_legal_moves(&board);
    assert_eq!(moves.len(), 8);
    assert_eq!(moves.iter().map(|(_, d)| d.len()).sum::<usize>(), 56);
    assert!(piece_destinations(&board, CASTLE).is_empty());
}

#[test]
fn test_initial_black_moves() {
    let mut board = Board::initial();
    board.set_turn(Player::Black);
    let moves = get_legal_moves(&board);
    assert_eq!(moves.len(), 12);
    assert_eq!(moves.iter().map(|(_, d)| d.len()).sum::<usize>(), 80);
}

#[test]
fn test_custodian_capture_against_ally() {
    let rows = [
        ".........",
        ".........",
        "..K......",
        ".........",
        ".........",
        ".........",
        ".WB....W.",
        ".........",
        ".........",
    ];
    let mut board = Board::from_layout(&rows, Player::White).unwrap();
    let captured = apply_move(&mut board, Move::new(sq(7, 6), sq(3, 6))).unwrap();
    assert_eq!(captured, vec![sq(2, 6)]);
    assert_eq!(board.piece_at(sq(2, 6)), None);
    assert_eq!(board.count(Player::Black), 0);
}

#[test]
fn test_no_capture_against_empty_square() {
    let rows = [
        ".........",
        ".........",
        "..K......",
        ".........",
        ".........",
        ".........",
        "..B....W.",
        ".........",
        ".........",
    ];
    let mut board = Board::from_layout(&rows, Player::White).unwrap();
    let captured = apply_move(&mut board, Move::new(sq(7, 6), sq(3, 6))).unwrap();
    assert!(captured.is_empty());
    assert_eq!(board.count(Player::Black), 1);
}

#[test]
fn test_king_on_castle_needs_four_attackers() {
    let surrounded = [
        ".........",
        ".........",
        ".........",
        "....B....",
        "...BKB...",
        "......B..",
        ".........",
        ".........",
        ".........",
    ];
    let mut board = Board::from_layout(&surrounded, Player::Black).unwrap();
    let captured = apply_move(&mut board, Move::new(sq(6, 5), sq(4, 5))).unwrap();
    assert_eq!(captured, vec![CASTLE]);
    assert!(board.king_captured());
    assert_eq!(board.king_square(), None);
    assert_eq!(check_end_game(&board), GameStatus::Won(Player::Black));

    let three_sides = [
        ".........",
        ".........",
        ".........",
        "....B....",
        "...BK....",
        "......B..",
        ".........",
        ".........",
        ".........",
    ];
    let mut board = Board::from_layout(&three_sides, Player::Black).unwrap();
    let captured = apply_move(&mut board, Move::new(sq(6, 5), sq(4, 5))).unwrap();
    assert!(captured.is_empty());
    assert_eq!(board.king_square(), Some(CASTLE));
    assert!(!board.king_captured());
}

#[test]
fn test_open_king_custodian_capture() {
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
    let mut board = Board::from_layout(&rows, Player::Black).unwrap();
    apply_move(&mut board, Move::new(sq(7, 2), sq(3, 2))).unwrap();
    assert!(board.king_captured());
    assert_eq!(check_end_game(&board), GameStatus::Won(Player::Black));
}

#[test]
fn test_king_on_escape_wins_regardless_of_moves() {
    let rows = [
        ".........",
        ".........",
        "K........",
        ".........",
        ".........",
        ".........",
        ".........",
        ".........",
        ".........",
    ];
    // Black has no piece and therefore no move, White still wins by escape
    let board = Board::from_layout(&rows, Player::Black).unwrap();
    assert_eq!(check_end_game(&board), GameStatus::Won(Player::White));
}

#[test]
fn test_stuck_side_loses() {
    let rows = [
        "BW.......",
        "W........",
        ".........",
        ".........",
        ".........",
        ".........",
        "......K..",
        ".........",
        ".........",
    ];
    let board = Board::from_layout(&rows, Player::Black).unwrap();
    assert_eq!(check_end_game(&board), GameStatus::Won(Player::White));

    let mut white_to_move = board.clone();
    white_to_move.set_turn(Player::White);
    assert_eq!(check_end_game(&white_to_move), GameStatus::Ongoing);
}

#[test]
fn test_wrong_side_and_illegal_moves_are_rejected() {
    let mut board = Board::initial();
    assert!(matches!(
        apply_move(&mut board, Move::new(sq(4, 1), sq(6, 1))),
        Err(RuleError::NotYourPiece { .. })
    ));
    assert!(matches!(
        apply_move(&mut board, Move::new(sq(0, 0), sq(0, 1))),
        Err(RuleError::EmptySquare(_))
    ));
    // defender cannot jump over the king
    assert!(matches!(
        apply_move(&mut board, Move::new(sq(4, 3), sq(4, 5))),
        Err(RuleError::IllegalMove { .. })
    ));
    assert_eq!(board, Board::initial());
}

#[test]
fn test_random_playout_reaches_an_end() {
    let mut rng = StdRng::seed_from_u64(2024);
    for _ in 0..3 {
        let winner = simulate_random_playout(&Board::initial(), &mut rng).unwrap();
        assert!(matches!(winner, Player::White | Player::Black));
    }
}

#[test]
fn test_server_state_round_trip() {
    let board = Board::initial();
    let rows: Vec<Vec<String>> = (0..9)
        .map(|y| {
            (0..9)
                .map(|x| match board.piece_at(sq(x, y)) {
                    None if sq(x, y) == CASTLE => "THRONE",
                    None => "EMPTY",
                    Some(p) if p.is_king => "KING",
                    Some(p) if p.color == Player::White => "WHITE",
                    Some(_) => "BLACK",
                }
                .to_string())
                .collect()
        })
        .collect();
    let json = serde_json::json!({ "board": rows, "turn": "WHITE" }).to_string();

    let state = tablut_zero::ServerState::from_json(&json).unwrap();
    assert_eq!(Board::from_server_state(&state).unwrap(), board);
}
