use crate::game::action::Move;
use crate::game::apply_move::apply_move;
use crate::game::board::{Board, RuleError};
use crate::game::check_end_game::{check_end_game, GameStatus};
use crate::game::get_legal_moves::get_legal_moves;
use crate::game::piece::Player;
use rand::Rng;

/// Picks a random legal move: first a piece uniformly among the pieces that
/// can move, then a destination uniformly among that piece's destinations.
///
/// This is not uniform over the flat move list; pieces with few moves are
/// favoured. Returns `None` when the side to move is stuck.
pub fn random_move<R: Rng>(board: &Board, rng: &mut R) -> Option<Move> {
    let moves = get_legal_moves(board);
    if moves.is_empty() {
        return None;
    }
    let (from, destinations) = &moves[rng.random_range(0..moves.len())];
    let to = destinations[rng.random_range(0..destinations.len())];
    Some(Move { from: *from, to })
}

/// Plays random moves on a copy of `board` until the game ends or
/// `max_plies` moves were made. Returns the winner, `None` on the ply cap.
pub fn simulate_random_playout_with_limit<R: Rng>(
    board: &Board,
    rng: &mut R,
    max_plies: usize,
) -> Result<Option<Player>, RuleError> {
    let mut simulated = board.clone();
    let mut plies = 0;

    loop {
        if let GameStatus::Won(winner) = check_end_game(&simulated) {
            return Ok(Some(winner));
        }
        if plies >= max_plies {
            return Ok(None);
        }
        match random_move(&simulated, rng) {
            Some(mv) => {
                apply_move(&mut simulated, mv)?;
            }
            // check_end_game already reports a stuck side as a loss
            None => return Ok(Some(simulated.turn().opponent())),
        }
        plies += 1;
    }
}

/// Plays random moves until the game ends and returns the winner.
pub fn simulate_random_playout<R: Rng>(
    board: &Board,
    rng: &mut R,
) -> Result<Player, RuleError> {
    let mut simulated = board.clone();
    loop {
        if let GameStatus::Won(winner) = check_end_game(&simulated) {
            return Ok(winner);
        }
        match random_move(&simulated, rng) {
            Some(mv) => {
                apply_move(&mut simulated, mv)?;
            }
            None => return Ok(simulated.turn().opponent()),
        }
    }
}
