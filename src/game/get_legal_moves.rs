use crate::game::action::{encode, Move, NUM_ACTIONS};
use crate::game::board::Board;
use crate::game::piece::{Piece, Player};
use crate::game::square::{all_squares, Square, Terrain, DIRECTIONS};

/// Whether a piece leaving `from` may stop on or pass through `square`.
///
/// The castle is closed to everyone. Camps are closed to White, and to Black
/// unless the moving piece started inside a camp.
fn can_enter(piece: Piece, from: Square, square: Square) -> bool {
    match square.terrain() {
        Terrain::Castle => false,
        Terrain::Camp => piece.color == Player::Black && from.terrain() == Terrain::Camp,
        _ => true,
    }
}

/// Destinations of the piece on `from`, ray by ray (north, east, south, west).
/// Empty when the square is empty.
pub fn piece_destinations(board: &Board, from: Square) -> Vec<Square> {
    let Some(piece) = board.piece_at(from) else {
        return Vec::new();
    };

    let mut destinations = Vec::new();
    for (dx, dy) in DIRECTIONS {
        let mut current = from;
        while let Some(next) = current.offset(dx, dy) {
            if board.is_occupied(next) || !can_enter(piece, from, next) {
                break;
            }
            destinations.push(next);
            current = next;
        }
    }
    destinations
}

/// Legal moves for the side to move, grouped by piece, pieces in row-major order.
/// Pieces without any destination are left out.
pub fn get_legal_moves(board: &Board) -> Vec<(Square, Vec<Square>)> {
    board
        .pieces_of(board.turn())
        .filter_map(|(from, _)| {
            let destinations = piece_destinations(board, from);
            (!destinations.is_empty()).then_some((from, destinations))
        })
        .collect()
}

/// Flattened list of legal moves.
pub fn legal_move_list(board: &Board) -> Vec<Move> {
    get_legal_moves(board)
        .into_iter()
        .flat_map(|(from, tos)| tos.into_iter().map(move |to| Move { from, to }))
        .collect()
}

/// Action indices of every legal move.
pub fn legal_actions(board: &Board) -> Vec<usize> {
    legal_move_list(board)
        .into_iter()
        // Legal moves are straight lines on the board, so encoding cannot fail.
        .filter_map(|mv| encode(mv.from, mv.to).ok())
        .collect()
}

/// Dense `NUM_ACTIONS`-long mask of legal actions.
pub fn legal_actions_mask(board: &Board) -> Vec<bool> {
    let mut mask = vec![false; NUM_ACTIONS];
    for action in legal_actions(board) {
        mask[action] = true;
    }
    mask
}

/// True as soon as the side to move has one legal move.
pub fn has_legal_move(board: &Board) -> bool {
    all_squares().any(|from| match board.piece_at(from) {
        Some(piece) if piece.color == board.turn() => DIRECTIONS.iter().any(|&(dx, dy)| {
            from.offset(dx, dy)
                .is_some_and(|next| !board.is_occupied(next) && can_enter(piece, from, next))
        }),
        _ => false,
    })
}

pub fn is_legal(board: &Board, mv: Move) -> bool {
    match board.piece_at(mv.from) {
        Some(piece) if piece.color == board.turn() => {
            piece_destinations(board, mv.from).contains(&mv.to)
        }
        _ => false,
    }
}
