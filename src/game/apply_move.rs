//! Move execution and custodian captures.

use crate::game::action::Move;
use crate::game::board::{Board, RuleError};
use crate::game::get_legal_moves::piece_destinations;
use crate::game::piece::Player;
use crate::game::square::{Square, Terrain, ADJACENT_TO_CASTLE, CASTLE, DIRECTIONS};

/// Applies `mv` for the side to move, resolves captures around the
/// destination and passes the turn. Returns the squares whose pieces were
/// captured.
///
/// The board is left untouched when the move is illegal.
pub fn apply_move(board: &mut Board, mv: Move) -> Result<Vec<Square>, RuleError> {
    let piece = board
        .piece_at(mv.from)
        .ok_or(RuleError::EmptySquare(mv.from))?;
    if piece.color != board.turn() {
        return Err(RuleError::NotYourPiece {
            square: mv.from,
            owner: piece.color,
            turn: board.turn(),
        });
    }
    if !piece_destinations(board, mv.from).contains(&mv.to) {
        return Err(RuleError::IllegalMove {
            from: mv.from,
            to: mv.to,
        });
    }

    board.remove(mv.from);
    board.place(mv.to, piece);

    let mover = piece.color;
    let mut captured = Vec::new();
    for (dx, dy) in DIRECTIONS {
        let (Some(mid), Some(far)) = (mv.to.offset(dx, dy), mv.to.offset(2 * dx, 2 * dy)) else {
            continue;
        };
        let Some(target) = board.piece_at(mid) else {
            continue;
        };
        if target.color == mover {
            continue;
        }

        let taken = if target.is_king {
            king_is_captured(board, mid, far, mover)
        } else {
            flanked(board, mid, far, mover)
        };

        if taken {
            board.remove(mid);
            if target.is_king {
                board.mark_king_captured();
            }
            captured.push(mid);
        }
    }

    board.toggle_turn();
    Ok(captured)
}

/// Custodian rule for ordinary pieces: the far side is an allied piece, the
/// castle, or a camp (unless the flanked piece itself stands in a camp).
fn flanked(board: &Board, mid: Square, far: Square, mover: Player) -> bool {
    if board.piece_at(far).is_some_and(|p| p.color == mover) {
        return true;
    }
    match far.terrain() {
        Terrain::Castle => true,
        Terrain::Camp => mid.terrain() != Terrain::Camp,
        _ => false,
    }
}

fn is_black(board: &Board, square: Square) -> bool {
    board
        .piece_at(square)
        .is_some_and(|p| p.color == Player::Black)
}

fn king_is_captured(board: &Board, king: Square, far: Square, mover: Player) -> bool {
    if king == CASTLE {
        ADJACENT_TO_CASTLE.iter().all(|&sq| is_black(board, sq))
    } else if king.terrain() == Terrain::AdjacentToCastle {
        king.neighbours()
            .all(|sq| is_black(board, sq) || sq.terrain() == Terrain::Castle)
    } else {
        board.piece_at(far).is_some_and(|p| p.color == mover)
            || (far.terrain() == Terrain::Camp && king.terrain() != Terrain::Camp)
    }
}
