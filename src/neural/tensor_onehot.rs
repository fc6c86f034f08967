/// ONE-HOT BOARD ENCODING FOR THE EVALUATOR
///
/// Three 9×9 planes, flattened `plane * 81 + y * 9 + x` (same `(x, y)`
/// convention as the rules engine):
/// - Plane 0: Black occupancy
/// - Plane 1: White occupancy, king included
/// - Plane 2: King occupancy
use crate::game::board::Board;
use crate::game::piece::Player;
use crate::game::square::BOARD_SIZE;

pub const ONEHOT_CHANNELS: usize = 3;

pub const PLANE_SIZE: usize = BOARD_SIZE * BOARD_SIZE;

/// Total length of an encoded board: 3 * 9 * 9.
pub const ENCODED_LEN: usize = ONEHOT_CHANNELS * PLANE_SIZE;

const BLACK_PLANE: usize = 0;
const WHITE_PLANE: usize = 1;
const KING_PLANE: usize = 2;

/// Encodes `board` into a flat `ENCODED_LEN` vector.
pub fn encode_board(board: &Board) -> Vec<f32> {
    let mut planes = vec![0.0f32; ENCODED_LEN];
    for (square, piece) in board.occupied() {
        let cell = square.index();
        match piece.color {
            Player::Black => planes[BLACK_PLANE * PLANE_SIZE + cell] = 1.0,
            Player::White => planes[WHITE_PLANE * PLANE_SIZE + cell] = 1.0,
        }
        if piece.is_king {
            planes[KING_PLANE * PLANE_SIZE + cell] = 1.0;
        }
    }
    planes
}
