use crate::game::board::Board;
use crate::game::get_legal_moves::has_legal_move;
use crate::game::piece::Player;
use crate::game::square::Terrain;

/// Outcome of a terminal check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Ongoing,
    Won(Player),
}

impl GameStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, GameStatus::Won(_))
    }

    pub fn winner(self) -> Option<Player> {
        match self {
            GameStatus::Won(player) => Some(player),
            GameStatus::Ongoing => None,
        }
    }
}

/// Black wins once the king is captured, White once the king stands on an
/// escape square. Otherwise a side with no legal move loses.
pub fn check_end_game(board: &Board) -> GameStatus {
    if board.king_captured() {
        return GameStatus::Won(Player::Black);
    }
    if board
        .king_square()
        .is_some_and(|sq| sq.terrain() == Terrain::Escape)
    {
        return GameStatus::Won(Player::White);
    }
    if !has_legal_move(board) {
        return GameStatus::Won(board.turn().opponent());
    }
    GameStatus::Ongoing
}
