//! Game state: piece placement, side to move and the sticky king-capture flag.
//!
//! A `Board` is a plain value. Search code takes a full copy with `clone()`
//! before mutating it, so the caller's board is never touched.

use crate::game::piece::{Piece, Player};
use crate::game::square::{all_squares, Square, BOARD_SIZE};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors raised by the rules engine.
#[derive(Debug, Error, PartialEq)]
pub enum RuleError {
    #[error("illegal move {from} -> {to}")]
    IllegalMove { from: Square, to: Square },

    #[error("no piece on {0}")]
    EmptySquare(Square),

    #[error("piece on {square} belongs to {owner}, but {turn} is to move")]
    NotYourPiece {
        square: Square,
        owner: Player,
        turn: Player,
    },

    #[error("invalid board configuration: {0}")]
    InvalidConfiguration(String),
}

const INITIAL_LAYOUT: [&str; BOARD_SIZE] = [
    "...BBB...",
    "....B....",
    "....W....",
    "B...W...B",
    "BBWWKWWBB",
    "B...W...B",
    "....W....",
    "....B....",
    "...BBB...",
];

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    /// Indexed `[y][x]`.
    cells: [[Option<Piece>; BOARD_SIZE]; BOARD_SIZE],
    turn: Player,
    king_captured: bool,
}

impl Default for Board {
    fn default() -> Self {
        Board::initial()
    }
}

impl Board {
    /// Standard Tablut opening position, White to move.
    pub fn initial() -> Board {
        let mut board = Board::empty(Player::White);
        for (y, row) in INITIAL_LAYOUT.iter().enumerate() {
            for (x, token) in row.bytes().enumerate() {
                board.cells[y][x] = match token {
                    b'B' => Some(Piece::BLACK),
                    b'W' => Some(Piece::WHITE),
                    b'K' => Some(Piece::KING),
                    _ => None,
                };
            }
        }
        board
    }

    /// Board with no pieces at all. Useful for building positions piece by piece.
    pub fn empty(turn: Player) -> Board {
        Board {
            cells: [[None; BOARD_SIZE]; BOARD_SIZE],
            turn,
            king_captured: false,
        }
    }

    /// Parses a 9x9 text grid (`B` black, `W` white, `K` king, any of `.-*#T`
    /// for an empty square; spaces are ignored) and validates the result.
    pub fn from_layout(rows: &[&str], turn: Player) -> Result<Board, RuleError> {
        if rows.len() != BOARD_SIZE {
            return Err(RuleError::InvalidConfiguration(format!(
                "expected {} rows, got {}",
                BOARD_SIZE,
                rows.len()
            )));
        }

        let mut board = Board::empty(turn);
        for (y, row) in rows.iter().enumerate() {
            let tokens: Vec<char> = row.chars().filter(|c| !c.is_whitespace()).collect();
            if tokens.len() != BOARD_SIZE {
                return Err(RuleError::InvalidConfiguration(format!(
                    "row {} has {} cells",
                    y,
                    tokens.len()
                )));
            }
            for (x, token) in tokens.into_iter().enumerate() {
                board.cells[y][x] = match token {
                    'B' | 'b' => Some(Piece::BLACK),
                    'W' | 'w' => Some(Piece::WHITE),
                    'K' | 'k' => Some(Piece::KING),
                    '.' | '-' | '*' | '#' | 'T' | 't' => None,
                    other => {
                        return Err(RuleError::InvalidConfiguration(format!(
                            "unknown cell token '{}' at ({}, {})",
                            other, x, y
                        )))
                    }
                };
            }
        }
        board.validate()?;
        Ok(board)
    }

    /// Builds a board from the competition server's JSON state.
    pub fn from_server_state(state: &ServerState) -> Result<Board, RuleError> {
        let turn = Player::from_token(&state.turn).ok_or_else(|| {
            RuleError::InvalidConfiguration(format!("unknown turn '{}'", state.turn))
        })?;
        if state.board.len() != BOARD_SIZE {
            return Err(RuleError::InvalidConfiguration(format!(
                "expected {} rows, got {}",
                BOARD_SIZE,
                state.board.len()
            )));
        }

        let mut board = Board::empty(turn);
        for (y, row) in state.board.iter().enumerate() {
            if row.len() != BOARD_SIZE {
                return Err(RuleError::InvalidConfiguration(format!(
                    "row {} has {} cells",
                    y,
                    row.len()
                )));
            }
            for (x, token) in row.iter().enumerate() {
                board.cells[y][x] = match token.to_ascii_uppercase().as_str() {
                    "EMPTY" | "THRONE" => None,
                    "WHITE" => Some(Piece::WHITE),
                    "BLACK" => Some(Piece::BLACK),
                    "KING" => Some(Piece::KING),
                    other => {
                        return Err(RuleError::InvalidConfiguration(format!(
                            "unknown cell token '{}' at ({}, {})",
                            other, x, y
                        )))
                    }
                };
            }
        }
        board.validate()?;
        Ok(board)
    }

    /// Checks the structural invariants: at most one king, and a king on the
    /// board unless it has already been captured.
    pub fn validate(&self) -> Result<(), RuleError> {
        let kings = self.occupied().filter(|(_, p)| p.is_king).count();
        match (kings, self.king_captured) {
            (0, false) => Err(RuleError::InvalidConfiguration(
                "no king on the board".to_string(),
            )),
            (1, false) | (0, true) => Ok(()),
            (1, true) => Err(RuleError::InvalidConfiguration(
                "king marked captured but still on the board".to_string(),
            )),
            (n, _) => Err(RuleError::InvalidConfiguration(format!(
                "{} kings on the board",
                n
            ))),
        }
    }

    pub fn turn(&self) -> Player {
        self.turn
    }

    pub fn set_turn(&mut self, turn: Player) {
        self.turn = turn;
    }

    pub(crate) fn toggle_turn(&mut self) {
        self.turn = self.turn.opponent();
    }

    pub fn king_captured(&self) -> bool {
        self.king_captured
    }

    pub(crate) fn mark_king_captured(&mut self) {
        self.king_captured = true;
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.cells[square.y][square.x]
    }

    pub fn is_occupied(&self, square: Square) -> bool {
        self.piece_at(square).is_some()
    }

    /// Puts `piece` on `square`, replacing whatever was there.
    pub fn place(&mut self, square: Square, piece: Piece) {
        self.cells[square.y][square.x] = Some(piece);
    }

    pub fn remove(&mut self, square: Square) -> Option<Piece> {
        self.cells[square.y][square.x].take()
    }

    /// Every occupied square with its piece, row-major.
    pub fn occupied(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        all_squares().filter_map(move |sq| self.piece_at(sq).map(|p| (sq, p)))
    }

    pub fn pieces_of(&self, player: Player) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.occupied().filter(move |(_, p)| p.color == player)
    }

    pub fn king_square(&self) -> Option<Square> {
        self.occupied().find(|(_, p)| p.is_king).map(|(sq, _)| sq)
    }

    pub fn count(&self, player: Player) -> usize {
        self.pieces_of(player).count()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..BOARD_SIZE {
            for x in 0..BOARD_SIZE {
                let square = Square { x, y };
                let symbol = match self.piece_at(square) {
                    Some(piece) => piece.symbol(),
                    None => square.terrain().marker(),
                };
                write!(f, "{}", symbol)?;
            }
            writeln!(f, " {}", y + 1)?;
        }
        writeln!(f, "abcdefghi")?;
        write!(f, "{} to move", self.turn)
    }
}

/// State message sent by the competition server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerState {
    pub board: Vec<Vec<String>>,
    pub turn: String,
}

impl ServerState {
    pub fn from_json(json: &str) -> serde_json::Result<ServerState> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::square::CASTLE;

    #[test]
    fn test_initial_board() {
        let board = Board::initial();
        assert_eq!(board.turn(), Player::White);
        assert_eq!(board.count(Player::Black), 16);
        // 8 defenders plus the king
        assert_eq!(board.count(Player::White), 9);
        assert_eq!(board.king_square(), Some(CASTLE));
        assert!(!board.king_captured());
        assert!(board.validate().is_ok());
    }

    #[test]
    fn test_layout_without_king_is_rejected() {
        let mut rows = INITIAL_LAYOUT;
        rows[4] = "BBWW.WWBB";
        let err = Board::from_layout(&rows, Player::Black).unwrap_err();
        assert!(matches!(err, RuleError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_layout_with_two_kings_is_rejected() {
        let mut rows = INITIAL_LAYOUT;
        rows[0] = "...BKB...";
        assert!(Board::from_layout(&rows, Player::White).is_err());
    }

    #[test]
    fn test_layout_bad_token() {
        let mut rows = INITIAL_LAYOUT;
        rows[0] = "...BXB...";
        assert!(Board::from_layout(&rows, Player::White).is_err());
    }

    #[test]
    fn test_server_state_roundtrip() {
        let board: Vec<Vec<String>> = INITIAL_LAYOUT
            .iter()
            .map(|row| {
                row.chars()
                    .map(|c| match c {
                        'B' => "BLACK",
                        'W' => "WHITE",
                        'K' => "KING",
                        _ => "EMPTY",
                    })
                    .map(str::to_string)
                    .collect()
            })
            .collect();
        let state = ServerState {
            board,
            turn: "WHITE".to_string(),
        };
        let json = serde_json::to_string(&state).unwrap();
        let parsed = ServerState::from_json(&json).unwrap();
        assert_eq!(Board::from_server_state(&parsed).unwrap(), Board::initial());
    }

    #[test]
    fn test_display_marks_castle_and_pieces() {
        let text = Board::initial().to_string();
        assert!(text.starts_with(".**BBB**. 1"));
        assert!(text.contains("BBWWKWWBB 5"));
        assert!(text.ends_with("White to move"));
    }
}
