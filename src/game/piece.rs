use serde::{Deserialize, Serialize};
use std::fmt;

/// Side to move, also used as piece colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    White,
    Black,
}

impl Player {
    pub fn opponent(self) -> Player {
        match self {
            Player::White => Player::Black,
            Player::Black => Player::White,
        }
    }

    /// Parses the competition server tokens (`WHITE`, `black`, `W`, ...).
    pub fn from_token(token: &str) -> Option<Player> {
        match token.trim().to_ascii_uppercase().as_str() {
            "WHITE" | "W" => Some(Player::White),
            "BLACK" | "B" => Some(Player::Black),
            _ => None,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::White => write!(f, "White"),
            Player::Black => write!(f, "Black"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub color: Player,
    pub is_king: bool,
}

impl Piece {
    pub const WHITE: Piece = Piece {
        color: Player::White,
        is_king: false,
    };
    pub const BLACK: Piece = Piece {
        color: Player::Black,
        is_king: false,
    };
    pub const KING: Piece = Piece {
        color: Player::White,
        is_king: true,
    };

    pub fn symbol(self) -> char {
        match (self.color, self.is_king) {
            (_, true) => 'K',
            (Player::White, false) => 'W',
            (Player::Black, false) => 'B',
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opponent_is_involution() {
        assert_eq!(Player::White.opponent(), Player::Black);
        assert_eq!(Player::Black.opponent().opponent(), Player::Black);
    }

    #[test]
    fn test_player_tokens() {
        assert_eq!(Player::from_token("WHITE"), Some(Player::White));
        assert_eq!(Player::from_token(" black "), Some(Player::Black));
        assert_eq!(Player::from_token("WHITEWIN"), None);
    }

    #[test]
    fn test_king_is_white() {
        assert_eq!(Piece::KING.color, Player::White);
        assert_eq!(Piece::KING.symbol(), 'K');
    }
}
