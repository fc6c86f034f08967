//! Mapping between straight-line moves and the flat action space.
//!
//! An action index flattens `(x, y, code)` as `(x * 9 + y) * 32 + code`, where
//! `(x, y)` is the start square and `code` packs direction and distance:
//!
//! - `0..16`: vertical moves, `dy` in `-8..=-1` then `1..=8`
//! - `16..32`: horizontal moves, `dx` in `-8..=-1` then `1..=8`

use crate::game::square::{Square, BOARD_SIZE};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Direction-and-distance codes per start square.
pub const MOVE_CODES: usize = 32;

/// Size of the action space: 9 * 9 * 32.
pub const NUM_ACTIONS: usize = BOARD_SIZE * BOARD_SIZE * MOVE_CODES;

const HALF: usize = MOVE_CODES / 2;
const MAX_DISTANCE: i32 = (BOARD_SIZE - 1) as i32;

#[derive(Debug, Error, PartialEq)]
pub enum ActionError {
    #[error("move {from} -> {to} is not a straight orthogonal line")]
    NotStraightLine { from: Square, to: Square },

    #[error("square ({x}, {y}) is outside the board")]
    OutOfBoard { x: usize, y: usize },

    #[error("action index {0} does not describe a move on the board")]
    IndexOutOfRange(usize),
}

/// A rook-like move from one square to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub from: Square,
    pub to: Square,
}

impl Move {
    pub fn new(from: Square, to: Square) -> Self {
        Move { from, to }
    }

    /// Parses `e3-e1` (the separator may also be a space).
    pub fn from_literal(literal: &str) -> Option<Move> {
        let mut parts = literal
            .split(|c: char| c == '-' || c.is_whitespace())
            .filter(|p| !p.is_empty());
        let from = Square::from_literal(parts.next()?)?;
        let to = Square::from_literal(parts.next()?)?;
        if parts.next().is_some() {
            return None;
        }
        Some(Move { from, to })
    }

    pub fn to_action(self) -> Result<usize, ActionError> {
        encode(self.from, self.to)
    }

    pub fn from_action(index: usize) -> Result<Move, ActionError> {
        decode(index)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.from, self.to)
    }
}

fn check_on_board(square: Square) -> Result<(), ActionError> {
    if square.x < BOARD_SIZE && square.y < BOARD_SIZE {
        Ok(())
    } else {
        Err(ActionError::OutOfBoard {
            x: square.x,
            y: square.y,
        })
    }
}

/// Signed distance in `-8..=8` (excluding 0) to a slot in `0..16`.
fn distance_to_slot(delta: i32) -> usize {
    let shifted = if delta > 0 { delta - 1 } else { delta };
    (shifted + MAX_DISTANCE) as usize
}

fn slot_to_distance(slot: usize) -> i32 {
    let shifted = slot as i32 - MAX_DISTANCE;
    if shifted >= 0 {
        shifted + 1
    } else {
        shifted
    }
}

/// Encodes a straight-line move into an action index in `0..NUM_ACTIONS`.
pub fn encode(from: Square, to: Square) -> Result<usize, ActionError> {
    check_on_board(from)?;
    check_on_board(to)?;

    let dx = to.x as i32 - from.x as i32;
    let dy = to.y as i32 - from.y as i32;
    let code = match (dx, dy) {
        (0, dy) if dy != 0 => distance_to_slot(dy),
        (dx, 0) if dx != 0 => HALF + distance_to_slot(dx),
        _ => return Err(ActionError::NotStraightLine { from, to }),
    };

    Ok((from.x * BOARD_SIZE + from.y) * MOVE_CODES + code)
}

/// Inverse of [`encode`]. Fails for indices whose destination leaves the board.
pub fn decode(index: usize) -> Result<Move, ActionError> {
    if index >= NUM_ACTIONS {
        return Err(ActionError::IndexOutOfRange(index));
    }

    let code = index % MOVE_CODES;
    let cell = index / MOVE_CODES;
    let from = Square {
        x: cell / BOARD_SIZE,
        y: cell % BOARD_SIZE,
    };

    let (dx, dy) = if code < HALF {
        (0, slot_to_distance(code))
    } else {
        (slot_to_distance(code - HALF), 0)
    };

    let to = from
        .offset(dx, dy)
        .ok_or(ActionError::IndexOutOfRange(index))?;
    Ok(Move { from, to })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(x: usize, y: usize) -> Square {
        Square { x, y }
    }

    #[test]
    fn test_action_space_size() {
        assert_eq!(NUM_ACTIONS, 2592);
    }

    #[test]
    fn test_known_codes() {
        // one step north from (0, 1): dy = -1 -> slot 7
        assert_eq!(encode(sq(0, 1), sq(0, 0)).unwrap(), 32 + 7);
        // one step south: dy = +1 -> slot 8
        assert_eq!(encode(sq(0, 0), sq(0, 1)).unwrap(), 8);
        // eight steps east from the corner: slot 16 + 15
        assert_eq!(encode(sq(0, 0), sq(8, 0)).unwrap(), 31);
        // last index of the space
        assert_eq!(encode(sq(8, 8), sq(8, 0)).unwrap(), (8 * 9 + 8) * 32);
    }

    #[test]
    fn test_diagonal_and_null_moves_fail() {
        assert_eq!(
            encode(sq(1, 1), sq(2, 2)),
            Err(ActionError::NotStraightLine {
                from: sq(1, 1),
                to: sq(2, 2)
            })
        );
        assert!(encode(sq(3, 3), sq(3, 3)).is_err());
        assert!(encode(sq(3, 3), sq(9, 3)).is_err());
    }

    #[test]
    fn test_decode_rejects_off_board() {
        // west from column 0
        assert!(decode(HALF).is_err());
        assert_eq!(decode(NUM_ACTIONS), Err(ActionError::IndexOutOfRange(NUM_ACTIONS)));
    }

    #[test]
    fn test_move_literal() {
        let mv = Move::from_literal("e3-e1").unwrap();
        assert_eq!(mv, Move::new(sq(4, 2), sq(4, 0)));
        assert_eq!(mv.to_string(), "e3-e1");
        assert_eq!(Move::from_literal("e3 e1"), Some(mv));
        assert_eq!(Move::from_literal("e3"), None);
    }
}
