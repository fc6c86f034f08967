//! Board coordinates and static terrain.
//!
//! Squares are addressed as `(x, y)` with `x` the column and `y` the row,
//! both in `0..9`. The literal notation used by the competition server is a
//! column letter followed by a 1-based row: `(0, 0)` is `a1`, `(4, 4)` is `e5`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Side length of the Tablut board.
pub const BOARD_SIZE: usize = 9;

/// Orthogonal directions in ray-casting order: north, east, south, west.
pub const DIRECTIONS: [(i32, i32); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];

/// The castle (throne) in the middle of the board.
pub const CASTLE: Square = Square { x: 4, y: 4 };

/// The four squares orthogonally adjacent to the castle.
pub const ADJACENT_TO_CASTLE: [Square; 4] = [
    Square { x: 4, y: 5 },
    Square { x: 5, y: 4 },
    Square { x: 4, y: 3 },
    Square { x: 3, y: 4 },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Square {
    pub x: usize,
    pub y: usize,
}

impl Square {
    /// Builds a square, returning `None` outside the board.
    pub fn new(x: usize, y: usize) -> Option<Self> {
        (x < BOARD_SIZE && y < BOARD_SIZE).then_some(Square { x, y })
    }

    /// Square reached by stepping `(dx, dy)` from `self`, if still on the board.
    pub fn offset(self, dx: i32, dy: i32) -> Option<Self> {
        let x = self.x as i32 + dx;
        let y = self.y as i32 + dy;
        if x < 0 || y < 0 {
            return None;
        }
        Square::new(x as usize, y as usize)
    }

    /// Row-major index `y * 9 + x`.
    pub fn index(self) -> usize {
        self.y * BOARD_SIZE + self.x
    }

    pub fn terrain(self) -> Terrain {
        Terrain::of(self)
    }

    /// Orthogonal neighbours that lie on the board.
    pub fn neighbours(self) -> impl Iterator<Item = Square> {
        DIRECTIONS
            .into_iter()
            .filter_map(move |(dx, dy)| self.offset(dx, dy))
    }

    /// Parses literal notation such as `e5` (case-insensitive column).
    pub fn from_literal(literal: &str) -> Option<Self> {
        let mut chars = literal.trim().chars();
        let column = chars.next()?.to_ascii_lowercase();
        if !column.is_ascii_lowercase() {
            return None;
        }
        let row: usize = chars.as_str().parse().ok()?;
        if row == 0 {
            return None;
        }
        Square::new((column as u8 - b'a') as usize, row - 1)
    }

    pub fn to_literal(self) -> String {
        format!("{}{}", (b'a' + self.x as u8) as char, self.y + 1)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_literal())
    }
}

/// Static classification of a square, fixed for the whole game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Terrain {
    Empty,
    Escape,
    Camp,
    Castle,
    Defense,
    AdjacentToCastle,
}

impl Terrain {
    pub fn of(square: Square) -> Terrain {
        let Square { x, y } = square;
        let on_edge_x = x == 0 || x == 8;
        let on_edge_y = y == 0 || y == 8;

        if (on_edge_x && matches!(y, 1 | 2 | 6 | 7)) || (on_edge_y && matches!(x, 1 | 2 | 6 | 7)) {
            Terrain::Escape
        } else if (on_edge_x && (3..=5).contains(&y))
            || (on_edge_y && (3..=5).contains(&x))
            || matches!((x, y), (1, 4) | (4, 1) | (7, 4) | (4, 7))
        {
            Terrain::Camp
        } else if square == CASTLE {
            Terrain::Castle
        } else if ADJACENT_TO_CASTLE.contains(&square) {
            Terrain::AdjacentToCastle
        } else if (x == 4 && matches!(y, 2 | 6)) || (y == 4 && matches!(x, 2 | 6)) {
            Terrain::Defense
        } else {
            Terrain::Empty
        }
    }

    pub(crate) fn marker(self) -> char {
        match self {
            Terrain::Escape => '*',
            Terrain::Camp => '#',
            Terrain::Castle => 'T',
            _ => '.',
        }
    }
}

impl fmt::Display for Terrain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.marker())
    }
}

/// Iterates every square in row-major order (y outer, x inner).
pub fn all_squares() -> impl Iterator<Item = Square> {
    (0..BOARD_SIZE).flat_map(|y| (0..BOARD_SIZE).map(move |x| Square { x, y }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(terrain: Terrain) -> usize {
        all_squares().filter(|s| s.terrain() == terrain).count()
    }

    #[test]
    fn test_terrain_counts() {
        assert_eq!(count(Terrain::Escape), 16);
        assert_eq!(count(Terrain::Camp), 16);
        assert_eq!(count(Terrain::Castle), 1);
        assert_eq!(count(Terrain::AdjacentToCastle), 4);
        assert_eq!(count(Terrain::Defense), 4);
    }

    #[test]
    fn test_specific_terrain() {
        assert_eq!(Square { x: 0, y: 1 }.terrain(), Terrain::Escape);
        assert_eq!(Square { x: 4, y: 0 }.terrain(), Terrain::Camp);
        assert_eq!(Square { x: 4, y: 1 }.terrain(), Terrain::Camp);
        assert_eq!(Square { x: 0, y: 0 }.terrain(), Terrain::Empty);
        assert_eq!(Square { x: 4, y: 3 }.terrain(), Terrain::AdjacentToCastle);
        assert_eq!(Square { x: 2, y: 4 }.terrain(), Terrain::Defense);
        assert_eq!(CASTLE.terrain(), Terrain::Castle);
    }

    #[test]
    fn test_literal_roundtrip() {
        assert_eq!(Square::from_literal("a1"), Some(Square { x: 0, y: 0 }));
        assert_eq!(Square::from_literal("E5"), Some(CASTLE));
        assert_eq!(Square { x: 8, y: 8 }.to_literal(), "i9");
        assert_eq!(Square::from_literal("j1"), None);
        assert_eq!(Square::from_literal("a0"), None);
        assert_eq!(Square::from_literal("a10"), None);
    }

    #[test]
    fn test_offset_stays_on_board() {
        let corner = Square { x: 0, y: 0 };
        assert_eq!(corner.offset(-1, 0), None);
        assert_eq!(corner.offset(0, 1), Some(Square { x: 0, y: 1 }));
        assert_eq!(corner.neighbours().count(), 2);
        assert_eq!(CASTLE.neighbours().count(), 4);
    }
}
