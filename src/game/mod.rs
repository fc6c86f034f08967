pub mod action;
pub mod apply_move;
pub mod board;
pub mod check_end_game;
pub mod get_legal_moves;
pub mod piece;
pub mod simulate_game;
pub mod square;

pub use action::{decode, encode, ActionError, Move, NUM_ACTIONS};
pub use apply_move::apply_move;
pub use board::{Board, RuleError, ServerState};
pub use check_end_game::{check_end_game, GameStatus};
pub use get_legal_moves::{get_legal_moves, legal_actions, legal_actions_mask, legal_move_list};
pub use piece::{Piece, Player};
pub use simulate_game::{random_move, simulate_random_playout};
pub use square::{Square, Terrain};
