pub mod selfplay;

pub use selfplay::{append_transitions, load_transitions, play_selfplay_game, GameRecord, Transition};
