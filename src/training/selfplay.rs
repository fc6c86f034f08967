//! Self-play game generation.
//!
//! Each position of a game is recorded with its one-hot encoding, the search
//! policy target and the side to move. Values are filled in once the game is
//! over: +1 for the winner's positions, -1 for the loser's, 0 for every
//! position of a game stopped at the ply cap.

use crate::game::apply_move::apply_move;
use crate::game::board::Board;
use crate::game::check_end_game::check_end_game;
use crate::game::piece::Player;
use crate::mcts::algorithm::{MctsEngine, SearchError};
use crate::neural::evaluator::Evaluator;
use crate::neural::tensor_onehot::encode_board;
use crate::TablutError;
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

pub const WHITE_TRANSITIONS_FILE: &str = "white_transitions.jsonl";
pub const BLACK_TRANSITIONS_FILE: &str = "black_transitions.jsonl";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    /// `encode_board` of the position
    pub state: Vec<f32>,
    /// Search policy target
    pub policy: Vec<f32>,
    /// Final outcome for `player`
    pub value: f32,
    pub player: Player,
}

#[derive(Debug, Clone)]
pub struct GameRecord {
    pub transitions: Vec<Transition>,
    /// `None` when the ply cap was reached first
    pub winner: Option<Player>,
    pub plies: usize,
}

impl GameRecord {
    pub fn transitions_of(&self, player: Player) -> impl Iterator<Item = &Transition> {
        self.transitions.iter().filter(move |t| t.player == player)
    }
}

/// Plays one game from the initial position, `white` and `black` searching
/// for their own side.
pub fn play_selfplay_game<W: Evaluator, B: Evaluator>(
    white: &mut MctsEngine<W>,
    black: &mut MctsEngine<B>,
    max_plies: usize,
) -> Result<GameRecord, SearchError> {
    play_selfplay_game_from(Board::initial(), white, black, max_plies)
}

pub fn play_selfplay_game_from<W: Evaluator, B: Evaluator>(
    mut board: Board,
    white: &mut MctsEngine<W>,
    black: &mut MctsEngine<B>,
    max_plies: usize,
) -> Result<GameRecord, SearchError> {
    let mut transitions = Vec::new();
    let mut plies = 0;

    let winner = loop {
        if let Some(winner) = check_end_game(&board).winner() {
            break Some(winner);
        }
        if plies >= max_plies {
            log::info!("Self-play game stopped at the {} ply cap", max_plies);
            break None;
        }

        let player = board.turn();
        let result = match player {
            Player::White => white.search(&board)?,
            Player::Black => black.search(&board)?,
        };
        transitions.push(Transition {
            state: encode_board(&board),
            policy: result.policy,
            value: 0.0,
            player,
        });
        log::debug!("ply {}: {} plays {}", plies + 1, player, result.mv);
        apply_move(&mut board, result.mv)?;
        plies += 1;
    };

    if let Some(winner) = winner {
        for transition in &mut transitions {
            transition.value = if transition.player == winner { 1.0 } else { -1.0 };
        }
    }

    Ok(GameRecord {
        transitions,
        winner,
        plies,
    })
}

/// Appends the record's transitions to the white and black JSONL files in
/// `dir`, creating them if needed. Returns both paths.
pub fn append_transitions(record: &GameRecord, dir: impl AsRef<Path>) -> Result<(PathBuf, PathBuf), TablutError> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)?;

    let white_path = dir.join(WHITE_TRANSITIONS_FILE);
    let black_path = dir.join(BLACK_TRANSITIONS_FILE);
    append_lines(&white_path, record.transitions_of(Player::White))?;
    append_lines(&black_path, record.transitions_of(Player::Black))?;
    Ok((white_path, black_path))
}

fn append_lines<'a>(path: &Path, transitions: impl Iterator<Item = &'a Transition>) -> Result<(), TablutError> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut writer = BufWriter::new(file);
    for transition in transitions {
        serde_json::to_writer(&mut writer, transition)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

/// Reads back a JSONL transition file.
pub fn load_transitions(path: impl AsRef<Path>) -> Result<Vec<Transition>, TablutError> {
    let file = std::fs::File::open(path)?;
    let mut transitions = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        transitions.push(serde_json::from_str(&line)?);
    }
    Ok(transitions)
}
