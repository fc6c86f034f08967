//! AI Arena - MCTS vs random opponent
//!
//! Plays independent games in parallel (one engine per game, the search itself
//! stays single-threaded), alternating the side played by the search, and
//! writes one CSV row per game.

use clap::Parser;
use csv::Writer;
use flexi_logger::Logger;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use std::error::Error;
use std::fs::File;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tablut_zero::game::simulate_game::random_move;
use tablut_zero::{
    apply_move, check_end_game, Board, Evaluator, MctsEngine, Player, RolloutEvaluator, SearchConfig,
    UniformEvaluator,
};

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum EvaluatorKind {
    Uniform,
    Rollout,
}

#[derive(Parser, Debug)]
#[command(name = "ai-arena", about = "Run MCTS vs random matches and record the results")]
struct Args {
    /// Number of games to play
    #[arg(long, default_value_t = 20)]
    games: usize,

    /// Number of MCTS simulations per move
    #[arg(long, default_value_t = 200)]
    simulations: usize,

    /// Position evaluator used by the search
    #[arg(long, value_enum, default_value = "rollout")]
    evaluator: EvaluatorKind,

    /// Ply cap of a single rollout
    #[arg(long, default_value_t = 300)]
    rollout_plies: usize,

    /// Ply cap per game
    #[arg(long, default_value_t = 200)]
    max_plies: usize,

    /// Output CSV file for results
    #[arg(short, long, default_value = "data/arena_results.csv")]
    output: String,

    /// Worker threads (0 = rayon default)
    #[arg(long, default_value_t = 0)]
    workers: usize,

    /// Random seed
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

#[derive(Debug, Clone)]
struct GameResult {
    game_id: usize,
    mcts_side: Player,
    winner: Option<Player>,
    plies: usize,
    mean_move_time: Duration,
    seed: u64,
}

impl GameResult {
    fn mcts_won(&self) -> bool {
        self.winner == Some(self.mcts_side)
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    Logger::try_with_env_or_str("info")?
        .format(flexi_logger::colored_default_format)
        .start()?;

    let args = Args::parse();

    if args.workers > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(args.workers)
            .build_global()?;
    }

    log::info!("🏟️  AI Arena");
    log::info!(
        "{} games, {} simulations/move, {:?} evaluator",
        args.games,
        args.simulations,
        args.evaluator
    );

    let finished = AtomicUsize::new(0);
    let results: Vec<GameResult> = (0..args.games)
        .into_par_iter()
        .map(|game_id| {
            let result = play_game(&args, game_id);
            let count = finished.fetch_add(1, Ordering::Relaxed) + 1;
            if let Ok(r) = &result {
                log::info!(
                    "game {} ({}/{}): MCTS as {} -> {} in {} plies",
                    r.game_id,
                    count,
                    args.games,
                    r.mcts_side,
                    r.winner.map_or("draw".to_string(), |p| p.to_string()),
                    r.plies
                );
            }
            result
        })
        .collect::<Result<_, String>>()?;

    let wins = results.iter().filter(|r| r.mcts_won()).count();
    let draws = results.iter().filter(|r| r.winner.is_none()).count();
    log::info!(
        "📊 MCTS won {}/{} ({:.1}%), {} draws",
        wins,
        results.len(),
        100.0 * wins as f64 / results.len().max(1) as f64,
        draws
    );

    save_results_csv(&args.output, &results)?;
    log::info!("✅ Results written to {}", args.output);
    Ok(())
}

fn play_game(args: &Args, game_id: usize) -> Result<GameResult, String> {
    let seed = args.seed.wrapping_add(game_id as u64);
    let mcts_side = if game_id % 2 == 0 { Player::White } else { Player::Black };

    let evaluator: Box<dyn Evaluator> = match args.evaluator {
        EvaluatorKind::Uniform => Box::new(UniformEvaluator::new()),
        EvaluatorKind::Rollout => Box::new(RolloutEvaluator::with_seed(args.rollout_plies, seed)),
    };
    let config = SearchConfig::for_evaluation()
        .with_budget(args.simulations)
        .with_seed(seed);
    let mut engine = MctsEngine::new(evaluator, config).map_err(|e| e.to_string())?;
    let mut rng = StdRng::seed_from_u64(seed ^ 0x9e37_79b9);

    let mut board = Board::initial();
    let mut plies = 0;
    let mut search_time = Duration::ZERO;
    let mut searches = 0u32;

    while plies < args.max_plies && !check_end_game(&board).is_terminal() {
        let mv = if board.turn() == mcts_side {
            let result = engine.search(&board).map_err(|e| format!("game {game_id}: {e}"))?;
            search_time += result.elapsed;
            searches += 1;
            result.mv
        } else {
            random_move(&board, &mut rng).ok_or_else(|| format!("game {game_id}: no legal move"))?
        };
        apply_move(&mut board, mv).map_err(|e| format!("game {game_id}: {e}"))?;
        plies += 1;
    }

    Ok(GameResult {
        game_id,
        mcts_side,
        winner: check_end_game(&board).winner(),
        plies,
        mean_move_time: search_time / searches.max(1),
        seed,
    })
}

fn save_results_csv(path: &str, results: &[GameResult]) -> Result<(), Box<dyn Error>> {
    if let Some(parent) = PathBuf::from(path).parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = File::create(path)?;
    let mut writer = Writer::from_writer(file);

    writer.write_record(["game_id", "mcts_side", "winner", "mcts_won", "plies", "mean_move_ms", "seed"])?;

    for result in results {
        writer.write_record(&[
            result.game_id.to_string(),
            result.mcts_side.to_string(),
            result.winner.map_or("draw".to_string(), |p| p.to_string()),
            result.mcts_won().to_string(),
            result.plies.to_string(),
            result.mean_move_time.as_millis().to_string(),
            result.seed.to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}
