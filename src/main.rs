use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;

use tablut_zero::game::simulate_game::random_move;
use tablut_zero::logging::{setup_file_logging, setup_logging};
use tablut_zero::training::selfplay::{append_transitions, play_selfplay_game};
use tablut_zero::{
    apply_move, check_end_game, Board, Evaluator, GameStatus, MctsEngine, Player, RolloutEvaluator,
    SearchConfig, ServerState, UniformEvaluator,
};

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum GameMode {
    /// Play one game and print the moves
    Play,
    /// Decide one move for a board given as server JSON
    Decide,
    /// Generate self-play transitions
    Selfplay,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum EvaluatorKind {
    Uniform,
    Rollout,
    #[cfg(feature = "torch")]
    Torch,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Opponent {
    Random,
    Mcts,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Side {
    White,
    Black,
}

impl From<Side> for Player {
    fn from(side: Side) -> Self {
        match side {
            Side::White => Player::White,
            Side::Black => Player::Black,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "tablut_zero")]
struct Config {
    /// What to run
    #[arg(long, value_enum, default_value = "play")]
    mode: GameMode,

    /// JSON search configuration; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Simulations per move
    #[arg(short = 's', long)]
    budget: Option<usize>,

    /// Exploration constant c_puct
    #[arg(long)]
    c_puct: Option<f32>,

    /// Disable Dirichlet noise at the root
    #[arg(long, default_value_t = false)]
    no_noise: bool,

    /// Wall-clock bound per move in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// RNG seed for search noise, rollouts and the random opponent
    #[arg(long)]
    seed: Option<u64>,

    /// Position evaluator
    #[arg(long, value_enum, default_value = "rollout")]
    evaluator: EvaluatorKind,

    /// Ply cap of a single rollout
    #[arg(long, default_value_t = 300)]
    rollout_plies: usize,

    /// Model weights for the torch evaluator
    #[arg(long)]
    model: Option<PathBuf>,

    /// Opponent in play mode
    #[arg(long, value_enum, default_value = "random")]
    opponent: Opponent,

    /// Side played by the search in play mode against a random opponent
    #[arg(long, value_enum, default_value = "white")]
    mcts_side: Side,

    /// Ply cap per game
    #[arg(long, default_value_t = 200)]
    max_plies: usize,

    /// Board file (server JSON state) for decide mode
    #[arg(long)]
    board: Option<PathBuf>,

    /// Number of self-play games
    #[arg(short = 'g', long, default_value_t = 10)]
    num_games: usize,

    /// Output directory for self-play transitions
    #[arg(long, default_value = "selfplay_data")]
    output_dir: PathBuf,

    /// Also log to rotated files in this directory
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

impl Config {
    fn search_config(&self) -> Result<SearchConfig, Box<dyn std::error::Error>> {
        let mut search = match &self.config {
            Some(path) => SearchConfig::from_json_file(path)?,
            None if self.mode == GameMode::Selfplay => SearchConfig::for_training(),
            None => SearchConfig::for_evaluation(),
        };
        if let Some(budget) = self.budget {
            search.budget = budget;
        }
        if let Some(c_puct) = self.c_puct {
            search.exploration_constant = c_puct;
        }
        if self.no_noise {
            search.root_noise = false;
        }
        if self.timeout_ms.is_some() {
            search.timeout_ms = self.timeout_ms;
        }
        if self.seed.is_some() {
            search.seed = self.seed;
        }
        search.validate()?;
        Ok(search)
    }

    fn build_evaluator(&self, salt: u64) -> Result<Box<dyn Evaluator>, Box<dyn std::error::Error>> {
        match self.evaluator {
            EvaluatorKind::Uniform => Ok(Box::new(UniformEvaluator::new())),
            EvaluatorKind::Rollout => Ok(Box::new(match self.seed {
                Some(seed) => RolloutEvaluator::with_seed(self.rollout_plies, seed.wrapping_add(salt)),
                None => RolloutEvaluator::new(self.rollout_plies),
            })),
            #[cfg(feature = "torch")]
            EvaluatorKind::Torch => {
                let path = self.model.as_ref().ok_or("--model is required with --evaluator torch")?;
                Ok(Box::new(tablut_zero::TorchEvaluator::load(
                    path,
                    tch::Device::cuda_if_available(),
                )?))
            }
        }
    }

    fn engine(&self, salt: u64) -> Result<MctsEngine<Box<dyn Evaluator>>, Box<dyn std::error::Error>> {
        let mut search = self.search_config()?;
        if let Some(seed) = search.seed {
            search.seed = Some(seed.wrapping_add(salt));
        }
        Ok(MctsEngine::new(self.build_evaluator(salt)?, search)?)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::parse();

    let _logger = match &config.log_dir {
        Some(dir) => setup_file_logging("info", dir)?,
        None => setup_logging("info")?,
    };

    if config.model.is_some() && !cfg!(feature = "torch") {
        log::warn!("--model ignored: built without the `torch` feature");
    }
    log::info!(
        "{} v{} | {}",
        tablut_zero::NAME,
        tablut_zero::VERSION,
        config.search_config()?.to_config_string()
    );

    match config.mode {
        GameMode::Play => play(&config),
        GameMode::Decide => decide(&config),
        GameMode::Selfplay => selfplay(&config),
    }
}

fn play(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let mut board = Board::initial();
    let mut white = config.engine(0)?;
    let mut black = config.engine(1)?;
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(2)),
        None => StdRng::from_os_rng(),
    };
    let mcts_side = Player::from(config.mcts_side);

    for ply in 1..=config.max_plies {
        if check_end_game(&board).is_terminal() {
            break;
        }
        let turn = board.turn();
        let mv = if config.opponent == Opponent::Random && turn != mcts_side {
            let mv = random_move(&board, &mut rng).ok_or("side to move has no legal move")?;
            log::info!("ply {} {}: {} (random)", ply, turn, mv);
            mv
        } else {
            let engine = if turn == Player::White { &mut white } else { &mut black };
            let result = engine.search(&board)?;
            log::info!(
                "ply {} {}: {} (win rate {:.3}, {} sims, {:?})",
                ply,
                turn,
                result.mv,
                result.win_rate,
                result.simulations,
                result.elapsed
            );
            result.mv
        };
        let captured = apply_move(&mut board, mv)?;
        if !captured.is_empty() {
            let squares: Vec<String> = captured.iter().map(|s| s.to_string()).collect();
            log::info!("captured: {}", squares.join(", "));
        }
    }

    println!("{board}");
    match check_end_game(&board) {
        GameStatus::Won(winner) => println!("🏆 {winner} wins"),
        GameStatus::Ongoing => println!("🤝 stopped after {} plies", config.max_plies),
    }
    Ok(())
}

fn decide(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let path = config.board.as_ref().ok_or("--board is required in decide mode")?;
    let state = ServerState::from_json(&std::fs::read_to_string(path)?)?;
    let board = Board::from_server_state(&state)?;
    log::debug!("decide on\n{board}");

    let result = config.engine(0)?.search(&board)?;
    let output = serde_json::json!({
        "from": result.mv.from.to_literal(),
        "to": result.mv.to.to_literal(),
        "turn": board.turn().to_string(),
        "action": result.action,
        "win_rate": result.win_rate,
        "simulations": result.simulations,
    });
    println!("{output}");
    Ok(())
}

fn selfplay(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let mut white = config.engine(0)?;
    let mut black = config.engine(1)?;
    let (mut white_wins, mut black_wins, mut draws) = (0, 0, 0);

    for game in 1..=config.num_games {
        let record = play_selfplay_game(&mut white, &mut black, config.max_plies)?;
        append_transitions(&record, &config.output_dir)?;
        match record.winner {
            Some(Player::White) => white_wins += 1,
            Some(Player::Black) => black_wins += 1,
            None => draws += 1,
        }
        log::info!(
            "game {}/{}: {} plies, winner {}",
            game,
            config.num_games,
            record.plies,
            record.winner.map_or("none".to_string(), |p| p.to_string())
        );
    }

    log::info!(
        "✅ self-play done: white {} / black {} / draws {} -> {}",
        white_wins,
        black_wins,
        draws,
        config.output_dir.display()
    );
    Ok(())
}
