use crate::game::action::Move;
use std::time::Duration;

/// Decision produced by one search call.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub mv: Move,
    pub action: usize,
    /// `-W/N` of the chosen action, from the mover's point of view.
    pub win_rate: f32,
    /// Root visit counts masked to legal actions, L1-normalised.
    pub policy: Vec<f32>,
    /// Simulations run after root setup.
    pub simulations: usize,
    pub elapsed: Duration,
}
