//! Search configuration.
//!
//! Every field has a default so partial JSON files load; CLI flags override
//! whatever the file or preset provides.

use crate::mcts::algorithm::SearchError;
use crate::TablutError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Simulations per decision
    /// Default: 500
    pub budget: usize,

    /// c_puct during the search (the final decision always uses 0)
    /// Default: 1.0
    pub exploration_constant: f32,

    /// Mix Dirichlet noise into the root priors
    /// Default: true
    pub root_noise: bool,

    /// Noise weight ε
    /// Default: 0.25
    pub dirichlet_epsilon: f32,

    /// Dirichlet concentration
    /// Default: 30.0
    pub dirichlet_alpha: f32,

    /// Wall-clock bound, checked between simulations
    pub timeout_ms: Option<u64>,

    /// Seed for the noise RNG; entropy-seeded when absent
    pub seed: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            budget: 500,
            exploration_constant: 1.0,
            root_noise: true,
            dirichlet_epsilon: 0.25,
            dirichlet_alpha: 30.0,
            timeout_ms: None,
            seed: None,
        }
    }
}

impl SearchConfig {
    /// Self-play settings: root noise on.
    pub fn for_training() -> Self {
        Self::default()
    }

    /// Match settings: deterministic root priors.
    pub fn for_evaluation() -> Self {
        Self {
            root_noise: false,
            ..Self::default()
        }
    }

    pub fn with_budget(mut self, budget: usize) -> Self {
        self.budget = budget;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    pub fn validate(&self) -> Result<(), SearchError> {
        if !self.exploration_constant.is_finite() || self.exploration_constant < 0.0 {
            return Err(SearchError::InvalidConfig(format!(
                "exploration_constant must be finite and non-negative, got {}",
                self.exploration_constant
            )));
        }
        if !(0.0..=1.0).contains(&self.dirichlet_epsilon) {
            return Err(SearchError::InvalidConfig(format!(
                "dirichlet_epsilon must be in [0, 1], got {}",
                self.dirichlet_epsilon
            )));
        }
        if self.root_noise && !(self.dirichlet_alpha.is_finite() && self.dirichlet_alpha > 0.0) {
            return Err(SearchError::InvalidConfig(format!(
                "dirichlet_alpha must be positive, got {}",
                self.dirichlet_alpha
            )));
        }
        Ok(())
    }

    /// Loads and validates a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, TablutError> {
        let contents = std::fs::read_to_string(path)?;
        let config: SearchConfig = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Compact form for log lines.
    pub fn to_config_string(&self) -> String {
        format!(
            "budget={}_c={:.2}_noise={}[eps={:.2},alpha={:.2}]",
            self.budget,
            self.exploration_constant,
            self.root_noise,
            self.dirichlet_epsilon,
            self.dirichlet_alpha
        )
    }
}
