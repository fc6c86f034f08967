//! Root exploration noise.
//!
//! Dirichlet samples are drawn as normalised `Gamma(alpha, 1)` variates, one
//! per legal action, and mixed into the priors:
//! `P_noisy = (1 - ε) × P + ε × noise`. Noise mass outside the legal actions
//! stays zero.

use crate::mcts::algorithm::SearchError;
use rand::Rng;
use rand_distr::{Distribution, Gamma};

/// Draws a Dirichlet(alpha, ..., alpha) vector of length `len`.
pub fn sample_dirichlet<R: Rng>(rng: &mut R, alpha: f32, len: usize) -> Result<Vec<f32>, SearchError> {
    let gamma = Gamma::new(alpha, 1.0)
        .map_err(|e| SearchError::InvalidConfig(format!("dirichlet_alpha {alpha}: {e}")))?;
    let mut noise: Vec<f32> = (0..len).map(|_| gamma.sample(&mut *rng)).collect();
    let sum: f32 = noise.iter().sum();
    if sum > 0.0 && sum.is_finite() {
        for val in &mut noise {
            *val /= sum;
        }
    } else if len > 0 {
        // every sample underflowed (tiny alpha)
        noise.fill(1.0 / len as f32);
    }
    Ok(noise)
}

/// Blends Dirichlet noise into `priors` on the `legal` actions only.
pub fn apply_root_noise<R: Rng>(
    priors: &mut [f32],
    legal: &[usize],
    epsilon: f32,
    alpha: f32,
    rng: &mut R,
) -> Result<(), SearchError> {
    if legal.is_empty() || epsilon == 0.0 {
        return Ok(());
    }
    let noise = sample_dirichlet(rng, alpha, legal.len())?;
    for prior in priors.iter_mut() {
        *prior *= 1.0 - epsilon;
    }
    for (&action, eta) in legal.iter().zip(noise) {
        priors[action] += epsilon * eta;
    }
    Ok(())
}
