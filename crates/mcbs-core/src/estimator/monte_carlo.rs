//! Monte Carlo predictive density.
//!
//! Draws M parameter samples per arm from the Beta posterior, maps them
//! through the reward family's mean, and counts how often each arm holds the
//! largest expected return across the M draws.

use mcbs_common::{Error, Result};
use mcbs_math::{argmax, indicator_variance};
use rand::RngCore;
use rand_distr::{Beta, Distribution};
use tracing::trace;

use super::{DensityEstimate, PredictiveDensityEstimator};
use crate::posterior::BetaPosterior;
use crate::reward::RewardModel;

#[derive(Debug, Clone)]
pub struct MonteCarloEstimator {
    draws: usize,
}

impl MonteCarloEstimator {
    /// `draws` must be at least 1; configuration validation enforces it.
    pub fn new(draws: usize) -> Self {
        Self {
            draws: draws.max(1),
        }
    }

    pub fn draws(&self) -> usize {
        self.draws
    }
}

impl PredictiveDensityEstimator for MonteCarloEstimator {
    fn name(&self) -> &'static str {
        "monte_carlo"
    }

    fn compute(
        &self,
        posterior: BetaPosterior<'_>,
        reward: &dyn RewardModel,
        rng: &mut dyn RngCore,
    ) -> Result<DensityEstimate> {
        let arms = posterior.arms();
        let m = self.draws;

        // samples[k * m + i]: expected return of arm k under draw i
        let mut samples = Vec::with_capacity(arms * m);
        let mut expected_returns = Vec::with_capacity(arms);
        for (k, (&a, &b)) in posterior.alpha.iter().zip(posterior.beta).enumerate() {
            let dist = Beta::new(a, b).map_err(|e| {
                Error::Distribution(format!("beta posterior of arm {k} ({a}, {b}): {e}"))
            })?;
            let start = samples.len();
            for _ in 0..m {
                samples.push(reward.mean(dist.sample(rng)));
            }
            let total: f64 = samples[start..].iter().sum();
            expected_returns.push(total / m as f64);
        }

        let mut wins = vec![0u64; arms];
        let mut column = vec![0.0; arms];
        for i in 0..m {
            for (k, slot) in column.iter_mut().enumerate() {
                *slot = samples[k * m + i];
            }
            if let Some(best) = argmax(&column) {
                wins[best] += 1;
            }
        }

        let mean: Vec<f64> = wins.iter().map(|&w| w as f64 / m as f64).collect();
        let variance = mean.iter().map(|&p| indicator_variance(p)).collect();
        trace!(
            target: "mcbs.estimator",
            draws = m,
            ?wins,
            "monte carlo predictive density"
        );

        Ok(DensityEstimate {
            mean,
            variance,
            expected_returns: Some(expected_returns),
        })
    }
}
