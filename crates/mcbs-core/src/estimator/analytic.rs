//! Analytic predictive density for Beta posteriors.
//!
//! P(arm k is optimal) = ∫ Π_{j≠k} F_j(x) dF_k(x), where F is the Beta CDF.
//! The Stieltjes integral is evaluated with the midpoint rule on a uniform
//! grid over [0, 1]: for each cell, the mass F_k gains across the cell times
//! the other arms' CDFs at its midpoint. Working with CDF increments instead
//! of densities keeps the rule finite for alpha or beta below 1.
//!
//! The result is exact for any reward whose mean is increasing in the Beta
//! parameter, since such a map preserves the argmax.

use mcbs_common::{Error, Result};
use mcbs_math::{beta_cdf, indicator_variance, normalize_probs};
use rand::RngCore;
use tracing::trace;

use super::{DensityEstimate, PredictiveDensityEstimator};
use crate::posterior::BetaPosterior;
use crate::reward::RewardModel;

const NORMALIZE_TOLERANCE: f64 = 1e-12;

#[derive(Debug, Clone)]
pub struct AnalyticEstimator {
    grid_intervals: usize,
}

impl AnalyticEstimator {
    pub fn new(grid_intervals: usize) -> Self {
        Self {
            grid_intervals: grid_intervals.max(2),
        }
    }

    pub fn grid_intervals(&self) -> usize {
        self.grid_intervals
    }

    /// Unnormalized P(arm k is optimal) for every arm.
    fn optimality_mass(&self, posterior: BetaPosterior<'_>) -> Result<Vec<f64>> {
        let arms = posterior.arms();
        let n = self.grid_intervals;
        let h = 1.0 / n as f64;

        // nodes[k][i] = F_k(i h), mids[k][i] = F_k((i + 1/2) h)
        let mut nodes = Vec::with_capacity(arms);
        let mut mids = Vec::with_capacity(arms);
        for (k, (&a, &b)) in posterior.alpha.iter().zip(posterior.beta).enumerate() {
            if !(a > 0.0 && b > 0.0 && a.is_finite() && b.is_finite()) {
                return Err(Error::Distribution(format!(
                    "beta posterior of arm {k} ({a}, {b}) is not a proper distribution"
                )));
            }
            nodes.push((0..=n).map(|i| beta_cdf(i as f64 * h, a, b)).collect::<Vec<_>>());
            mids.push(
                (0..n)
                    .map(|i| beta_cdf((i as f64 + 0.5) * h, a, b))
                    .collect::<Vec<_>>(),
            );
        }

        let mut mass = vec![0.0; arms];
        for i in 0..n {
            for k in 0..arms {
                let dk = nodes[k][i + 1] - nodes[k][i];
                if dk <= 0.0 {
                    continue;
                }
                let others: f64 = (0..arms)
                    .filter(|&j| j != k)
                    .map(|j| mids[j][i])
                    .product();
                mass[k] += dk * others;
            }
        }
        Ok(mass)
    }
}

impl PredictiveDensityEstimator for AnalyticEstimator {
    fn name(&self) -> &'static str {
        "analytic"
    }

    fn compute(
        &self,
        posterior: BetaPosterior<'_>,
        _reward: &dyn RewardModel,
        _rng: &mut dyn RngCore,
    ) -> Result<DensityEstimate> {
        let arms = posterior.arms();
        if arms == 1 {
            return Ok(DensityEstimate {
                mean: vec![1.0],
                variance: vec![0.0],
                expected_returns: None,
            });
        }

        let mass = self.optimality_mass(posterior)?;
        let raw_sum: f64 = mass.iter().sum();
        let mean = normalize_probs(&mass, NORMALIZE_TOLERANCE)
            .ok_or_else(|| {
                Error::Distribution(format!("optimality mass {mass:?} is not a weight vector"))
            })?
            .into_probs();
        trace!(
            target: "mcbs.estimator",
            grid = self.grid_intervals,
            raw_sum,
            "analytic predictive density"
        );

        let variance = mean.iter().map(|&p| indicator_variance(p)).collect();
        Ok(DensityEstimate {
            mean,
            variance,
            expected_returns: None,
        })
    }
}
