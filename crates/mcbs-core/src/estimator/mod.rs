//! Action predictive density estimators.
//!
//! Both estimators answer the same question for the latest posterior: with
//! what probability is each arm the one with the highest expected return?
//! The run loop only sees the [`PredictiveDensityEstimator`] trait.

mod analytic;
mod monte_carlo;

pub use analytic::AnalyticEstimator;
pub use monte_carlo::MonteCarloEstimator;

use mcbs_common::Result;
use mcbs_config::EstimatorConfig;
use rand::RngCore;
use serde::Serialize;

use crate::posterior::BetaPosterior;
use crate::reward::RewardModel;

/// Predictive density of one step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DensityEstimate {
    /// Probability that each arm is optimal; sums to one.
    pub mean: Vec<f64>,
    /// Variance of the "arm is optimal" indicator.
    pub variance: Vec<f64>,
    /// Per-arm expected return averaged over posterior draws, when the
    /// estimator draws any.
    pub expected_returns: Option<Vec<f64>>,
}

/// Computes the action predictive density from a posterior snapshot.
pub trait PredictiveDensityEstimator: Send + Sync + std::fmt::Debug {
    fn name(&self) -> &'static str;

    fn compute(
        &self,
        posterior: BetaPosterior<'_>,
        reward: &dyn RewardModel,
        rng: &mut dyn RngCore,
    ) -> Result<DensityEstimate>;
}

/// Build the estimator described by `config`.
pub fn estimator_from_config(config: &EstimatorConfig) -> Box<dyn PredictiveDensityEstimator> {
    match *config {
        EstimatorConfig::Analytic { grid_intervals } => {
            Box::new(AnalyticEstimator::new(grid_intervals))
        }
        EstimatorConfig::MonteCarlo { draws } => Box::new(MonteCarloEstimator::new(draws)),
    }
}
