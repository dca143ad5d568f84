//! The Bayesian sampling bandit and its run loop.
//!
//! One [`SamplingBandit`] is an immutable policy description. Every call to
//! [`SamplingBandit::execute`] starts from fresh state at t = 0 and walks the
//! horizon strictly forward:
//!
//! ```text
//!   posterior[t] ─▶ predictive density ─▶ budget ─▶ vote ─▶ arm
//!        ▲                                                   │
//!        └──────────── conjugate update ◀── reward ◀─────────┘
//! ```
//!
//! Errors abort the run; the partially written traces are dropped with it.

use mcbs_common::Result;
use mcbs_config::BanditConfig;
use mcbs_math::{is_probability_vector, BetaMoments};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::budget::{BudgetPolicy, SampleBudget};
use crate::estimator::{estimator_from_config, PredictiveDensityEstimator};
use crate::posterior::{ConjugateUpdater, PosteriorHistory};
use crate::reward::{reward_from_config, RewardModel};
use crate::select::ActionSelector;
use crate::trace::ArmMatrix;

/// Tolerance for the predictive mean summing to one.
pub const DENSITY_SUM_TOLERANCE: f64 = 1e-6;

/// Bayesian bandit that samples its actions from the predictive density.
#[derive(Debug)]
pub struct SamplingBandit {
    arms: usize,
    horizon: usize,
    seed: u64,
    reward: Box<dyn RewardModel>,
    estimator: Box<dyn PredictiveDensityEstimator>,
    budget: BudgetPolicy,
    selector: ActionSelector,
    updater: ConjugateUpdater,
}

impl SamplingBandit {
    /// Validate `config` and assemble the bandit.
    ///
    /// All configuration errors surface here, before any run state exists.
    /// Validation pins every per-arm vector to `config.arms`.
    pub fn new(config: &BanditConfig) -> Result<Self> {
        config.validate()?;
        let updater = ConjugateUpdater::new(config.reward.family(), &config.prior)?;
        let reward = reward_from_config(&config.reward)?;
        Ok(Self {
            arms: config.arms,
            horizon: config.horizon,
            seed: config.seed,
            reward,
            estimator: estimator_from_config(&config.estimator),
            budget: BudgetPolicy::new(config.sampling.clone()),
            selector: ActionSelector::new(),
            updater,
        })
    }

    pub fn arms(&self) -> usize {
        self.arms
    }

    pub fn horizon(&self) -> usize {
        self.horizon
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn reward(&self) -> &dyn RewardModel {
        self.reward.as_ref()
    }

    pub fn estimator(&self) -> &dyn PredictiveDensityEstimator {
        self.estimator.as_ref()
    }

    pub fn budget(&self) -> &BudgetPolicy {
        &self.budget
    }

    /// Run one realization with a generator seeded from `seed`.
    pub fn execute_seeded(&self, seed: u64) -> Result<RunTrace> {
        let mut rng = StdRng::seed_from_u64(seed);
        self.execute(&mut rng)
    }

    /// Run the full horizon, drawing all randomness from `rng`.
    pub fn execute(&self, rng: &mut dyn RngCore) -> Result<RunTrace> {
        let mut run = RunTrace::allocate(self.arms, self.horizon, &self.updater);

        for t in 0..self.horizon {
            let density = self
                .estimator
                .compute(run.posterior.latest(), self.reward.as_ref(), rng)?;
            assert!(
                is_probability_vector(&density.mean, DENSITY_SUM_TOLERANCE),
                "predictive mean at step {t} is not a distribution: {:?}",
                density.mean
            );
            run.predictive_mean.write_column(t, &density.mean);
            run.predictive_variance.write_column(t, &density.variance);
            if let Some(expected) = &density.expected_returns {
                run.expected_returns.write_column(t, expected);
            }

            let budget = self
                .budget
                .samples_needed(t, &density.mean, &density.variance);
            run.n_samples.push(budget);

            let arm = self
                .selector
                .select(t, &density.mean, budget, rng, &mut run.actions)?;
            assert!(
                run.actions.column_sum(t) == 1.0,
                "action record at step {t} is not one-hot"
            );

            let ret = self.reward.sample(arm, rng);
            run.returns.set(arm, t, ret);

            self.updater
                .update(t, &run.actions, &run.returns, &mut run.posterior);

            debug!(
                target: "mcbs.step",
                t,
                arm,
                reward = ret,
                budget = budget.as_f64(),
                p_arm = density.mean[arm],
                "step complete"
            );
        }

        info!(
            target: "mcbs.run",
            estimator = self.estimator.name(),
            sampling = %self.budget.policy().mode(),
            horizon = self.horizon,
            cumulative_reward = run.cumulative_reward(),
            "run complete"
        );
        Ok(run)
    }
}

/// Everything a finished run recorded. Read-only once returned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunTrace {
    /// One-hot chosen arm per step.
    pub actions: ArmMatrix,
    /// Observed return of the chosen arm; zero elsewhere.
    pub returns: ArmMatrix,
    /// Monte Carlo estimate of each arm's expected return per step.
    pub expected_returns: ArmMatrix,
    pub predictive_mean: ArmMatrix,
    pub predictive_variance: ArmMatrix,
    /// Vote budget per step.
    pub n_samples: Vec<SampleBudget>,
    /// Beta snapshots, `horizon + 1` of them.
    pub posterior: PosteriorHistory,
}

impl RunTrace {
    fn allocate(arms: usize, horizon: usize, updater: &ConjugateUpdater) -> Self {
        Self {
            actions: ArmMatrix::zeros(arms, horizon),
            returns: ArmMatrix::zeros(arms, horizon),
            expected_returns: ArmMatrix::zeros(arms, horizon),
            predictive_mean: ArmMatrix::zeros(arms, horizon),
            predictive_variance: ArmMatrix::zeros(arms, horizon),
            n_samples: Vec::with_capacity(horizon),
            posterior: updater.history(horizon),
        }
    }

    pub fn horizon(&self) -> usize {
        self.actions.steps()
    }

    /// Arm played at step `t`.
    pub fn chosen_arm(&self, t: usize) -> Option<usize> {
        self.actions.column(t).iter().position(|&a| a == 1.0)
    }

    pub fn chosen_arms(&self) -> Vec<usize> {
        (0..self.horizon())
            .filter_map(|t| self.chosen_arm(t))
            .collect()
    }

    pub fn cumulative_reward(&self) -> f64 {
        self.returns.row_sums().iter().sum()
    }

    /// Fraction of steps each arm was played.
    pub fn action_frequency(&self) -> Vec<f64> {
        let h = self.horizon().max(1) as f64;
        self.actions.row_sums().into_iter().map(|n| n / h).collect()
    }

    /// Posterior mean and variance of every arm after the last step.
    pub fn final_posterior(&self) -> Vec<BetaMoments> {
        let last = self.posterior.latest();
        last.alpha
            .iter()
            .zip(last.beta)
            .map(|(&a, &b)| BetaMoments::of(a, b))
            .collect()
    }
}
