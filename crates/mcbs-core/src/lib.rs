//! Bayesian sampling bandit decision engine.
//!
//! A [`SamplingBandit`] keeps a Beta posterior per arm, estimates at each step
//! the probability that each arm is optimal (analytically or by Monte Carlo),
//! decides how many votes to draw from that density, plays the winning arm,
//! and folds the observed reward back into its posterior.

pub mod bandit;
pub mod budget;
pub mod estimator;
pub mod logging;
pub mod posterior;
pub mod realizations;
pub mod reward;
pub mod select;
pub mod trace;

pub use bandit::{RunTrace, SamplingBandit};
pub use budget::{BudgetPolicy, SampleBudget};
pub use estimator::{
    estimator_from_config, AnalyticEstimator, DensityEstimate, MonteCarloEstimator,
    PredictiveDensityEstimator,
};
pub use posterior::{BetaPosterior, ConjugateUpdater, PosteriorHistory};
pub use realizations::{execute_bandits, execute_realizations, ExecutionMode};
pub use reward::{reward_from_config, BernoulliReward, PoissonReward, RewardModel};
pub use select::ActionSelector;
pub use trace::ArmMatrix;
