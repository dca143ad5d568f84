//! Reward models: the environment the bandit plays against.
//!
//! A reward model holds the true per-arm parameters. The decision engine only
//! ever calls [`RewardModel::sample`] for the chosen arm and
//! [`RewardModel::mean`] on *sampled* parameters; the true parameters are for
//! the simulator and for reporting.

use mcbs_common::{Error, Result, RewardFamily};
use mcbs_config::RewardConfig;
use rand::distr::Bernoulli;
use rand::RngCore;
use rand_distr::{Distribution, Poisson};

/// Stochastic per-arm reward source.
pub trait RewardModel: Send + Sync + std::fmt::Debug {
    /// Family tag used to select the conjugate update rule.
    fn family(&self) -> RewardFamily;

    fn arms(&self) -> usize;

    /// Draw one return for `arm`.
    fn sample(&self, arm: usize, rng: &mut dyn RngCore) -> f64;

    /// Expected return of the family evaluated at parameter `param`.
    fn mean(&self, param: f64) -> f64;

    /// True expected return of every arm.
    fn expected_returns(&self) -> Vec<f64>;
}

/// Bernoulli(θ_k) rewards.
#[derive(Debug, Clone)]
pub struct BernoulliReward {
    theta: Vec<f64>,
    dists: Vec<Bernoulli>,
}

impl BernoulliReward {
    pub fn new(theta: Vec<f64>) -> Result<Self> {
        let dists = theta
            .iter()
            .enumerate()
            .map(|(arm, &p)| {
                Bernoulli::new(p).map_err(|e| {
                    Error::Distribution(format!("bernoulli theta[{arm}] = {p}: {e}"))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { theta, dists })
    }
}

impl RewardModel for BernoulliReward {
    fn family(&self) -> RewardFamily {
        RewardFamily::Bernoulli
    }

    fn arms(&self) -> usize {
        self.theta.len()
    }

    fn sample(&self, arm: usize, rng: &mut dyn RngCore) -> f64 {
        if self.dists[arm].sample(rng) {
            1.0
        } else {
            0.0
        }
    }

    fn mean(&self, param: f64) -> f64 {
        param
    }

    fn expected_returns(&self) -> Vec<f64> {
        self.theta.clone()
    }
}

/// Poisson(λ_k) count rewards.
#[derive(Debug, Clone)]
pub struct PoissonReward {
    lambda: Vec<f64>,
    // `None` for λ = 0, which the sampler rejects but is a valid point mass.
    dists: Vec<Option<Poisson<f64>>>,
}

impl PoissonReward {
    pub fn new(lambda: Vec<f64>) -> Result<Self> {
        let dists = lambda
            .iter()
            .enumerate()
            .map(|(arm, &l)| {
                if l == 0.0 {
                    return Ok(None);
                }
                Poisson::new(l).map(Some).map_err(|e| {
                    Error::Distribution(format!("poisson lambda[{arm}] = {l}: {e}"))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { lambda, dists })
    }
}

impl RewardModel for PoissonReward {
    fn family(&self) -> RewardFamily {
        RewardFamily::Poisson
    }

    fn arms(&self) -> usize {
        self.lambda.len()
    }

    fn sample(&self, arm: usize, rng: &mut dyn RngCore) -> f64 {
        match &self.dists[arm] {
            Some(dist) => dist.sample(rng),
            None => 0.0,
        }
    }

    fn mean(&self, param: f64) -> f64 {
        param
    }

    fn expected_returns(&self) -> Vec<f64> {
        self.lambda.clone()
    }
}

/// Build the reward model described by `config`.
pub fn reward_from_config(config: &RewardConfig) -> Result<Box<dyn RewardModel>> {
    Ok(match config {
        RewardConfig::Bernoulli { theta } => Box::new(BernoulliReward::new(theta.clone())?),
        RewardConfig::Poisson { lambda } => Box::new(PoissonReward::new(lambda.clone())?),
    })
}
