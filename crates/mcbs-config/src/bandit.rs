//! Bandit experiment configuration types.

use mcbs_common::{PriorFamily, RewardFamily};
use serde::{Deserialize, Serialize};

use crate::sampling::SamplingPolicy;
use crate::validate::{
    check_per_arm, non_negative_finite, positive_finite, unit_interval, ValidationError,
    ValidationResult,
};

/// Default Monte Carlo draws per arm and step.
pub const DEFAULT_MC_DRAWS: usize = 1000;

/// Default number of grid intervals for the analytic estimator.
pub const DEFAULT_GRID_INTERVALS: usize = 2000;

/// Complete configuration for one Bayesian sampling bandit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BanditConfig {
    #[serde(default = "default_schema_version")]
    pub schema_version: String,

    #[serde(default)]
    pub description: Option<String>,

    /// Number of arms K.
    pub arms: usize,

    /// Number of decision steps t_max.
    pub horizon: usize,

    /// Base seed; realization `r` uses `seed + r`.
    #[serde(default)]
    pub seed: u64,

    /// True reward model. Only the simulator reads its parameters.
    pub reward: RewardConfig,

    /// Prior over the reward parameters.
    pub prior: PriorConfig,

    #[serde(default)]
    pub sampling: SamplingPolicy,

    #[serde(default)]
    pub estimator: EstimatorConfig,
}

fn default_schema_version() -> String {
    crate::CONFIG_SCHEMA_VERSION.to_string()
}

/// True per-arm reward distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "snake_case")]
pub enum RewardConfig {
    Bernoulli { theta: Vec<f64> },
    Poisson { lambda: Vec<f64> },
}

impl RewardConfig {
    pub fn family(&self) -> RewardFamily {
        match self {
            RewardConfig::Bernoulli { .. } => RewardFamily::Bernoulli,
            RewardConfig::Poisson { .. } => RewardFamily::Poisson,
        }
    }

    /// True per-arm parameters.
    pub fn params(&self) -> &[f64] {
        match self {
            RewardConfig::Bernoulli { theta } => theta,
            RewardConfig::Poisson { lambda } => lambda,
        }
    }

    pub fn validate(&self, arms: usize) -> ValidationResult<()> {
        match self {
            RewardConfig::Bernoulli { theta } => {
                check_per_arm("reward.theta", theta, arms, unit_interval)
            }
            RewardConfig::Poisson { lambda } => {
                check_per_arm("reward.lambda", lambda, arms, non_negative_finite)
            }
        }
    }
}

/// Prior hyperparameters, one entry per arm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "snake_case")]
pub enum PriorConfig {
    Beta { alpha: Vec<f64>, beta: Vec<f64> },
    Gamma { shape: Vec<f64>, rate: Vec<f64> },
}

impl PriorConfig {
    /// Uninformative Beta(1, 1) on every arm.
    pub fn uniform_beta(arms: usize) -> Self {
        PriorConfig::Beta {
            alpha: vec![1.0; arms],
            beta: vec![1.0; arms],
        }
    }

    pub fn family(&self) -> PriorFamily {
        match self {
            PriorConfig::Beta { .. } => PriorFamily::Beta,
            PriorConfig::Gamma { .. } => PriorFamily::Gamma,
        }
    }

    pub fn validate(&self, arms: usize) -> ValidationResult<()> {
        match self {
            PriorConfig::Beta { alpha, beta } => {
                check_per_arm("prior.alpha", alpha, arms, positive_finite)?;
                check_per_arm("prior.beta", beta, arms, positive_finite)
            }
            PriorConfig::Gamma { shape, rate } => {
                check_per_arm("prior.shape", shape, arms, positive_finite)?;
                check_per_arm("prior.rate", rate, arms, positive_finite)
            }
        }
    }
}

/// How the action predictive density is computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EstimatorConfig {
    /// Numerical integration of the closed-form optimality probability.
    Analytic {
        #[serde(default = "default_grid_intervals")]
        grid_intervals: usize,
    },
    /// Monte Carlo integration with `draws` posterior samples per arm.
    MonteCarlo {
        #[serde(default = "default_mc_draws")]
        draws: usize,
    },
}

fn default_grid_intervals() -> usize {
    DEFAULT_GRID_INTERVALS
}

fn default_mc_draws() -> usize {
    DEFAULT_MC_DRAWS
}

impl EstimatorConfig {
    pub fn monte_carlo(draws: usize) -> Self {
        EstimatorConfig::MonteCarlo { draws }
    }

    pub fn analytic() -> Self {
        EstimatorConfig::Analytic {
            grid_intervals: DEFAULT_GRID_INTERVALS,
        }
    }

    pub fn validate(&self) -> ValidationResult<()> {
        match *self {
            EstimatorConfig::MonteCarlo { draws } if draws == 0 => {
                Err(ValidationError::InvalidValue {
                    field: "estimator.draws",
                    message: "at least one Monte Carlo draw is required".to_string(),
                })
            }
            EstimatorConfig::Analytic { grid_intervals } if grid_intervals < 2 => {
                Err(ValidationError::InvalidValue {
                    field: "estimator.grid_intervals",
                    message: format!("{grid_intervals} is too coarse, need at least 2"),
                })
            }
            _ => Ok(()),
        }
    }
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self::monte_carlo(DEFAULT_MC_DRAWS)
    }
}

impl BanditConfig {
    /// Bernoulli arms with Beta(1, 1) priors and Thompson sampling.
    pub fn bernoulli(theta: Vec<f64>, horizon: usize) -> Self {
        let arms = theta.len();
        Self {
            schema_version: default_schema_version(),
            description: None,
            arms,
            horizon,
            seed: 0,
            reward: RewardConfig::Bernoulli { theta },
            prior: PriorConfig::uniform_beta(arms),
            sampling: SamplingPolicy::default(),
            estimator: EstimatorConfig::default(),
        }
    }

    pub fn with_sampling(mut self, sampling: SamplingPolicy) -> Self {
        self.sampling = sampling;
        self
    }

    pub fn with_estimator(mut self, estimator: EstimatorConfig) -> Self {
        self.estimator = estimator;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Load a configuration from a JSON file and validate it.
    pub fn from_file(path: &std::path::Path) -> ValidationResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ValidationError::IoError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config = Self::parse_json(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a configuration from a JSON string (no validation).
    pub fn parse_json(json: &str) -> ValidationResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| ValidationError::ParseError(format!("Invalid JSON: {}", e)))
    }

    /// Validate shapes and values. Family compatibility is checked by the
    /// engine when it picks an update rule.
    pub fn validate(&self) -> ValidationResult<()> {
        if self.arms == 0 {
            return Err(ValidationError::InvalidValue {
                field: "arms",
                message: "a bandit needs at least one arm".to_string(),
            });
        }
        self.reward.validate(self.arms)?;
        self.prior.validate(self.arms)?;
        self.sampling.validate()?;
        self.estimator.validate()
    }
}
