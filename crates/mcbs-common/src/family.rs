//! Distribution family tags.
//!
//! Tags identify which conjugate update rule applies; they carry no
//! parameters themselves.

use serde::{Deserialize, Serialize};

/// Family of the per-arm reward distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardFamily {
    /// Bernoulli(θ) rewards in {0, 1}.
    Bernoulli,
    /// Poisson(λ) count rewards.
    Poisson,
}

impl std::fmt::Display for RewardFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RewardFamily::Bernoulli => write!(f, "bernoulli"),
            RewardFamily::Poisson => write!(f, "poisson"),
        }
    }
}

/// Family of the prior (and posterior) over reward parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorFamily {
    /// Beta(alpha, beta).
    Beta,
    /// Gamma(shape, rate).
    Gamma,
}

impl std::fmt::Display for PriorFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PriorFamily::Beta => write!(f, "beta"),
            PriorFamily::Gamma => write!(f, "gamma"),
        }
    }
}
