//! Sampling-budget policies: how many votes to draw from the predictive
//! density before committing to an arm.
//!
//! Boundary times are clamped, never raised: `ln 0` and the division by a zero
//! variance both resolve to the floor or cap of their mode.

use mcbs_config::SamplingPolicy;
use mcbs_math::argmax;
use serde::{Deserialize, Serialize};

/// Number of votes for one step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum SampleBudget {
    /// Draw `ceil(n)` votes.
    Finite(f64),
    /// Infinitely many votes: the most probable arm wins outright.
    Exhaustive,
}

impl SampleBudget {
    /// Vote count to draw, or `None` for [`SampleBudget::Exhaustive`].
    pub fn votes(&self) -> Option<u64> {
        match *self {
            SampleBudget::Finite(n) => Some(n.max(0.0).ceil() as u64),
            SampleBudget::Exhaustive => None,
        }
    }

    /// The budget as a number, with `Exhaustive` as `+inf`.
    pub fn as_f64(&self) -> f64 {
        match *self {
            SampleBudget::Finite(n) => n,
            SampleBudget::Exhaustive => f64::INFINITY,
        }
    }
}

/// Sampling policy fixed at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetPolicy {
    policy: SamplingPolicy,
}

impl BudgetPolicy {
    pub fn new(policy: SamplingPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &SamplingPolicy {
        &self.policy
    }

    /// Votes to draw at step `t` given that step's predictive density.
    pub fn samples_needed(&self, t: usize, mean: &[f64], variance: &[f64]) -> SampleBudget {
        let t = t as f64;
        let n = match self.policy {
            SamplingPolicy::Static { n_samples } => n_samples,
            SamplingPolicy::Linear { n0, n } => (n0 + n * t).max(1.0),
            SamplingPolicy::LogT => {
                if t < 1.0 {
                    1.0
                } else {
                    t.ln().max(1.0)
                }
            }
            SamplingPolicy::SqrtT => t.sqrt().max(1.0),
            SamplingPolicy::InvVar { n_max } => {
                let var = most_probable(mean).map_or(0.0, |k| variance[k]);
                clamp_inverse(var, n_max)
            }
            SamplingPolicy::InvPfa { n_max } => {
                let p = most_probable(mean).map_or(0.0, |k| mean[k]);
                clamp_inverse(1.0 - p, n_max)
            }
            SamplingPolicy::ArgMax => return SampleBudget::Exhaustive,
        };
        SampleBudget::Finite(n)
    }
}

fn most_probable(mean: &[f64]) -> Option<usize> {
    argmax(mean)
}

/// `min(max(1/x, 1), n_max)`, with `1/0` read as `+inf`.
fn clamp_inverse(x: f64, n_max: f64) -> f64 {
    let inv = if x > 0.0 { 1.0 / x } else { f64::INFINITY };
    inv.max(1.0).min(n_max)
}
