//! Configuration presets for the standard Bernoulli evaluation set.
//!
//! Each preset fixes the estimator and sampling policy; the caller supplies
//! the true arm parameters and horizon. Defaults follow the usual evaluation
//! run: Beta(1, 1) priors, M = 1000 Monte Carlo draws, N_max = 25.

use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

use crate::bandit::{BanditConfig, EstimatorConfig, DEFAULT_MC_DRAWS};
use crate::sampling::SamplingPolicy;

/// Default vote cap for the adaptive policies.
pub const DEFAULT_N_MAX: f64 = 25.0;

#[derive(Debug, Error)]
pub enum PresetError {
    #[error("unknown preset: {0}")]
    Unknown(String),
}

/// Named bandit presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PresetName {
    /// One posterior draw per arm, one vote: classic Thompson sampling.
    ThompsonSampling,
    /// Thompson voting over a Monte Carlo predictive density.
    McThompsonSampling,
    /// Thompson voting over the analytic predictive density.
    AnalyticThompsonSampling,
    InvPfa,
    InvVar,
    ArgMax,
    Linear,
    LogT,
    SqrtT,
}

impl PresetName {
    pub const ALL: [PresetName; 9] = [
        PresetName::ThompsonSampling,
        PresetName::McThompsonSampling,
        PresetName::AnalyticThompsonSampling,
        PresetName::InvPfa,
        PresetName::InvVar,
        PresetName::ArgMax,
        PresetName::Linear,
        PresetName::LogT,
        PresetName::SqrtT,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PresetName::ThompsonSampling => "thompson-sampling",
            PresetName::McThompsonSampling => "mc-thompson-sampling",
            PresetName::AnalyticThompsonSampling => "analytic-thompson-sampling",
            PresetName::InvPfa => "inv-pfa",
            PresetName::InvVar => "inv-var",
            PresetName::ArgMax => "arg-max",
            PresetName::Linear => "linear",
            PresetName::LogT => "log-t",
            PresetName::SqrtT => "sqrt-t",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            PresetName::ThompsonSampling => "Thompson sampling (M=1, one vote)",
            PresetName::McThompsonSampling => "Monte Carlo density, one vote per step",
            PresetName::AnalyticThompsonSampling => "Analytic density, one vote per step",
            PresetName::InvPfa => "Votes = 1/(1 - P(best arm)), capped at N_max",
            PresetName::InvVar => "Votes = 1/Var(best arm indicator), capped at N_max",
            PresetName::ArgMax => "Always play the most probable arm",
            PresetName::Linear => "Votes grow linearly with time (n0=1, n=1)",
            PresetName::LogT => "Votes grow as ln(t)",
            PresetName::SqrtT => "Votes grow as sqrt(t)",
        }
    }

    fn estimator(&self) -> EstimatorConfig {
        match self {
            PresetName::ThompsonSampling => EstimatorConfig::monte_carlo(1),
            PresetName::AnalyticThompsonSampling => EstimatorConfig::analytic(),
            _ => EstimatorConfig::monte_carlo(DEFAULT_MC_DRAWS),
        }
    }

    fn sampling(&self) -> SamplingPolicy {
        match self {
            PresetName::ThompsonSampling
            | PresetName::McThompsonSampling
            | PresetName::AnalyticThompsonSampling => SamplingPolicy::thompson(),
            PresetName::InvPfa => SamplingPolicy::InvPfa {
                n_max: DEFAULT_N_MAX,
            },
            PresetName::InvVar => SamplingPolicy::InvVar {
                n_max: DEFAULT_N_MAX,
            },
            PresetName::ArgMax => SamplingPolicy::ArgMax,
            PresetName::Linear => SamplingPolicy::Linear { n0: 1.0, n: 1.0 },
            PresetName::LogT => SamplingPolicy::LogT,
            PresetName::SqrtT => SamplingPolicy::SqrtT,
        }
    }
}

impl std::fmt::Display for PresetName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PresetName {
    type Err = PresetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PresetName::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| PresetError::Unknown(s.to_string()))
    }
}

/// Summary of a preset for listings.
#[derive(Debug, Clone, Serialize)]
pub struct PresetInfo {
    pub name: PresetName,
    pub description: &'static str,
}

/// All presets with descriptions.
pub fn list_presets() -> Vec<PresetInfo> {
    PresetName::ALL
        .into_iter()
        .map(|name| PresetInfo {
            name,
            description: name.description(),
        })
        .collect()
}

/// Build a Bernoulli bandit configuration for `preset`.
pub fn get_preset(preset: PresetName, theta: Vec<f64>, horizon: usize) -> BanditConfig {
    let mut config = BanditConfig::bernoulli(theta, horizon)
        .with_estimator(preset.estimator())
        .with_sampling(preset.sampling());
    config.description = Some(preset.description().to_string());
    config
}
