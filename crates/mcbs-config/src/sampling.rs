//! Sampling-budget policy configuration.
//!
//! One variant per mode; each carries only the knobs that mode reads. Mode
//! names follow the established short forms (`logT`, `invPFA`, ...) so that
//! configuration files and command lines use the same vocabulary.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::validate::{ValidationError, ValidationResult};

/// How many predictive-density votes to draw before committing to an arm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode")]
pub enum SamplingPolicy {
    /// Constant number of votes. `n_samples = 1` is Thompson sampling.
    #[serde(rename = "static")]
    Static { n_samples: f64 },
    /// `max(n0 + n * t, 1)` votes.
    #[serde(rename = "linear")]
    Linear { n0: f64, n: f64 },
    /// `max(ln t, 1)` votes.
    #[serde(rename = "logT")]
    LogT,
    /// `max(sqrt t, 1)` votes.
    #[serde(rename = "sqrtT")]
    SqrtT,
    /// Inverse variance of the most probable arm, in `[1, n_max]`.
    #[serde(rename = "invVar")]
    InvVar { n_max: f64 },
    /// Inverse false-alarm probability of the most probable arm, in `[1, n_max]`.
    #[serde(rename = "invPFA")]
    InvPfa { n_max: f64 },
    /// Infinitely many votes: pick the most probable arm directly.
    #[serde(rename = "argMax")]
    ArgMax,
}

/// Mode tag without knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SamplingMode {
    #[serde(rename = "static")]
    Static,
    #[serde(rename = "linear")]
    Linear,
    #[serde(rename = "logT")]
    LogT,
    #[serde(rename = "sqrtT")]
    SqrtT,
    #[serde(rename = "invVar")]
    InvVar,
    #[serde(rename = "invPFA")]
    InvPfa,
    #[serde(rename = "argMax")]
    ArgMax,
}

impl SamplingMode {
    pub const ALL: [SamplingMode; 7] = [
        SamplingMode::Static,
        SamplingMode::Linear,
        SamplingMode::LogT,
        SamplingMode::SqrtT,
        SamplingMode::InvVar,
        SamplingMode::InvPfa,
        SamplingMode::ArgMax,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SamplingMode::Static => "static",
            SamplingMode::Linear => "linear",
            SamplingMode::LogT => "logT",
            SamplingMode::SqrtT => "sqrtT",
            SamplingMode::InvVar => "invVar",
            SamplingMode::InvPfa => "invPFA",
            SamplingMode::ArgMax => "argMax",
        }
    }
}

impl std::fmt::Display for SamplingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SamplingMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SamplingMode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| ValidationError::UnsupportedSamplingMode(s.to_string()))
    }
}

/// Numeric knobs shared by the modes that need them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplingKnobs {
    /// Votes for `static`.
    pub n_samples: f64,
    /// Intercept for `linear`.
    pub n0: f64,
    /// Slope for `linear`.
    pub n: f64,
    /// Cap for `invVar` and `invPFA`.
    pub n_max: f64,
}

impl Default for SamplingKnobs {
    fn default() -> Self {
        Self {
            n_samples: 1.0,
            n0: 1.0,
            n: 1.0,
            n_max: 25.0,
        }
    }
}

impl SamplingPolicy {
    /// Build a policy from a mode name and knobs.
    ///
    /// Fails with [`ValidationError::UnsupportedSamplingMode`] for unknown
    /// names.
    pub fn from_parts(name: &str, knobs: SamplingKnobs) -> ValidationResult<Self> {
        let policy = match name.parse::<SamplingMode>()? {
            SamplingMode::Static => SamplingPolicy::Static {
                n_samples: knobs.n_samples,
            },
            SamplingMode::Linear => SamplingPolicy::Linear {
                n0: knobs.n0,
                n: knobs.n,
            },
            SamplingMode::LogT => SamplingPolicy::LogT,
            SamplingMode::SqrtT => SamplingPolicy::SqrtT,
            SamplingMode::InvVar => SamplingPolicy::InvVar {
                n_max: knobs.n_max,
            },
            SamplingMode::InvPfa => SamplingPolicy::InvPfa {
                n_max: knobs.n_max,
            },
            SamplingMode::ArgMax => SamplingPolicy::ArgMax,
        };
        policy.validate()?;
        Ok(policy)
    }

    /// Pure Thompson sampling: one vote per step.
    pub fn thompson() -> Self {
        SamplingPolicy::Static { n_samples: 1.0 }
    }

    pub fn mode(&self) -> SamplingMode {
        match self {
            SamplingPolicy::Static { .. } => SamplingMode::Static,
            SamplingPolicy::Linear { .. } => SamplingMode::Linear,
            SamplingPolicy::LogT => SamplingMode::LogT,
            SamplingPolicy::SqrtT => SamplingMode::SqrtT,
            SamplingPolicy::InvVar { .. } => SamplingMode::InvVar,
            SamplingPolicy::InvPfa { .. } => SamplingMode::InvPfa,
            SamplingPolicy::ArgMax => SamplingMode::ArgMax,
        }
    }

    pub fn validate(&self) -> ValidationResult<()> {
        match *self {
            SamplingPolicy::Static { n_samples } => {
                if !n_samples.is_finite() || n_samples < 0.0 {
                    return Err(ValidationError::InvalidValue {
                        field: "sampling.n_samples",
                        message: format!("{n_samples} must be finite and non-negative"),
                    });
                }
            }
            SamplingPolicy::Linear { n0, n } => {
                if !n0.is_finite() || !n.is_finite() {
                    return Err(ValidationError::InvalidValue {
                        field: "sampling.linear",
                        message: format!("n0={n0} and n={n} must be finite"),
                    });
                }
            }
            SamplingPolicy::InvVar { n_max } | SamplingPolicy::InvPfa { n_max } => {
                if !n_max.is_finite() || n_max < 1.0 {
                    return Err(ValidationError::InvalidValue {
                        field: "sampling.n_max",
                        message: format!("{n_max} must be finite and at least 1"),
                    });
                }
            }
            SamplingPolicy::LogT | SamplingPolicy::SqrtT | SamplingPolicy::ArgMax => {}
        }
        Ok(())
    }
}

impl Default for SamplingPolicy {
    fn default() -> Self {
        Self::thompson()
    }
}
