//! Error types for the bandit sampling engine.

use thiserror::Error;

use crate::family::{PriorFamily, RewardFamily};

/// Result type alias for bandit operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the bandit sampling engine.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors (10-19)
    #[error("configuration error: {0}")]
    Config(String),

    #[error("unsupported reward/prior combination: reward={reward} with prior={prior}")]
    UnsupportedCombination {
        reward: RewardFamily,
        prior: PriorFamily,
    },

    #[error("unsupported sampling mode: {0}")]
    UnsupportedSamplingMode(String),

    #[error("dimension mismatch for {what}: expected {expected}, got {actual}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("invalid hyperparameter {name}[{arm}] = {value}")]
    InvalidHyperparameter {
        name: &'static str,
        arm: usize,
        value: f64,
    },

    // Numeric errors (30-39)
    #[error("distribution rejected its parameters: {0}")]
    Distribution(String),

    // I/O errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns the error code for this error type.
    pub fn code(&self) -> u32 {
        match self {
            Error::Config(_) => 10,
            Error::UnsupportedCombination { .. } => 11,
            Error::UnsupportedSamplingMode(_) => 12,
            Error::DimensionMismatch { .. } => 13,
            Error::InvalidHyperparameter { .. } => 14,
            Error::Distribution(_) => 30,
            Error::Io(_) => 60,
            Error::Json(_) => 61,
        }
    }

    /// Whether the error was raised while validating configuration, i.e.
    /// before any simulation state existed.
    pub fn is_configuration(&self) -> bool {
        (10..20).contains(&self.code())
    }
}
