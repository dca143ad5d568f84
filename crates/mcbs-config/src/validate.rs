//! Configuration validation errors.

use mcbs_common::Error;
use thiserror::Error;

/// Result alias for configuration loading and validation.
pub type ValidationResult<T> = std::result::Result<T, ValidationError>;

/// Problems found while loading or validating a configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("parse error: {0}")]
    ParseError(String),

    #[error("{what} has {actual} entries, expected {expected} (one per arm)")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("invalid {field}[{index}] = {value}: {reason}")]
    InvalidEntry {
        field: &'static str,
        index: usize,
        value: f64,
        reason: &'static str,
    },

    #[error("invalid {field}: {message}")]
    InvalidValue { field: &'static str, message: String },

    #[error("unsupported sampling mode: {0}")]
    UnsupportedSamplingMode(String),
}

impl From<ValidationError> for Error {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::DimensionMismatch {
                what,
                expected,
                actual,
            } => Error::DimensionMismatch {
                what,
                expected,
                actual,
            },
            ValidationError::InvalidEntry {
                field,
                index,
                value,
                ..
            } => Error::InvalidHyperparameter {
                name: field,
                arm: index,
                value,
            },
            ValidationError::UnsupportedSamplingMode(name) => Error::UnsupportedSamplingMode(name),
            other => Error::Config(other.to_string()),
        }
    }
}

/// Check that `values` has one entry per arm and every entry passes `check`.
pub(crate) fn check_per_arm(
    field: &'static str,
    values: &[f64],
    arms: usize,
    check: fn(f64) -> Option<&'static str>,
) -> ValidationResult<()> {
    if values.len() != arms {
        return Err(ValidationError::DimensionMismatch {
            what: field,
            expected: arms,
            actual: values.len(),
        });
    }
    for (index, &value) in values.iter().enumerate() {
        if let Some(reason) = check(value) {
            return Err(ValidationError::InvalidEntry {
                field,
                index,
                value,
                reason,
            });
        }
    }
    Ok(())
}

pub(crate) fn positive_finite(v: f64) -> Option<&'static str> {
    if !v.is_finite() {
        Some("must be finite")
    } else if v <= 0.0 {
        Some("must be positive")
    } else {
        None
    }
}

pub(crate) fn unit_interval(v: f64) -> Option<&'static str> {
    if (0.0..=1.0).contains(&v) {
        None
    } else {
        Some("must lie in [0, 1]")
    }
}

pub(crate) fn non_negative_finite(v: f64) -> Option<&'static str> {
    if !v.is_finite() {
        Some("must be finite")
    } else if v < 0.0 {
        Some("must be non-negative")
    } else {
        None
    }
}
