//! Bayesian bandit sampling configuration loading and validation.
//!
//! This crate provides:
//! - Typed Rust structs for bandit experiment configuration
//! - Tagged enums for reward, prior, sampling-budget, and estimator choices
//! - Shape and value validation, run once before any simulation step
//! - Configuration presets mirroring the standard evaluation set

pub mod bandit;
pub mod preset;
pub mod sampling;
pub mod validate;

pub use bandit::{BanditConfig, EstimatorConfig, PriorConfig, RewardConfig};
pub use preset::{get_preset, list_presets, PresetError, PresetInfo, PresetName};
pub use sampling::{SamplingKnobs, SamplingMode, SamplingPolicy};
pub use validate::{ValidationError, ValidationResult};

/// Schema version for configuration files.
pub const CONFIG_SCHEMA_VERSION: &str = "1.0.0";
