//! Bayesian bandit sampling common types and errors.
//!
//! This crate provides foundational types shared across the mcbs crates:
//! - The unified error type and its stable codes
//! - Distribution family tags used to pick conjugate update rules

pub mod error;
pub mod family;

pub use error::{Error, Result};
pub use family::{PriorFamily, RewardFamily};
