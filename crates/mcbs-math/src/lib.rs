//! Bayesian bandit sampling math utilities.

pub mod math;

pub use math::beta::*;
pub use math::gamma::*;
pub use math::probability::*;
