//! Posterior history and the conjugate updater.
//!
//! The history is an arena of `horizon + 1` Beta snapshots: entry 0 is the
//! prior and entry `t + 1` is the posterior after observing step `t`. Each
//! entry is written exactly once, in order.

use mcbs_common::{Error, Result, RewardFamily};
use mcbs_config::PriorConfig;
use serde::{Deserialize, Serialize};

use crate::trace::ArmMatrix;

/// Borrowed Beta hyperparameters of every arm at one snapshot.
#[derive(Debug, Clone, Copy)]
pub struct BetaPosterior<'a> {
    pub alpha: &'a [f64],
    pub beta: &'a [f64],
}

impl BetaPosterior<'_> {
    pub fn arms(&self) -> usize {
        self.alpha.len()
    }
}

/// Append-once Beta snapshots, indexed by time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PosteriorHistory {
    alpha: ArmMatrix,
    beta: ArmMatrix,
    filled: usize,
}

impl PosteriorHistory {
    /// Allocate the arena and write the prior as entry 0.
    pub fn new(prior_alpha: &[f64], prior_beta: &[f64], horizon: usize) -> Self {
        let arms = prior_alpha.len();
        let mut alpha = ArmMatrix::zeros(arms, horizon + 1);
        let mut beta = ArmMatrix::zeros(arms, horizon + 1);
        alpha.write_column(0, prior_alpha);
        beta.write_column(0, prior_beta);
        Self {
            alpha,
            beta,
            filled: 1,
        }
    }

    /// Number of snapshots written so far (prior included).
    pub fn len(&self) -> usize {
        self.filled
    }

    pub fn is_empty(&self) -> bool {
        self.filled == 0
    }

    /// Snapshot `index`, if it has been written.
    pub fn at(&self, index: usize) -> Option<BetaPosterior<'_>> {
        (index < self.filled).then(|| BetaPosterior {
            alpha: self.alpha.column(index),
            beta: self.beta.column(index),
        })
    }

    /// Most recent snapshot.
    pub fn latest(&self) -> BetaPosterior<'_> {
        BetaPosterior {
            alpha: self.alpha.column(self.filled - 1),
            beta: self.beta.column(self.filled - 1),
        }
    }

    pub fn alpha(&self) -> &ArmMatrix {
        &self.alpha
    }

    pub fn beta(&self) -> &ArmMatrix {
        &self.beta
    }

    /// Write the next snapshot. Entries are never revisited.
    fn push(&mut self, alpha: &[f64], beta: &[f64]) {
        assert!(
            self.filled < self.alpha.steps(),
            "posterior history full at {} snapshots",
            self.filled
        );
        self.alpha.write_column(self.filled, alpha);
        self.beta.write_column(self.filled, beta);
        self.filled += 1;
    }
}

/// Conjugate update rule for Bernoulli rewards under Beta priors.
///
/// Construction is where unsupported reward/prior pairings are rejected, so
/// a bandit that builds successfully can always update.
#[derive(Debug, Clone)]
pub struct ConjugateUpdater {
    prior_alpha: Vec<f64>,
    prior_beta: Vec<f64>,
}

impl ConjugateUpdater {
    pub fn new(reward: RewardFamily, prior: &PriorConfig) -> Result<Self> {
        match (reward, prior) {
            (RewardFamily::Bernoulli, PriorConfig::Beta { alpha, beta }) => {
                if alpha.len() != beta.len() {
                    return Err(Error::DimensionMismatch {
                        what: "prior.beta",
                        expected: alpha.len(),
                        actual: beta.len(),
                    });
                }
                Ok(Self {
                    prior_alpha: alpha.clone(),
                    prior_beta: beta.clone(),
                })
            }
            (reward, prior) => Err(Error::UnsupportedCombination {
                reward,
                prior: prior.family(),
            }),
        }
    }

    /// Fresh history holding only the prior.
    pub fn history(&self, horizon: usize) -> PosteriorHistory {
        PosteriorHistory::new(&self.prior_alpha, &self.prior_beta, horizon)
    }

    /// Fold the observation at step `t` into the history.
    ///
    /// With s_t successes and n_t pulls of an arm through `t`, the new
    /// snapshot is `alpha_0 + s_t`, `beta_0 + n_t - s_t`. Snapshot `t` already
    /// holds the counts through `t - 1`, so only step `t` is added.
    pub fn update(
        &self,
        t: usize,
        actions: &ArmMatrix,
        returns: &ArmMatrix,
        history: &mut PosteriorHistory,
    ) {
        assert_eq!(
            history.len(),
            t + 1,
            "posterior update for step {t} out of order"
        );
        let prev = history.latest();
        let pulls = actions.column(t);
        let successes = returns.column(t);

        let alpha: Vec<f64> = prev
            .alpha
            .iter()
            .zip(successes)
            .map(|(a, s)| a + s)
            .collect();
        let beta: Vec<f64> = prev
            .beta
            .iter()
            .zip(pulls.iter().zip(successes))
            .map(|(b, (n, s))| b + (n - s))
            .collect();
        history.push(&alpha, &beta);
    }
}
