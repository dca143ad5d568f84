//! Action selection from the predictive density.
//!
//! With a finite budget the selector draws `ceil(n)` categorical votes
//! weighted by the predictive mean and plays the arm with the most votes. The
//! exhaustive budget skips voting and plays the most probable arm. Ties go to
//! the lowest arm index in both cases, so an empty tally plays arm 0.

use mcbs_common::{Error, Result};
use mcbs_math::{argmax, argmax_counts, normalize_probs, Normalized};
use rand::distr::weighted::WeightedIndex;
use rand::distr::Distribution;
use rand::RngCore;
use tracing::warn;

use crate::budget::SampleBudget;
use crate::trace::ArmMatrix;

/// Sums within this distance of one are used as-is.
pub const PROBABILITY_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, Default)]
pub struct ActionSelector;

impl ActionSelector {
    pub fn new() -> Self {
        Self
    }

    /// Pick the arm for step `t` and mark it in `actions`.
    pub fn select(
        &self,
        t: usize,
        mean: &[f64],
        budget: SampleBudget,
        rng: &mut dyn RngCore,
        actions: &mut ArmMatrix,
    ) -> Result<usize> {
        let arm = match budget.votes() {
            None => most_probable(mean)?,
            Some(votes) => {
                let probs = vote_weights(t, mean)?;
                let dist = WeightedIndex::new(&probs)
                    .map_err(|e| Error::Distribution(format!("vote weights {probs:?}: {e}")))?;
                let mut tally = vec![0u64; mean.len()];
                for _ in 0..votes {
                    tally[dist.sample(rng)] += 1;
                }
                argmax_counts(&tally).ok_or_else(no_arms)?
            }
        };

        let column = actions.column_mut(t);
        assert!(
            column.iter().all(|&a| a == 0.0),
            "action for step {t} already recorded"
        );
        column[arm] = 1.0;
        Ok(arm)
    }
}

fn most_probable(mean: &[f64]) -> Result<usize> {
    argmax(mean).ok_or_else(no_arms)
}

fn no_arms() -> Error {
    Error::Config("predictive density has no arms".to_string())
}

/// Predictive mean as vote probabilities, renormalized when it drifted.
fn vote_weights(t: usize, mean: &[f64]) -> Result<Vec<f64>> {
    match normalize_probs(mean, PROBABILITY_TOLERANCE) {
        Some(Normalized::Unchanged(p)) => Ok(p),
        Some(Normalized::Rescaled {
            probs,
            original_sum,
        }) => {
            warn!(
                target: "mcbs.select",
                t,
                original_sum,
                "predictive mean drifted from 1; renormalized before voting"
            );
            Ok(probs)
        }
        Some(Normalized::Uniform(p)) => {
            warn!(
                target: "mcbs.select",
                t,
                "predictive mean is all zero; voting uniformly"
            );
            Ok(p)
        }
        None => Err(Error::Distribution(format!(
            "predictive mean at step {t} is not a weight vector: {mean:?}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn select(mean: &[f64], budget: SampleBudget, seed: u64) -> (usize, ArmMatrix) {
        let mut actions = ArmMatrix::zeros(mean.len(), 1);
        let mut rng = StdRng::seed_from_u64(seed);
        let arm = ActionSelector::new()
            .select(0, mean, budget, &mut rng, &mut actions)
            .unwrap();
        (arm, actions)
    }

    #[test]
    fn exhaustive_picks_argmax() {
        let (arm, actions) = select(&[0.2, 0.5, 0.3], SampleBudget::Exhaustive, 0);
        assert_eq!(arm, 1);
        assert_eq!(actions.column(0), &[0.0, 1.0, 0.0]);
    }

    #[test]
    fn exhaustive_ties_go_to_lowest_index() {
        let (arm, _) = select(&[0.4, 0.4, 0.2], SampleBudget::Exhaustive, 0);
        assert_eq!(arm, 0);
    }

    #[test]
    fn certain_density_always_wins_the_vote() {
        for seed in 0..20 {
            let (arm, _) = select(&[0.0, 0.0, 1.0], SampleBudget::Finite(5.0), seed);
            assert_eq!(arm, 2);
        }
    }

    #[test]
    fn many_votes_concentrate_on_mode() {
        let (arm, _) = select(&[0.45, 0.55], SampleBudget::Finite(20_000.0), 3);
        assert_eq!(arm, 1);
    }

    #[test]
    fn single_vote_follows_probabilities() {
        let mut hits = 0;
        let n = 4_000;
        for seed in 0..n {
            let (arm, _) = select(&[0.3, 0.7], SampleBudget::Finite(1.0), seed);
            hits += arm;
        }
        let freq = hits as f64 / n as f64;
        assert!((freq - 0.7).abs() < 0.04, "freq={freq}");
    }

    #[test]
    fn zero_votes_tie_at_lowest_index() {
        for seed in 0..5 {
            let (arm, actions) = select(&[0.1, 0.9], SampleBudget::Finite(0.0), seed);
            assert_eq!(arm, 0);
            assert_eq!(actions.column(0), &[1.0, 0.0]);
        }
    }

    #[test]
    fn drifted_mean_is_renormalized() {
        let (arm, _) = select(&[0.0, 0.5], SampleBudget::Finite(3.0), 8);
        assert_eq!(arm, 1);
    }

    #[test]
    fn negative_mean_is_rejected() {
        let mut actions = ArmMatrix::zeros(2, 1);
        let mut rng = StdRng::seed_from_u64(0);
        let err = ActionSelector::new()
            .select(0, &[-0.5, 1.5], SampleBudget::Finite(1.0), &mut rng, &mut actions)
            .unwrap_err();
        assert!(matches!(err, Error::Distribution(_)));
        assert_eq!(actions.column_sum(0), 0.0);
    }

    #[test]
    #[should_panic(expected = "already recorded")]
    fn double_selection_panics() {
        let mut actions = ArmMatrix::zeros(2, 1);
        let mut rng = StdRng::seed_from_u64(0);
        let selector = ActionSelector::new();
        selector
            .select(0, &[0.5, 0.5], SampleBudget::Exhaustive, &mut rng, &mut actions)
            .unwrap();
        let _ = selector.select(0, &[0.5, 0.5], SampleBudget::Exhaustive, &mut rng, &mut actions);
    }
}
