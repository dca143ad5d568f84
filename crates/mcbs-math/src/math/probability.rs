//! Probability-vector helpers: argmax with a fixed tie rule, normalization,
//! and Bernoulli indicator variance.
//!
//! These are shared by the predictive-density estimators and the action
//! selector so that tie-breaking and renormalization behave identically
//! everywhere.

/// Index of the maximal element, lowest index on ties.
///
/// NaN entries never win. Returns `None` for an empty slice or when every
/// entry is NaN.
pub fn argmax(values: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &v) in values.iter().enumerate() {
        if v.is_nan() {
            continue;
        }
        match best {
            Some((_, b)) if v <= b => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}

/// Index of the maximal count, lowest index on ties.
pub fn argmax_counts(counts: &[u64]) -> Option<usize> {
    let mut best: Option<(usize, u64)> = None;
    for (i, &c) in counts.iter().enumerate() {
        match best {
            Some((_, b)) if c <= b => {}
            _ => best = Some((i, c)),
        }
    }
    best.map(|(i, _)| i)
}

/// Outcome of normalizing a weight vector into a probability vector.
#[derive(Debug, Clone, PartialEq)]
pub enum Normalized {
    /// The weights already summed to one within tolerance.
    Unchanged(Vec<f64>),
    /// The weights were rescaled by their sum.
    Rescaled { probs: Vec<f64>, original_sum: f64 },
    /// All weights were zero; a uniform vector was substituted.
    Uniform(Vec<f64>),
}

impl Normalized {
    pub fn probs(&self) -> &[f64] {
        match self {
            Normalized::Unchanged(p) | Normalized::Uniform(p) => p,
            Normalized::Rescaled { probs, .. } => probs,
        }
    }

    pub fn into_probs(self) -> Vec<f64> {
        match self {
            Normalized::Unchanged(p) | Normalized::Uniform(p) => p,
            Normalized::Rescaled { probs, .. } => probs,
        }
    }
}

/// Normalize non-negative weights so they sum to one.
///
/// Returns `None` when the slice is empty or holds a negative or non-finite
/// entry; such vectors are not probability weights and must not be repaired.
pub fn normalize_probs(weights: &[f64], tolerance: f64) -> Option<Normalized> {
    if weights.is_empty() || weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
        return None;
    }
    let sum: f64 = weights.iter().sum();
    if sum == 0.0 {
        let k = weights.len() as f64;
        return Some(Normalized::Uniform(vec![1.0 / k; weights.len()]));
    }
    if (sum - 1.0).abs() <= tolerance {
        return Some(Normalized::Unchanged(weights.to_vec()));
    }
    Some(Normalized::Rescaled {
        probs: weights.iter().map(|w| w / sum).collect(),
        original_sum: sum,
    })
}

/// Whether `probs` is a probability vector within `tolerance`.
pub fn is_probability_vector(probs: &[f64], tolerance: f64) -> bool {
    !probs.is_empty()
        && probs.iter().all(|p| p.is_finite() && *p >= 0.0)
        && (probs.iter().sum::<f64>() - 1.0).abs() <= tolerance
}

/// Population variance of a 0/1 indicator that is 1 with frequency `p`.
pub fn indicator_variance(p: f64) -> f64 {
    (p * (1.0 - p)).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argmax_prefers_lowest_index_on_ties() {
        assert_eq!(argmax(&[0.2, 0.4, 0.4]), Some(1));
        assert_eq!(argmax(&[0.5, 0.5]), Some(0));
        assert_eq!(argmax(&[1.0]), Some(0));
    }

    #[test]
    fn argmax_skips_nan() {
        assert_eq!(argmax(&[f64::NAN, 0.1, 0.05]), Some(1));
        assert_eq!(argmax(&[f64::NAN]), None);
        assert_eq!(argmax(&[]), None);
    }

    #[test]
    fn argmax_counts_ties() {
        assert_eq!(argmax_counts(&[3, 7, 7, 1]), Some(1));
        assert_eq!(argmax_counts(&[0, 0]), Some(0));
        assert_eq!(argmax_counts(&[]), None);
    }

    #[test]
    fn normalize_unchanged_when_close() {
        let out = normalize_probs(&[0.25, 0.75], 1e-9).unwrap();
        assert!(matches!(out, Normalized::Unchanged(_)));
    }

    #[test]
    fn normalize_rescales_drift() {
        let out = normalize_probs(&[0.3, 0.3], 1e-9).unwrap();
        match &out {
            Normalized::Rescaled { original_sum, .. } => {
                assert!((original_sum - 0.6).abs() < 1e-12)
            }
            other => panic!("expected rescale, got {other:?}"),
        }
        assert!(is_probability_vector(out.probs(), 1e-12));
    }

    #[test]
    fn normalize_zero_sum_is_uniform() {
        let out = normalize_probs(&[0.0, 0.0, 0.0, 0.0], 1e-9).unwrap();
        assert!(matches!(out, Normalized::Uniform(_)));
        assert_eq!(out.into_probs(), vec![0.25; 4]);
    }

    #[test]
    fn normalize_rejects_invalid() {
        assert!(normalize_probs(&[], 1e-9).is_none());
        assert!(normalize_probs(&[0.5, -0.1], 1e-9).is_none());
        assert!(normalize_probs(&[f64::NAN, 1.0], 1e-9).is_none());
    }

    #[test]
    fn indicator_variance_bounds() {
        assert_eq!(indicator_variance(0.0), 0.0);
        assert_eq!(indicator_variance(1.0), 0.0);
        assert!((indicator_variance(0.5) - 0.25).abs() < 1e-15);
    }
}
