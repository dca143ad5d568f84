//! End-to-end runs of the sampling bandit.

use mcbs_common::Error;
use mcbs_config::{
    get_preset, BanditConfig, EstimatorConfig, PresetName, PriorConfig, RewardConfig,
    SamplingKnobs, SamplingPolicy,
};
use mcbs_core::{execute_realizations, ExecutionMode, RunTrace, SampleBudget, SamplingBandit};
use mcbs_math::argmax;

fn run(config: &BanditConfig) -> RunTrace {
    let bandit = SamplingBandit::new(config).expect("bandit should build");
    bandit.execute_seeded(bandit.seed()).expect("run should finish")
}

#[test]
fn two_arm_thompson_posterior_follows_recursion() {
    let config = BanditConfig::bernoulli(vec![0.2, 0.8], 5)
        .with_sampling(SamplingPolicy::Static { n_samples: 1.0 })
        .with_seed(2024);
    let trace = run(&config);

    assert_eq!(trace.posterior.at(0).unwrap().alpha, &[1.0, 1.0]);
    assert_eq!(trace.posterior.at(0).unwrap().beta, &[1.0, 1.0]);
    for t in 0..5 {
        let before = trace.posterior.at(t).unwrap();
        let after = trace.posterior.at(t + 1).unwrap();
        for k in 0..2 {
            let a = trace.actions.get(k, t);
            let r = trace.returns.get(k, t);
            assert_eq!(after.alpha[k], before.alpha[k] + r);
            assert_eq!(after.beta[k], before.beta[k] + a - r);
        }
        assert_eq!(trace.actions.column_sum(t), 1.0);
        assert!((trace.predictive_mean.column_sum(t) - 1.0).abs() < 1e-6);
        assert_eq!(trace.n_samples[t], SampleBudget::Finite(1.0));
    }
}

#[test]
fn posterior_matches_cumulative_counts() {
    let config = BanditConfig::bernoulli(vec![0.3, 0.5, 0.7], 40).with_seed(9);
    let trace = run(&config);
    let last = trace.posterior.latest();
    let plays = trace.actions.row_sums();
    let wins = trace.returns.row_sums();
    for k in 0..3 {
        assert_eq!(last.alpha[k], 1.0 + wins[k]);
        assert_eq!(last.beta[k], 1.0 + plays[k] - wins[k]);
    }
}

#[test]
fn hyperparameters_never_decrease() {
    let config = get_preset(PresetName::InvPfa, vec![0.1, 0.4, 0.6, 0.9], 30).with_seed(5);
    let trace = run(&config);
    for t in 0..30 {
        let before = trace.posterior.at(t).unwrap();
        let after = trace.posterior.at(t + 1).unwrap();
        for k in 0..4 {
            assert!(after.alpha[k] >= before.alpha[k]);
            assert!(after.beta[k] >= before.beta[k]);
        }
        let grown: f64 = (0..4)
            .map(|k| after.alpha[k] + after.beta[k] - before.alpha[k] - before.beta[k])
            .sum();
        assert_eq!(grown, 1.0);
    }
}

#[test]
fn arg_max_plays_most_probable_arm() {
    for estimator in [EstimatorConfig::monte_carlo(500), EstimatorConfig::analytic()] {
        let config = BanditConfig::bernoulli(vec![0.25, 0.5, 0.75], 25)
            .with_sampling(SamplingPolicy::ArgMax)
            .with_estimator(estimator)
            .with_seed(77);
        let trace = run(&config);
        for t in 0..25 {
            let expected = argmax(trace.predictive_mean.column(t)).unwrap();
            assert_eq!(trace.chosen_arm(t), Some(expected), "step {t}");
            assert_eq!(trace.n_samples[t], SampleBudget::Exhaustive);
        }
    }
}

#[test]
fn same_seed_same_trace() {
    let config = get_preset(PresetName::LogT, vec![0.35, 0.65], 50).with_seed(31);
    let bandit = SamplingBandit::new(&config).unwrap();
    let a = serde_json::to_string(&bandit.execute_seeded(8).unwrap()).unwrap();
    let b = serde_json::to_string(&bandit.execute_seeded(8).unwrap()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn parallel_realizations_match_sequential() {
    let config = get_preset(PresetName::InvVar, vec![0.4, 0.6], 20).with_seed(100);
    let bandit = SamplingBandit::new(&config).unwrap();
    let seq = execute_realizations(&bandit, 5, ExecutionMode::Sequential).unwrap();
    let par = execute_realizations(&bandit, 5, ExecutionMode::Parallel).unwrap();
    let seq = serde_json::to_string(&seq).unwrap();
    let par = serde_json::to_string(&par).unwrap();
    assert_eq!(seq, par);
}

#[test]
fn monte_carlo_density_concentrates_on_best_arm() {
    let config = BanditConfig::bernoulli(vec![0.2, 0.8], 100)
        .with_estimator(EstimatorConfig::monte_carlo(20_000))
        .with_sampling(SamplingPolicy::Static { n_samples: 1.0 })
        .with_seed(12);
    let trace = run(&config);

    let first = trace.predictive_mean.column(0);
    assert!((first[0] - 0.5).abs() < 0.02, "{first:?}");
    let last = trace.predictive_mean.column(99);
    assert!(last[1] > last[0]);
    assert!(last[1] > 0.9, "{last:?}");

    let er = trace.expected_returns.column(99);
    assert!(er[1] > er[0]);
}

#[test]
fn full_draw_count_density_approaches_one() {
    let horizon = 200;
    let config = BanditConfig::bernoulli(vec![0.2, 0.8], horizon)
        .with_estimator(EstimatorConfig::monte_carlo(100_000))
        .with_sampling(SamplingPolicy::Static { n_samples: 1.0 })
        .with_seed(2024);
    let trace = run(&config);

    let first = trace.predictive_mean.column(0);
    assert!((first[0] - 0.5).abs() < 0.01, "{first:?}");
    assert!((first[1] - 0.5).abs() < 0.01, "{first:?}");

    let last = trace.predictive_mean.column(horizon - 1);
    assert!(last[1] > last[0], "{last:?}");
    assert!(1.0 - last[1] < 0.05, "{last:?}");
}

#[test]
fn zero_vote_budget_always_plays_first_arm() {
    let config = BanditConfig::bernoulli(vec![0.1, 0.9], 20)
        .with_sampling(SamplingPolicy::Static { n_samples: 0.0 })
        .with_seed(6);
    let trace = run(&config);
    assert_eq!(trace.chosen_arms(), vec![0; 20]);
    assert_eq!(trace.action_frequency(), vec![1.0, 0.0]);
}

#[test]
fn uniform_prior_gives_uniform_first_step() {
    let config = BanditConfig::bernoulli(vec![0.1, 0.2, 0.3, 0.4], 1)
        .with_estimator(EstimatorConfig::analytic());
    let trace = run(&config);
    for p in trace.predictive_mean.column(0) {
        assert!((p - 0.25).abs() < 1e-6);
    }
}

#[test]
fn unsupported_combination_rejected_before_running() {
    let config = BanditConfig {
        reward: RewardConfig::Poisson {
            lambda: vec![1.0, 3.0],
        },
        ..BanditConfig::bernoulli(vec![0.5, 0.5], 10)
    };
    let err = SamplingBandit::new(&config).unwrap_err();
    assert!(matches!(err, Error::UnsupportedCombination { .. }), "{err}");
    assert!(err.is_configuration());

    let gamma_prior = BanditConfig {
        prior: PriorConfig::Gamma {
            shape: vec![1.0, 1.0],
            rate: vec![1.0, 1.0],
        },
        ..BanditConfig::bernoulli(vec![0.5, 0.5], 10)
    };
    let err = SamplingBandit::new(&gamma_prior).unwrap_err();
    assert!(matches!(err, Error::UnsupportedCombination { .. }), "{err}");
}

#[test]
fn unknown_sampling_mode_rejected() {
    let err: Error = SamplingPolicy::from_parts("infPfa", SamplingKnobs::default())
        .unwrap_err()
        .into();
    assert!(matches!(err, Error::UnsupportedSamplingMode(ref m) if m == "infPfa"));
}

#[test]
fn config_file_round_trip_runs() {
    let json = r#"{
        "schema_version": "1.0.0",
        "arms": 2,
        "horizon": 10,
        "seed": 3,
        "reward": { "family": "bernoulli", "theta": [0.3, 0.7] },
        "prior": { "family": "beta", "alpha": [1.0, 1.0], "beta": [1.0, 1.0] },
        "sampling": { "mode": "sqrtT" },
        "estimator": { "kind": "monte_carlo", "draws": 200 }
    }"#;
    let config = BanditConfig::parse_json(json).unwrap();
    let trace = run(&config);
    assert_eq!(trace.chosen_arms().len(), 10);
    assert!(trace.n_samples.iter().all(|b| b.as_f64() >= 1.0));
}
