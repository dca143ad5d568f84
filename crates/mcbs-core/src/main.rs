//! `mcbs` command-line entry point.
//!
//! Runs Bayesian sampling bandits from a JSON configuration file or a named
//! preset and prints a JSON summary of every realization to stdout.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use mcbs_common::{Error, Result};
use mcbs_config::{get_preset, list_presets, BanditConfig, PresetName, SamplingMode};
use mcbs_core::logging::{init_logging, LogFormat};
use mcbs_core::{execute_realizations, ExecutionMode, RunTrace, SamplingBandit};
use mcbs_math::BetaMoments;
use serde::Serialize;
use tracing::error;

#[derive(Parser, Debug)]
#[command(name = "mcbs", version, about = "Bayesian sampling bandit simulator")]
struct Cli {
    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty, global = true)]
    log_format: LogFormat,

    /// Log filter directives (overrides RUST_LOG)
    #[arg(long, global = true)]
    log_filter: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one bandit for a number of realizations
    Run(RunArgs),
    /// List the built-in presets
    Presets,
    /// List the sampling-budget modes
    Modes,
}

#[derive(Args, Debug)]
struct RunArgs {
    /// JSON bandit configuration
    #[arg(long, conflicts_with_all = ["preset", "theta", "horizon"])]
    config: Option<PathBuf>,

    /// Preset name (see `mcbs presets`)
    #[arg(long, default_value = "thompson-sampling")]
    preset: String,

    /// Bernoulli success probability per arm, comma separated
    #[arg(long, value_delimiter = ',', required_unless_present = "config")]
    theta: Vec<f64>,

    /// Steps per realization
    #[arg(long, default_value_t = 100)]
    horizon: usize,

    /// Number of independent realizations
    #[arg(short, long, default_value_t = 1)]
    realizations: usize,

    /// Base seed; realization r uses seed + r
    #[arg(long, env = "MCBS_SEED")]
    seed: Option<u64>,

    /// sequential | parallel
    #[arg(long, default_value = "sequential")]
    mode: String,

    /// Print full traces instead of the summary
    #[arg(long)]
    full: bool,
}

#[derive(Debug, Serialize)]
struct RunSummary {
    description: Option<String>,
    arms: usize,
    horizon: usize,
    seed: u64,
    estimator: &'static str,
    sampling: SamplingMode,
    mode: ExecutionMode,
    expected_returns: Vec<f64>,
    realizations: Vec<RealizationSummary>,
}

#[derive(Debug, Serialize)]
struct RealizationSummary {
    index: usize,
    cumulative_reward: f64,
    action_frequency: Vec<f64>,
    final_posterior: Vec<BetaMoments>,
}

impl RealizationSummary {
    fn of(index: usize, run: &RunTrace) -> Self {
        Self {
            index,
            cumulative_reward: run.cumulative_reward(),
            action_frequency: run.action_frequency(),
            final_posterior: run.final_posterior(),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(e) = init_logging(cli.log_format, cli.log_filter.as_deref()) {
        eprintln!("mcbs: {e}");
        return ExitCode::from(e.code() as u8);
    }

    let outcome = match cli.command {
        Command::Run(args) => run(args),
        Command::Presets => print_json(&list_presets()),
        Command::Modes => print_json(&SamplingMode::ALL),
    };
    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(code = e.code(), "{e}");
            eprintln!("mcbs: {e}");
            ExitCode::from(e.code() as u8)
        }
    }
}

fn load_config(args: &RunArgs) -> Result<BanditConfig> {
    let mut config = match &args.config {
        Some(path) => BanditConfig::from_file(path)?,
        None => {
            let preset: PresetName = args
                .preset
                .parse()
                .map_err(|e: mcbs_config::PresetError| Error::Config(e.to_string()))?;
            get_preset(preset, args.theta.clone(), args.horizon)
        }
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    Ok(config)
}

fn run(args: RunArgs) -> Result<()> {
    let config = load_config(&args)?;
    let mode: ExecutionMode = args.mode.parse()?;
    let bandit = SamplingBandit::new(&config)?;
    let runs = execute_realizations(&bandit, args.realizations, mode)?;

    if args.full {
        return print_json(&runs);
    }
    let summary = RunSummary {
        description: config.description.clone(),
        arms: bandit.arms(),
        horizon: bandit.horizon(),
        seed: bandit.seed(),
        estimator: bandit.estimator().name(),
        sampling: bandit.budget().policy().mode(),
        mode,
        expected_returns: bandit.reward().expected_returns(),
        realizations: runs
            .iter()
            .enumerate()
            .map(|(i, run)| RealizationSummary::of(i, run))
            .collect(),
    };
    print_json(&summary)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}
