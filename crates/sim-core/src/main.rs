//! Commons Simulation
//!
//! Run with: cargo run -p sim-core
//!
//! Examples:
//!   cargo run -p sim-core -- --days 360 --seed 42
//!   cargo run -p sim-core -- --config run.toml --output-dir output/

use clap::Parser;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use sim_core::config::{ConfigError, SimConfig};
use sim_core::events::ProbabilisticEventGenerator;
use sim_core::output::{Chronicle, OutputError, SummaryWriter};
use sim_core::setup::build_population;
use sim_core::{Environment, Simulator};

/// Closed-society cooperation simulation
#[derive(Parser, Debug)]
#[command(name = "commons_sim")]
#[command(about = "N-player prisoner's dilemma society simulation")]
struct Args {
    /// Path to a TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Random seed, overrides the config file
    #[arg(long)]
    seed: Option<u64>,

    /// Number of days to simulate, overrides the config file
    #[arg(long)]
    days: Option<u64>,

    /// Directory for run outputs
    #[arg(long, default_value = "output")]
    output_dir: PathBuf,
}

#[derive(Debug, Error)]
enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Output(#[from] OutputError),
    #[error("could not prepare output directory: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not serialize run report: {0}")]
    Report(#[from] serde_json::Error),
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("run failed: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), RunError> {
    let mut config = match &args.config {
        Some(path) => SimConfig::from_file(path)?,
        None => SimConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.run.seed = seed;
    }
    if let Some(days) = args.days {
        config.run.days = days;
    }
    config.validate()?;

    std::fs::create_dir_all(&args.output_dir)?;
    let chronicle = Chronicle::new(args.output_dir.join("chronicle.txt"))
        .map_err(OutputError::Io)?;
    let summary_writer = SummaryWriter::new(args.output_dir.join("summary.jsonl"))
        .map_err(OutputError::Io)?;

    info!(
        seed = config.run.seed,
        days = config.run.days,
        founders = config.founding_size(),
        "starting run"
    );

    let mut rng = SmallRng::seed_from_u64(config.run.seed);
    let agents = build_population(&config, &mut rng);
    let env = Environment::new(agents, config.economy.lost_per_day, &mut rng);
    let generator = ProbabilisticEventGenerator {
        coop_event_probability: config.events.coop_event_probability,
        good_coop_resource_probability: config.events.good_coop_resource_probability,
        good_time_probability: config.events.good_time_probability,
        thief_toleration: config.events.thief_toleration,
    };

    let mut simulator = Simulator::new(env, generator, &config, rng, chronicle, summary_writer);
    let report = simulator.run(config.run.days)?;

    let report_path = args.output_dir.join("report.json");
    std::fs::write(&report_path, serde_json::to_string_pretty(&report)?)?;
    info!(path = %report_path.display(), "run report written");
    Ok(())
}
