use std::path::PathBuf;
use std::sync::mpsc::RecvTimeoutError;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use color_eyre::eyre::{WrapErr, bail};
use paramsim::{
    Overrides, SimulationResponse, SimulationWorker, TextReport, init_logging, load_scenario,
    render_json,
};
use paramsim_core::interaction::InteractionModel;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Interaction {
    /// Random coupling per parameter pair
    Uniform,
    /// Coupling derived from parameter weights
    WeightAffinity,
}

impl From<Interaction> for InteractionModel {
    fn from(value: Interaction) -> Self {
        match value {
            Interaction::Uniform => InteractionModel::Uniform,
            Interaction::WeightAffinity => InteractionModel::WeightAffinity,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "paramsim")]
#[command(about = "Monte Carlo simulation of joint parameter outcomes")]
struct Args {
    /// Path to a YAML scenario file
    scenario: PathBuf,

    /// Number of trials in the main run
    #[arg(short, long)]
    iterations: Option<usize>,

    /// Trials per sensitivity pass (default: min(iterations, 500))
    #[arg(long)]
    sensitivity_iterations: Option<usize>,

    /// Seed for reproducible results (default: random)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Skip the sensitivity analysis
    #[arg(long)]
    no_sensitivity: bool,

    /// Interaction strength model
    #[arg(long, value_enum)]
    interaction: Option<Interaction>,

    /// Print the full report as JSON
    #[arg(long)]
    json: bool,

    /// Log level (debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Append logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    init_logging(args.log_file.as_deref(), &args.log_level)?;

    let overrides = Overrides {
        iterations: args.iterations,
        sensitivity_iterations: args.sensitivity_iterations,
        seed: args.seed,
        interaction: args.interaction.map(Into::into),
        no_sensitivity: args.no_sensitivity,
    };
    let scenario = load_scenario(&args.scenario)?.with_overrides(&overrides);

    let worker = SimulationWorker::new();
    if !worker.run(scenario.parameters, scenario.config) {
        bail!("simulation worker stopped unexpectedly");
    }

    let report = loop {
        match worker.recv_timeout(Duration::from_millis(250)) {
            Ok(SimulationResponse::Complete(report)) => break report,
            Ok(SimulationResponse::Cancelled) => bail!("simulation cancelled"),
            Ok(SimulationResponse::Error(message)) => bail!(message),
            Err(RecvTimeoutError::Disconnected) => bail!("simulation worker stopped unexpectedly"),
            Err(RecvTimeoutError::Timeout) => {
                let (done, total) = worker.progress();
                tracing::debug!(stage = worker.stage().label(), done, total, "simulation running");
            }
        }
    };

    if args.json {
        let json = render_json(&report).wrap_err("failed to serialize report")?;
        println!("{json}");
    } else {
        print!(
            "{}",
            TextReport::new(&report).with_title(scenario.name.as_deref())
        );
    }

    tracing::info!("Simulation finished");
    Ok(())
}
