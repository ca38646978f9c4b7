//! Scatterbrain - Entry Point
//!
//! Runs one brain simulation and prints its summary. Real-time pacing, if
//! requested, is layered on through the per-tick observer.

use std::path::PathBuf;
use std::process::ExitCode;
use std::thread;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use scatterbrain::brain::{Brain, SimulationSummary, TickReport};
use scatterbrain::core::config::BrainConfig;
use scatterbrain::core::error::Result;
use scatterbrain::core::types::task_or_none;

/// Simulate a distractible brain juggling tasks for one day
#[derive(Parser, Debug)]
#[command(name = "scatterbrain")]
#[command(about = "Stochastic task-switching brain simulation")]
struct Args {
    /// TOML config file (missing keys keep their defaults)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Number of ticks to simulate
    #[arg(long)]
    ticks: Option<u64>,

    /// Cap for the compounding switch probability (0.0-1.0)
    #[arg(long)]
    switch_cap: Option<f64>,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Real-time delay after each tick, in milliseconds
    #[arg(long, default_value_t = 0)]
    pace_ms: u64,

    /// Print the full activity log after the summary (text format only)
    #[arg(long)]
    events: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("scatterbrain=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let config = build_config(args)?;
    let mut brain = Brain::new(config)?;
    let pace = Duration::from_millis(args.pace_ms);

    let result = brain.run_with(|report| {
        if args.format == Format::Text {
            display_tick(report);
        }
        if !pace.is_zero() {
            thread::sleep(pace);
        }
    });

    match result {
        Ok(summary) => {
            print_summary(&summary, args);
            Ok(())
        }
        Err(e) => {
            // The state up to the failure is still worth showing
            print_summary(&brain.summary(), args);
            Err(e)
        }
    }
}

fn build_config(args: &Args) -> Result<BrainConfig> {
    let mut config = match &args.config {
        Some(path) => BrainConfig::load(path)?,
        None => BrainConfig::default(),
    };

    if let Some(seed) = args.seed {
        config.run.seed = Some(seed);
    }
    if let Some(ticks) = args.ticks {
        config.run.ticks = ticks;
    }
    if let Some(cap) = args.switch_cap {
        config.run.switch_probability_cap = Some(cap);
    }

    config.validate()?;
    Ok(config)
}

/// One status line per tick
fn display_tick(report: &TickReport) {
    println!(
        "--- Tick {} | task: {} | energy: {} | memory: {} | switch p: {:.3} | done {} / interrupted {} ---",
        report.tick,
        task_or_none(report.current_task),
        report.energy,
        report.memory_len,
        report.switch_probability,
        report.completed,
        report.interrupted,
    );
}

fn print_summary(summary: &SimulationSummary, args: &Args) {
    match args.format {
        Format::Json => println!("{}", summary.to_json()),
        Format::Text => {
            println!();
            println!("{}", summary.summary());
            println!("{}", summary.statistics_line());

            if args.events {
                println!();
                println!("--- Activity ---");
                for event in &summary.history.events {
                    println!(
                        "[tick {:>2} | t={:>4}] {:?}",
                        event.tick, event.clock, event.event_type
                    );
                }
            }
        }
    }
}
