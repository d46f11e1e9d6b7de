//! `vitalwatch simulate`: synthetic saturation readings and alert transitions.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use colored::Colorize;
use tracing::info;

use crate::commands::now_ms;
use crate::config::Config;
use crate::ingest::message::{format_message, format_transition};
use crate::simulator::{AlertState, BistableSimulator, SaturationGenerator};

/// Settings for one simulation run
#[derive(Debug, Clone)]
pub struct SimulateOptions {
    pub patients: u32,
    pub steps: u32,
    pub seed: Option<u64>,
    pub interval_ms: i64,
    /// First timestamp; defaults to the current time
    pub start: Option<i64>,
    /// Output file; stdout when absent
    pub output: Option<PathBuf>,
    pub config: Option<PathBuf>,
}

/// Counts from a finished run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimulationSummary {
    pub readings: usize,
    pub triggered: usize,
    pub resolved: usize,
}

pub fn execute(options: SimulateOptions) -> Result<()> {
    if options.patients == 0 {
        bail!("--patients must be at least 1");
    }
    if options.interval_ms <= 0 {
        bail!("--interval-ms must be positive, got {}", options.interval_ms);
    }

    let config = Config::resolve(options.config.as_deref())?;

    let summary = match &options.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            let mut out = BufWriter::new(file);
            let summary = run(&options, &config, &mut out)?;
            out.flush()
                .with_context(|| format!("Failed to write output file: {}", path.display()))?;
            summary
        }
        None => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            run(&options, &config, &mut out)?
        }
    };

    eprintln!(
        "{} Simulated {} patients for {} steps: {} readings, {} triggered, {} resolved",
        "✓".green().bold(),
        options.patients,
        options.steps,
        summary.readings,
        summary.triggered.to_string().yellow(),
        summary.resolved
    );

    Ok(())
}

/// Write the whole simulation to `out` in the streaming wire format
pub fn run<W: Write>(
    options: &SimulateOptions,
    config: &Config,
    out: &mut W,
) -> Result<SimulationSummary> {
    let (mut alerts, mut saturation) = match options.seed {
        Some(seed) => (
            BistableSimulator::seeded(config.simulator, seed),
            SaturationGenerator::seeded(seed.wrapping_add(1)),
        ),
        None => (
            BistableSimulator::new(config.simulator),
            SaturationGenerator::new(),
        ),
    };

    let start = options.start.unwrap_or_else(now_ms);
    let mut summary = SimulationSummary::default();
    info!(
        patients = options.patients,
        steps = options.steps,
        seed = ?options.seed,
        "Starting simulation"
    );

    for step in 0..i64::from(options.steps) {
        let timestamp = step_timestamp(start, step, options.interval_ms)?;

        for patient_id in 1..=options.patients {
            let record = saturation.next_record(patient_id, timestamp);
            writeln!(out, "{}", format_message(&record)).context("Failed to write reading")?;
            summary.readings += 1;

            if let Some(transition) = alerts.step(patient_id, timestamp) {
                writeln!(out, "{}", format_transition(&transition))
                    .context("Failed to write alert transition")?;
                match transition.to {
                    AlertState::Triggered => summary.triggered += 1,
                    AlertState::Resolved => summary.resolved += 1,
                }
            }
        }
    }

    Ok(summary)
}

/// Timestamp of `step`, refusing runs that leave the i64 millisecond range
fn step_timestamp(start: i64, step: i64, interval_ms: i64) -> Result<i64> {
    step.checked_mul(interval_ms)
        .and_then(|offset| start.checked_add(offset))
        .with_context(|| {
            format!("Simulation step {step} from {start} overflows the timestamp range")
        })
}
