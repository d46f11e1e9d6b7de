use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use vitalwatch::commands::simulate::SimulateOptions;
use vitalwatch::commands::{evaluate, ingest, rules, simulate};
use vitalwatch::logging;

#[derive(Parser)]
#[command(name = "vitalwatch")]
#[command(about = "Clinical alert rules over patient vital signs", long_about = None)]
#[command(version)]
struct Cli {
    /// Debug logging (overridden by VITALWATCH_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate alert rules over a batch data file
    Evaluate {
        /// Data file with `patientId,value,label,timestamp` lines
        #[arg(short, long)]
        data: PathBuf,

        /// Evaluate only this patient (default: every patient in the file)
        #[arg(short, long)]
        patient: Option<u32>,

        /// Evaluation time in ms since the epoch (default: newest record)
        #[arg(long)]
        now: Option<i64>,

        /// Configuration file (default: $VITALWATCH_CONFIG, else built-in rules)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Also append alerts as JSON lines to this file
        #[arg(long)]
        alerts_file: Option<PathBuf>,

        /// Print per-patient reports as JSON instead of console alerts
        #[arg(long)]
        json: bool,
    },

    /// Generate synthetic readings and alert transitions in the wire format
    Simulate {
        /// Number of patients, numbered from 1
        #[arg(short, long, default_value_t = 10)]
        patients: u32,

        /// Number of steps per patient
        #[arg(short, long, default_value_t = 100)]
        steps: u32,

        /// Seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,

        /// Milliseconds between steps
        #[arg(long, default_value_t = 1000)]
        interval_ms: i64,

        /// First timestamp in ms since the epoch (default: now)
        #[arg(long)]
        start: Option<i64>,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Configuration file for simulator rates
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Validate a wire-format capture and report accepted and rejected lines
    Ingest {
        /// Capture file, or `-` for stdin
        source: String,

        /// Print accepted records in the batch file format
        #[arg(long)]
        csv: bool,
    },

    /// Show the effective rule set
    Rules {
        /// Configuration file (default: $VITALWATCH_CONFIG, else built-in rules)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print a table instead of TOML
        #[arg(short, long)]
        list: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose)?;

    match cli.command {
        Commands::Evaluate {
            data,
            patient,
            now,
            config,
            alerts_file,
            json,
        } => evaluate::execute(data, patient, now, config, alerts_file, json),
        Commands::Simulate {
            patients,
            steps,
            seed,
            interval_ms,
            start,
            output,
            config,
        } => simulate::execute(SimulateOptions {
            patients,
            steps,
            seed,
            interval_ms,
            start,
            output,
            config,
        }),
        Commands::Ingest { source, csv } => ingest::execute(source, csv),
        Commands::Rules { config, list } => rules::execute(config, list),
    }
}
