//! `vitalwatch evaluate`: run the rule set over a batch data file.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use colored::Colorize;
use serde::Serialize;

use crate::commands::now_ms;
use crate::config::Config;
use crate::emit::{CollectingEmitter, ConsoleEmitter, FanOut, JsonLinesEmitter};
use crate::engine::{EvaluationReport, Evaluator};
use crate::ingest::file;
use crate::models::{Patient, PatientId};
use crate::store::InMemoryStore;

/// Result for one patient in `--json` output
#[derive(Debug, Serialize)]
struct PatientOutcome {
    patient_id: PatientId,
    #[serde(skip_serializing_if = "Option::is_none")]
    report: Option<EvaluationReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Evaluate every patient in `data` (or just `patient`) as of `now`.
///
/// `now` defaults to the newest timestamp in the file, so historical captures
/// evaluate the way they would have when the last reading arrived.
pub fn execute(
    data: PathBuf,
    patient: Option<PatientId>,
    now: Option<i64>,
    config: Option<PathBuf>,
    alerts_file: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let config = Config::resolve(config.as_deref())?;
    let batch = file::load(&data)?;

    for rejected in &batch.rejected {
        eprintln!(
            "{} Skipped line {}: {} ({})",
            "⚠".yellow(),
            rejected.line,
            rejected.content.dimmed(),
            rejected.error
        );
    }

    let now = now
        .or_else(|| batch.records.iter().map(|r| r.timestamp).max())
        .unwrap_or_else(now_ms);

    let patients: Vec<Patient> = match patient {
        Some(0) => bail!("Patient id 0 is not a valid identity"),
        Some(id) => vec![Patient::new(id)],
        None => batch.patient_ids().into_iter().map(Patient::new).collect(),
    };
    let store = InMemoryStore::from_records(batch.records);

    if patients.is_empty() {
        if json {
            println!("[]");
        } else {
            println!("{} No records in {}", "ℹ".blue(), data.display());
        }
        return Ok(());
    }

    let channels = build_channels(json, alerts_file.as_deref())?;
    let emitter = config.delivery.pipeline(channels);
    let evaluator = Evaluator::new(&store, emitter, config.rules.clone());

    let results = evaluator.evaluate_all(&patients, now);
    let failures = results.iter().filter(|(_, r)| r.is_err()).count();

    if json {
        let outcomes: Vec<PatientOutcome> = results
            .into_iter()
            .map(|(patient_id, result)| match result {
                Ok(report) => PatientOutcome {
                    patient_id,
                    report: Some(report),
                    error: None,
                },
                Err(e) => PatientOutcome {
                    patient_id,
                    report: None,
                    error: Some(e.to_string()),
                },
            })
            .collect();
        let text = serde_json::to_string_pretty(&outcomes)
            .context("Failed to serialize evaluation results")?;
        println!("{text}");
    } else {
        println!();
        for (patient_id, result) in &results {
            print_outcome(*patient_id, result.as_ref().map_err(|e| e.to_string()));
        }
    }

    if failures > 0 {
        bail!("{failures} of {} patient evaluations failed", patients.len());
    }

    Ok(())
}

fn build_channels(json: bool, alerts_file: Option<&Path>) -> Result<FanOut> {
    let mut channels = FanOut::new();
    if !json {
        channels = channels.with(ConsoleEmitter::stdout());
    }
    if let Some(path) = alerts_file {
        let sink = JsonLinesEmitter::open(path)
            .with_context(|| format!("Failed to open alerts file: {}", path.display()))?;
        channels = channels.with(sink);
    }
    if channels.is_empty() {
        // JSON output with no file still needs a sink
        channels = channels.with(CollectingEmitter::new());
    }
    Ok(channels)
}

fn print_outcome(patient_id: PatientId, result: Result<&EvaluationReport, String>) {
    match result {
        Ok(report) if report.detections() == 0 => println!(
            "{} Patient {}: {} rules, no alerts",
            "✓".green().bold(),
            patient_id.to_string().cyan(),
            report.rules_evaluated
        ),
        Ok(report) => {
            println!(
                "{} Patient {}: {} rules, {} alerts ({})",
                "!".red().bold(),
                patient_id.to_string().cyan(),
                report.rules_evaluated,
                report.alerts_emitted,
                report.fired_rules.join(", ").yellow()
            );
            if report.emission_failures > 0 {
                println!(
                    "  {} {} alerts could not be delivered",
                    "→".dimmed(),
                    report.emission_failures
                );
            }
        }
        Err(e) => eprintln!(
            "{} Patient {}: {}",
            "✗".red().bold(),
            patient_id.to_string().cyan(),
            e
        ),
    }
}
