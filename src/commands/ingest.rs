//! `vitalwatch ingest`: validate a streaming-format capture.

use std::fs::File;
use std::io::{self, BufRead, BufReader};

use anyhow::{Context, Result};
use colored::Colorize;

use crate::ingest::{file, ingest_stream, StreamSummary};
use crate::models::MeasurementRecord;
use crate::store::{InMemoryStore, RecordStore};

/// Ingest `source` (a path, or `-` for stdin).
///
/// With `csv`, accepted records go to stdout in the batch format and the
/// summary goes to stderr.
pub fn execute(source: String, csv: bool) -> Result<()> {
    let reader: Box<dyn BufRead> = if source == "-" {
        Box::new(io::stdin().lock())
    } else {
        let file =
            File::open(&source).with_context(|| format!("Failed to open capture: {source}"))?;
        Box::new(BufReader::new(file))
    };

    let store = InMemoryStore::new();
    let summary = ingest_stream(reader, &store)
        .with_context(|| format!("Failed to read capture: {source}"))?;

    if csv {
        for record in sorted_records(&store)? {
            println!("{}", file::format_line(&record));
        }
    }

    report(&summary, store.patient_ids().len(), csv);
    Ok(())
}

/// Every stored record, by patient then timestamp
fn sorted_records(store: &InMemoryStore) -> Result<Vec<MeasurementRecord>> {
    let mut all = Vec::with_capacity(store.len());
    for patient_id in store.patient_ids() {
        let mut records = store
            .get_records(patient_id, i64::MIN, i64::MAX)
            .with_context(|| format!("Failed to read back records for patient {patient_id}"))?;
        records.sort_by_key(|r| r.timestamp);
        all.extend(records);
    }
    Ok(all)
}

fn report(summary: &StreamSummary, patients: usize, to_stderr: bool) {
    let lines = [
        format!(
            "{} Accepted {} readings for {} patients",
            "✓".green().bold(),
            summary.accepted,
            patients
        ),
        format!(
            "  {} alert transitions: {} triggered, {} resolved",
            "→".dimmed(),
            summary.triggered,
            summary.resolved
        ),
    ];
    for line in lines {
        if to_stderr {
            eprintln!("{line}");
        } else {
            println!("{line}");
        }
    }

    if summary.rejected.is_empty() {
        return;
    }

    eprintln!(
        "{} Rejected {} lines",
        "✗".red().bold(),
        summary.rejected.len()
    );
    for rejected in &summary.rejected {
        eprintln!(
            "  line {}: {} ({})",
            rejected.line.to_string().yellow(),
            rejected.error,
            rejected.content.dimmed()
        );
    }
}
