//! Batch file format: one `patientId,value,label,timestamp` record per line.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result};

use crate::models::MeasurementRecord;

use super::error::IngestError;
use super::{parse_label, parse_number, parse_patient_id, parse_value, IngestBatch};

const FIELDS: usize = 4;

/// Parse one batch line into a record
pub fn parse_line(line: &str) -> Result<MeasurementRecord, IngestError> {
    let fields: Vec<&str> = line.trim().split(',').collect();
    if fields.len() != FIELDS {
        return Err(IngestError::FieldCount {
            expected: FIELDS,
            found: fields.len(),
        });
    }

    let patient_id = parse_patient_id(fields[0])?;
    let value = parse_value(fields[1])?;
    let signal = parse_label(fields[2])?;
    let timestamp = parse_number::<i64>("timestamp", fields[3])?;

    Ok(MeasurementRecord::new(patient_id, signal, value, timestamp))
}

/// Format a record as a batch line (no trailing newline)
pub fn format_line(record: &MeasurementRecord) -> String {
    format!(
        "{},{},{},{}",
        record.patient_id, record.value, record.signal, record.timestamp
    )
}

/// Load a batch file, separating accepted records from rejected lines
pub fn load(path: &Path) -> Result<IngestBatch> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open data file: {}", path.display()))?;

    let batch = super::collect(BufReader::new(file), parse_line)
        .with_context(|| format!("Failed to read data file: {}", path.display()))?;

    Ok(batch)
}
