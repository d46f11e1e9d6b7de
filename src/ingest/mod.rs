//! Ingestion boundary.
//!
//! Turns batch files and streamed messages into [`MeasurementRecord`]s.
//! Every line is validated in full before anything reaches a store; bad lines
//! are kept aside with their line numbers.

mod error;
pub mod file;
pub mod message;
mod stream;

pub use error::IngestError;
pub use message::Message;
pub use stream::{ingest_stream, StreamSummary};

use std::io::BufRead;
use std::str::FromStr;

use serde::Serialize;
use tracing::warn;

use crate::models::{MeasurementRecord, PatientId, SignalType};

/// An input line that failed validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedLine {
    /// 1-based line number
    pub line: usize,
    pub content: String,
    pub error: String,
}

/// Outcome of reading a whole input
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IngestBatch {
    pub records: Vec<MeasurementRecord>,
    pub rejected: Vec<RejectedLine>,
}

impl IngestBatch {
    /// Distinct patient ids among the accepted records, ascending
    pub fn patient_ids(&self) -> Vec<PatientId> {
        let mut ids: Vec<PatientId> = self.records.iter().map(|r| r.patient_id).collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }
}

/// Read every non-blank line of `reader` through `parse`
pub fn collect<R, F>(reader: R, parse: F) -> Result<IngestBatch, IngestError>
where
    R: BufRead,
    F: Fn(&str) -> Result<MeasurementRecord, IngestError>,
{
    let mut batch = IngestBatch::default();

    for_each_line(reader, |number, line| match line {
        Ok(line) => match parse(&line) {
            Ok(record) => batch.records.push(record),
            Err(e) => batch.rejected.push(reject(number, line, &e)),
        },
        Err(rejected) => batch.rejected.push(rejected),
    })?;

    Ok(batch)
}

/// Feed each non-blank line of `reader` to `visit` with its 1-based number.
///
/// Lines that are not valid UTF-8 arrive already rejected; only a failed
/// read ends the loop early.
pub(crate) fn for_each_line<R, F>(mut reader: R, mut visit: F) -> Result<(), IngestError>
where
    R: BufRead,
    F: FnMut(usize, Result<String, RejectedLine>),
{
    let mut buf = Vec::new();
    let mut number = 0;

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            return Ok(());
        }
        number += 1;

        while matches!(buf.last(), Some(b'\n' | b'\r')) {
            buf.pop();
        }

        match std::str::from_utf8(&buf) {
            Ok(line) if line.trim().is_empty() => {}
            Ok(line) => visit(number, Ok(line.to_string())),
            Err(e) => {
                let error = IngestError::InvalidEncoding {
                    valid_up_to: e.valid_up_to(),
                };
                let content = String::from_utf8_lossy(&buf).into_owned();
                visit(number, Err(reject(number, content, &error)));
            }
        }
    }
}

/// Record a refused line, logging it
pub(crate) fn reject(line: usize, content: String, error: &IngestError) -> RejectedLine {
    warn!(line, error = %error, "Rejected line");
    RejectedLine {
        line,
        content,
        error: error.to_string(),
    }
}

pub(crate) fn parse_number<T: FromStr>(field: &'static str, text: &str) -> Result<T, IngestError> {
    text.trim()
        .parse::<T>()
        .map_err(|_| IngestError::InvalidNumber {
            field,
            value: text.trim().to_string(),
        })
}

/// Measurement value; NaN and infinities are refused
pub(crate) fn parse_value(text: &str) -> Result<f64, IngestError> {
    let value = parse_number::<f64>("value", text)?;
    if !value.is_finite() {
        return Err(IngestError::InvalidNumber {
            field: "value",
            value: text.trim().to_string(),
        });
    }
    Ok(value)
}

pub(crate) fn parse_patient_id(text: &str) -> Result<PatientId, IngestError> {
    match parse_number::<PatientId>("patient id", text)? {
        0 => Err(IngestError::ZeroPatientId),
        id => Ok(id),
    }
}

pub(crate) fn parse_label(text: &str) -> Result<SignalType, IngestError> {
    let label = text.trim();
    if label.is_empty() {
        return Err(IngestError::EmptyLabel);
    }
    Ok(SignalType::from(label))
}
