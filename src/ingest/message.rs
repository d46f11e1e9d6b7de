//! Streaming wire format.
//!
//! One message per line:
//! `Patient ID: <id>, Timestamp: <ms>, Label: <label>, Data: <value>[%]`.
//! Lines labelled `Alert` carry a simulated alert transition
//! (`triggered`/`resolved`) instead of a measurement.

use crate::models::{MeasurementRecord, PatientId, SignalType};
use crate::simulator::{AlertState, Transition};

use super::error::IngestError;
use super::{parse_label, parse_number, parse_patient_id, parse_value};

/// Label that marks an alert transition line
pub const ALERT_LABEL: &str = "Alert";

const FIELDS: [&str; 4] = ["Patient ID", "Timestamp", "Label", "Data"];

/// A decoded wire message
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Measurement(MeasurementRecord),
    Alert {
        patient_id: PatientId,
        timestamp: i64,
        state: AlertState,
    },
}

fn field<'a>(part: &'a str, name: &'static str) -> Result<&'a str, IngestError> {
    part.trim()
        .strip_prefix(name)
        .and_then(|rest| rest.strip_prefix(':'))
        .map(str::trim)
        .ok_or(IngestError::MissingField { field: name })
}

/// Decode one wire line
pub fn parse_message(line: &str) -> Result<Message, IngestError> {
    let parts: Vec<&str> = line.trim().split(',').collect();
    if parts.len() != FIELDS.len() {
        return Err(IngestError::FieldCount {
            expected: FIELDS.len(),
            found: parts.len(),
        });
    }

    let patient_id = parse_patient_id(field(parts[0], FIELDS[0])?)?;
    let timestamp = parse_number::<i64>("timestamp", field(parts[1], FIELDS[1])?)?;
    let label = field(parts[2], FIELDS[2])?;
    let data = field(parts[3], FIELDS[3])?;

    if label == ALERT_LABEL {
        let state = match data {
            "triggered" => AlertState::Triggered,
            "resolved" => AlertState::Resolved,
            other => {
                return Err(IngestError::InvalidAlertState {
                    value: other.to_string(),
                })
            }
        };
        return Ok(Message::Alert {
            patient_id,
            timestamp,
            state,
        });
    }

    let signal = parse_label(label)?;
    let value = parse_value(data.trim_end_matches('%'))?;
    Ok(Message::Measurement(MeasurementRecord::new(
        patient_id, signal, value, timestamp,
    )))
}

/// Parse a wire line that must carry a measurement
pub fn parse_measurement(line: &str) -> Result<MeasurementRecord, IngestError> {
    match parse_message(line)? {
        Message::Measurement(record) => Ok(record),
        Message::Alert { .. } => Err(IngestError::UnexpectedAlert),
    }
}

/// Encode a measurement as a wire line; saturation carries a `%` suffix
pub fn format_message(record: &MeasurementRecord) -> String {
    let suffix = if record.signal == SignalType::Saturation {
        "%"
    } else {
        ""
    };
    format!(
        "Patient ID: {}, Timestamp: {}, Label: {}, Data: {}{}",
        record.patient_id, record.timestamp, record.signal, record.value, suffix
    )
}

/// Encode a simulated alert transition as a wire line
pub fn format_transition(transition: &Transition) -> String {
    format!(
        "Patient ID: {}, Timestamp: {}, Label: {}, Data: {}",
        transition.entity, transition.timestamp, ALERT_LABEL, transition.to
    )
}
