//! Measurement records as they arrive from ingestion.

use serde::{Deserialize, Serialize};

use super::patient::PatientId;

/// Kind of physiological signal a record carries.
///
/// Labels outside the well-known set are kept verbatim in `Other` so that
/// stores can hold them; the default rule set simply never selects them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SignalType {
    SystolicPressure,
    DiastolicPressure,
    Saturation,
    Ecg,
    Other(String),
}

impl SignalType {
    /// The wire label for this signal.
    pub fn label(&self) -> &str {
        match self {
            SignalType::SystolicPressure => "SystolicPressure",
            SignalType::DiastolicPressure => "DiastolicPressure",
            SignalType::Saturation => "Saturation",
            SignalType::Ecg => "ECG",
            SignalType::Other(label) => label,
        }
    }
}

impl std::fmt::Display for SignalType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl From<&str> for SignalType {
    fn from(label: &str) -> Self {
        match label.trim() {
            "SystolicPressure" => SignalType::SystolicPressure,
            "DiastolicPressure" => SignalType::DiastolicPressure,
            "Saturation" => SignalType::Saturation,
            "ECG" => SignalType::Ecg,
            other => SignalType::Other(other.to_string()),
        }
    }
}

impl From<String> for SignalType {
    fn from(label: String) -> Self {
        SignalType::from(label.as_str())
    }
}

impl From<SignalType> for String {
    fn from(signal: SignalType) -> Self {
        signal.label().to_string()
    }
}

/// A single timestamped measurement for one patient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementRecord {
    pub patient_id: PatientId,
    pub signal: SignalType,
    pub value: f64,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
}

impl MeasurementRecord {
    pub fn new(patient_id: PatientId, signal: SignalType, value: f64, timestamp: i64) -> Self {
        Self {
            patient_id,
            signal,
            value,
            timestamp,
        }
    }
}
