//! Alert events produced by rule evaluation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::patient::PatientId;

/// A detected clinical condition for one patient at one point in time.
///
/// Created once per detected condition instance and handed to an emitter;
/// evaluators do not keep them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertEvent {
    pub patient_id: PatientId,
    /// Descriptive condition tag, e.g. "Low Saturation"
    pub condition: String,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
}

impl AlertEvent {
    pub fn new(patient_id: PatientId, condition: impl Into<String>, timestamp: i64) -> Self {
        Self {
            patient_id,
            condition: condition.into(),
            timestamp,
        }
    }

    /// Timestamp as a UTC date, if it is representable
    pub fn occurred_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp)
    }
}

impl std::fmt::Display for AlertEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.occurred_at() {
            Some(at) => write!(
                f,
                "patient {}: {} at {}",
                self.patient_id,
                self.condition,
                at.format("%Y-%m-%d %H:%M:%S%.3f UTC")
            ),
            None => write!(
                f,
                "patient {}: {} at {}ms",
                self.patient_id, self.condition, self.timestamp
            ),
        }
    }
}
