//! Window extraction: signal-typed, time-bounded, time-sorted record subsets.

use serde::{Deserialize, Serialize};

use crate::models::{MeasurementRecord, PatientId, SignalType};
use crate::store::{RecordStore, RetrievalError};

/// Order in which a window yields its records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    /// Oldest first
    #[default]
    Ascending,
    /// Newest first
    Descending,
}

/// Inclusive time range in milliseconds since the epoch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub from: i64,
    pub to: i64,
}

impl TimeRange {
    pub fn new(from: i64, to: i64) -> Self {
        Self { from, to }
    }

    /// The range `[now - window_ms, now]`.
    pub fn lookback(now: i64, window_ms: i64) -> Self {
        Self {
            from: now.saturating_sub(window_ms.max(0)),
            to: now,
        }
    }

    pub fn contains(&self, timestamp: i64) -> bool {
        timestamp >= self.from && timestamp <= self.to
    }
}

/// Select the records of `signal` inside `range`, sorted by timestamp in `order`.
///
/// Sorting is stable, so records sharing a timestamp keep their input order.
pub fn extract<'a>(
    records: &'a [MeasurementRecord],
    range: TimeRange,
    signal: &SignalType,
    order: SortOrder,
) -> Vec<&'a MeasurementRecord> {
    let mut window: Vec<&MeasurementRecord> = records
        .iter()
        .filter(|r| &r.signal == signal && range.contains(r.timestamp))
        .collect();

    match order {
        SortOrder::Ascending => window.sort_by_key(|r| r.timestamp),
        SortOrder::Descending => window.sort_by(|a, b| b.timestamp.cmp(&a.timestamp)),
    }

    window
}

/// Read one window straight from a store.
///
/// Store failures propagate unchanged so callers can tell an empty window
/// from a failed read.
pub fn fetch<S: RecordStore + ?Sized>(
    store: &S,
    patient_id: PatientId,
    range: TimeRange,
    signal: &SignalType,
    order: SortOrder,
) -> Result<Vec<MeasurementRecord>, RetrievalError> {
    let records = store.get_records(patient_id, range.from, range.to)?;
    Ok(extract(&records, range, signal, order)
        .into_iter()
        .cloned()
        .collect())
}
