//! Inter-record interval regularity for rhythm signals.

use crate::models::MeasurementRecord;

/// Mean gap between consecutive records of an oldest-first run.
///
/// `None` for fewer than two records.
pub fn mean_interval(records: &[&MeasurementRecord]) -> Option<f64> {
    if records.len() < 2 {
        return None;
    }

    let total: f64 = records.windows(2).map(|pair| gap(pair[0], pair[1])).sum();

    Some(total / (records.len() - 1) as f64)
}

/// Signed gap between two records, in f64 so that distant timestamps cannot
/// overflow
fn gap(earlier: &MeasurementRecord, later: &MeasurementRecord) -> f64 {
    later.timestamp as f64 - earlier.timestamp as f64
}

/// The first record whose gap from its predecessor deviates from the mean gap
/// by more than `tolerance * mean`. Scanning stops at that record.
pub fn first_irregular_interval<'a>(
    records: &[&'a MeasurementRecord],
    tolerance: f64,
) -> Option<&'a MeasurementRecord> {
    let mean = mean_interval(records)?;
    let allowed = mean * tolerance;

    records
        .windows(2)
        .find(|pair| (gap(pair[0], pair[1]).abs() - mean).abs() > allowed)
        .map(|pair| pair[1])
}
