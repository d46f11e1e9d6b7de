//! Rapid-drop detection between consecutive readings.
//!
//! Two definitions coexist and are configured as separate rules: an absolute
//! drop in value points, and a drop relative to the earlier reading.

use crate::models::MeasurementRecord;

/// First consecutive pair (oldest-first) whose value falls by at least
/// `min_points`. Returns the later record of the pair.
pub fn first_absolute_drop<'a>(
    records: &[&'a MeasurementRecord],
    min_points: f64,
) -> Option<&'a MeasurementRecord> {
    records
        .windows(2)
        .find(|pair| pair[0].value - pair[1].value >= min_points)
        .map(|pair| pair[1])
}

/// First consecutive pair (oldest-first) whose value falls by at least
/// `min_percent` percent of the earlier reading. Returns the later record.
///
/// Pairs whose earlier reading is not positive are skipped.
pub fn first_percent_drop<'a>(
    records: &[&'a MeasurementRecord],
    min_percent: f64,
) -> Option<&'a MeasurementRecord> {
    records
        .windows(2)
        .find(|pair| {
            let previous = pair[0].value;
            previous > 0.0 && 100.0 * (previous - pair[1].value) / previous >= min_percent
        })
        .map(|pair| pair[1])
}
