//! Monotonic trend detection over consecutive same-signal records.

use crate::models::MeasurementRecord;

/// Fewest records a trend verdict can be made from.
pub const MIN_TREND_RECORDS: usize = 3;

/// Direction of a detected trend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendDirection {
    Increasing,
    Decreasing,
}

impl std::fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrendDirection::Increasing => write!(f, "Increasing Trend"),
            TrendDirection::Decreasing => write!(f, "Decreasing Trend"),
        }
    }
}

/// Result of scanning a window for a trend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrendScan {
    /// Every step rose by at least the threshold
    pub increasing: bool,
    /// Every step fell by at least the threshold
    pub decreasing: bool,
    /// Newest timestamp in the window
    pub latest_timestamp: i64,
}

impl TrendScan {
    pub fn directions(&self) -> Vec<TrendDirection> {
        let mut directions = Vec::new();
        if self.increasing {
            directions.push(TrendDirection::Increasing);
        }
        if self.decreasing {
            directions.push(TrendDirection::Decreasing);
        }
        directions
    }
}

/// Scan an oldest-first run of records for a trend.
///
/// Returns `None` when there are fewer than [`MIN_TREND_RECORDS`] records.
/// Both directions are judged independently over the same ordering, so with
/// a positive `min_delta` at most one of them can hold.
pub fn scan(records: &[&MeasurementRecord], min_delta: f64) -> Option<TrendScan> {
    if records.len() < MIN_TREND_RECORDS {
        return None;
    }

    let mut increasing = true;
    let mut decreasing = true;
    for pair in records.windows(2) {
        let delta = pair[1].value - pair[0].value;
        increasing &= delta >= min_delta;
        decreasing &= -delta >= min_delta;
    }

    let latest_timestamp = records.iter().map(|r| r.timestamp).max()?;

    Some(TrendScan {
        increasing,
        decreasing,
        latest_timestamp,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SignalType;

    fn run(values: &[f64]) -> Vec<MeasurementRecord> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| {
                MeasurementRecord::new(1, SignalType::SystolicPressure, *v, 1_000 * i as i64)
            })
            .collect()
    }

    fn scan_values(values: &[f64]) -> Option<TrendScan> {
        let data = run(values);
        let refs: Vec<&MeasurementRecord> = data.iter().collect();
        scan(&refs, 10.0)
    }

    #[test]
    fn test_increasing_run() {
        let result = scan_values(&[120.0, 130.0, 140.0]).unwrap();
        assert!(result.increasing);
        assert!(!result.decreasing);
        assert_eq!(result.latest_timestamp, 2_000);
        assert_eq!(result.directions(), vec![TrendDirection::Increasing]);
    }

    #[test]
    fn test_decreasing_run() {
        let result = scan_values(&[140.0, 130.0, 120.0]).unwrap();
        assert_eq!(result.directions(), vec![TrendDirection::Decreasing]);
    }

    #[test]
    fn test_mixed_run_has_no_direction() {
        let result = scan_values(&[120.0, 135.0, 128.0]).unwrap();
        assert!(result.directions().is_empty());
    }

    #[test]
    fn test_one_short_step_breaks_the_run() {
        let result = scan_values(&[120.0, 130.0, 139.0, 160.0]).unwrap();
        assert!(result.directions().is_empty());
    }

    #[test]
    fn test_short_runs_give_no_verdict() {
        assert!(scan_values(&[]).is_none());
        assert!(scan_values(&[120.0]).is_none());
        assert!(scan_values(&[120.0, 180.0]).is_none());
    }

    #[test]
    fn test_flat_run_with_zero_threshold_holds_both_ways() {
        let data = run(&[100.0, 100.0, 100.0]);
        let refs: Vec<&MeasurementRecord> = data.iter().collect();
        assert_eq!(
            scan(&refs, 0.0).unwrap().directions(),
            vec![TrendDirection::Increasing, TrendDirection::Decreasing]
        );
    }
}
