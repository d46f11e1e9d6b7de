//! Fixed-bound threshold checks.

use serde::{Deserialize, Serialize};

use crate::models::MeasurementRecord;

/// Acceptable value interval. An absent bound is unbounded on that side.
///
/// A value violates the interval only when it lies strictly outside it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lower: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upper: Option<f64>,
}

impl Bounds {
    pub fn between(lower: f64, upper: f64) -> Self {
        Self {
            lower: Some(lower),
            upper: Some(upper),
        }
    }

    pub fn below(lower: f64) -> Self {
        Self {
            lower: Some(lower),
            upper: None,
        }
    }

    pub fn above(upper: f64) -> Self {
        Self {
            lower: None,
            upper: Some(upper),
        }
    }

    pub fn is_violated_by(&self, value: f64) -> bool {
        self.lower.is_some_and(|lower| value < lower)
            || self.upper.is_some_and(|upper| value > upper)
    }
}

/// Every record outside `bounds`, in iteration order.
pub fn every_violation<'a>(
    records: &[&'a MeasurementRecord],
    bounds: &Bounds,
) -> Vec<&'a MeasurementRecord> {
    records
        .iter()
        .copied()
        .filter(|r| bounds.is_violated_by(r.value))
        .collect()
}

/// The first record outside `bounds` in iteration order; scanning stops there.
pub fn first_violation<'a>(
    records: &[&'a MeasurementRecord],
    bounds: &Bounds,
) -> Option<&'a MeasurementRecord> {
    records
        .iter()
        .copied()
        .find(|r| bounds.is_violated_by(r.value))
}
