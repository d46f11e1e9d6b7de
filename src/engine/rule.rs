//! Tagged rule configuration and the shared rule evaluator.
//!
//! Every clinical condition is a [`Rule`]: a signal, a look-back window and a
//! [`Check`] that says which evaluator runs over that window. Rules are plain
//! data so that several rule sets (for example per-ward policies) can exist
//! side by side.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::models::constants::{bounds, ECG_WINDOW_MS, PRESSURE_WINDOW_MS};
use crate::models::constants::{SATURATION_PERCENT_DROP_WINDOW_MS, SATURATION_WINDOW_MS};
use crate::models::{AlertEvent, MeasurementRecord, PatientId, SignalType};

use super::threshold::Bounds;
use super::window::{self, SortOrder, TimeRange};
use super::{correlation, decline, rhythm, threshold, trend};

/// Second signal of a correlation rule, windowed independently of the first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelatedLeg {
    pub signal: SignalType,
    pub window_ms: i64,
    pub bounds: Bounds,
}

/// Which evaluation runs over a rule's window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Check {
    /// One alert per record outside `bounds`, at the record's timestamp
    RangeBreach { bounds: Bounds },
    /// One alert for the newest record outside `bounds`, then stop
    FirstBreach { bounds: Bounds },
    /// One alert per direction whose every step changes by at least `min_delta`
    Trend { min_delta: f64 },
    /// One alert at the first consecutive fall of at least `min_points`
    AbsoluteDrop { min_points: f64 },
    /// One alert at the first consecutive fall of at least `min_percent` percent
    PercentDrop { min_percent: f64 },
    /// One alert at the first gap deviating from the mean gap by more than
    /// `tolerance` (a fraction of the mean)
    IntervalIrregularity { tolerance: f64 },
    /// One alert, at evaluation time, when this rule's window and `with` both
    /// contain a record outside their bounds
    Correlation { bounds: Bounds, with: CorrelatedLeg },
}

impl Check {
    /// Ordering the check reads its window in
    pub fn order(&self) -> SortOrder {
        match self {
            Check::RangeBreach { .. } | Check::FirstBreach { .. } => SortOrder::Descending,
            _ => SortOrder::Ascending,
        }
    }
}

fn enabled_by_default() -> bool {
    true
}

/// A named clinical alert rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    /// Unique identifier, e.g. "systolic-critical"
    pub name: String,
    /// Condition text carried by emitted alerts
    pub condition: String,
    pub signal: SignalType,
    /// Look-back from evaluation time, in milliseconds
    pub window_ms: i64,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    pub check: Check,
}

impl Rule {
    pub fn new(
        name: impl Into<String>,
        condition: impl Into<String>,
        signal: SignalType,
        window_ms: i64,
        check: Check,
    ) -> Self {
        Self {
            name: name.into(),
            condition: condition.into(),
            signal,
            window_ms,
            enabled: true,
            check,
        }
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Longest look-back this rule reads, across both legs for correlations
    pub fn lookback_ms(&self) -> i64 {
        match &self.check {
            Check::Correlation { with, .. } => self.window_ms.max(with.window_ms),
            _ => self.window_ms,
        }
    }

    /// Evaluate this rule over `records` (which must cover its look-back).
    ///
    /// Pure: returns the alerts to emit and never touches a sink.
    pub fn evaluate(
        &self,
        patient_id: PatientId,
        records: &[MeasurementRecord],
        now: i64,
    ) -> Vec<AlertEvent> {
        let range = TimeRange::lookback(now, self.window_ms);
        let records_in_window = window::extract(records, range, &self.signal, self.check.order());
        let alert = |timestamp: i64| AlertEvent::new(patient_id, self.condition.clone(), timestamp);

        match &self.check {
            Check::RangeBreach { bounds } => threshold::every_violation(&records_in_window, bounds)
                .into_iter()
                .map(|r| alert(r.timestamp))
                .collect(),
            Check::FirstBreach { bounds } => threshold::first_violation(&records_in_window, bounds)
                .map(|r| alert(r.timestamp))
                .into_iter()
                .collect(),
            Check::Trend { min_delta } => trend::scan(&records_in_window, *min_delta)
                .map(|scan| {
                    scan.directions()
                        .into_iter()
                        .map(|direction| {
                            AlertEvent::new(
                                patient_id,
                                format!("{} {}", self.condition, direction),
                                scan.latest_timestamp,
                            )
                        })
                        .collect()
                })
                .unwrap_or_default(),
            Check::AbsoluteDrop { min_points } => {
                decline::first_absolute_drop(&records_in_window, *min_points)
                    .map(|r| alert(r.timestamp))
                    .into_iter()
                    .collect()
            }
            Check::PercentDrop { min_percent } => {
                decline::first_percent_drop(&records_in_window, *min_percent)
                    .map(|r| alert(r.timestamp))
                    .into_iter()
                    .collect()
            }
            Check::IntervalIrregularity { tolerance } => {
                rhythm::first_irregular_interval(&records_in_window, *tolerance)
                    .map(|r| alert(r.timestamp))
                    .into_iter()
                    .collect()
            }
            Check::Correlation { bounds, with } => {
                let other = window::extract(
                    records,
                    TimeRange::lookback(now, with.window_ms),
                    &with.signal,
                    SortOrder::Ascending,
                );
                if correlation::both_legs_hold(&records_in_window, bounds, &other, &with.bounds) {
                    vec![alert(now)]
                } else {
                    Vec::new()
                }
            }
        }
    }

    /// Reject configurations no evaluator can make sense of
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            bail!("Rule name must not be empty");
        }
        if self.condition.trim().is_empty() {
            bail!("Rule '{}' has an empty condition", self.name);
        }
        if self.window_ms < 0 {
            bail!("Rule '{}' has a negative window: {}", self.name, self.window_ms);
        }

        match &self.check {
            Check::RangeBreach { bounds } | Check::FirstBreach { bounds } => {
                validate_bounds(&self.name, bounds)?;
                if bounds.lower.is_none() && bounds.upper.is_none() {
                    bail!("Rule '{}' has no bounds and can never fire", self.name);
                }
            }
            Check::Trend { min_delta } => {
                validate_non_negative(&self.name, "min_delta", *min_delta)?
            }
            Check::AbsoluteDrop { min_points } => {
                validate_non_negative(&self.name, "min_points", *min_points)?
            }
            Check::PercentDrop { min_percent } => {
                validate_non_negative(&self.name, "min_percent", *min_percent)?
            }
            Check::IntervalIrregularity { tolerance } => {
                validate_non_negative(&self.name, "tolerance", *tolerance)?
            }
            Check::Correlation { bounds, with } => {
                validate_bounds(&self.name, bounds)?;
                validate_bounds(&self.name, &with.bounds)?;
                if with.window_ms < 0 {
                    bail!(
                        "Rule '{}' has a negative correlated window: {}",
                        self.name,
                        with.window_ms
                    );
                }
            }
        }

        Ok(())
    }
}

fn validate_bounds(rule: &str, bounds: &Bounds) -> Result<()> {
    for value in [bounds.lower, bounds.upper].into_iter().flatten() {
        if !value.is_finite() {
            bail!("Rule '{rule}' has a non-finite bound: {value}");
        }
    }
    if let (Some(lower), Some(upper)) = (bounds.lower, bounds.upper) {
        if lower > upper {
            bail!("Rule '{rule}' has lower bound {lower} above upper bound {upper}");
        }
    }
    Ok(())
}

fn validate_non_negative(rule: &str, field: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        bail!("Rule '{rule}' needs a finite, non-negative {field}, got {value}");
    }
    Ok(())
}

/// The standard adult monitoring rule set.
///
/// The percentage-based saturation drop ships disabled; enable it in place of
/// (or next to) the absolute drop where that definition is preferred.
pub fn default_rules() -> Vec<Rule> {
    vec![
        Rule::new(
            "systolic-critical",
            "Critical Systolic Pressure",
            SignalType::SystolicPressure,
            PRESSURE_WINDOW_MS,
            Check::RangeBreach {
                bounds: Bounds::between(bounds::SYSTOLIC_LOW, bounds::SYSTOLIC_HIGH),
            },
        ),
        Rule::new(
            "diastolic-critical",
            "Critical Diastolic Pressure",
            SignalType::DiastolicPressure,
            PRESSURE_WINDOW_MS,
            Check::RangeBreach {
                bounds: Bounds::between(bounds::DIASTOLIC_LOW, bounds::DIASTOLIC_HIGH),
            },
        ),
        Rule::new(
            "systolic-trend",
            "Systolic Pressure",
            SignalType::SystolicPressure,
            PRESSURE_WINDOW_MS,
            Check::Trend {
                min_delta: bounds::PRESSURE_TREND_DELTA,
            },
        ),
        Rule::new(
            "diastolic-trend",
            "Diastolic Pressure",
            SignalType::DiastolicPressure,
            PRESSURE_WINDOW_MS,
            Check::Trend {
                min_delta: bounds::PRESSURE_TREND_DELTA,
            },
        ),
        Rule::new(
            "low-saturation",
            "Low Saturation",
            SignalType::Saturation,
            SATURATION_WINDOW_MS,
            Check::FirstBreach {
                bounds: Bounds::below(bounds::SATURATION_LOW),
            },
        ),
        Rule::new(
            "saturation-rapid-drop",
            "Rapid Drop In Blood Oxygen",
            SignalType::Saturation,
            SATURATION_WINDOW_MS,
            Check::AbsoluteDrop {
                min_points: bounds::SATURATION_DROP_POINTS,
            },
        ),
        Rule::new(
            "saturation-rapid-drop-percent",
            "Rapid Percentage Drop In Blood Oxygen",
            SignalType::Saturation,
            SATURATION_PERCENT_DROP_WINDOW_MS,
            Check::PercentDrop {
                min_percent: bounds::SATURATION_DROP_PERCENT,
            },
        )
        .disabled(),
        Rule::new(
            "abnormal-heart-rate",
            "Abnormal Heart Rate",
            SignalType::Ecg,
            ECG_WINDOW_MS,
            Check::RangeBreach {
                bounds: Bounds::below(bounds::HEART_RATE_LOW),
            },
        ),
        Rule::new(
            "irregular-beat",
            "Irregular Beat",
            SignalType::Ecg,
            ECG_WINDOW_MS,
            Check::IntervalIrregularity {
                tolerance: bounds::INTERVAL_TOLERANCE,
            },
        ),
        Rule::new(
            "hypotensive-hypoxemia",
            "Hypotensive Hypoxemia",
            SignalType::SystolicPressure,
            PRESSURE_WINDOW_MS,
            Check::Correlation {
                bounds: Bounds::below(bounds::SYSTOLIC_LOW),
                with: CorrelatedLeg {
                    signal: SignalType::Saturation,
                    window_ms: SATURATION_WINDOW_MS,
                    bounds: Bounds::below(bounds::SATURATION_LOW),
                },
            },
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000_000;

    fn rule_named(name: &str) -> Rule {
        default_rules()
            .into_iter()
            .find(|r| r.name == name)
            .unwrap()
    }

    #[test]
    fn test_default_rule_names_are_unique() {
        let rules = default_rules();
        let mut names: Vec<&str> = rules.iter().map(|r| r.name.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), rules.len());
    }

    #[test]
    fn test_default_rules_validate() {
        for rule in default_rules() {
            rule.validate().unwrap();
        }
    }

    #[test]
    fn test_only_percent_drop_disabled_by_default() {
        let disabled: Vec<String> = default_rules()
            .into_iter()
            .filter(|r| !r.enabled)
            .map(|r| r.name)
            .collect();
        assert_eq!(disabled, vec!["saturation-rapid-drop-percent".to_string()]);
    }

    #[test]
    fn test_range_breach_ignores_records_outside_window() {
        let rule = rule_named("systolic-critical");
        let records = vec![
            MeasurementRecord::new(1, SignalType::SystolicPressure, 200.0, NOW - 2 * PRESSURE_WINDOW_MS),
            MeasurementRecord::new(1, SignalType::SystolicPressure, 200.0, NOW + 1),
        ];
        assert!(rule.evaluate(1, &records, NOW).is_empty());
    }

    #[test]
    fn test_first_breach_reports_newest_violation() {
        let rule = rule_named("low-saturation");
        let records = vec![
            MeasurementRecord::new(1, SignalType::Saturation, 88.0, NOW - 2_000),
            MeasurementRecord::new(1, SignalType::Saturation, 90.0, NOW - 1_000),
            MeasurementRecord::new(1, SignalType::Saturation, 97.0, NOW),
        ];

        let alerts = rule.evaluate(1, &records, NOW);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].timestamp, NOW - 1_000);
        assert_eq!(alerts[0].condition, "Low Saturation");
    }

    #[test]
    fn test_trend_alert_uses_newest_timestamp_and_direction() {
        let rule = rule_named("diastolic-trend");
        let records = vec![
            MeasurementRecord::new(1, SignalType::DiastolicPressure, 100.0, NOW - 3_000),
            MeasurementRecord::new(1, SignalType::DiastolicPressure, 80.0, NOW - 1_000),
            MeasurementRecord::new(1, SignalType::DiastolicPressure, 90.0, NOW - 2_000),
        ];

        let alerts = rule.evaluate(4, &records, NOW);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].condition, "Diastolic Pressure Decreasing Trend");
        assert_eq!(alerts[0].timestamp, NOW - 1_000);
        assert_eq!(alerts[0].patient_id, 4);
    }

    #[test]
    fn test_correlation_alert_at_evaluation_time() {
        let rule = rule_named("hypotensive-hypoxemia");
        let records = vec![
            MeasurementRecord::new(1, SignalType::SystolicPressure, 89.0, NOW - 5 * 60 * 60 * 1_000),
            MeasurementRecord::new(1, SignalType::Saturation, 91.0, NOW - 60_000),
        ];

        let alerts = rule.evaluate(1, &records, NOW);
        assert_eq!(alerts, vec![AlertEvent::new(1, "Hypotensive Hypoxemia", NOW)]);
    }

    #[test]
    fn test_correlation_legs_use_their_own_windows() {
        let rule = rule_named("hypotensive-hypoxemia");
        // Saturation is low, but older than its ten minute window
        let records = vec![
            MeasurementRecord::new(1, SignalType::SystolicPressure, 89.0, NOW - 60_000),
            MeasurementRecord::new(1, SignalType::Saturation, 91.0, NOW - 11 * 60 * 1_000),
        ];
        assert!(rule.evaluate(1, &records, NOW).is_empty());
    }

    #[test]
    fn test_lookback_covers_both_legs() {
        let mut rule = rule_named("hypotensive-hypoxemia");
        assert_eq!(rule.lookback_ms(), PRESSURE_WINDOW_MS);

        if let Check::Correlation { with, .. } = &mut rule.check {
            with.window_ms = 2 * PRESSURE_WINDOW_MS;
        }
        assert_eq!(rule.lookback_ms(), 2 * PRESSURE_WINDOW_MS);
    }

    #[test]
    fn test_validate_rejects_inverted_bounds() {
        let rule = Rule::new(
            "bad",
            "Bad",
            SignalType::Saturation,
            1_000,
            Check::RangeBreach {
                bounds: Bounds::between(100.0, 90.0),
            },
        );
        let err = rule.validate().unwrap_err();
        assert!(err.to_string().contains("lower bound 100 above upper bound 90"));
    }

    #[test]
    fn test_validate_rejects_unbounded_threshold() {
        let rule = Rule::new(
            "open",
            "Open",
            SignalType::Saturation,
            1_000,
            Check::FirstBreach {
                bounds: Bounds::default(),
            },
        );
        assert!(rule.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_negative_parameters() {
        let rule = Rule::new(
            "trend",
            "Trend",
            SignalType::SystolicPressure,
            1_000,
            Check::Trend { min_delta: -1.0 },
        );
        assert!(rule.validate().is_err());

        let rule = Rule::new(
            "window",
            "Window",
            SignalType::Ecg,
            -1,
            Check::IntervalIrregularity { tolerance: 0.1 },
        );
        assert!(rule.validate().is_err());
    }

    #[test]
    fn test_rule_toml_shape() {
        let rule = rule_named("low-saturation");
        let text = toml::to_string(&rule).unwrap();
        assert!(text.contains("name = \"low-saturation\""));
        assert!(text.contains("signal = \"Saturation\""));
        assert!(text.contains("kind = \"first-breach\""));

        let parsed: Rule = toml::from_str(&text).unwrap();
        assert_eq!(parsed, rule);
    }

    #[test]
    fn test_enabled_defaults_to_true_when_omitted() {
        let text = r#"
name = "custom-hr"
condition = "High Heart Rate"
signal = "ECG"
window_ms = 3600000

[check]
kind = "range-breach"
bounds = { upper = 100.0 }
"#;
        let rule: Rule = toml::from_str(text).unwrap();
        assert!(rule.enabled);
        assert_eq!(
            rule.check,
            Check::RangeBreach {
                bounds: Bounds::above(100.0)
            }
        );
    }
}
