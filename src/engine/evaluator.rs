//! Evaluation pass: one store read, every enabled rule, isolated delivery.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::emit::Emitter;
use crate::models::{AlertEvent, Patient, PatientId};
use crate::store::RecordStore;

use super::error::EvaluationError;
use super::rule::Rule;
use super::window::TimeRange;

/// Outcome of one evaluation pass for one patient
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EvaluationReport {
    pub patient_id: PatientId,
    /// Evaluation time, milliseconds since the epoch
    pub evaluated_at: i64,
    pub rules_evaluated: usize,
    pub alerts_emitted: usize,
    pub emission_failures: usize,
    /// Names of rules that detected at least one condition
    pub fired_rules: Vec<String>,
}

impl EvaluationReport {
    fn new(patient_id: PatientId, evaluated_at: i64) -> Self {
        Self {
            patient_id,
            evaluated_at,
            rules_evaluated: 0,
            alerts_emitted: 0,
            emission_failures: 0,
            fired_rules: Vec::new(),
        }
    }

    /// Conditions detected in this pass, delivered or not
    pub fn detections(&self) -> usize {
        self.alerts_emitted + self.emission_failures
    }
}

/// Runs a rule set against a record store and reports through an emitter.
///
/// Holds no per-patient state, so one evaluator can serve many patients
/// concurrently.
pub struct Evaluator<S, E> {
    store: S,
    emitter: E,
    rules: Vec<Rule>,
}

impl<S: RecordStore, E: Emitter> Evaluator<S, E> {
    pub fn new(store: S, emitter: E, rules: Vec<Rule>) -> Self {
        Self {
            store,
            emitter,
            rules,
        }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn emitter(&self) -> &E {
        &self.emitter
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Evaluate every enabled rule for `patient` as of `now`.
    ///
    /// Reads the store once, covering the longest rule look-back. A failed
    /// read aborts the pass; a failed delivery is logged and counted, and the
    /// remaining alerts and rules still run.
    pub fn evaluate(
        &self,
        patient: &Patient,
        now: i64,
    ) -> Result<EvaluationReport, EvaluationError> {
        if !patient.has_identity() {
            return Err(EvaluationError::InvalidInput(
                "patient has no identity (id 0)".to_string(),
            ));
        }

        let mut report = EvaluationReport::new(patient.id, now);
        let active: Vec<&Rule> = self.rules.iter().filter(|r| r.enabled).collect();
        let Some(lookback) = active.iter().map(|r| r.lookback_ms()).max() else {
            debug!(patient_id = patient.id, "No enabled rules");
            return Ok(report);
        };

        let range = TimeRange::lookback(now, lookback);
        let records = self.store.get_records(patient.id, range.from, range.to)?;
        debug!(
            patient_id = patient.id,
            records = records.len(),
            rules = active.len(),
            "Evaluating patient"
        );

        for rule in active {
            report.rules_evaluated += 1;
            let alerts = rule.evaluate(patient.id, &records, now);
            if alerts.is_empty() {
                continue;
            }

            report.fired_rules.push(rule.name.clone());
            for alert in &alerts {
                self.deliver(rule, alert, &mut report);
            }
        }

        if report.detections() > 0 {
            info!(
                patient_id = patient.id,
                emitted = report.alerts_emitted,
                failed = report.emission_failures,
                "Alert conditions detected"
            );
        }

        Ok(report)
    }

    fn deliver(&self, rule: &Rule, alert: &AlertEvent, report: &mut EvaluationReport) {
        match self.emitter.emit(alert) {
            Ok(()) => report.alerts_emitted += 1,
            Err(e) => {
                warn!(
                    patient_id = alert.patient_id,
                    rule = %rule.name,
                    condition = %alert.condition,
                    error = %e,
                    "Alert delivery failed, continuing"
                );
                report.emission_failures += 1;
            }
        }
    }

    /// Evaluate several patients in parallel on scoped threads.
    ///
    /// Results come back in the order of `patients`; one patient's failure
    /// does not affect the others.
    pub fn evaluate_all(
        &self,
        patients: &[Patient],
        now: i64,
    ) -> Vec<(PatientId, Result<EvaluationReport, EvaluationError>)> {
        if patients.is_empty() {
            return Vec::new();
        }

        let workers = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        let chunk_size = patients.len().div_ceil(workers);

        std::thread::scope(|scope| {
            let handles: Vec<_> = patients
                .chunks(chunk_size)
                .map(|chunk| {
                    let handle = scope.spawn(move || {
                        chunk
                            .iter()
                            .map(|patient| (patient.id, self.evaluate(patient, now)))
                            .collect::<Vec<_>>()
                    });
                    (chunk, handle)
                })
                .collect();

            handles
                .into_iter()
                .flat_map(|(chunk, handle)| match handle.join() {
                    Ok(results) => results,
                    Err(_) => chunk
                        .iter()
                        .map(|patient| {
                            (
                                patient.id,
                                Err(EvaluationError::WorkerPanicked {
                                    patient_id: patient.id,
                                }),
                            )
                        })
                        .collect(),
                })
                .collect()
        })
    }
}
