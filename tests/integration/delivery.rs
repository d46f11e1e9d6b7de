//! Delivery isolation and middleware through the evaluator

use std::sync::Arc;

use vitalwatch::emit::{
    CollectingEmitter, DeliveryConfig, EmissionError, Emitter, FanOut, Pipeline, Priority,
};
use vitalwatch::engine::{default_rules, Evaluator};
use vitalwatch::models::{AlertEvent, MeasurementRecord, Patient, SignalType};
use vitalwatch::store::InMemoryStore;

use super::helpers::RefusingEmitter;

const NOW: i64 = 1_000_000_000;

fn critical_store() -> InMemoryStore {
    InMemoryStore::from_records([
        MeasurementRecord::new(1, SignalType::SystolicPressure, 200.0, NOW - 1_000),
        MeasurementRecord::new(1, SignalType::Ecg, 42.0, NOW),
    ])
}

#[test]
fn test_failing_channel_does_not_block_others() {
    let collector = Arc::new(CollectingEmitter::new());
    let channels = FanOut::new()
        .with(RefusingEmitter)
        .with(Arc::clone(&collector));
    let evaluator = Evaluator::new(critical_store(), channels, default_rules());

    let report = evaluator.evaluate(&Patient::new(1), NOW).unwrap();

    // The fan-out reports the pager failure for every alert
    assert_eq!(report.emission_failures, 2);
    assert_eq!(report.alerts_emitted, 0);
    // but the collector still received both
    assert_eq!(collector.alerts().len(), 2);
}

#[test]
fn test_repeat_and_priority_from_config() {
    let collector = Arc::new(CollectingEmitter::new());
    let delivery = DeliveryConfig {
        priority_conditions: vec!["heart rate".to_string()],
        repeat: 2,
    };
    let evaluator = Evaluator::new(
        critical_store(),
        delivery.pipeline(Arc::clone(&collector)),
        default_rules(),
    );

    let report = evaluator.evaluate(&Patient::new(1), NOW).unwrap();
    assert_eq!(report.alerts_emitted, 2);
    assert_eq!(collector.count_condition("Critical Systolic Pressure"), 3);
    assert_eq!(collector.count_condition("[PRIORITY] Abnormal Heart Rate"), 3);
}

#[test]
fn test_custom_closure_layer() {
    let collector = Arc::new(CollectingEmitter::new());
    let pipeline = Pipeline::new(Arc::clone(&collector))
        .layer(
            |alert: &AlertEvent, next: &dyn Emitter| -> Result<(), EmissionError> {
                let shifted =
                    AlertEvent::new(alert.patient_id, alert.condition.clone(), alert.timestamp + 1);
                next.emit(&shifted)
            },
        )
        .layer(Priority::new(["pressure"]));

    pipeline
        .emit(&AlertEvent::new(1, "Critical Systolic Pressure", 10))
        .unwrap();
    assert_eq!(
        collector.alerts(),
        vec![AlertEvent::new(1, "[PRIORITY] Critical Systolic Pressure", 11)]
    );
}
