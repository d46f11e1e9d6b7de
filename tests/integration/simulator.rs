//! Simulators driven through their public API

use rand::rngs::StdRng;
use rand::SeedableRng;

use vitalwatch::simulator::{AlertState, BistableSimulator, SaturationGenerator, SimulatorConfig};

#[test]
fn test_many_entities_track_stationary_fraction() {
    let config = SimulatorConfig {
        lambda: 0.5,
        resolve_probability: 0.6,
    };
    let mut sim = BistableSimulator::with_rng(config, StdRng::seed_from_u64(31));

    let entities = 200u32;
    let steps = 500i64;
    let mut triggered = 0usize;
    for t in 0..steps {
        for entity in 1..=entities {
            sim.step(entity, t);
        }
        if t >= 50 {
            triggered += sim.triggered_count();
        }
    }

    let samples = (steps - 50) as f64 * f64::from(entities);
    let observed = triggered as f64 / samples;
    let expected = config.stationary_triggered_fraction();
    assert!(
        (observed - expected).abs() < 0.02,
        "observed {observed}, expected {expected}"
    );
}

#[test]
fn test_transitions_alternate_per_entity() {
    let mut sim = BistableSimulator::seeded(SimulatorConfig::default(), 8);
    let mut last = [AlertState::Resolved; 4];

    for t in 0..2_000 {
        for entity in 0..4u32 {
            if let Some(transition) = sim.step(entity + 1, t) {
                let slot = &mut last[entity as usize];
                assert_eq!(transition.from, *slot);
                *slot = transition.to;
            }
        }
    }
}

#[test]
fn test_saturation_generator_per_patient_state() {
    let mut generator = SaturationGenerator::with_rng(StdRng::seed_from_u64(4));
    let mut previous = [0.0f64; 3];
    for step in 0..1_000 {
        for patient in 0..3u32 {
            let value = generator.next_value(patient + 1);
            assert!((90.0..=100.0).contains(&value));
            if step > 0 {
                assert!((value - previous[patient as usize]).abs() <= 1.0);
            }
            previous[patient as usize] = value;
        }
    }
}
