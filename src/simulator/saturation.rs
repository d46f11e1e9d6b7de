//! Blood oxygen saturation random walk per patient.

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::models::{MeasurementRecord, PatientId, SignalType};

const BASELINE_MIN: i32 = 95;
const BASELINE_MAX: i32 = 100;
const FLOOR: f64 = 90.0;
const CEILING: f64 = 100.0;

/// Saturation generator: each patient starts at a random baseline in
/// [95, 100] and moves by -1, 0 or +1 per reading, clamped to [90, 100].
#[derive(Debug)]
pub struct SaturationGenerator<R = StdRng> {
    rng: R,
    levels: HashMap<PatientId, f64>,
}

impl SaturationGenerator<StdRng> {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl Default for SaturationGenerator<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> SaturationGenerator<R> {
    pub fn with_rng(rng: R) -> Self {
        Self {
            rng,
            levels: HashMap::new(),
        }
    }

    /// Next saturation reading for `patient_id`
    pub fn next_value(&mut self, patient_id: PatientId) -> f64 {
        let current = match self.levels.get(&patient_id) {
            Some(level) => *level,
            None => f64::from(self.rng.gen_range(BASELINE_MIN..=BASELINE_MAX)),
        };
        let step = f64::from(self.rng.gen_range(-1i32..=1));
        let next = (current + step).clamp(FLOOR, CEILING);
        self.levels.insert(patient_id, next);
        next
    }

    /// Next reading as a record stamped `timestamp`
    pub fn next_record(&mut self, patient_id: PatientId, timestamp: i64) -> MeasurementRecord {
        let value = self.next_value(patient_id);
        MeasurementRecord::new(patient_id, SignalType::Saturation, value, timestamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_walk_stays_in_range_with_unit_steps() {
        let mut generator = SaturationGenerator::seeded(99);
        let first = generator.next_value(1);
        assert!((94.0..=100.0).contains(&first));

        let mut previous = first;
        for _ in 0..10_000 {
            let value = generator.next_value(1);
            assert!((FLOOR..=CEILING).contains(&value));
            assert!((value - previous).abs() <= 1.0);
            assert_eq!(value.fract(), 0.0);
            previous = value;
        }
    }

    #[test]
    fn test_seeded_generators_repeat() {
        let mut a = SaturationGenerator::seeded(5);
        let mut b = SaturationGenerator::seeded(5);
        let xs: Vec<f64> = (0..50).map(|_| a.next_value(3)).collect();
        let ys: Vec<f64> = (0..50).map(|_| b.next_value(3)).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn test_next_record() {
        let mut generator = SaturationGenerator::seeded(1);
        let record = generator.next_record(8, 1_000);
        assert_eq!(record.patient_id, 8);
        assert_eq!(record.signal, SignalType::Saturation);
        assert_eq!(record.timestamp, 1_000);
    }
}
