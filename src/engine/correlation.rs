//! Cross-signal correlation: two independent existence tests, ANDed.

use crate::models::MeasurementRecord;

use super::threshold::Bounds;

/// Whether any record in `window` violates `bounds`. Empty windows never match.
pub fn any_violation(window: &[&MeasurementRecord], bounds: &Bounds) -> bool {
    window.iter().any(|r| bounds.is_violated_by(r.value))
}

/// Whether both legs hold at the same time.
///
/// Each leg is tested over its own window with its own bounds; the windows
/// may have different look-backs and need not overlap in time.
pub fn both_legs_hold(
    primary: &[&MeasurementRecord],
    primary_bounds: &Bounds,
    secondary: &[&MeasurementRecord],
    secondary_bounds: &Bounds,
) -> bool {
    any_violation(primary, primary_bounds) && any_violation(secondary, secondary_bounds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SignalType;

    fn one(signal: SignalType, value: f64) -> MeasurementRecord {
        MeasurementRecord::new(1, signal, value, 0)
    }

    #[test]
    fn test_both_low_holds() {
        let pressure = one(SignalType::SystolicPressure, 89.0);
        let saturation = one(SignalType::Saturation, 91.0);

        assert!(both_legs_hold(
            &[&pressure],
            &Bounds::below(90.0),
            &[&saturation],
            &Bounds::below(92.0),
        ));
    }

    #[test]
    fn test_one_leg_normal_does_not_hold() {
        let pressure = one(SignalType::SystolicPressure, 95.0);
        let saturation = one(SignalType::Saturation, 91.0);

        assert!(!both_legs_hold(
            &[&pressure],
            &Bounds::below(90.0),
            &[&saturation],
            &Bounds::below(92.0),
        ));
    }

    #[test]
    fn test_empty_leg_never_holds() {
        let pressure = one(SignalType::SystolicPressure, 80.0);
        assert!(!both_legs_hold(
            &[&pressure],
            &Bounds::below(90.0),
            &[],
            &Bounds::below(92.0),
        ));
        assert!(!any_violation(&[], &Bounds::below(92.0)));
    }

    #[test]
    fn test_any_record_in_leg_is_enough() {
        let normal = one(SignalType::Saturation, 98.0);
        let low = one(SignalType::Saturation, 90.0);
        assert!(any_violation(&[&normal, &low], &Bounds::below(92.0)));
    }
}
