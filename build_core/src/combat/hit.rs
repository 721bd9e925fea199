//! Hit chance - accuracy against evasion
//!
//! Formula: chance = accuracy / (accuracy + (evasion / DIVISOR)^EXPONENT)
//!
//! Examples (divisor 4, exponent 0.9):
//! - any accuracy vs 0 evasion: max chance
//! - 1000 accuracy vs 1000 evasion: ~93%
//! - 100 accuracy vs 10000 evasion: ~9%

use crate::config::HitConstants;
use crate::error::{ensure_finite, CalcError};

/// Chance to hit in percent, clamped to `[min_chance, max_chance]`
///
/// Negative or non-finite inputs are caller errors and are rejected rather
/// than clamped.
pub fn hit_chance(accuracy: f64, evasion: f64, constants: &HitConstants) -> Result<f64, CalcError> {
    let accuracy = ensure_finite("accuracy", accuracy)?;
    let evasion = ensure_finite("evasion", evasion)?;
    if accuracy < 0.0 {
        return Err(CalcError::NegativeAccuracy(accuracy));
    }
    if evasion < 0.0 {
        return Err(CalcError::NegativeEvasion(evasion));
    }

    if evasion == 0.0 {
        return Ok(constants.max_chance);
    }

    let evasion_term = (evasion / constants.evasion_divisor).powf(constants.evasion_exponent);
    let raw = accuracy / (accuracy + evasion_term) * 100.0;
    Ok(raw.max(constants.min_chance).min(constants.max_chance))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn constants() -> HitConstants {
        HitConstants::default()
    }

    #[test]
    fn test_zero_evasion_always_hits() {
        assert!((hit_chance(100.0, 0.0, &constants()).unwrap() - 100.0).abs() < f64::EPSILON);
        assert!((hit_chance(0.0, 0.0, &constants()).unwrap() - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_formula() {
        // (1000 / 4)^0.9 = 250^0.9
        let expected = 1000.0 / (1000.0 + 250f64.powf(0.9)) * 100.0;
        let chance = hit_chance(1000.0, 1000.0, &constants()).unwrap();
        assert!((chance - expected).abs() < 1e-9);
    }

    #[test]
    fn test_floor() {
        let chance = hit_chance(0.0, 5000.0, &constants()).unwrap();
        assert!((chance - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rejects_bad_input() {
        assert_eq!(
            hit_chance(100.0, -1.0, &constants()),
            Err(CalcError::NegativeEvasion(-1.0))
        );
        assert_eq!(
            hit_chance(-3.0, 10.0, &constants()),
            Err(CalcError::NegativeAccuracy(-3.0))
        );
        assert!(hit_chance(f64::NAN, 10.0, &constants()).is_err());
    }

    proptest! {
        #[test]
        fn prop_clamped(accuracy in 0.0f64..100_000.0, evasion in 0.0f64..100_000.0) {
            let chance = hit_chance(accuracy, evasion, &constants()).unwrap();
            prop_assert!((5.0..=100.0).contains(&chance));
        }

        #[test]
        fn prop_monotonic_in_accuracy(
            accuracy in 0.0f64..50_000.0,
            extra in 0.0f64..50_000.0,
            evasion in 0.0f64..50_000.0,
        ) {
            let low = hit_chance(accuracy, evasion, &constants()).unwrap();
            let high = hit_chance(accuracy + extra, evasion, &constants()).unwrap();
            prop_assert!(high >= low - 1e-12);
        }

        #[test]
        fn prop_non_increasing_in_evasion(
            accuracy in 0.0f64..50_000.0,
            evasion in 0.0f64..50_000.0,
            extra in 0.0f64..50_000.0,
        ) {
            let low = hit_chance(accuracy, evasion + extra, &constants()).unwrap();
            let high = hit_chance(accuracy, evasion, &constants()).unwrap();
            prop_assert!(high >= low - 1e-12);
        }
    }
}
