//! Armour - Physical damage reduction with diminishing returns
//!
//! `Reduction = Armour / (Armour + CONSTANT × Damage)`, capped at the
//! configured maximum. Armour is strong against many small hits and weak
//! against a single large one.

use crate::config::ArmourConstants;

/// Physical reduction in percent against a hit of `damage`
pub fn armour_reduction_percent(armour: f64, damage: f64, constants: &ArmourConstants) -> f64 {
    if armour <= 0.0 {
        return 0.0;
    }
    if damage <= 0.0 {
        return constants.max_reduction;
    }

    let reduction = armour / (armour + constants.damage_constant * damage) * 100.0;
    reduction.clamp(0.0, constants.max_reduction)
}

/// Damage left after armour
pub fn damage_after_armour(armour: f64, damage: f64, constants: &ArmourConstants) -> f64 {
    if damage <= 0.0 {
        return 0.0;
    }
    damage * (1.0 - armour_reduction_percent(armour, damage, constants) / 100.0)
}

/// Largest physical hit that leaves `pool` damage after armour
///
/// Solves `H × (1 - A / (A + kH)) = pool` for H; the solution is exact, not
/// an approximation at a reference hit. Falls back to the capped reduction
/// when the uncapped solution would reduce more than the cap allows.
pub fn max_physical_hit(pool: f64, armour: f64, constants: &ArmourConstants) -> f64 {
    if pool <= 0.0 {
        return 0.0;
    }
    let capped = pool / (1.0 - constants.max_reduction / 100.0);
    if armour <= 0.0 {
        return pool;
    }
    let k = constants.damage_constant;
    if k <= 0.0 {
        return capped;
    }

    // k·H² - pool·k·H - pool·A = 0
    let uncapped = (pool * k + (pool * pool * k * k + 4.0 * k * pool * armour).sqrt()) / (2.0 * k);
    let reduction = armour / (armour + k * uncapped) * 100.0;
    if reduction > constants.max_reduction {
        capped
    } else {
        uncapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constants() -> ArmourConstants {
        ArmourConstants::default()
    }

    #[test]
    fn test_no_armour() {
        assert_eq!(armour_reduction_percent(0.0, 100.0, &constants()), 0.0);
        assert!((damage_after_armour(0.0, 100.0, &constants()) - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_reduction_formula() {
        // 1000 / (1000 + 10 × 100) = 50%
        let reduction = armour_reduction_percent(1000.0, 100.0, &constants());
        assert!((reduction - 50.0).abs() < 1e-9);
        assert!((damage_after_armour(1000.0, 100.0, &constants()) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_reduction_capped() {
        let reduction = armour_reduction_percent(1_000_000.0, 10.0, &constants());
        assert!((reduction - 90.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_max_hit_is_exact() {
        let pool = 1000.0;
        let armour = 5000.0;
        let hit = max_physical_hit(pool, armour, &constants());
        let taken = damage_after_armour(armour, hit, &constants());
        assert!((taken - pool).abs() < 1e-6);
    }

    #[test]
    fn test_max_hit_capped() {
        let hit = max_physical_hit(100.0, 1_000_000.0, &constants());
        assert!((hit - 1000.0).abs() < 1e-6);
        assert!((max_physical_hit(100.0, 0.0, &constants()) - 100.0).abs() < f64::EPSILON);
    }
}
