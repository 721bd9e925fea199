//! Evasion - chance to evade incoming attacks
//!
//! The defender side of the same accuracy-versus-evasion formula attacks use,
//! so the evade chance never exceeds `100 - min_chance`.

use crate::combat::hit_chance;
use crate::config::HitConstants;
use crate::error::CalcError;

/// Chance in percent to evade an attacker with `enemy_accuracy`
pub fn chance_to_evade(evasion: f64, enemy_accuracy: f64, constants: &HitConstants) -> Result<f64, CalcError> {
    Ok(100.0 - hit_chance(enemy_accuracy, evasion, constants)?)
}

/// Multiplier evasion applies to the effective pool
pub fn evasion_mitigation_factor(evade_chance: f64) -> f64 {
    if evade_chance >= 100.0 {
        return f64::INFINITY;
    }
    100.0 / (100.0 - evade_chance.max(0.0))
}
