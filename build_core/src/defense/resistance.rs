//! Resistances - percentage mitigation per damage type

/// Resistance that actually applies: raw value clamped to its maximum
pub fn effective_resistance(resistance: f64, max_resistance: f64) -> f64 {
    resistance.min(max_resistance)
}

/// Damage left after a resistance (negative resistance increases damage)
pub fn damage_after_resistance(damage: f64, resistance: f64) -> f64 {
    if damage <= 0.0 {
        return 0.0;
    }
    damage * (1.0 - resistance / 100.0)
}

/// `100 / (100 - resistance)`: how much further a pool stretches
pub fn resistance_mitigation_factor(resistance: f64) -> f64 {
    if resistance >= 100.0 {
        return f64::INFINITY;
    }
    100.0 / (100.0 - resistance)
}
