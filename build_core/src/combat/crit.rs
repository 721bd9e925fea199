//! Critical hits
//!
//! Both chance and bonus follow the same composition as damage: flat values
//! add onto the base, increased sums, more chains.

use crate::config::CritConstants;
use crate::stat_block::StatValue;
use serde::{Deserialize, Serialize};

/// Resolved critical hit numbers for one skill
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CritProfile {
    /// Percent, clamped to the configured bounds
    pub chance: f64,
    /// Total damage of a critical hit in percent (200 = double damage)
    pub multiplier: f64,
}

impl CritProfile {
    pub fn resolve(base_chance: f64, chance: &StatValue, bonus: &StatValue, constants: &CritConstants) -> Self {
        CritProfile {
            chance: crit_chance(base_chance, chance, constants),
            multiplier: crit_multiplier(bonus, constants),
        }
    }

    /// Factor the average hit is multiplied by
    pub fn average_factor(&self) -> f64 {
        1.0 + self.chance / 100.0 * (self.multiplier / 100.0 - 1.0)
    }
}

/// Critical hit chance from a base chance and the accumulated modifiers
pub fn crit_chance(base_chance: f64, modifiers: &StatValue, constants: &CritConstants) -> f64 {
    modifiers
        .rebased(base_chance)
        .compute()
        .max(constants.min_chance)
        .min(constants.max_chance)
}

/// Critical damage multiplier in percent
///
/// `100 + (base_bonus + added) × (1 + increased/100) × more`
pub fn crit_multiplier(bonus: &StatValue, constants: &CritConstants) -> f64 {
    100.0 + bonus.rebased(constants.base_bonus).compute().max(0.0)
}
