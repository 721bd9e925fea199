//! Defensive summary - effective HP and max hit per damage type

use super::armour::{armour_reduction_percent, max_physical_hit};
use super::evasion::{chance_to_evade, evasion_mitigation_factor};
use super::resistance::resistance_mitigation_factor;
use crate::config::GameConstants;
use crate::error::CalcError;
use crate::stat_block::{CharacterStats, Resistances};
use crate::types::{DamageComponents, DamageType};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefenseSummary {
    pub life: f64,
    pub energy_shield: f64,
    pub mana: f64,
    /// Life + energy shield
    pub total_pool: f64,
    pub armour: f64,
    pub evasion: f64,
    pub resistances: Resistances,
    pub capped_resistances: Resistances,
    pub max_resistances: Resistances,
    pub block_chance: f64,
    pub dodge_effectiveness: f64,
    /// Physical reduction against the reference hit, percent
    pub physical_reduction: f64,
    /// Chance to evade the reference enemy's attacks, percent
    pub evade_chance: f64,
    pub effective_hp: f64,
    /// Largest survivable hit of each single damage type
    pub max_hit: DamageComponents,
}

impl DefenseSummary {
    /// Derive the defensive numbers from the character sheet
    ///
    /// `EHP = pool × armour × evasion × elemental`, each factor being
    /// `100 / (100 - mitigation%)`. Resistances are capped before averaging.
    pub fn compute(stats: &CharacterStats, constants: &GameConstants) -> Result<Self, CalcError> {
        let total_pool = stats.life + stats.energy_shield;
        let capped = stats.capped_resistances();

        let physical_reduction = armour_reduction_percent(
            stats.armour,
            constants.armour.reference_hit,
            &constants.armour,
        );
        let evade_chance = chance_to_evade(
            stats.evasion,
            constants.character.enemy_accuracy,
            &constants.hit,
        )?;

        let effective_hp = total_pool
            * resistance_mitigation_factor(physical_reduction)
            * evasion_mitigation_factor(evade_chance)
            * resistance_mitigation_factor(capped.elemental_average());

        let max_hit = DamageComponents::zero().map(|damage_type, _| match damage_type {
            DamageType::Physical => max_physical_hit(total_pool, stats.armour, &constants.armour),
            other => total_pool * resistance_mitigation_factor(capped.get(other)),
        });

        Ok(DefenseSummary {
            life: stats.life,
            energy_shield: stats.energy_shield,
            mana: stats.mana,
            total_pool,
            armour: stats.armour,
            evasion: stats.evasion,
            resistances: stats.resistances,
            capped_resistances: capped,
            max_resistances: stats.max_resistances,
            block_chance: stats.block_chance,
            dodge_effectiveness: stats.dodge_effectiveness,
            physical_reduction,
            evade_chance,
            effective_hp,
            max_hit,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet() -> CharacterStats {
        let mut stats = CharacterStats {
            life: 800.0,
            energy_shield: 200.0,
            ..Default::default()
        };
        stats.max_resistances = Resistances {
            fire: 75.0,
            cold: 75.0,
            lightning: 75.0,
            chaos: 75.0,
        };
        stats
    }

    #[test]
    fn test_bare_pool() {
        let summary = DefenseSummary::compute(&sheet(), &GameConstants::default()).unwrap();
        assert!((summary.total_pool - 1000.0).abs() < f64::EPSILON);
        assert!((summary.effective_hp - 1000.0).abs() < 1e-9);
        assert!((summary.max_hit.physical - 1000.0).abs() < 1e-9);
        assert!((summary.max_hit.fire - 1000.0).abs() < 1e-9);
    }

    #[test]
    fn test_resistances_capped_for_ehp() {
        let mut stats = sheet();
        stats.resistances = Resistances {
            fire: 120.0,
            cold: 75.0,
            lightning: 75.0,
            chaos: -20.0,
        };
        let summary = DefenseSummary::compute(&stats, &GameConstants::default()).unwrap();
        assert!((summary.capped_resistances.fire - 75.0).abs() < f64::EPSILON);
        // average capped elemental resist 75 → ×4
        assert!((summary.effective_hp - 4000.0).abs() < 1e-6);
        assert!((summary.max_hit.cold - 4000.0).abs() < 1e-6);
        // negative chaos resistance shrinks the max hit
        assert!(summary.max_hit.chaos < summary.total_pool);
    }

    #[test]
    fn test_armour_raises_physical_max_hit() {
        let mut stats = sheet();
        stats.armour = 5000.0;
        let summary = DefenseSummary::compute(&stats, &GameConstants::default()).unwrap();
        assert!(summary.physical_reduction > 0.0);
        assert!(summary.max_hit.physical > summary.total_pool);
        assert!(summary.effective_hp > summary.total_pool);
    }
}
