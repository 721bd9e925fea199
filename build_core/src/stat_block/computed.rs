//! CharacterStats - final character sheet values derived from aggregated stats

use super::aggregator::AggregatedStats;
use crate::config::GameConstants;
use crate::modifier::Stat;
use crate::types::DamageType;
use serde::{Deserialize, Serialize};

/// Per-type resistance values (physical has none)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Resistances {
    pub fire: f64,
    pub cold: f64,
    pub lightning: f64,
    pub chaos: f64,
}

impl Resistances {
    pub fn get(&self, damage_type: DamageType) -> f64 {
        match damage_type {
            DamageType::Physical => 0.0,
            DamageType::Fire => self.fire,
            DamageType::Cold => self.cold,
            DamageType::Lightning => self.lightning,
            DamageType::Chaos => self.chaos,
        }
    }

    fn from_fn(mut f: impl FnMut(DamageType) -> f64) -> Self {
        Resistances {
            fire: f(DamageType::Fire),
            cold: f(DamageType::Cold),
            lightning: f(DamageType::Lightning),
            chaos: f(DamageType::Chaos),
        }
    }

    /// Average of the three elemental values
    pub fn elemental_average(&self) -> f64 {
        (self.fire + self.cold + self.lightning) / 3.0
    }
}

/// Character sheet values after every source and attribute bonus
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CharacterStats {
    pub strength: f64,
    pub dexterity: f64,
    pub intelligence: f64,
    pub life: f64,
    pub mana: f64,
    pub energy_shield: f64,
    pub spirit: f64,
    pub accuracy: f64,
    pub armour: f64,
    pub evasion: f64,
    /// Percent, capped
    pub block_chance: f64,
    /// Percent of base dodge roll effectiveness (100 = unmodified)
    pub dodge_effectiveness: f64,
    /// Raw resistance totals before capping
    pub resistances: Resistances,
    /// Maximum resistances after modifiers and the hard cap
    pub max_resistances: Resistances,
}

impl CharacterStats {
    /// Resolve the character sheet from aggregated player stats
    pub fn compute(stats: &AggregatedStats, constants: &GameConstants) -> Self {
        let c = &constants.character;
        let strength = stats.stat(Stat::Strength, &[]).compute();
        let dexterity = stats.stat(Stat::Dexterity, &[]).compute();
        let intelligence = stats.stat(Stat::Intelligence, &[]).compute();

        let with_bonus = |stat: Stat, bonus: f64| {
            let mut value = stats.stat(stat, &[]);
            value.flat += bonus;
            value.compute().max(0.0)
        };

        let res = &constants.resistances;
        CharacterStats {
            strength,
            dexterity,
            intelligence,
            life: with_bonus(Stat::Life, strength * c.life_per_strength),
            mana: with_bonus(Stat::Mana, intelligence * c.mana_per_intelligence),
            energy_shield: with_bonus(Stat::EnergyShield, 0.0),
            spirit: with_bonus(Stat::Spirit, 0.0),
            accuracy: with_bonus(Stat::Accuracy, dexterity * c.accuracy_per_dexterity),
            armour: with_bonus(Stat::Armour, 0.0),
            evasion: with_bonus(Stat::Evasion, 0.0),
            block_chance: stats
                .stat(Stat::BlockChance, &[])
                .compute()
                .clamp(0.0, constants.block.cap),
            dodge_effectiveness: stats
                .stat(Stat::DodgeEffectiveness, &[])
                .rebased(100.0)
                .compute(),
            resistances: Resistances::from_fn(|dt| {
                stats.flat(Stat::Resistance(dt), &[]).max(res.min_value)
            }),
            max_resistances: Resistances::from_fn(|dt| {
                (res.default_cap + stats.flat(Stat::MaxResistance(dt), &[])).min(res.hard_cap)
            }),
        }
    }

    /// Resistance after clamping to its maximum
    pub fn capped_resistance(&self, damage_type: DamageType) -> f64 {
        self.resistances
            .get(damage_type)
            .min(self.max_resistances.get(damage_type))
    }

    pub fn capped_resistances(&self) -> Resistances {
        Resistances::from_fn(|dt| self.capped_resistance(dt))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modifier::{Effect, EffectKind};

    fn flat(stat: Stat, value: f64) -> Effect {
        Effect::new(stat, EffectKind::Added, value)
    }

    #[test]
    fn test_attribute_bonuses() {
        let effects = vec![
            Effect::new(Stat::Life, EffectKind::Base, 100.0),
            flat(Stat::Strength, 20.0),
            flat(Stat::AllAttributes, 5.0),
            Effect::new(Stat::Life, EffectKind::Increased, 10.0),
        ];
        let stats = AggregatedStats::fold(&effects);
        let sheet = CharacterStats::compute(&stats, &GameConstants::default());
        assert!((sheet.strength - 25.0).abs() < 1e-9);
        assert!((sheet.dexterity - 5.0).abs() < 1e-9);
        // (100 + 25 × 2) × 1.1
        assert!((sheet.life - 165.0).abs() < 1e-9);
        assert!((sheet.accuracy - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_resistance_caps() {
        let effects = vec![
            flat(Stat::Resistance(DamageType::Fire), 90.0),
            flat(Stat::MaxResistance(DamageType::Fire), 30.0),
            flat(Stat::Resistance(DamageType::Cold), 90.0),
            flat(Stat::Resistance(DamageType::Lightning), -300.0),
        ];
        let stats = AggregatedStats::fold(&effects);
        let sheet = CharacterStats::compute(&stats, &GameConstants::default());
        // 75 + 30 capped at the 90 hard cap
        assert!((sheet.capped_resistance(DamageType::Fire) - 90.0).abs() < 1e-9);
        assert!((sheet.capped_resistance(DamageType::Cold) - 75.0).abs() < 1e-9);
        assert!((sheet.capped_resistance(DamageType::Lightning) + 200.0).abs() < 1e-9);
        assert_eq!(sheet.capped_resistance(DamageType::Physical), 0.0);
    }

    #[test]
    fn test_block_capped() {
        let stats = AggregatedStats::fold(&[flat(Stat::BlockChance, 120.0)]);
        let sheet = CharacterStats::compute(&stats, &GameConstants::default());
        assert!((sheet.block_chance - 75.0).abs() < 1e-9);
        assert!((sheet.dodge_effectiveness - 100.0).abs() < 1e-9);
    }
}
