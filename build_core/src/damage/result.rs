//! CalculationResult - engine output and its audit trail

use super::calculation::{ChannelTrace, ResourceEfficiency};
use crate::combat::CritProfile;
use crate::defense::DefenseSummary;
use crate::dot::AilmentDps;
use crate::minion::MinionDps;
use crate::resolve::{SkillProfile, WeaponProfile};
use crate::stat_block::CharacterStats;
use crate::types::DamageComponents;
use serde::{Deserialize, Serialize};

/// Everything one calculation produced
///
/// Built once per call and never updated; recalculating means calling the
/// engine again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    pub character: String,
    pub class: String,
    pub level: u32,
    pub skill: String,
    /// Hit DPS before combo and spirit scaling
    pub total_dps: f64,
    pub combo_dps: f64,
    /// Combo DPS after spirit efficiency
    pub effective_dps: f64,
    pub dps_by_type: DamageComponents,
    /// Average damage per hit, crits included
    pub average_hit: f64,
    pub uses_per_second: f64,
    /// Percent
    pub hit_chance: f64,
    /// Percent
    pub crit_chance: f64,
    /// Percent (200 = double damage)
    pub crit_multiplier: f64,
    pub combo_multiplier: f64,
    pub resources: ResourceEfficiency,
    pub ailments: Vec<AilmentDps>,
    pub ailment_dps: f64,
    pub minion: Option<MinionDps>,
    pub defense: DefenseSummary,
    pub details: CalculationDetails,
}

/// Intermediate values sufficient to retrace the final numbers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationDetails {
    pub weapon: WeaponProfile,
    pub skill: SkillProfile,
    pub character_stats: CharacterStats,
    pub channels: Vec<ChannelTrace>,
    /// Damage per hit before crits, by channel
    pub hit_damage: DamageComponents,
    pub crit: CritProfile,
    pub accuracy: f64,
    pub enemy_evasion: f64,
    pub combo_stacks: u32,
    /// Effects folded from every stat source
    pub effect_count: usize,
}

impl CalculationResult {
    /// Hit, ailment and minion DPS together
    pub fn combined_dps(&self) -> f64 {
        self.effective_dps + self.ailment_dps + self.minion.as_ref().map_or(0.0, |m| m.total_dps)
    }

    pub fn is_finite(&self) -> bool {
        [
            self.total_dps,
            self.combo_dps,
            self.effective_dps,
            self.average_hit,
            self.hit_chance,
            self.crit_chance,
            self.crit_multiplier,
            self.ailment_dps,
            self.defense.effective_hp,
        ]
        .iter()
        .all(|v| v.is_finite())
    }
}
