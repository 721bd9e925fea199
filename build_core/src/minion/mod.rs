//! Minion DPS engine
//!
//! Minions are scaled only by `Minion`-namespace effects ("Minions deal N%
//! increased Damage"). Player damage modifiers never reach them, and minion
//! modifiers never reach the player.

use crate::combat::{crit_chance, crit_multiplier, CritProfile};
use crate::config::{GameConstants, MinionBase, MinionOptions};
use crate::modifier::{Effect, MinionStat, Namespace, Qualifier, Stat};
use crate::stat_block::StatValue;
use crate::types::DamageType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::trace;

/// Minion-namespace accumulators
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MinionModifiers {
    stats: BTreeMap<MinionStat, StatValue>,
    /// Extra maximum minions, by the (lowercase) minion name the modifier names
    counts: BTreeMap<String, f64>,
}

impl MinionModifiers {
    pub fn fold<'a, I>(effects: I) -> Self
    where
        I: IntoIterator<Item = &'a Effect>,
    {
        let mut modifiers = MinionModifiers::default();
        for effect in effects {
            if effect.stat().namespace() != Namespace::Minion {
                continue;
            }
            let Stat::Minion(stat) = effect.stat() else {
                continue;
            };
            match (stat, effect.qualifier()) {
                (MinionStat::Count, Some(Qualifier::Named(name))) => {
                    *modifiers.counts.entry(name.to_lowercase()).or_default() += effect.value();
                }
                _ => modifiers
                    .stats
                    .entry(stat)
                    .or_default()
                    .apply(effect.kind(), effect.value()),
            }
        }
        modifiers
    }

    pub fn stat(&self, stat: MinionStat) -> StatValue {
        self.stats.get(&stat).cloned().unwrap_or_default()
    }

    /// Attack speed including "attack and cast speed" modifiers
    pub fn attack_speed(&self) -> StatValue {
        let mut speed = self.stat(MinionStat::AttackSpeed);
        speed.merge(&self.stat(MinionStat::Speed));
        speed
    }

    /// Extra minions granted for a minion type
    ///
    /// Named counts match when the modifier's name contains the minion's
    /// singular name ("Raised Zombies" covers "Zombie"). Unnamed counts apply
    /// to every minion.
    pub fn extra_count(&self, minion: &str) -> f64 {
        let wanted = singular(&minion.to_lowercase()).to_string();
        let named: f64 = self
            .counts
            .iter()
            .filter(|(name, _)| singular(name).contains(&wanted))
            .map(|(_, value)| value)
            .sum();
        named + self.stat(MinionStat::Count).flat
    }

    pub fn is_empty(&self) -> bool {
        self.stats.is_empty() && self.counts.is_empty()
    }
}

fn singular(name: &str) -> &str {
    name.trim().trim_end_matches('s')
}

/// Base numbers of one minion type before minion modifiers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinionProfile {
    pub name: String,
    pub damage_type: DamageType,
    pub damage_min: f64,
    pub damage_max: f64,
    pub attacks_per_second: f64,
    pub crit_chance: f64,
    pub count: u32,
    pub life: f64,
}

impl MinionProfile {
    /// Minion base from the skill database at a gem level, with option overrides
    pub fn from_base(base: &MinionBase, level: u32, options: &MinionOptions) -> Self {
        let scale = 1.0 + base.damage_per_level / 100.0 * f64::from(level.saturating_sub(1));
        let damage_min = options.damage_min.unwrap_or(base.damage_min * scale).max(0.0);
        let damage_max = options
            .damage_max
            .unwrap_or(base.damage_max * scale)
            .max(damage_min);

        MinionProfile {
            name: base.name.clone(),
            damage_type: base.damage_type,
            damage_min,
            damage_max,
            attacks_per_second: options
                .attacks_per_second
                .filter(|aps| *aps > 0.0)
                .unwrap_or(base.attacks_per_second)
                .max(0.0),
            crit_chance: base.crit_chance,
            count: options.count.unwrap_or(base.count),
            life: base.life,
        }
    }

    pub fn average_damage(&self) -> f64 {
        (self.damage_min + self.damage_max) / 2.0
    }
}

/// Result for a minion type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinionDps {
    pub name: String,
    pub damage_type: DamageType,
    /// Minions alive at once, including extra count modifiers
    pub count: u32,
    pub damage_per_hit: f64,
    pub average_hit: f64,
    pub attacks_per_second: f64,
    pub crit: CritProfile,
    pub life: f64,
    pub dps_per_minion: f64,
    pub total_dps: f64,
}

/// Expected DPS of every minion of a type combined
///
/// Minions are assumed to always hit.
pub fn calculate_minion_dps(
    profile: &MinionProfile,
    modifiers: &MinionModifiers,
    constants: &GameConstants,
) -> MinionDps {
    let damage_per_hit = modifiers
        .stat(MinionStat::Damage)
        .rebased(profile.average_damage())
        .compute()
        .max(0.0);
    let attacks_per_second = modifiers
        .attack_speed()
        .rebased(profile.attacks_per_second)
        .compute()
        .max(0.0);
    let crit = CritProfile {
        chance: crit_chance(
            profile.crit_chance,
            &modifiers.stat(MinionStat::CritChance),
            &constants.crit,
        ),
        multiplier: crit_multiplier(&StatValue::default(), &constants.crit),
    };
    let life = modifiers
        .stat(MinionStat::Life)
        .rebased(profile.life)
        .compute()
        .max(0.0);

    let extra = modifiers.extra_count(&profile.name).max(0.0).floor() as u32;
    let count = profile.count.saturating_add(extra);

    let average_hit = damage_per_hit * crit.average_factor();
    let dps_per_minion = average_hit * attacks_per_second;
    let total_dps = dps_per_minion * f64::from(count);

    trace!(minion = %profile.name, count, dps_per_minion, total_dps, "minion resolved");

    MinionDps {
        name: profile.name.clone(),
        damage_type: profile.damage_type,
        count,
        damage_per_hit,
        average_hit,
        attacks_per_second,
        crit,
        life,
        dps_per_minion,
        total_dps,
    }
}
