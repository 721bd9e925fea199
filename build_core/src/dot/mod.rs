//! Damaging ailment (DoT) engine
//!
//! Ailments take a share of the hit damage as their base and are scaled by
//! their own accumulator namespace. Nothing here reads or writes the player
//! damage buckets.

mod types;

pub use types::{AilmentConfig, DotStacking};

use crate::modifier::{AilmentStat, Effect, Namespace, Stat};
use crate::stat_block::StatValue;
use crate::types::{Ailment, DamageComponents, SkillTag};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::trace;

/// Ailment type registry
#[derive(Debug, Clone, Default)]
pub struct AilmentRegistry {
    configs: BTreeMap<Ailment, AilmentConfig>,
}

impl AilmentRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an ailment type, replacing any previous definition
    pub fn register(&mut self, config: AilmentConfig) {
        self.configs.insert(config.ailment, config);
    }

    pub fn get(&self, ailment: Ailment) -> Option<&AilmentConfig> {
        self.configs.get(&ailment)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AilmentConfig> {
        self.configs.values()
    }

    /// Bleed, ignite and poison from the embedded reference data
    pub fn with_defaults() -> Self {
        let toml = include_str!("../../config/ailments.toml");
        crate::config::parse_ailment_configs(toml).unwrap_or_else(|err| {
            tracing::warn!(%err, "embedded ailment data failed to load");
            Self::new()
        })
    }
}

/// Ailment-namespace accumulators
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AilmentModifiers {
    stats: BTreeMap<AilmentStat, StatValue>,
}

impl AilmentModifiers {
    /// Fold the ailment effects that apply to a skill with `tags`
    pub fn fold<'a, I>(effects: I, tags: &[SkillTag]) -> Self
    where
        I: IntoIterator<Item = &'a Effect>,
    {
        let mut modifiers = AilmentModifiers::default();
        for effect in effects {
            if effect.stat().namespace() != Namespace::Ailment || !effect.applies_to_tags(tags) {
                continue;
            }
            if let Stat::Ailment(stat) = effect.stat() {
                modifiers
                    .stats
                    .entry(stat)
                    .or_default()
                    .apply(effect.kind(), effect.value());
            }
        }
        modifiers
    }

    /// Total added chance to inflict, in percent
    pub fn chance(&self, ailment: Ailment) -> f64 {
        self.stats
            .get(&AilmentStat::Chance(ailment))
            .map_or(0.0, |value| value.flat)
    }

    /// Magnitude plus every damage-over-time modifier that covers the ailment's damage type
    pub fn damage(&self, config: &AilmentConfig) -> StatValue {
        let mut merged = StatValue::default();
        for (stat, value) in &self.stats {
            let applies = match stat {
                AilmentStat::Magnitude(ailment) => *ailment == config.ailment,
                AilmentStat::DamageOverTime(category) => category.applies_to(config.damage_type),
                _ => false,
            };
            if applies {
                merged.merge(value);
            }
        }
        merged
    }

    pub fn duration(&self, ailment: Ailment) -> StatValue {
        self.stats
            .get(&AilmentStat::Duration(ailment))
            .cloned()
            .unwrap_or_default()
    }
}

/// Hit-side inputs an ailment is derived from
#[derive(Debug, Clone, Copy)]
pub struct AilmentInput<'a> {
    /// Average damage per hit, by channel
    pub hit: &'a DamageComponents,
    pub uses_per_second: f64,
    /// Percent
    pub hit_chance: f64,
}

/// Result for one ailment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AilmentDps {
    pub ailment: Ailment,
    /// Chance to inflict on hit, percent
    pub chance: f64,
    /// Damage per second of a single instance
    pub instance_dps: f64,
    pub duration: f64,
    pub applications_per_second: f64,
    /// Average number of simultaneously active instances before stacking rules
    pub concurrent_instances: f64,
    pub dps: f64,
}

/// Expected DPS of one ailment given the hit it rides on
pub fn calculate_ailment_dps(
    config: &AilmentConfig,
    modifiers: &AilmentModifiers,
    input: AilmentInput<'_>,
) -> AilmentDps {
    let chance = (config.base_chance + modifiers.chance(config.ailment)).clamp(0.0, 100.0);

    let base: f64 = config
        .source_types
        .iter()
        .map(|dt| input.hit[*dt] * config.base_damage_percent / 100.0)
        .sum();
    let instance_dps = modifiers.damage(config).rebased(base).compute().max(0.0);
    let duration = modifiers
        .duration(config.ailment)
        .rebased(config.base_duration)
        .compute()
        .max(0.0);

    let applications_per_second =
        input.uses_per_second * (input.hit_chance / 100.0) * (chance / 100.0);
    let concurrent_instances = applications_per_second * duration;
    let dps = instance_dps * config.stacking.effective_instances(concurrent_instances);

    trace!(
        ailment = ?config.ailment,
        base,
        instance_dps,
        applications_per_second,
        dps,
        "ailment resolved"
    );

    AilmentDps {
        ailment: config.ailment,
        chance,
        instance_dps,
        duration,
        applications_per_second,
        concurrent_instances,
        dps,
    }
}
