//! WeaponProfile - the main-hand weapon after its local modifiers

use crate::character::{parse_range, Item};
use crate::modifier::{DamageCategory, Effect, EffectKind, Stat};
use crate::source::{GearSource, StatSource};
use crate::stat_block::AggregatedStats;
use crate::types::{DamageComponents, DamageType, SkillTag, WeaponClass};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Damage property names on weapon items, per channel
const DAMAGE_PROPERTIES: [(DamageType, &str); 5] = [
    (DamageType::Physical, "Physical Damage"),
    (DamageType::Fire, "Fire Damage"),
    (DamageType::Cold, "Cold Damage"),
    (DamageType::Lightning, "Lightning Damage"),
    (DamageType::Chaos, "Chaos Damage"),
];

/// Resolved weapon numbers
///
/// Local modifiers are already applied: local added damage joins the base
/// range and local increased physical damage scales that weapon-owned
/// physical damage only. Global modifiers are never folded in here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponProfile {
    pub name: String,
    pub class: WeaponClass,
    pub damage_min: DamageComponents,
    pub damage_max: DamageComponents,
    pub attacks_per_second: f64,
    /// Base critical hit chance after local modifiers, percent
    pub crit_chance: f64,
    /// Local flat accuracy
    pub accuracy: f64,
    /// Local increased physical damage that was applied, percent
    pub local_increased_physical: f64,
}

impl WeaponProfile {
    pub const UNARMED_MIN: f64 = 2.0;
    pub const UNARMED_MAX: f64 = 6.0;
    pub const UNARMED_APS: f64 = 1.2;
    pub const UNARMED_CRIT: f64 = 5.0;
    /// Base crit for a weapon whose item data lists no critical hit chance
    pub const DEFAULT_CRIT: f64 = 5.0;

    /// Canonical profile used when no weapon is equipped
    pub fn unarmed() -> Self {
        WeaponProfile {
            name: "Unarmed".to_string(),
            class: WeaponClass::Unarmed,
            damage_min: DamageComponents::single(DamageType::Physical, Self::UNARMED_MIN),
            damage_max: DamageComponents::single(DamageType::Physical, Self::UNARMED_MAX),
            attacks_per_second: Self::UNARMED_APS,
            crit_chance: Self::UNARMED_CRIT,
            accuracy: 0.0,
            local_increased_physical: 0.0,
        }
    }

    /// Resolve the main-hand item; empty or non-weapon slots resolve to unarmed
    pub fn resolve(item: Option<&Item>) -> Self {
        let Some(item) = item else {
            debug!("main hand empty, using unarmed profile");
            return Self::unarmed();
        };
        let Some(class) = item.weapon_class() else {
            debug!(item = %item.name, "main hand item is not a weapon, using unarmed profile");
            return Self::unarmed();
        };

        let local: Vec<Effect> = GearSource::new(item)
            .effects()
            .into_iter()
            .filter(Effect::is_local)
            .collect();
        Self::from_parts(item, class, &local)
    }

    fn from_parts(item: &Item, class: WeaponClass, local: &[Effect]) -> Self {
        let mut damage_min = DamageComponents::zero();
        let mut damage_max = DamageComponents::zero();
        for (damage_type, property) in DAMAGE_PROPERTIES {
            let Some(raw) = item.property(property) else {
                continue;
            };
            match parse_range(raw) {
                Some(range) => {
                    damage_min.add(damage_type, range.min);
                    damage_max.add(damage_type, range.max);
                }
                None => debug!(item = %item.name, property, raw, "malformed damage range"),
            }
        }

        let mut increased_physical = 0.0;
        let mut increased_speed = 0.0;
        let mut increased_crit = 0.0;
        let mut flat_crit = 0.0;
        let mut accuracy = 0.0;
        for effect in local {
            match (effect.stat(), effect.kind()) {
                (Stat::Damage(category), EffectKind::Added) => {
                    if let Some(damage_type) = category.damage_type() {
                        let (min, max) = effect.bounds();
                        damage_min.add(damage_type, min);
                        damage_max.add(damage_type, max);
                    }
                }
                (Stat::Damage(DamageCategory::Physical), EffectKind::Increased) => {
                    increased_physical += effect.value();
                }
                (Stat::AttackSpeed, EffectKind::Increased) => increased_speed += effect.value(),
                (Stat::CritChance, EffectKind::Added) => flat_crit += effect.value(),
                (Stat::CritChance, EffectKind::Increased) => increased_crit += effect.value(),
                (Stat::Accuracy, EffectKind::Added) => accuracy += effect.value(),
                _ => {}
            }
        }

        let physical_scale = (1.0 + increased_physical / 100.0).max(0.0);
        damage_min[DamageType::Physical] *= physical_scale;
        damage_max[DamageType::Physical] *= physical_scale;

        let base_aps = item
            .property_number("Attacks per Second")
            .filter(|aps| *aps > 0.0)
            .unwrap_or(Self::UNARMED_APS);
        let base_crit = item
            .property_number("Critical Hit Chance")
            .unwrap_or(Self::DEFAULT_CRIT);

        WeaponProfile {
            name: item.name.clone(),
            class,
            damage_min,
            damage_max,
            attacks_per_second: base_aps * (1.0 + increased_speed / 100.0).max(0.0),
            crit_chance: ((base_crit + flat_crit) * (1.0 + increased_crit / 100.0)).max(0.0),
            accuracy,
            local_increased_physical: increased_physical,
        }
    }

    /// Average damage per channel
    pub fn average(&self) -> DamageComponents {
        self.damage_min.map(|dt, min| (min + self.damage_max[dt]) / 2.0)
    }
}

/// Global added damage for a skill, averaged per channel
///
/// The aggregator keeps raw ranges; this is where they collapse to
/// `(min + max) / 2`.
pub fn resolve_added_damage(stats: &AggregatedStats, tags: &[SkillTag]) -> DamageComponents {
    DamageComponents::zero().map(|dt, _| stats.damage_for(dt, tags).added().average())
}
