//! SkillProfile - the active skill with its level, quality and supports applied

use crate::character::{Character, SkillSetup};
use crate::config::{MinionBase, SkillDatabase, SkillDefinition};
use crate::modifier::{parse_modifiers, DamageCategory, Effect, EffectKind, Stat};
use crate::stat_block::AggregatedStats;
use crate::types::{DamageComponents, DamageType, SkillTag};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Cast time used for spells whose data carries none
pub const DEFAULT_CAST_TIME: f64 = 1.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillProfile {
    pub id: String,
    pub name: String,
    pub tags: Vec<SkillTag>,
    /// Gem level including "+N to Level" bonuses
    pub level: u32,
    pub quality: u32,
    /// Percent of base damage dealt; never negative
    pub damage_effectiveness: f64,
    pub base_damage_min: DamageComponents,
    pub base_damage_max: DamageComponents,
    pub cast_time: Option<f64>,
    pub base_crit_chance: Option<f64>,
    /// Percent of weapon attack speed
    pub attack_speed_multiplier: f64,
    pub mana_cost: f64,
    pub spirit_cost: f64,
    pub combo_cost: u32,
    pub combo_generation: u32,
    /// Product of support cost multipliers, as a factor
    pub cost_multiplier: f64,
    /// Names of supports that resolved
    pub supports: Vec<String>,
    /// Gem modifiers, quality bonus and support effects
    #[serde(skip)]
    pub effects: Vec<Effect>,
    pub minion: Option<MinionBase>,
}

impl SkillProfile {
    /// Canonical basic attack used when no skill data is usable
    pub fn basic_attack() -> Self {
        Self::from_definition(&SkillDefinition::basic_attack(), 1, 0)
    }

    fn from_definition(definition: &SkillDefinition, level: u32, quality: u32) -> Self {
        let levels_above_one = f64::from(level.saturating_sub(1));
        let damage_scale = 1.0 + definition.base_damage_per_level / 100.0 * levels_above_one;

        let mut base_damage_min = DamageComponents::zero();
        let mut base_damage_max = DamageComponents::zero();
        for damage in &definition.base_damages {
            if let Some(range) = damage.range() {
                base_damage_min.add(damage.damage_type, range.min * damage_scale);
                base_damage_max.add(damage.damage_type, range.max * damage_scale);
            }
        }

        let mut effects = definition.effects();
        let quality_bonus = f64::from(quality) * definition.quality_increased_damage;
        if quality_bonus != 0.0 {
            effects.push(
                Effect::new(Stat::Damage(DamageCategory::All), EffectKind::Increased, quality_bonus)
                    .with_source(format!("quality:{}", definition.id)),
            );
        }

        SkillProfile {
            id: definition.id.clone(),
            name: definition.name.clone(),
            tags: definition.tags.clone(),
            level,
            quality,
            damage_effectiveness: (definition.damage_effectiveness
                + definition.effectiveness_per_level * levels_above_one)
                .max(0.0),
            base_damage_min,
            base_damage_max,
            cast_time: definition.cast_time.filter(|t| *t > 0.0),
            base_crit_chance: definition.base_crit_chance,
            attack_speed_multiplier: definition.attack_speed_multiplier.max(0.0),
            mana_cost: definition.mana_cost.max(0.0),
            spirit_cost: definition.spirit_cost.max(0.0),
            combo_cost: definition.combo_cost,
            combo_generation: definition.combo_generation,
            cost_multiplier: 1.0,
            supports: Vec::new(),
            effects,
            minion: definition.minion.clone(),
        }
    }

    /// Resolve a configured skill against the database
    ///
    /// Unknown skills fall back to the basic attack. Skill level bonuses from
    /// `stats` raise the gem level before level scaling is applied.
    pub fn resolve(setup: Option<&SkillSetup>, database: &SkillDatabase, stats: &AggregatedStats) -> Self {
        let Some(setup) = setup else {
            debug!("no skill configured, using basic attack");
            return Self::basic_attack();
        };
        let Some(definition) = database.skill(&setup.name) else {
            debug!(skill = %setup.name, "unknown skill, using basic attack");
            return Self::basic_attack();
        };

        let bonus_levels = stats.flat(Stat::SkillLevel, &definition.tags).max(0.0);
        let level = setup.level.max(1).saturating_add(bonus_levels.floor() as u32);
        let mut profile = Self::from_definition(definition, level, setup.quality);

        // Stat lines reported by the game override the database base damage
        let reported = parse_modifiers(&setup.stats, &format!("skill:{}", definition.id)).effects;
        let (base_lines, extra_lines): (Vec<_>, Vec<_>) =
            reported.into_iter().partition(|e| e.kind() == EffectKind::Base);
        if !base_lines.is_empty() {
            profile.base_damage_min = DamageComponents::zero();
            profile.base_damage_max = DamageComponents::zero();
            for effect in &base_lines {
                if let Some(damage_type) = damage_channel(effect) {
                    let (min, max) = effect.bounds();
                    profile.base_damage_min.add(damage_type, min);
                    profile.base_damage_max.add(damage_type, max);
                }
            }
        }
        profile.effects.extend(extra_lines);

        for gem in &setup.supports {
            match database.support(&gem.name) {
                Some(support) => {
                    profile.effects.extend(support.effects());
                    profile.cost_multiplier *= (support.cost_multiplier / 100.0).max(0.0);
                    profile.spirit_cost += support.spirit_cost;
                    profile.supports.push(support.name.clone());
                }
                None => debug!(support = %gem.name, skill = %definition.name, "unknown support gem, skipping"),
            }
        }
        profile
    }

    pub fn has_tag(&self, tag: SkillTag) -> bool {
        self.tags.contains(&tag)
    }

    pub fn is_attack(&self) -> bool {
        self.has_tag(SkillTag::Attack)
    }

    pub fn is_spell(&self) -> bool {
        self.has_tag(SkillTag::Spell)
    }

    /// Skills that consume combo stacks get the combo multiplier
    pub fn uses_combo(&self) -> bool {
        self.combo_cost > 0
    }

    pub fn base_damage_average(&self) -> DamageComponents {
        self.base_damage_min
            .map(|dt, min| (min + self.base_damage_max[dt]) / 2.0)
    }
}

fn damage_channel(effect: &Effect) -> Option<DamageType> {
    match effect.stat() {
        Stat::Damage(category) => category.damage_type(),
        _ => None,
    }
}

/// Pick the configured skill: the named one if given, else the first
///
/// A selected name that is not in the character's list is still looked up
/// in the database as a bare level 1 gem.
pub fn select_skill(character: &Character, selected: Option<&str>) -> Option<SkillSetup> {
    match selected {
        Some(name) => character
            .skills
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(name.trim()))
            .cloned()
            .or_else(|| Some(SkillSetup::new(name))),
        None => character.skills.first().cloned(),
    }
}

/// Spirit reserved by every persistent skill the character has configured
pub fn reserved_spirit(character: &Character, database: &SkillDatabase) -> f64 {
    character
        .skills
        .iter()
        .filter_map(|setup| {
            let definition = database.skill(&setup.name)?;
            let support_cost: f64 = setup
                .supports
                .iter()
                .filter_map(|gem| database.support(&gem.name))
                .map(|support| support.spirit_cost)
                .sum();
            (definition.spirit_cost > 0.0).then_some(definition.spirit_cost + support_cost)
        })
        .sum()
}
