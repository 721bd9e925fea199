//! Damage calculation - weapon + skill + aggregated stats into DPS
//!
//! Per channel, in this order:
//! 1. base = weapon base (attacks) + skill base + base damage effects
//! 2. with_added = base + averaged added damage
//! 3. scaled = with_added × effectiveness / 100
//! 4. × (1 + Σincreased / 100)
//! 5. × Π(1 + more / 100)
//!
//! Crits fold into the average hit; hit chance, combo and spirit efficiency
//! only ever scale the finished DPS.

use crate::combat::{hit_chance, CritProfile};
use crate::config::{ComboConstants, GameConstants};
use crate::error::CalcError;
use crate::modifier::Stat;
use crate::resolve::{resolve_added_damage, SkillProfile, WeaponProfile, DEFAULT_CAST_TIME};
use crate::stat_block::AggregatedStats;
use crate::types::{DamageComponents, DamageType};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Every intermediate value of one damage channel
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChannelTrace {
    pub damage_type: DamageType,
    pub weapon_base: f64,
    pub skill_base: f64,
    pub base: f64,
    pub added: f64,
    pub with_added: f64,
    pub scaled_by_effectiveness: f64,
    pub increased_multiplier: f64,
    pub more_multiplier: f64,
    /// Damage per hit before critical hits
    pub final_damage: f64,
    /// Low and high end of the per-hit roll, before critical hits
    pub min_damage: f64,
    pub max_damage: f64,
}

/// Inputs of one damage calculation
#[derive(Debug, Clone, Copy)]
pub struct DamageContext<'a> {
    pub weapon: &'a WeaponProfile,
    pub skill: &'a SkillProfile,
    /// Player stats with the skill's own effects folded in
    pub stats: &'a AggregatedStats,
    pub constants: &'a GameConstants,
    pub accuracy: f64,
    pub enemy_evasion: f64,
    /// Combo stacks consumed per use; `None` uses the skill's combo cost
    pub combo_stacks: Option<u32>,
    pub spirit_available: f64,
    pub spirit_reserved: f64,
}

/// Mana and spirit economics of the skill
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceEfficiency {
    /// Mana per use after support multipliers and mana cost modifiers
    pub mana_cost: f64,
    pub mana_per_second: f64,
    /// DPS per mana spent per second; `None` when the skill costs no mana
    pub damage_per_mana: Option<f64>,
    pub spirit_available: f64,
    pub spirit_reserved: f64,
    /// `min(1, available / reserved)`
    pub spirit_efficiency: f64,
}

/// Offensive output of the pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DamageOutcome {
    pub channels: Vec<ChannelTrace>,
    /// Damage per hit before crits, by channel
    pub hit_damage: DamageComponents,
    /// Damage per hit with crits averaged in, by channel
    pub average_hit_by_type: DamageComponents,
    pub average_hit: f64,
    pub uses_per_second: f64,
    /// Percent
    pub hit_chance: f64,
    pub crit: CritProfile,
    pub dps_by_type: DamageComponents,
    pub dps: f64,
    pub combo_stacks: u32,
    pub combo_multiplier: f64,
    pub combo_dps: f64,
    pub effective_dps: f64,
    pub resources: ResourceEfficiency,
}

/// Per-hit damage of every channel, before critical hits
pub fn calculate_hit_damage(
    weapon: &WeaponProfile,
    skill: &SkillProfile,
    stats: &AggregatedStats,
) -> Vec<ChannelTrace> {
    let (weapon_min, weapon_max) = if skill.is_attack() {
        (weapon.damage_min, weapon.damage_max)
    } else {
        (DamageComponents::zero(), DamageComponents::zero())
    };
    let weapon_base = weapon_min.map(|dt, min| (min + weapon_max[dt]) / 2.0);
    let skill_base = skill.base_damage_average();
    let added = resolve_added_damage(stats, &skill.tags);
    let effectiveness = skill.damage_effectiveness / 100.0;

    DamageType::ALL
        .into_iter()
        .map(|damage_type| {
            let modifiers = stats.damage_for(damage_type, &skill.tags);
            let base = weapon_base[damage_type]
                + skill_base[damage_type]
                + modifiers.base().average();
            let with_added = base + added[damage_type];
            let scaled_by_effectiveness = with_added * effectiveness;
            let increased_multiplier = modifiers.increased_multiplier();
            let more_multiplier = modifiers.more_multiplier();
            let scale = effectiveness * increased_multiplier * more_multiplier;
            let final_damage =
                (scaled_by_effectiveness * increased_multiplier * more_multiplier).max(0.0);

            let base_range = modifiers.base();
            let added_range = modifiers.added();
            let low = weapon_min[damage_type]
                + skill.base_damage_min[damage_type]
                + base_range.min
                + added_range.min;
            let high = weapon_max[damage_type]
                + skill.base_damage_max[damage_type]
                + base_range.max
                + added_range.max;

            trace!(
                ?damage_type,
                base,
                with_added,
                scaled_by_effectiveness,
                increased_multiplier,
                more_multiplier,
                final_damage,
                "channel resolved"
            );

            ChannelTrace {
                damage_type,
                weapon_base: weapon_base[damage_type],
                skill_base: skill_base[damage_type],
                base,
                added: added[damage_type],
                with_added,
                scaled_by_effectiveness,
                increased_multiplier,
                more_multiplier,
                final_damage,
                min_damage: (low * scale).max(0.0),
                max_damage: (high * scale).max(0.0),
            }
        })
        .collect()
}

/// Attacks or casts per second
///
/// Skills that are neither attacks nor spells are never used directly and
/// resolve to zero.
pub fn uses_per_second(weapon: &WeaponProfile, skill: &SkillProfile, stats: &AggregatedStats) -> f64 {
    if skill.is_attack() {
        let speed = stats.stat(Stat::AttackSpeed, &skill.tags).rebased(1.0).compute();
        weapon.attacks_per_second * skill.attack_speed_multiplier / 100.0 * speed
    } else if skill.is_spell() {
        let speed = stats.stat(Stat::CastSpeed, &skill.tags).rebased(1.0).compute();
        speed / skill.cast_time.unwrap_or(DEFAULT_CAST_TIME)
    } else {
        0.0
    }
}

/// Base critical hit chance: the weapon's for attacks, the gem's otherwise
pub fn base_crit_chance(weapon: &WeaponProfile, skill: &SkillProfile) -> f64 {
    if skill.is_attack() {
        weapon.crit_chance
    } else {
        skill.base_crit_chance.unwrap_or(0.0)
    }
}

/// Stacks consumed per use, capped at the configured maximum
pub fn combo_stacks(skill: &SkillProfile, stacks: Option<u32>, constants: &ComboConstants) -> u32 {
    if !skill.uses_combo() {
        return 0;
    }
    stacks.unwrap_or(skill.combo_cost).min(constants.max_stacks)
}

/// `1 + bonus_per_stack × stacks / 100`
pub fn combo_multiplier(stacks: u32, constants: &ComboConstants) -> f64 {
    1.0 + constants.bonus_per_stack * f64::from(stacks) / 100.0
}

/// Share of reserved spirit the character can actually pay for
pub fn spirit_efficiency(available: f64, reserved: f64) -> f64 {
    if reserved <= 0.0 {
        return 1.0;
    }
    (available / reserved).clamp(0.0, 1.0)
}

/// Mana and spirit economics for a skill dealing `dps`
pub fn resource_efficiency(
    skill: &SkillProfile,
    stats: &AggregatedStats,
    uses_per_second: f64,
    dps: f64,
    spirit_available: f64,
    spirit_reserved: f64,
) -> ResourceEfficiency {
    let cost_scale = stats.stat(Stat::ManaCost, &skill.tags).rebased(1.0).compute();
    let mana_cost = (skill.mana_cost * skill.cost_multiplier * cost_scale).max(0.0);
    let mana_per_second = mana_cost * uses_per_second;
    ResourceEfficiency {
        mana_cost,
        mana_per_second,
        damage_per_mana: (mana_per_second > 0.0).then(|| dps / mana_per_second),
        spirit_available,
        spirit_reserved,
        spirit_efficiency: spirit_efficiency(spirit_available, spirit_reserved),
    }
}

/// Run the full offensive pipeline
pub fn calculate_damage(ctx: &DamageContext<'_>) -> Result<DamageOutcome, CalcError> {
    let DamageContext {
        weapon,
        skill,
        stats,
        constants,
        ..
    } = *ctx;

    let channels = calculate_hit_damage(weapon, skill, stats);
    let mut hit_damage = DamageComponents::zero();
    for channel in &channels {
        hit_damage[channel.damage_type] = channel.final_damage;
    }

    let crit = CritProfile::resolve(
        base_crit_chance(weapon, skill),
        &stats.stat(Stat::CritChance, &skill.tags),
        &stats.stat(Stat::CritMultiplier, &skill.tags),
        &constants.crit,
    );

    // Only attacks roll against evasion
    let chance = if skill.is_attack() {
        hit_chance(ctx.accuracy, ctx.enemy_evasion, &constants.hit)?
    } else {
        constants.hit.max_chance
    };

    let uses = uses_per_second(weapon, skill, stats);
    let average_hit_by_type = hit_damage * crit.average_factor();
    let dps_by_type = average_hit_by_type * (uses * chance / 100.0);
    let dps = dps_by_type.total();

    let stacks = combo_stacks(skill, ctx.combo_stacks, &constants.combo);
    let combo_multiplier = combo_multiplier(stacks, &constants.combo);
    let combo_dps = dps * combo_multiplier;

    let resources = resource_efficiency(
        skill,
        stats,
        uses,
        combo_dps,
        ctx.spirit_available,
        ctx.spirit_reserved,
    );
    let effective_dps = combo_dps * resources.spirit_efficiency;

    trace!(dps, combo_dps, effective_dps, hit_chance = chance, "damage resolved");

    Ok(DamageOutcome {
        channels,
        hit_damage,
        average_hit_by_type,
        average_hit: average_hit_by_type.total(),
        uses_per_second: uses,
        hit_chance: chance,
        crit,
        dps_by_type,
        dps,
        combo_stacks: stacks,
        combo_multiplier,
        combo_dps,
        effective_dps,
        resources,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::Item;
    use crate::modifier::{parse_modifiers, DamageCategory, Effect, EffectKind};
    use crate::types::{EquipmentSlot, SkillTag};

    fn weapon() -> WeaponProfile {
        let item = Item::new(EquipmentSlot::MainHand, "Plain Club")
            .with_class("One Hand Maces")
            .with_property("Physical Damage", "10-20")
            .with_property("Attacks per Second", "1.5")
            .with_property("Critical Hit Chance", "0%");
        WeaponProfile::resolve(Some(&item))
    }

    fn context<'a>(
        weapon: &'a WeaponProfile,
        skill: &'a SkillProfile,
        stats: &'a AggregatedStats,
        constants: &'a GameConstants,
    ) -> DamageContext<'a> {
        DamageContext {
            weapon,
            skill,
            stats,
            constants,
            accuracy: 100.0,
            enemy_evasion: 0.0,
            combo_stacks: None,
            spirit_available: 0.0,
            spirit_reserved: 0.0,
        }
    }

    #[test]
    fn test_plain_weapon_dps() {
        let weapon = weapon();
        let skill = SkillProfile::basic_attack();
        let stats = AggregatedStats::new();
        let constants = GameConstants::default();
        let outcome = calculate_damage(&context(&weapon, &skill, &stats, &constants)).unwrap();
        assert!((outcome.average_hit - 15.0).abs() < 1e-9);
        assert!((outcome.hit_chance - 100.0).abs() < f64::EPSILON);
        assert!((outcome.dps - 22.5).abs() < 1e-9);
        assert!((outcome.effective_dps - 22.5).abs() < 1e-9);

        let physical = outcome.channels[0];
        assert_eq!(physical.damage_type, DamageType::Physical);
        assert!((physical.min_damage - 10.0).abs() < 1e-9);
        assert!((physical.max_damage - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_increased_then_more() {
        let weapon = weapon();
        let skill = SkillProfile::basic_attack();
        let effects = vec![
            Effect::new(Stat::Damage(DamageCategory::Physical), EffectKind::Increased, 20.0),
            Effect::new(Stat::Damage(DamageCategory::Physical), EffectKind::More, 10.0),
        ];
        let stats = AggregatedStats::fold(&effects);
        let channels = calculate_hit_damage(&weapon, &skill, &stats);
        let physical = channels
            .iter()
            .find(|c| c.damage_type == DamageType::Physical)
            .unwrap();
        assert!((physical.final_damage - 19.8).abs() < 1e-9);
        assert!((physical.increased_multiplier - 1.2).abs() < 1e-12);
        assert!((physical.more_multiplier - 1.1).abs() < 1e-12);
    }

    #[test]
    fn test_added_damage_before_effectiveness() {
        let weapon = weapon();
        let mut skill = SkillProfile::basic_attack();
        skill.damage_effectiveness = 50.0;
        let effects = parse_modifiers(["Adds 10 to 20 Fire Damage to Attacks"], "ring").effects;
        let stats = AggregatedStats::fold(&effects);
        let channels = calculate_hit_damage(&weapon, &skill, &stats);
        let fire = channels.iter().find(|c| c.damage_type == DamageType::Fire).unwrap();
        assert!((fire.added - 15.0).abs() < 1e-12);
        assert!((fire.final_damage - 7.5).abs() < 1e-12);
    }

    #[test]
    fn test_spell_ignores_weapon_and_evasion() {
        let weapon = weapon();
        let mut skill = SkillProfile::basic_attack();
        skill.tags = vec![SkillTag::Spell];
        skill.base_damage_min = DamageComponents::single(DamageType::Cold, 10.0);
        skill.base_damage_max = DamageComponents::single(DamageType::Cold, 30.0);
        skill.cast_time = Some(0.5);
        let stats = AggregatedStats::new();
        let constants = GameConstants::default();
        let mut ctx = context(&weapon, &skill, &stats, &constants);
        ctx.enemy_evasion = 10_000.0;
        let outcome = calculate_damage(&ctx).unwrap();
        assert_eq!(outcome.hit_damage.physical, 0.0);
        assert!((outcome.hit_chance - 100.0).abs() < f64::EPSILON);
        // 20 × 2 casts per second
        assert!((outcome.dps - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_combo_and_spirit_scale_final_dps() {
        let weapon = weapon();
        let mut skill = SkillProfile::basic_attack();
        skill.combo_cost = 4;
        let stats = AggregatedStats::new();
        let constants = GameConstants::default();
        let mut ctx = context(&weapon, &skill, &stats, &constants);
        ctx.spirit_available = 50.0;
        ctx.spirit_reserved = 100.0;
        let outcome = calculate_damage(&ctx).unwrap();
        assert_eq!(outcome.combo_stacks, 4);
        assert!((outcome.combo_multiplier - 2.0).abs() < 1e-12);
        assert!((outcome.combo_dps - 45.0).abs() < 1e-9);
        assert!((outcome.effective_dps - 22.5).abs() < 1e-9);
        // per-hit damage is untouched by either
        assert!((outcome.average_hit - 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_combo_stacks_capped() {
        let mut skill = SkillProfile::basic_attack();
        let constants = ComboConstants::default();
        assert_eq!(combo_stacks(&skill, Some(50), &constants), 0);
        skill.combo_cost = 3;
        assert_eq!(combo_stacks(&skill, None, &constants), 3);
        assert_eq!(combo_stacks(&skill, Some(50), &constants), 10);
    }

    #[test]
    fn test_negative_evasion_rejected() {
        let weapon = weapon();
        let skill = SkillProfile::basic_attack();
        let stats = AggregatedStats::new();
        let constants = GameConstants::default();
        let mut ctx = context(&weapon, &skill, &stats, &constants);
        ctx.enemy_evasion = -10.0;
        assert_eq!(
            calculate_damage(&ctx),
            Err(CalcError::NegativeEvasion(-10.0))
        );
    }

    #[test]
    fn test_resource_efficiency() {
        let mut skill = SkillProfile::basic_attack();
        skill.mana_cost = 10.0;
        skill.cost_multiplier = 1.5;
        let effects = parse_modifiers(["20% reduced Mana Cost of Skills"], "helmet").effects;
        let stats = AggregatedStats::fold(&effects);
        let resources = resource_efficiency(&skill, &stats, 2.0, 120.0, 30.0, 0.0);
        assert!((resources.mana_cost - 12.0).abs() < 1e-9);
        assert!((resources.mana_per_second - 24.0).abs() < 1e-9);
        assert!((resources.damage_per_mana.unwrap() - 5.0).abs() < 1e-9);
        assert!((resources.spirit_efficiency - 1.0).abs() < f64::EPSILON);

        skill.mana_cost = 0.0;
        let free = resource_efficiency(&skill, &stats, 2.0, 120.0, 30.0, 0.0);
        assert!(free.damage_per_mana.is_none());
    }

    #[test]
    fn test_spirit_efficiency() {
        assert!((spirit_efficiency(100.0, 0.0) - 1.0).abs() < f64::EPSILON);
        assert!((spirit_efficiency(30.0, 60.0) - 0.5).abs() < f64::EPSILON);
        assert!((spirit_efficiency(90.0, 60.0) - 1.0).abs() < f64::EPSILON);
        assert_eq!(spirit_efficiency(-5.0, 60.0), 0.0);
    }
}
