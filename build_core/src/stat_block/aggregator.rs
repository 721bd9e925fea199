//! AggregatedStats - folds effects from every source into per-stat accumulators

use super::stat_value::{MoreMultipliers, SortedSum, StatValue};
use crate::modifier::{DamageCategory, Effect, EffectKind, Namespace, Stat};
use crate::types::{DamageRange, DamageType, SkillTag};
use std::collections::BTreeMap;
use tracing::trace;

/// Accumulator key: the stat plus the skill tag it is restricted to
type StatKey = (Stat, Option<SkillTag>);

/// Damage-specific buckets for one (category, tag) pair
///
/// Base and added damage keep their raw min/max so ranges stay visible until
/// they are averaged in the resolver.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DamageModifiers {
    pub base_min: f64,
    pub base_max: f64,
    pub added_min: f64,
    pub added_max: f64,
    /// Σ increased% for this category
    pub increased: f64,
    pub more: MoreMultipliers,
    terms: [SortedSum; 5],
}

impl DamageModifiers {
    fn add_range(&mut self, kind: EffectKind, min: f64, max: f64) {
        let [base_min, base_max, added_min, added_max, _] = &mut self.terms;
        match kind {
            EffectKind::Base => {
                self.base_min = base_min.add(self.base_min, min);
                self.base_max = base_max.add(self.base_max, max);
            }
            EffectKind::Added => {
                self.added_min = added_min.add(self.added_min, min);
                self.added_max = added_max.add(self.added_max, max);
            }
            EffectKind::Increased | EffectKind::More => {}
        }
    }

    fn add_increased(&mut self, value: f64) {
        self.increased = self.terms[4].add(self.increased, value);
    }

    fn apply(&mut self, effect: &Effect) {
        match effect.kind() {
            EffectKind::Increased => self.add_increased(effect.value()),
            EffectKind::More => self.more.push(effect.value()),
            kind => {
                let (min, max) = effect.bounds();
                self.add_range(kind, min, max);
            }
        }
    }

    fn merge(&mut self, other: &DamageModifiers) {
        self.add_range(EffectKind::Base, other.base_min, other.base_max);
        self.add_range(EffectKind::Added, other.added_min, other.added_max);
        self.add_increased(other.increased);
        self.more.extend(&other.more);
    }

    pub fn base(&self) -> DamageRange {
        DamageRange::new(self.base_min, self.base_max).unwrap_or_default()
    }

    pub fn added(&self) -> DamageRange {
        DamageRange::new(self.added_min, self.added_max).unwrap_or_default()
    }

    pub fn increased_multiplier(&self) -> f64 {
        (1.0 + self.increased / 100.0).max(0.0)
    }

    pub fn more_multiplier(&self) -> f64 {
        self.more.product()
    }
}

/// Accumulated player-namespace stats for one calculation
///
/// Built fresh from an effect list on every calculation. Ailment and minion
/// effects are left to their own accumulators and never land here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregatedStats {
    damage: BTreeMap<(DamageCategory, Option<SkillTag>), DamageModifiers>,
    scalars: BTreeMap<StatKey, StatValue>,
}

impl AggregatedStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a sequence of effects; the result does not depend on their order
    pub fn fold<'a, I>(effects: I) -> Self
    where
        I: IntoIterator<Item = &'a Effect>,
    {
        let mut stats = AggregatedStats::new();
        for effect in effects {
            stats.add(effect);
        }
        stats
    }

    /// Copy of these stats with extra effects folded in (support gems)
    pub fn extended<'a, I>(&self, effects: I) -> Self
    where
        I: IntoIterator<Item = &'a Effect>,
    {
        let mut stats = self.clone();
        for effect in effects {
            stats.add(effect);
        }
        stats
    }

    /// Fold a single effect
    pub fn add(&mut self, effect: &Effect) {
        if effect.is_local() {
            trace!(stat = ?effect.stat(), source = effect.source(), "skipping local effect");
            return;
        }
        if effect.stat().namespace() != Namespace::Player {
            return;
        }

        let tag = effect.required_tag();
        match effect.stat() {
            Stat::Damage(category) => self.damage.entry((category, tag)).or_default().apply(effect),
            stat => self
                .scalars
                .entry((stat, tag))
                .or_default()
                .apply(effect.kind(), effect.value()),
        }
    }

    /// Every damage modifier that scales `damage_type` for a skill with `tags`
    pub fn damage_for(&self, damage_type: DamageType, tags: &[SkillTag]) -> DamageModifiers {
        let mut merged = DamageModifiers::default();
        for ((category, tag), modifiers) in &self.damage {
            if category.applies_to(damage_type) && tag_matches(*tag, tags) {
                merged.merge(modifiers);
            }
        }
        merged
    }

    /// Accumulated value for a scalar stat, including its umbrella stats
    /// (attack and cast speed, all elemental resistances, all attributes)
    pub fn stat(&self, stat: Stat, tags: &[SkillTag]) -> StatValue {
        let mut merged = StatValue::default();
        for covering in covering_stats(stat) {
            for ((key, tag), value) in self.scalars.range((covering, None)..) {
                if *key != covering {
                    break;
                }
                if tag_matches(*tag, tags) {
                    merged.merge(value);
                }
            }
        }
        merged
    }

    /// Untagged stat with an explicit base value, fully resolved
    pub fn total(&self, stat: Stat, base: f64) -> f64 {
        self.stat(stat, &[]).rebased(base).compute()
    }

    /// Sum of flat additions only (resistances, skill levels, block chance)
    pub fn flat(&self, stat: Stat, tags: &[SkillTag]) -> f64 {
        self.stat(stat, tags).flat
    }

    pub fn is_empty(&self) -> bool {
        self.damage.is_empty() && self.scalars.is_empty()
    }
}

/// Untagged modifiers always apply; tagged ones need the skill to carry the tag
fn tag_matches(required: Option<SkillTag>, tags: &[SkillTag]) -> bool {
    required.map_or(true, |tag| tags.contains(&tag))
}

fn covering_stats(stat: Stat) -> Vec<Stat> {
    match stat {
        Stat::AttackSpeed | Stat::CastSpeed => vec![stat, Stat::Speed],
        Stat::Resistance(dt) if dt.is_elemental() => vec![stat, Stat::ElementalResistances],
        Stat::MaxResistance(dt) if dt.is_elemental() => vec![stat, Stat::MaxElementalResistances],
        Stat::Strength | Stat::Dexterity | Stat::Intelligence => vec![stat, Stat::AllAttributes],
        _ => vec![stat],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modifier::{MinionStat, Qualifier};
    use proptest::prelude::*;

    fn effect(stat: Stat, kind: EffectKind, value: f64) -> Effect {
        Effect::new(stat, kind, value)
    }

    #[test]
    fn test_increased_fire_sums() {
        let fire = Stat::Damage(DamageCategory::Fire);
        let effects = vec![
            effect(fire, EffectKind::Increased, 10.0),
            effect(fire, EffectKind::Increased, 10.0),
        ];
        let stats = AggregatedStats::fold(&effects);
        let modifiers = stats.damage_for(DamageType::Fire, &[]);
        assert!((modifiers.increased - 20.0).abs() < 1e-12);
        assert!((modifiers.increased_multiplier() - 1.20).abs() < 1e-12);
    }

    #[test]
    fn test_more_damage_chains() {
        let all = Stat::Damage(DamageCategory::All);
        let effects = vec![
            effect(all, EffectKind::More, 10.0),
            effect(all, EffectKind::More, 10.0),
        ];
        let stats = AggregatedStats::fold(&effects);
        let modifiers = stats.damage_for(DamageType::Physical, &[]);
        assert!((modifiers.more_multiplier() - 1.21).abs() < 1e-12);
        assert_eq!(modifiers.more.terms().len(), 2);
    }

    #[test]
    fn test_elemental_does_not_scale_physical() {
        let effects = vec![effect(
            Stat::Damage(DamageCategory::Elemental),
            EffectKind::Increased,
            30.0,
        )];
        let stats = AggregatedStats::fold(&effects);
        assert_eq!(stats.damage_for(DamageType::Physical, &[]).increased, 0.0);
        assert!((stats.damage_for(DamageType::Cold, &[]).increased - 30.0).abs() < 1e-12);
    }

    #[test]
    fn test_tagged_damage_needs_tag() {
        let effects = vec![effect(Stat::Damage(DamageCategory::All), EffectKind::Increased, 40.0)
            .with_qualifier(Qualifier::Tag(SkillTag::Spell))];
        let stats = AggregatedStats::fold(&effects);
        assert_eq!(stats.damage_for(DamageType::Fire, &[SkillTag::Attack]).increased, 0.0);
        assert!(
            (stats.damage_for(DamageType::Fire, &[SkillTag::Spell]).increased - 40.0).abs() < 1e-12
        );
    }

    #[test]
    fn test_added_keeps_range() {
        let effects = vec![
            Effect::range(Stat::Damage(DamageCategory::Cold), EffectKind::Added, 3.0, 7.0),
            Effect::range(Stat::Damage(DamageCategory::Cold), EffectKind::Added, 1.0, 2.0),
        ];
        let stats = AggregatedStats::fold(&effects);
        let added = stats.damage_for(DamageType::Cold, &[]).added();
        assert_eq!((added.min, added.max), (4.0, 9.0));
    }

    #[test]
    fn test_umbrella_stats() {
        let effects = vec![
            effect(Stat::Speed, EffectKind::Increased, 5.0),
            effect(Stat::AttackSpeed, EffectKind::Increased, 10.0),
            effect(Stat::ElementalResistances, EffectKind::Added, 10.0),
            effect(Stat::Resistance(DamageType::Fire), EffectKind::Added, 30.0),
            effect(Stat::AllAttributes, EffectKind::Added, 5.0),
        ];
        let stats = AggregatedStats::fold(&effects);
        assert!((stats.stat(Stat::AttackSpeed, &[]).increased - 15.0).abs() < 1e-12);
        assert!((stats.stat(Stat::CastSpeed, &[]).increased - 5.0).abs() < 1e-12);
        assert!((stats.flat(Stat::Resistance(DamageType::Fire), &[]) - 40.0).abs() < 1e-12);
        assert!((stats.flat(Stat::Resistance(DamageType::Chaos), &[])).abs() < 1e-12);
        assert!((stats.flat(Stat::Dexterity, &[]) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_minion_and_local_effects_ignored() {
        let effects = vec![
            effect(Stat::Minion(MinionStat::Damage), EffectKind::Increased, 50.0),
            effect(Stat::Damage(DamageCategory::Physical), EffectKind::Increased, 50.0).localized(),
        ];
        let stats = AggregatedStats::fold(&effects);
        assert!(stats.is_empty());
    }

    #[test]
    fn test_decimal_crit_chance_order() {
        let lines = [
            "+0.1% to Critical Hit Chance",
            "+0.2% to Critical Hit Chance",
            "+0.3% to Critical Hit Chance",
        ];
        let forward: Vec<Effect> = lines
            .iter()
            .filter_map(|line| crate::modifier::parse_modifier(line, "test"))
            .collect();
        let reversed: Vec<Effect> = forward.iter().rev().cloned().collect();
        assert_eq!(forward.len(), 3);

        let a = AggregatedStats::fold(&forward);
        let b = AggregatedStats::fold(&reversed);
        assert_eq!(a, b);
        assert_eq!(
            a.flat(Stat::CritChance, &[]).to_bits(),
            b.flat(Stat::CritChance, &[]).to_bits()
        );
    }

    #[test]
    fn test_decimal_increased_damage_order() {
        let fire = Stat::Damage(DamageCategory::Fire);
        let values = [0.1, 0.2, 0.3, 12.7];
        let forward: Vec<Effect> = values
            .iter()
            .map(|v| effect(fire, EffectKind::Increased, *v))
            .collect();
        let reversed: Vec<Effect> = forward.iter().rev().cloned().collect();
        let a = AggregatedStats::fold(&forward).damage_for(DamageType::Fire, &[]);
        let b = AggregatedStats::fold(&reversed).damage_for(DamageType::Fire, &[]);
        assert_eq!(a.increased.to_bits(), b.increased.to_bits());
    }

    fn arb_effect() -> impl Strategy<Value = Effect> {
        let stat = prop::sample::select(vec![
            Stat::Damage(DamageCategory::All),
            Stat::Damage(DamageCategory::Fire),
            Stat::Damage(DamageCategory::Physical),
            Stat::AttackSpeed,
            Stat::Speed,
            Stat::CritChance,
            Stat::Life,
        ]);
        let kind = prop::sample::select(vec![
            EffectKind::Added,
            EffectKind::Increased,
            EffectKind::More,
        ]);
        // hundredths, so sums of terms like 0.1 + 0.2 are exercised
        (stat, kind, -5_000i32..20_000)
            .prop_map(|(stat, kind, value)| effect(stat, kind, f64::from(value) / 100.0))
    }

    proptest! {
        #[test]
        fn prop_fold_is_order_independent(
            (effects, shuffled) in prop::collection::vec(arb_effect(), 0..24)
                .prop_flat_map(|effects| {
                    let shuffled = Just(effects.clone()).prop_shuffle();
                    (Just(effects), shuffled)
                })
        ) {
            let a = AggregatedStats::fold(&effects);
            let b = AggregatedStats::fold(&shuffled);
            prop_assert_eq!(&a, &b);
            for dt in DamageType::ALL {
                let (x, y) = (a.damage_for(dt, &[]), b.damage_for(dt, &[]));
                prop_assert_eq!(x.increased.to_bits(), y.increased.to_bits());
                prop_assert_eq!(x.added_min.to_bits(), y.added_min.to_bits());
                prop_assert_eq!(x.more_multiplier().to_bits(), y.more_multiplier().to_bits());
            }
            for stat in [Stat::AttackSpeed, Stat::CritChance, Stat::Life] {
                let (x, y) = (a.stat(stat, &[]), b.stat(stat, &[]));
                prop_assert_eq!(x.flat.to_bits(), y.flat.to_bits());
                prop_assert_eq!(x.increased.to_bits(), y.increased.to_bits());
            }
        }
    }
}
