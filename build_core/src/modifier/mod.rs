//! Modifier text parser
//!
//! Converts free-text modifier lines ("+12% increased Fire Damage",
//! "Adds 4 to 9 Cold Damage to Attacks") into typed [`Effect`]s.

mod effect;
mod rules;

pub use effect::{
    AilmentStat, DamageCategory, Effect, EffectKind, EffectScope, MinionStat, Namespace, Qualifier,
    Stat,
};

use rules::rules;
use tracing::debug;

/// Prefixes carried by support gem text that do not change the meaning
const STRIPPED_PREFIXES: &[&str] = &["supported skills deal ", "supported skills have ", "supported skills "];

/// Result of parsing a batch of modifier lines
#[derive(Debug, Clone, Default)]
pub struct ParsedModifiers {
    pub effects: Vec<Effect>,
    /// Lines that matched no rule or carried malformed numbers
    pub unmatched: Vec<String>,
}

/// Normalize modifier text for matching: lowercase, single spaces, no
/// trailing period, no support-gem prefix
pub fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase();
    let mut normalized = lowered.split_whitespace().collect::<Vec<_>>().join(" ");
    while normalized.ends_with('.') {
        normalized.pop();
    }
    for prefix in STRIPPED_PREFIXES {
        if let Some(rest) = normalized.strip_prefix(prefix) {
            return rest.to_string();
        }
    }
    normalized
}

/// Parse one modifier line into at most one effect
///
/// The first rule whose pattern matches decides the outcome. Unrecognized text
/// and matched text with malformed numbers both yield `None`.
pub fn parse_modifier(text: &str, source: &str) -> Option<Effect> {
    let normalized = normalize(text);
    if normalized.is_empty() {
        return None;
    }

    for rule in rules() {
        match rule.apply(&normalized) {
            None => continue,
            Some(Some(effect)) => return Some(effect.with_source(source)),
            Some(None) => {
                debug!(rule = rule.name, text, source, "dropping modifier with malformed value");
                return None;
            }
        }
    }

    debug!(text, source, "unrecognized modifier");
    None
}

/// Parse a batch of lines from one source
pub fn parse_modifiers<I, S>(lines: I, source: &str) -> ParsedModifiers
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut parsed = ParsedModifiers::default();
    for line in lines {
        let line = line.as_ref();
        match parse_modifier(line, source) {
            Some(effect) => parsed.effects.push(effect),
            None => parsed.unmatched.push(line.to_string()),
        }
    }
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Ailment, DamageType, SkillTag};
    use proptest::prelude::*;

    fn parse(text: &str) -> Effect {
        parse_modifier(text, "test").unwrap_or_else(|| panic!("no effect for {text:?}"))
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  +10% Increased   Fire Damage. "), "+10% increased fire damage");
        assert_eq!(
            normalize("Supported Skills deal 20% more Damage"),
            "20% more damage"
        );
    }

    #[test]
    fn test_increased_generic_damage() {
        let effect = parse("15% increased Damage");
        assert_eq!(effect.stat(), Stat::Damage(DamageCategory::All));
        assert_eq!(effect.kind(), EffectKind::Increased);
        assert!((effect.value() - 15.0).abs() < f64::EPSILON);
        assert_eq!(effect.source(), "test");
    }

    #[test]
    fn test_reduced_and_less_are_negative() {
        let reduced = parse("10% reduced Cold Damage");
        assert_eq!(reduced.stat(), Stat::Damage(DamageCategory::Cold));
        assert_eq!(reduced.kind(), EffectKind::Increased);
        assert!((reduced.value() + 10.0).abs() < f64::EPSILON);

        let less = parse("Supported Skills deal 25% less Damage");
        assert_eq!(less.kind(), EffectKind::More);
        assert!((less.value() + 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_tagged_damage() {
        let effect = parse("20% increased Elemental Damage with Attacks");
        assert_eq!(effect.stat(), Stat::Damage(DamageCategory::Elemental));
        assert_eq!(effect.required_tag(), Some(SkillTag::Attack));

        let effect = parse("30% increased Spell Damage");
        assert_eq!(effect.stat(), Stat::Damage(DamageCategory::All));
        assert_eq!(effect.required_tag(), Some(SkillTag::Spell));

        let effect = parse("12% increased Melee Physical Damage");
        assert_eq!(effect.stat(), Stat::Damage(DamageCategory::Physical));
        assert_eq!(effect.required_tag(), Some(SkillTag::Melee));
    }

    #[test]
    fn test_added_damage_keeps_raw_range() {
        let effect = parse("Adds 4 to 9 Fire Damage to Attacks");
        assert_eq!(effect.stat(), Stat::Damage(DamageCategory::Fire));
        assert_eq!(effect.kind(), EffectKind::Added);
        assert_eq!(effect.bounds(), (4.0, 9.0));
        assert_eq!(effect.required_tag(), Some(SkillTag::Attack));
    }

    #[test]
    fn test_inverted_range_is_dropped() {
        assert!(parse_modifier("Adds 9 to 4 Fire Damage", "test").is_none());
    }

    #[test]
    fn test_skill_base_damage() {
        let effect = parse("Deals 12 to 18 Lightning Damage");
        assert_eq!(effect.kind(), EffectKind::Base);
        assert_eq!(effect.stat(), Stat::Damage(DamageCategory::Lightning));
    }

    #[test]
    fn test_minion_before_generic() {
        let effect = parse("Minions deal 25% increased Damage");
        assert_eq!(effect.stat(), Stat::Minion(MinionStat::Damage));
        assert_eq!(effect.stat().namespace(), Namespace::Minion);

        let effect = parse("Minions have 30% increased Damage");
        assert_eq!(effect.stat(), Stat::Minion(MinionStat::Damage));
        assert!((effect.value() - 30.0).abs() < f64::EPSILON);

        let effect = parse("Minions have 10% less Damage");
        assert_eq!(effect.stat(), Stat::Minion(MinionStat::Damage));
        assert_eq!(effect.kind(), EffectKind::More);
        assert!((effect.value() + 10.0).abs() < f64::EPSILON);

        let effect = parse("20% increased Minion Damage");
        assert_eq!(effect.stat(), Stat::Minion(MinionStat::Damage));

        let effect = parse("Minions have 10% increased Attack and Cast Speed");
        assert_eq!(effect.stat(), Stat::Minion(MinionStat::Speed));

        let effect = parse("+1 to maximum number of Skeletal Warriors");
        assert_eq!(effect.stat(), Stat::Minion(MinionStat::Count));
        assert_eq!(effect.qualifier(), Some(&Qualifier::Named("skeletal warriors".to_string())));
    }

    #[test]
    fn test_ailment_family() {
        let effect = parse("25% chance to inflict Bleeding on Hit");
        assert_eq!(effect.stat(), Stat::Ailment(AilmentStat::Chance(Ailment::Bleed)));

        let effect = parse("30% increased Magnitude of Poison you inflict");
        assert_eq!(effect.stat(), Stat::Ailment(AilmentStat::Magnitude(Ailment::Poison)));

        let effect = parse("15% increased Burning Damage");
        assert_eq!(effect.stat(), Stat::Ailment(AilmentStat::Magnitude(Ailment::Ignite)));

        let effect = parse("20% increased Ignite Duration on Enemies");
        assert_eq!(effect.stat(), Stat::Ailment(AilmentStat::Duration(Ailment::Ignite)));

        let effect = parse("10% increased Chaos Damage over Time");
        assert_eq!(
            effect.stat(),
            Stat::Ailment(AilmentStat::DamageOverTime(DamageCategory::Chaos))
        );
    }

    #[test]
    fn test_speed_and_crit() {
        assert_eq!(parse("8% increased Attack Speed").stat(), Stat::AttackSpeed);
        assert_eq!(parse("8% increased Cast Speed").stat(), Stat::CastSpeed);
        assert_eq!(parse("5% increased Attack and Cast Speed").stat(), Stat::Speed);

        let flat = parse("+1.5% to Critical Hit Chance");
        assert_eq!(flat.stat(), Stat::CritChance);
        assert_eq!(flat.kind(), EffectKind::Added);
        assert!((flat.value() - 1.5).abs() < f64::EPSILON);

        let inc = parse("40% increased Critical Hit Chance for Spells");
        assert_eq!(inc.kind(), EffectKind::Increased);
        assert_eq!(inc.required_tag(), Some(SkillTag::Spell));

        let bonus = parse("+25% to Critical Damage Bonus");
        assert_eq!(bonus.stat(), Stat::CritMultiplier);
        assert_eq!(bonus.kind(), EffectKind::Added);

        let bonus = parse("20% increased Critical Damage Bonus");
        assert_eq!(bonus.stat(), Stat::CritMultiplier);
        assert_eq!(bonus.kind(), EffectKind::Increased);
    }

    #[test]
    fn test_accuracy_block_dodge() {
        let flat = parse("+120 to Accuracy Rating");
        assert_eq!(flat.stat(), Stat::Accuracy);
        assert_eq!(flat.kind(), EffectKind::Added);
        assert_eq!(parse("10% increased Accuracy Rating").kind(), EffectKind::Increased);
        assert_eq!(parse("+5% to Block Chance").stat(), Stat::BlockChance);
        assert_eq!(parse("15% increased Block Chance").kind(), EffectKind::Increased);
        assert_eq!(parse("10% increased Dodge Roll Distance").stat(), Stat::DodgeEffectiveness);
    }

    #[test]
    fn test_defensive_family() {
        assert_eq!(parse("+80 to maximum Life").stat(), Stat::Life);
        assert_eq!(parse("8% increased maximum Mana").stat(), Stat::Mana);
        assert_eq!(parse("+40 to maximum Energy Shield").stat(), Stat::EnergyShield);
        assert_eq!(parse("+150 to Armour").stat(), Stat::Armour);
        assert_eq!(parse("30% increased Evasion Rating").stat(), Stat::Evasion);
        assert_eq!(
            parse("+30% to Fire Resistance").stat(),
            Stat::Resistance(DamageType::Fire)
        );
        assert_eq!(
            parse("+12% to all Elemental Resistances").stat(),
            Stat::ElementalResistances
        );
        assert_eq!(
            parse("+2% to Maximum Cold Resistance").stat(),
            Stat::MaxResistance(DamageType::Cold)
        );
        assert_eq!(parse("+30 to Spirit").stat(), Stat::Spirit);
        assert!((parse("10% reduced Mana Cost of Skills").value() + 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_attributes_and_levels() {
        assert_eq!(parse("+15 to Strength").stat(), Stat::Strength);
        assert_eq!(parse("+8 to all Attributes").stat(), Stat::AllAttributes);

        let level = parse("+1 to Level of all Melee Skills");
        assert_eq!(level.stat(), Stat::SkillLevel);
        assert_eq!(level.required_tag(), Some(SkillTag::Melee));

        let level = parse("+2 to Level of all Skills");
        assert_eq!(level.required_tag(), None);
    }

    #[test]
    fn test_unrecognized_is_collected() {
        let parsed = parse_modifiers(
            ["10% increased Fire Damage", "Grants a warm feeling", ""],
            "amulet",
        );
        assert_eq!(parsed.effects.len(), 1);
        assert_eq!(parsed.unmatched.len(), 2);
    }

    proptest! {
        #[test]
        fn prop_parse_is_idempotent(value in 1u32..500, word in prop::sample::select(vec![
            "increased", "reduced", "more", "less",
        ]), noun in prop::sample::select(vec![
            "damage", "fire damage", "attack speed", "critical hit chance", "minion damage",
            "maximum life", "armour", "poison damage",
        ])) {
            let text = format!("{value}% {word} {noun}");
            let first = parse_modifier(&text, "prop");
            let second = parse_modifier(&text, "prop");
            prop_assert_eq!(first, second);
        }

        #[test]
        fn prop_arbitrary_text_never_panics(text in ".{0,64}") {
            let _ = parse_modifier(&text, "prop");
        }
    }
}
