//! Modifier rule table - ordered (pattern, extractor) pairs
//!
//! Rules are tried top to bottom against normalized (lowercase, trimmed)
//! modifier text and the first match wins. More specific phrasings must sit
//! above the generic ones they would otherwise be swallowed by.

use super::effect::{AilmentStat, DamageCategory, Effect, EffectKind, MinionStat, Qualifier, Stat};
use crate::types::{Ailment, DamageType, SkillTag};
use regex::{Captures, Regex};
use std::sync::OnceLock;

/// Number token: integers, decimals, optional sign
const NUM: &str = r"([+-]?\d+(?:\.\d+)?)";

/// Increase/decrease wording
const SCALE: &str = r"(increased|reduced|more|less)";

pub(crate) struct Rule {
    pub name: &'static str,
    pattern: Regex,
    extract: fn(&Captures) -> Option<Effect>,
}

impl Rule {
    fn new(name: &'static str, pattern: &str, extract: fn(&Captures) -> Option<Effect>) -> Self {
        let pattern = pattern.replace("{NUM}", NUM).replace("{SCALE}", SCALE);
        Rule {
            name,
            pattern: Regex::new(&format!("^{pattern}$")).expect("modifier rule patterns are valid regex"),
            extract,
        }
    }

    /// `None` when the text does not match; `Some(None)` when it matches but
    /// the numeric data is malformed
    pub fn apply(&self, text: &str) -> Option<Option<Effect>> {
        self.pattern.captures(text).map(|caps| (self.extract)(&caps))
    }
}

static RULES: OnceLock<Vec<Rule>> = OnceLock::new();

/// The rule table, compiled on first use
pub(crate) fn rules() -> &'static [Rule] {
    RULES.get_or_init(build_rules)
}

fn build_rules() -> Vec<Rule> {
    vec![
        // === Minions ===
        Rule::new("minion_damage", r"minions (?:deal|have) {NUM}% {SCALE} damage", |c| {
            scaled(c, 1, 2, Stat::Minion(MinionStat::Damage))
        }),
        Rule::new("minion_damage_short", r"{NUM}% {SCALE} minion damage", |c| {
            scaled(c, 1, 2, Stat::Minion(MinionStat::Damage))
        }),
        Rule::new(
            "minion_speed",
            r"minions have {NUM}% {SCALE} (attack and cast|attack|cast) speed",
            |c| {
                let stat = match &c[3] {
                    "attack" => MinionStat::AttackSpeed,
                    "cast" => MinionStat::CastSpeed,
                    _ => MinionStat::Speed,
                };
                scaled(c, 1, 2, Stat::Minion(stat))
            },
        ),
        Rule::new(
            "minion_crit",
            r"minions have {NUM}% {SCALE} critical (?:hit|strike) chance",
            |c| scaled(c, 1, 2, Stat::Minion(MinionStat::CritChance)),
        ),
        Rule::new("minion_life", r"minions have {NUM}% {SCALE} maximum life", |c| {
            scaled(c, 1, 2, Stat::Minion(MinionStat::Life))
        }),
        Rule::new("minion_count", r"{NUM} to maximum number of (.+)", |c| {
            let value = number(c, 1)?;
            let name = c[2].trim().to_string();
            Some(
                Effect::new(Stat::Minion(MinionStat::Count), EffectKind::Added, value)
                    .with_qualifier(Qualifier::Named(name)),
            )
        }),
        // === Ailments ===
        Rule::new(
            "ailment_chance",
            r"{NUM}% chance to (?:inflict |cause )?(bleeding|bleed|poison|ignite)(?: enemies)?(?: on hit)?",
            |c| {
                let ailment = Ailment::from_word(&c[2])?;
                Some(Effect::new(
                    Stat::Ailment(AilmentStat::Chance(ailment)),
                    EffectKind::Added,
                    number(c, 1)?,
                ))
            },
        ),
        Rule::new(
            "ailment_magnitude",
            r"{NUM}% {SCALE} (?:magnitude of (bleeding|poison|ignite)|(bleeding|poison|ignite) magnitude|damage with (bleeding|poison|ignite)|(bleeding|poison|burning|ignite) damage)(?: you inflict)?",
            |c| {
                let word = (3..=6).find_map(|i| c.get(i))?.as_str();
                let ailment = Ailment::from_word(word)?;
                scaled(c, 1, 2, Stat::Ailment(AilmentStat::Magnitude(ailment)))
            },
        ),
        Rule::new(
            "ailment_duration",
            r"{NUM}% {SCALE} (bleeding|bleed|poison|ignite) duration(?: on enemies)?",
            |c| {
                let ailment = Ailment::from_word(&c[3])?;
                scaled(c, 1, 2, Stat::Ailment(AilmentStat::Duration(ailment)))
            },
        ),
        Rule::new(
            "damage_over_time",
            r"{NUM}% {SCALE} (?:(physical|fire|cold|lightning|chaos|elemental) )?damage over time(?: multiplier)?",
            |c| {
                let category = category_or_all(c, 3)?;
                scaled(c, 1, 2, Stat::Ailment(AilmentStat::DamageOverTime(category)))
            },
        ),
        // === Damage ===
        Rule::new(
            "base_damage",
            r"deals {NUM} to {NUM} (physical|fire|cold|lightning|chaos) damage",
            |c| {
                let category = DamageCategory::from_name(&c[3])?;
                range(c, Stat::Damage(category), EffectKind::Base)
            },
        ),
        Rule::new(
            "added_damage",
            r"adds {NUM} to {NUM} (physical|fire|cold|lightning|chaos) damage(?: to (attacks|spells))?",
            |c| {
                let category = DamageCategory::from_name(&c[3])?;
                let effect = range(c, Stat::Damage(category), EffectKind::Added)?;
                Some(with_tag(effect, c, 4))
            },
        ),
        Rule::new(
            "damage_percent",
            r"{NUM}% {SCALE} (?:global )?(?:(attack|spell|melee|projectile|area|strike|slam) )?(?:(physical|fire|cold|lightning|chaos|elemental) )?damage(?: (?:with|for) (attacks|spells|melee skills|projectile skills|area skills))?",
            |c| {
                let category = category_or_all(c, 4)?;
                let effect = scaled(c, 1, 2, Stat::Damage(category))?;
                let effect = with_tag(effect, c, 3);
                Some(with_tag(effect, c, 5))
            },
        ),
        // === Speed ===
        Rule::new(
            "speed",
            r"{NUM}% {SCALE} (attack and cast|attack|cast) speed",
            |c| {
                let stat = match &c[3] {
                    "attack" => Stat::AttackSpeed,
                    "cast" => Stat::CastSpeed,
                    _ => Stat::Speed,
                };
                scaled(c, 1, 2, stat)
            },
        ),
        // === Critical hits ===
        Rule::new(
            "crit_chance_flat",
            r"{NUM}% to (?:global )?critical (?:hit|strike) chance",
            |c| flat(c, 1, Stat::CritChance),
        ),
        Rule::new(
            "crit_chance_percent",
            r"{NUM}% {SCALE} (?:global )?critical (?:hit|strike) chance(?: (?:for|with) (attacks|spells))?",
            |c| {
                let effect = scaled(c, 1, 2, Stat::CritChance)?;
                Some(with_tag(effect, c, 3))
            },
        ),
        Rule::new(
            "crit_bonus_flat",
            r"{NUM}% to (?:global )?critical (?:damage bonus|strike multiplier|hit multiplier)",
            |c| flat(c, 1, Stat::CritMultiplier),
        ),
        Rule::new(
            "crit_bonus_percent",
            r"{NUM}% {SCALE} (?:global )?critical (?:damage bonus|strike multiplier|hit multiplier)",
            |c| scaled(c, 1, 2, Stat::CritMultiplier),
        ),
        // === Accuracy ===
        Rule::new("accuracy_flat", r"{NUM} to accuracy rating", |c| {
            flat(c, 1, Stat::Accuracy)
        }),
        Rule::new(
            "accuracy_percent",
            r"{NUM}% {SCALE} (?:global )?accuracy rating",
            |c| scaled(c, 1, 2, Stat::Accuracy),
        ),
        // === Block / dodge ===
        Rule::new("block_flat", r"{NUM}% to (?:maximum )?block chance", |c| {
            flat(c, 1, Stat::BlockChance)
        }),
        Rule::new("block_percent", r"{NUM}% {SCALE} block chance", |c| {
            scaled(c, 1, 2, Stat::BlockChance)
        }),
        Rule::new(
            "dodge",
            r"{NUM}% {SCALE} dodge roll (?:distance|speed|effectiveness)",
            |c| scaled(c, 1, 2, Stat::DodgeEffectiveness),
        ),
        // === Resources ===
        Rule::new(
            "pool_flat",
            r"{NUM} to maximum (life|mana|energy shield)",
            |c| flat(c, 1, pool_stat(&c[2])?),
        ),
        Rule::new(
            "pool_percent",
            r"{NUM}% {SCALE} maximum (life|mana|energy shield)",
            |c| scaled(c, 1, 2, pool_stat(&c[3])?),
        ),
        Rule::new("spirit_flat", r"{NUM} to spirit", |c| flat(c, 1, Stat::Spirit)),
        Rule::new("spirit_percent", r"{NUM}% {SCALE} spirit", |c| {
            scaled(c, 1, 2, Stat::Spirit)
        }),
        Rule::new(
            "mana_cost",
            r"{NUM}% {SCALE} mana cost(?: of skills)?",
            |c| scaled(c, 1, 2, Stat::ManaCost),
        ),
        // === Defences ===
        Rule::new(
            "defence_flat",
            r"{NUM} to (armour|evasion rating|maximum energy shield|energy shield)",
            |c| flat(c, 1, defence_stat(&c[2])?),
        ),
        Rule::new(
            "defence_percent",
            r"{NUM}% {SCALE} (?:global )?(armour|evasion rating|energy shield)",
            |c| scaled(c, 1, 2, defence_stat(&c[3])?),
        ),
        Rule::new(
            "max_resistance",
            r"{NUM}% to maximum (fire|cold|lightning|chaos) resistance",
            |c| {
                let damage_type = DamageType::from_name(&c[2])?;
                flat(c, 1, Stat::MaxResistance(damage_type))
            },
        ),
        Rule::new(
            "max_elemental_resistances",
            r"{NUM}% to all maximum elemental resistances",
            |c| flat(c, 1, Stat::MaxElementalResistances),
        ),
        Rule::new(
            "resistance",
            r"{NUM}% to (fire|cold|lightning|chaos) resistance",
            |c| {
                let damage_type = DamageType::from_name(&c[2])?;
                flat(c, 1, Stat::Resistance(damage_type))
            },
        ),
        Rule::new(
            "elemental_resistances",
            r"{NUM}% to all elemental resistances",
            |c| flat(c, 1, Stat::ElementalResistances),
        ),
        // === Attributes / levels ===
        Rule::new(
            "attribute",
            r"{NUM} to (strength|dexterity|intelligence|all attributes)",
            |c| {
                let stat = match &c[2] {
                    "strength" => Stat::Strength,
                    "dexterity" => Stat::Dexterity,
                    "intelligence" => Stat::Intelligence,
                    _ => Stat::AllAttributes,
                };
                flat(c, 1, stat)
            },
        ),
        Rule::new(
            "skill_level",
            r"{NUM} to level of all (?:(attack|spell|melee|minion|projectile) )?skills?(?: gems)?",
            |c| {
                let effect = flat(c, 1, Stat::SkillLevel)?;
                Some(with_tag(effect, c, 2))
            },
        ),
    ]
}

/// Parse a capture group as a finite number
fn number(caps: &Captures, index: usize) -> Option<f64> {
    let raw = caps.get(index)?.as_str();
    raw.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Increased/reduced/more/less effect; "reduced" and "less" negate the magnitude
fn scaled(caps: &Captures, num: usize, word: usize, stat: Stat) -> Option<Effect> {
    let value = number(caps, num)?;
    let (kind, sign) = match caps.get(word)?.as_str() {
        "increased" => (EffectKind::Increased, 1.0),
        "reduced" => (EffectKind::Increased, -1.0),
        "more" => (EffectKind::More, 1.0),
        "less" => (EffectKind::More, -1.0),
        _ => return None,
    };
    Some(Effect::new(stat, kind, value * sign))
}

fn flat(caps: &Captures, num: usize, stat: Stat) -> Option<Effect> {
    Some(Effect::new(stat, EffectKind::Added, number(caps, num)?))
}

/// "N to M" range in groups 1 and 2; inverted or negative ranges are malformed
fn range(caps: &Captures, stat: Stat, kind: EffectKind) -> Option<Effect> {
    let min = number(caps, 1)?;
    let max = number(caps, 2)?;
    if min < 0.0 || min > max {
        return None;
    }
    Some(Effect::range(stat, kind, min, max))
}

fn category_or_all(caps: &Captures, index: usize) -> Option<DamageCategory> {
    match caps.get(index) {
        Some(m) => DamageCategory::from_name(m.as_str()),
        None => Some(DamageCategory::All),
    }
}

/// Attach a tag qualifier from an optional group ("to attacks", "melee ...")
fn with_tag(effect: Effect, caps: &Captures, index: usize) -> Effect {
    let tag = caps
        .get(index)
        .map(|m| m.as_str().split_whitespace().next().unwrap_or_default())
        .and_then(SkillTag::from_word);
    match tag {
        Some(tag) => effect.with_qualifier(Qualifier::Tag(tag)),
        None => effect,
    }
}

fn pool_stat(word: &str) -> Option<Stat> {
    match word {
        "life" => Some(Stat::Life),
        "mana" => Some(Stat::Mana),
        "energy shield" => Some(Stat::EnergyShield),
        _ => None,
    }
}

fn defence_stat(word: &str) -> Option<Stat> {
    match word {
        "armour" => Some(Stat::Armour),
        "evasion rating" => Some(Stat::Evasion),
        "energy shield" | "maximum energy shield" => Some(Stat::EnergyShield),
        _ => None,
    }
}
