//! Effect - a single normalized modifier

use crate::types::{Ailment, DamageType, SkillTag};
use serde::{Deserialize, Serialize};

/// How an effect composes with others of the same stat
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    /// Intrinsic value of a skill or item base
    Base,
    /// Flat addition, summed with other flat additions
    Added,
    /// Percentage bonus, summed with other increases before it is applied
    Increased,
    /// Percentage multiplier, chained with every other more multiplier
    More,
}

/// Whether an effect applies to the character or only to the item carrying it
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectScope {
    #[default]
    Global,
    Local,
}

/// Damage bucket a damage modifier scales
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DamageCategory {
    All,
    Physical,
    Fire,
    Cold,
    Lightning,
    Chaos,
    Elemental,
}

impl DamageCategory {
    pub fn from_name(name: &str) -> Option<Self> {
        if name == "elemental" {
            return Some(DamageCategory::Elemental);
        }
        DamageType::from_name(name).map(DamageCategory::from)
    }

    /// The single channel this category names, if it names exactly one
    pub fn damage_type(self) -> Option<DamageType> {
        DamageType::ALL
            .into_iter()
            .find(|dt| DamageCategory::from(*dt) == self)
    }

    /// Whether a modifier of this category scales the given channel
    pub fn applies_to(self, damage_type: DamageType) -> bool {
        match self {
            DamageCategory::All => true,
            DamageCategory::Elemental => damage_type.is_elemental(),
            other => DamageCategory::from(damage_type) == other,
        }
    }
}

impl From<DamageType> for DamageCategory {
    fn from(damage_type: DamageType) -> Self {
        match damage_type {
            DamageType::Physical => DamageCategory::Physical,
            DamageType::Fire => DamageCategory::Fire,
            DamageType::Cold => DamageCategory::Cold,
            DamageType::Lightning => DamageCategory::Lightning,
            DamageType::Chaos => DamageCategory::Chaos,
        }
    }
}

/// Ailment-namespace stats
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AilmentStat {
    /// Chance to inflict on hit
    Chance(Ailment),
    /// Damage/magnitude of one ailment
    Magnitude(Ailment),
    Duration(Ailment),
    /// Generic damage over time, optionally restricted to one channel
    DamageOverTime(DamageCategory),
}

/// Minion-namespace stats
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MinionStat {
    Damage,
    AttackSpeed,
    CastSpeed,
    /// Attack and cast speed together
    Speed,
    CritChance,
    Life,
    /// Maximum number of a named minion type
    Count,
}

/// The stat an effect modifies
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "stat", content = "of")]
pub enum Stat {
    Damage(DamageCategory),
    AttackSpeed,
    CastSpeed,
    /// Attack and cast speed together
    Speed,
    CritChance,
    /// Critical damage bonus (on top of the 100% base hit)
    CritMultiplier,
    Accuracy,
    BlockChance,
    DodgeEffectiveness,
    Life,
    Mana,
    EnergyShield,
    Armour,
    Evasion,
    Resistance(DamageType),
    ElementalResistances,
    MaxResistance(DamageType),
    MaxElementalResistances,
    Spirit,
    ManaCost,
    Strength,
    Dexterity,
    Intelligence,
    AllAttributes,
    SkillLevel,
    Ailment(AilmentStat),
    Minion(MinionStat),
}

/// Accumulator namespace an effect belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    Player,
    Ailment,
    Minion,
}

impl Stat {
    pub fn namespace(&self) -> Namespace {
        match self {
            Stat::Ailment(_) => Namespace::Ailment,
            Stat::Minion(_) => Namespace::Minion,
            _ => Namespace::Player,
        }
    }
}

/// Restriction attached to an effect
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Qualifier {
    /// Only applies to skills carrying this tag ("to Attacks", "with Spells")
    Tag(SkillTag),
    /// Names a specific entity ("maximum number of Skeletal Warriors")
    Named(String),
}

/// A single normalized modifier extracted from text
///
/// Effects are produced by the parser and never mutated afterwards; the
/// builder methods consume `self` and are only used while constructing one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Effect {
    stat: Stat,
    kind: EffectKind,
    value: f64,
    /// Upper bound when the modifier is a "N to M" range
    value_max: Option<f64>,
    scope: EffectScope,
    qualifier: Option<Qualifier>,
    source: String,
}

impl Effect {
    pub fn new(stat: Stat, kind: EffectKind, value: f64) -> Self {
        Effect {
            stat,
            kind,
            value,
            value_max: None,
            scope: EffectScope::Global,
            qualifier: None,
            source: String::new(),
        }
    }

    /// Range effect ("Adds N to M ..."); raw bounds are kept for display
    pub fn range(stat: Stat, kind: EffectKind, min: f64, max: f64) -> Self {
        Effect {
            value_max: Some(max),
            ..Effect::new(stat, kind, min)
        }
    }

    pub fn with_qualifier(mut self, qualifier: Qualifier) -> Self {
        self.qualifier = Some(qualifier);
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// Copy of this effect scoped to the item carrying it
    pub fn localized(mut self) -> Self {
        self.scope = EffectScope::Local;
        self
    }

    /// Copy of this effect with its magnitude multiplied (buff stacks)
    pub fn scaled(mut self, factor: f64) -> Self {
        self.value *= factor;
        self.value_max = self.value_max.map(|m| m * factor);
        self
    }

    pub fn stat(&self) -> Stat {
        self.stat
    }

    pub fn kind(&self) -> EffectKind {
        self.kind
    }

    /// Magnitude (lower bound for ranges)
    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn value_max(&self) -> Option<f64> {
        self.value_max
    }

    /// Raw (min, max) bounds; single values are their own range
    pub fn bounds(&self) -> (f64, f64) {
        (self.value, self.value_max.unwrap_or(self.value))
    }

    pub fn scope(&self) -> EffectScope {
        self.scope
    }

    pub fn is_local(&self) -> bool {
        self.scope == EffectScope::Local
    }

    pub fn qualifier(&self) -> Option<&Qualifier> {
        self.qualifier.as_ref()
    }

    /// Tag restriction, if the qualifier is a tag
    pub fn required_tag(&self) -> Option<SkillTag> {
        match self.qualifier {
            Some(Qualifier::Tag(tag)) => Some(tag),
            _ => None,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Whether this effect applies to a skill with the given tags
    pub fn applies_to_tags(&self, tags: &[SkillTag]) -> bool {
        self.required_tag().map_or(true, |tag| tags.contains(&tag))
    }
}
