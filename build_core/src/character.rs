//! Character input records
//!
//! These mirror the shape of the game's character API: items carry their
//! modifier lines split by category and their base properties as display
//! strings ("10-20", "1.50").

use crate::types::{DamageRange, EquipmentSlot, WeaponClass};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A displayed item property ("Physical Damage: 10-20")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemProperty {
    pub name: String,
    #[serde(default)]
    pub values: Vec<String>,
}

impl ItemProperty {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        ItemProperty {
            name: name.into(),
            values: vec![value.into()],
        }
    }
}

/// An equipped item
///
/// `properties` describe the unmodified base type; local modifiers in the mod
/// lists are applied on top of them by the resolver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub slot: EquipmentSlot,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub base_type: String,
    /// Item class as reported by the game ("Two Hand Maces")
    #[serde(default)]
    pub item_class: Option<String>,
    #[serde(default)]
    pub properties: Vec<ItemProperty>,
    #[serde(default)]
    pub implicit_mods: Vec<String>,
    #[serde(default)]
    pub explicit_mods: Vec<String>,
    #[serde(default)]
    pub crafted_mods: Vec<String>,
    #[serde(default)]
    pub enchant_mods: Vec<String>,
    #[serde(default)]
    pub rune_mods: Vec<String>,
}

impl Item {
    pub fn new(slot: EquipmentSlot, name: impl Into<String>) -> Self {
        Item {
            slot,
            name: name.into(),
            base_type: String::new(),
            item_class: None,
            properties: Vec::new(),
            implicit_mods: Vec::new(),
            explicit_mods: Vec::new(),
            crafted_mods: Vec::new(),
            enchant_mods: Vec::new(),
            rune_mods: Vec::new(),
        }
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.item_class = Some(class.into());
        self
    }

    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.push(ItemProperty::new(name, value));
        self
    }

    pub fn with_explicit(mut self, modifier: impl Into<String>) -> Self {
        self.explicit_mods.push(modifier.into());
        self
    }

    /// Every modifier line on the item, in display order
    pub fn all_mods(&self) -> impl Iterator<Item = &String> {
        self.enchant_mods
            .iter()
            .chain(&self.rune_mods)
            .chain(&self.implicit_mods)
            .chain(&self.explicit_mods)
            .chain(&self.crafted_mods)
    }

    /// First value of a property, matched case-insensitively
    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
            .and_then(|p| p.values.first())
            .map(String::as_str)
    }

    /// Property parsed as a number ("1.50", "+25%", "8.00%")
    pub fn property_number(&self, name: &str) -> Option<f64> {
        self.property(name).and_then(parse_number)
    }

    /// Property parsed as a damage range ("10-20", "10 to 20")
    pub fn property_range(&self, name: &str) -> Option<DamageRange> {
        self.property(name).and_then(parse_range)
    }

    /// Weapon class from the item class string, if this is a weapon
    pub fn weapon_class(&self) -> Option<WeaponClass> {
        self.item_class.as_deref().and_then(WeaponClass::from_item_class)
    }
}

/// Parse a displayed number, ignoring a leading '+' and a trailing '%'
pub fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim().trim_end_matches('%').trim_start_matches('+').trim();
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a displayed "min-max" range; malformed or inverted ranges yield `None`
pub fn parse_range(raw: &str) -> Option<DamageRange> {
    let raw = raw.trim();
    let (min, max) = raw
        .split_once(" to ")
        .or_else(|| raw.split_once('-'))?;
    DamageRange::new(parse_number(min)?, parse_number(max)?)
}

/// A support gem socketed into a skill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupportGem {
    pub name: String,
    #[serde(default = "default_level")]
    pub level: u32,
    #[serde(default)]
    pub quality: u32,
}

/// A configured skill: the active gem plus its supports
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillSetup {
    pub name: String,
    #[serde(default = "default_level")]
    pub level: u32,
    #[serde(default)]
    pub quality: u32,
    /// Stat lines the game reports for the gem at its current level
    #[serde(default)]
    pub stats: Vec<String>,
    #[serde(default)]
    pub supports: Vec<SupportGem>,
}

impl SkillSetup {
    pub fn new(name: impl Into<String>) -> Self {
        SkillSetup {
            name: name.into(),
            level: 1,
            quality: 0,
            stats: Vec::new(),
            supports: Vec::new(),
        }
    }

    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level;
        self
    }

    pub fn with_support(mut self, name: impl Into<String>) -> Self {
        self.supports.push(SupportGem {
            name: name.into(),
            level: 1,
            quality: 0,
        });
        self
    }
}

fn default_level() -> u32 {
    1
}

/// Raw character record as fetched from the game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub name: String,
    #[serde(default)]
    pub class: String,
    #[serde(default = "default_level")]
    pub level: u32,
    #[serde(default)]
    pub items: Vec<Item>,
    /// Allocated passive node identifiers
    #[serde(default)]
    pub passives: Vec<String>,
    #[serde(default)]
    pub skills: Vec<SkillSetup>,
}

impl Character {
    pub fn new(name: impl Into<String>, class: impl Into<String>, level: u32) -> Self {
        Character {
            name: name.into(),
            class: class.into(),
            level,
            items: Vec::new(),
            passives: Vec::new(),
            skills: Vec::new(),
        }
    }

    pub fn with_item(mut self, item: Item) -> Self {
        self.items.push(item);
        self
    }

    pub fn with_skill(mut self, skill: SkillSetup) -> Self {
        self.skills.push(skill);
        self
    }

    pub fn with_passive(mut self, node: impl Into<String>) -> Self {
        self.passives.push(node.into());
        self
    }

    /// First item equipped in a slot
    pub fn item(&self, slot: EquipmentSlot) -> Option<&Item> {
        self.items.iter().find(|item| item.slot == slot)
    }

    pub fn main_hand(&self) -> Option<&Item> {
        self.item(EquipmentSlot::MainHand)
    }
}

/// Passive-tree reference data: node id → modifier lines
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PassiveTree(HashMap<String, Vec<String>>);

impl PassiveTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_node<I, S>(mut self, id: impl Into<String>, modifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.0
            .insert(id.into(), modifiers.into_iter().map(Into::into).collect());
        self
    }

    pub fn node(&self, id: &str) -> Option<&[String]> {
        self.0.get(id).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
