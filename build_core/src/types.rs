//! Core types shared across the engine

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Index, IndexMut, Mul};

/// Damage channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DamageType {
    Physical,
    Fire,
    Cold,
    Lightning,
    Chaos,
}

impl DamageType {
    /// All damage channels in pipeline order
    pub const ALL: [DamageType; 5] = [
        DamageType::Physical,
        DamageType::Fire,
        DamageType::Cold,
        DamageType::Lightning,
        DamageType::Chaos,
    ];

    pub fn is_elemental(self) -> bool {
        matches!(self, DamageType::Fire | DamageType::Cold | DamageType::Lightning)
    }

    /// Parse a lowercase channel name as it appears in modifier text
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "physical" => Some(DamageType::Physical),
            "fire" => Some(DamageType::Fire),
            "cold" => Some(DamageType::Cold),
            "lightning" => Some(DamageType::Lightning),
            "chaos" => Some(DamageType::Chaos),
            _ => None,
        }
    }

    fn index(self) -> usize {
        match self {
            DamageType::Physical => 0,
            DamageType::Fire => 1,
            DamageType::Cold => 2,
            DamageType::Lightning => 3,
            DamageType::Chaos => 4,
        }
    }
}

/// One non-negative value per damage channel
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DamageComponents {
    pub physical: f64,
    pub fire: f64,
    pub cold: f64,
    pub lightning: f64,
    pub chaos: f64,
}

impl DamageComponents {
    pub fn zero() -> Self {
        Self::default()
    }

    /// Build from a single channel value
    pub fn single(damage_type: DamageType, amount: f64) -> Self {
        let mut components = Self::zero();
        components[damage_type] = amount.max(0.0);
        components
    }

    pub fn total(&self) -> f64 {
        self.physical + self.fire + self.cold + self.lightning + self.chaos
    }

    /// Add to one channel, ignoring negative or non-finite amounts
    pub fn add(&mut self, damage_type: DamageType, amount: f64) {
        if amount.is_finite() && amount > 0.0 {
            self[damage_type] += amount;
        }
    }

    /// Apply a per-channel function, clamping the result to be non-negative
    pub fn map(&self, mut f: impl FnMut(DamageType, f64) -> f64) -> Self {
        let mut out = Self::zero();
        for damage_type in DamageType::ALL {
            let value = f(damage_type, self[damage_type]);
            out[damage_type] = if value.is_finite() { value.max(0.0) } else { 0.0 };
        }
        out
    }

    pub fn iter(&self) -> impl Iterator<Item = (DamageType, f64)> + '_ {
        DamageType::ALL.into_iter().map(move |dt| (dt, self[dt]))
    }

    pub fn is_zero(&self) -> bool {
        self.total() <= 0.0
    }
}

impl Index<DamageType> for DamageComponents {
    type Output = f64;

    fn index(&self, damage_type: DamageType) -> &f64 {
        match damage_type.index() {
            0 => &self.physical,
            1 => &self.fire,
            2 => &self.cold,
            3 => &self.lightning,
            _ => &self.chaos,
        }
    }
}

impl IndexMut<DamageType> for DamageComponents {
    fn index_mut(&mut self, damage_type: DamageType) -> &mut f64 {
        match damage_type.index() {
            0 => &mut self.physical,
            1 => &mut self.fire,
            2 => &mut self.cold,
            3 => &mut self.lightning,
            _ => &mut self.chaos,
        }
    }
}

impl Add for DamageComponents {
    type Output = DamageComponents;

    fn add(self, rhs: DamageComponents) -> DamageComponents {
        self.map(|dt, v| v + rhs[dt])
    }
}

impl AddAssign for DamageComponents {
    fn add_assign(&mut self, rhs: DamageComponents) {
        *self = *self + rhs;
    }
}

impl Mul<f64> for DamageComponents {
    type Output = DamageComponents;

    fn mul(self, rhs: f64) -> DamageComponents {
        self.map(|_, v| v * rhs)
    }
}

/// Min/max damage range for one channel
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DamageRange {
    pub min: f64,
    pub max: f64,
}

impl DamageRange {
    /// Create a range; returns `None` when `min > max` or either bound is negative
    pub fn new(min: f64, max: f64) -> Option<Self> {
        if !min.is_finite() || !max.is_finite() || min < 0.0 || min > max {
            return None;
        }
        Some(DamageRange { min, max })
    }

    pub fn average(&self) -> f64 {
        (self.min + self.max) / 2.0
    }

    pub fn is_zero(&self) -> bool {
        self.max <= 0.0
    }
}

impl Add for DamageRange {
    type Output = DamageRange;

    fn add(self, rhs: DamageRange) -> DamageRange {
        DamageRange {
            min: self.min + rhs.min,
            max: self.max + rhs.max,
        }
    }
}

/// Skill tags for damage scaling and categorization
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillTag {
    // Damage source
    Attack,
    Spell,
    // Delivery
    Melee,
    Projectile,
    Area,
    Strike,
    Slam,
    // Persistent
    Minion,
    Persistent,
    Buff,
    Totem,
}

impl SkillTag {
    /// Parse a tag word as it appears in modifier text ("attack", "spells", ...)
    pub fn from_word(word: &str) -> Option<Self> {
        match word.trim_end_matches('s') {
            "attack" => Some(SkillTag::Attack),
            "spell" => Some(SkillTag::Spell),
            "melee" => Some(SkillTag::Melee),
            "projectile" => Some(SkillTag::Projectile),
            "area" => Some(SkillTag::Area),
            "strike" => Some(SkillTag::Strike),
            "slam" => Some(SkillTag::Slam),
            "minion" => Some(SkillTag::Minion),
            "persistent" => Some(SkillTag::Persistent),
            "buff" => Some(SkillTag::Buff),
            "totem" => Some(SkillTag::Totem),
            _ => None,
        }
    }
}

/// Equipment slot for gear
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentSlot {
    MainHand,
    OffHand,
    Helmet,
    BodyArmour,
    Gloves,
    Boots,
    Ring1,
    Ring2,
    Amulet,
    Belt,
    Charm,
    Flask,
}

impl EquipmentSlot {
    /// Get all equipment slots
    pub fn all() -> &'static [EquipmentSlot] {
        &[
            EquipmentSlot::MainHand,
            EquipmentSlot::OffHand,
            EquipmentSlot::Helmet,
            EquipmentSlot::BodyArmour,
            EquipmentSlot::Gloves,
            EquipmentSlot::Boots,
            EquipmentSlot::Ring1,
            EquipmentSlot::Ring2,
            EquipmentSlot::Amulet,
            EquipmentSlot::Belt,
            EquipmentSlot::Charm,
            EquipmentSlot::Flask,
        ]
    }

    /// Flasks and charms only apply while active, so their mods are not part of the static build
    pub fn contributes_stats(self) -> bool {
        !matches!(self, EquipmentSlot::Flask | EquipmentSlot::Charm)
    }
}

/// Weapon class of the equipped main hand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaponClass {
    Unarmed,
    OneHandMace,
    TwoHandMace,
    Quarterstaff,
    Spear,
    Sword,
    Axe,
    Dagger,
    Claw,
    Flail,
    Bow,
    Crossbow,
    Wand,
    Staff,
    Sceptre,
}

impl WeaponClass {
    /// Map an item class string from the game API to a weapon class
    pub fn from_item_class(class: &str) -> Option<Self> {
        let class = class.to_ascii_lowercase();
        let class = class.trim();
        let weapon = match class {
            "one hand mace" | "one hand maces" => WeaponClass::OneHandMace,
            "two hand mace" | "two hand maces" => WeaponClass::TwoHandMace,
            "quarterstaff" | "quarterstaves" | "warstaff" | "warstaves" => WeaponClass::Quarterstaff,
            "spear" | "spears" => WeaponClass::Spear,
            "one hand sword" | "two hand sword" | "sword" | "swords" => WeaponClass::Sword,
            "one hand axe" | "two hand axe" | "axe" | "axes" => WeaponClass::Axe,
            "dagger" | "daggers" => WeaponClass::Dagger,
            "claw" | "claws" => WeaponClass::Claw,
            "flail" | "flails" => WeaponClass::Flail,
            "bow" | "bows" => WeaponClass::Bow,
            "crossbow" | "crossbows" => WeaponClass::Crossbow,
            "wand" | "wands" => WeaponClass::Wand,
            "staff" | "staves" => WeaponClass::Staff,
            "sceptre" | "sceptres" => WeaponClass::Sceptre,
            _ => return None,
        };
        Some(weapon)
    }
}

/// Damaging ailments handled by the DoT engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ailment {
    Bleed,
    Ignite,
    Poison,
}

impl Ailment {
    pub const ALL: [Ailment; 3] = [Ailment::Bleed, Ailment::Ignite, Ailment::Poison];

    /// Parse an ailment word as it appears in modifier text
    pub fn from_word(word: &str) -> Option<Self> {
        match word {
            "bleed" | "bleeding" => Some(Ailment::Bleed),
            "ignite" | "ignited" | "burning" => Some(Ailment::Ignite),
            "poison" | "poisoned" => Some(Ailment::Poison),
            _ => None,
        }
    }
}
