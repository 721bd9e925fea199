//! Game constants configuration
//!
//! Every value here is a patch-dependent game-mechanics number. Formulas read
//! them from a `GameConstants` instead of embedding literals.

use serde::{Deserialize, Serialize};

/// Tunable game constants
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameConstants {
    #[serde(default)]
    pub hit: HitConstants,
    #[serde(default)]
    pub crit: CritConstants,
    #[serde(default)]
    pub combo: ComboConstants,
    #[serde(default)]
    pub resistances: ResistanceConstants,
    #[serde(default)]
    pub armour: ArmourConstants,
    #[serde(default)]
    pub block: BlockConstants,
    #[serde(default)]
    pub character: CharacterConstants,
}

impl GameConstants {
    /// Every floating-point field by its TOML path
    fn fields(&self) -> Vec<(&'static str, f64)> {
        let GameConstants {
            hit,
            crit,
            combo,
            resistances,
            armour,
            block,
            character,
        } = self;
        vec![
            ("hit.evasion_divisor", hit.evasion_divisor),
            ("hit.evasion_exponent", hit.evasion_exponent),
            ("hit.min_chance", hit.min_chance),
            ("hit.max_chance", hit.max_chance),
            ("hit.enemy_evasion_base", hit.enemy_evasion_base),
            ("hit.enemy_evasion_per_level", hit.enemy_evasion_per_level),
            ("crit.base_bonus", crit.base_bonus),
            ("crit.min_chance", crit.min_chance),
            ("crit.max_chance", crit.max_chance),
            ("combo.bonus_per_stack", combo.bonus_per_stack),
            ("resistances.default_cap", resistances.default_cap),
            ("resistances.hard_cap", resistances.hard_cap),
            ("resistances.min_value", resistances.min_value),
            ("armour.damage_constant", armour.damage_constant),
            ("armour.max_reduction", armour.max_reduction),
            ("armour.reference_hit", armour.reference_hit),
            ("block.cap", block.cap),
            ("character.base_life", character.base_life),
            ("character.life_per_level", character.life_per_level),
            ("character.base_mana", character.base_mana),
            ("character.mana_per_level", character.mana_per_level),
            ("character.base_spirit", character.base_spirit),
            ("character.base_accuracy", character.base_accuracy),
            ("character.accuracy_per_level", character.accuracy_per_level),
            ("character.life_per_strength", character.life_per_strength),
            ("character.accuracy_per_dexterity", character.accuracy_per_dexterity),
            ("character.mana_per_intelligence", character.mana_per_intelligence),
            ("character.base_evasion", character.base_evasion),
            ("character.enemy_accuracy", character.enemy_accuracy),
        ]
    }

    /// Check relationships between values that serde cannot express
    pub fn validate(&self) -> Result<(), String> {
        if let Some((name, _)) = self.fields().into_iter().find(|(_, value)| !value.is_finite()) {
            return Err(format!("{name} must be a finite number"));
        }

        check_chance_bounds("hit", self.hit.min_chance, self.hit.max_chance)?;
        check_chance_bounds("crit", self.crit.min_chance, self.crit.max_chance)?;
        if self.hit.evasion_divisor <= 0.0 {
            return Err("hit.evasion_divisor must be positive".to_string());
        }
        if self.hit.evasion_exponent <= 0.0 {
            return Err("hit.evasion_exponent must be positive".to_string());
        }
        if self.hit.enemy_evasion_base < 0.0 || self.hit.enemy_evasion_per_level < 0.0 {
            return Err("hit.enemy_evasion_base and hit.enemy_evasion_per_level must be non-negative".to_string());
        }
        if self.combo.bonus_per_stack < 0.0 {
            return Err("combo.bonus_per_stack must be non-negative".to_string());
        }
        if self.resistances.default_cap > self.resistances.hard_cap {
            return Err("resistances.default_cap exceeds resistances.hard_cap".to_string());
        }
        if self.resistances.hard_cap >= 100.0 {
            return Err("resistances.hard_cap must be below 100".to_string());
        }
        if self.resistances.min_value > self.resistances.default_cap {
            return Err("resistances.min_value exceeds resistances.default_cap".to_string());
        }
        if self.armour.damage_constant <= 0.0 {
            return Err("armour.damage_constant must be positive".to_string());
        }
        if self.armour.max_reduction >= 100.0 || self.armour.max_reduction < 0.0 {
            return Err("armour.max_reduction must be in [0, 100)".to_string());
        }
        if self.armour.reference_hit <= 0.0 {
            return Err("armour.reference_hit must be positive".to_string());
        }
        if !(0.0..=100.0).contains(&self.block.cap) {
            return Err("block.cap must be in [0, 100]".to_string());
        }
        Ok(())
    }
}

/// Both bounds of a percent chance in [0, 100], min not above max
fn check_chance_bounds(section: &str, min: f64, max: f64) -> Result<(), String> {
    if !(0.0..=100.0).contains(&min) {
        return Err(format!("{section}.min_chance must be in [0, 100], got {min}"));
    }
    if !(0.0..=100.0).contains(&max) {
        return Err(format!("{section}.max_chance must be in [0, 100], got {max}"));
    }
    if min > max {
        return Err(format!("{section}.min_chance exceeds {section}.max_chance"));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HitConstants {
    /// Evasion is divided by this before the exponent is applied
    #[serde(default = "default_evasion_divisor")]
    pub evasion_divisor: f64,
    #[serde(default = "default_evasion_exponent")]
    pub evasion_exponent: f64,
    #[serde(default = "default_hit_min")]
    pub min_chance: f64,
    #[serde(default = "default_hundred")]
    pub max_chance: f64,
    /// Estimated evasion of a level 1 enemy when only its level is known
    #[serde(default = "default_enemy_evasion_base")]
    pub enemy_evasion_base: f64,
    #[serde(default = "default_enemy_evasion_per_level")]
    pub enemy_evasion_per_level: f64,
}

impl Default for HitConstants {
    fn default() -> Self {
        HitConstants {
            evasion_divisor: 4.0,
            evasion_exponent: 0.9,
            min_chance: 5.0,
            max_chance: 100.0,
            enemy_evasion_base: 30.0,
            enemy_evasion_per_level: 22.0,
        }
    }
}

fn default_evasion_divisor() -> f64 {
    4.0
}
fn default_evasion_exponent() -> f64 {
    0.9
}
fn default_enemy_evasion_base() -> f64 {
    30.0
}
fn default_enemy_evasion_per_level() -> f64 {
    22.0
}
fn default_hit_min() -> f64 {
    5.0
}
fn default_hundred() -> f64 {
    100.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CritConstants {
    /// Critical damage bonus every hit starts with (100 = hits deal 200%)
    #[serde(default = "default_hundred")]
    pub base_bonus: f64,
    #[serde(default)]
    pub min_chance: f64,
    #[serde(default = "default_hundred")]
    pub max_chance: f64,
}

impl Default for CritConstants {
    fn default() -> Self {
        CritConstants {
            base_bonus: 100.0,
            min_chance: 0.0,
            max_chance: 100.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComboConstants {
    /// Percent bonus per consumed combo stack
    #[serde(default = "default_combo_bonus")]
    pub bonus_per_stack: f64,
    #[serde(default = "default_combo_max")]
    pub max_stacks: u32,
}

impl Default for ComboConstants {
    fn default() -> Self {
        ComboConstants {
            bonus_per_stack: 25.0,
            max_stacks: 10,
        }
    }
}

fn default_combo_bonus() -> f64 {
    25.0
}
fn default_combo_max() -> u32 {
    10
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResistanceConstants {
    /// Cap before any maximum-resistance modifiers
    #[serde(default = "default_res_cap")]
    pub default_cap: f64,
    /// Absolute ceiling for maximum resistance
    #[serde(default = "default_res_hard_cap")]
    pub hard_cap: f64,
    /// Minimum resistance (can go negative)
    #[serde(default = "default_res_min")]
    pub min_value: f64,
}

impl Default for ResistanceConstants {
    fn default() -> Self {
        ResistanceConstants {
            default_cap: 75.0,
            hard_cap: 90.0,
            min_value: -200.0,
        }
    }
}

fn default_res_cap() -> f64 {
    75.0
}
fn default_res_hard_cap() -> f64 {
    90.0
}
fn default_res_min() -> f64 {
    -200.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArmourConstants {
    /// Formula constant: reduction = armour / (armour + constant × damage)
    #[serde(default = "default_damage_constant")]
    pub damage_constant: f64,
    /// Maximum physical reduction from armour, in percent
    #[serde(default = "default_max_reduction")]
    pub max_reduction: f64,
    /// Hit size used for summary numbers (EHP)
    #[serde(default = "default_reference_hit")]
    pub reference_hit: f64,
}

impl Default for ArmourConstants {
    fn default() -> Self {
        ArmourConstants {
            damage_constant: 10.0,
            max_reduction: 90.0,
            reference_hit: 1000.0,
        }
    }
}

fn default_damage_constant() -> f64 {
    10.0
}
fn default_max_reduction() -> f64 {
    90.0
}
fn default_reference_hit() -> f64 {
    1000.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockConstants {
    #[serde(default = "default_block_cap")]
    pub cap: f64,
}

impl Default for BlockConstants {
    fn default() -> Self {
        BlockConstants { cap: 75.0 }
    }
}

fn default_block_cap() -> f64 {
    75.0
}

/// Per-level and per-attribute character growth
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterConstants {
    #[serde(default = "default_base_life")]
    pub base_life: f64,
    #[serde(default = "default_life_per_level")]
    pub life_per_level: f64,
    #[serde(default = "default_base_mana")]
    pub base_mana: f64,
    #[serde(default = "default_mana_per_level")]
    pub mana_per_level: f64,
    #[serde(default = "default_hundred")]
    pub base_spirit: f64,
    #[serde(default)]
    pub base_accuracy: f64,
    #[serde(default = "default_accuracy_per_level")]
    pub accuracy_per_level: f64,
    #[serde(default = "default_two")]
    pub life_per_strength: f64,
    #[serde(default = "default_accuracy_per_dexterity")]
    pub accuracy_per_dexterity: f64,
    #[serde(default = "default_two")]
    pub mana_per_intelligence: f64,
    #[serde(default = "default_base_evasion")]
    pub base_evasion: f64,
    /// Accuracy of the reference enemy used for the chance-to-evade summary
    #[serde(default = "default_enemy_accuracy")]
    pub enemy_accuracy: f64,
}

impl Default for CharacterConstants {
    fn default() -> Self {
        CharacterConstants {
            base_life: 28.0,
            life_per_level: 12.0,
            base_mana: 30.0,
            mana_per_level: 4.0,
            base_spirit: 100.0,
            base_accuracy: 0.0,
            accuracy_per_level: 6.0,
            life_per_strength: 2.0,
            accuracy_per_dexterity: 6.0,
            mana_per_intelligence: 2.0,
            base_evasion: 15.0,
            enemy_accuracy: 1500.0,
        }
    }
}

fn default_base_life() -> f64 {
    28.0
}
fn default_life_per_level() -> f64 {
    12.0
}
fn default_base_mana() -> f64 {
    30.0
}
fn default_mana_per_level() -> f64 {
    4.0
}
fn default_accuracy_per_level() -> f64 {
    6.0
}
fn default_two() -> f64 {
    2.0
}
fn default_accuracy_per_dexterity() -> f64 {
    6.0
}
fn default_base_evasion() -> f64 {
    15.0
}
fn default_enemy_accuracy() -> f64 {
    1500.0
}
