//! Per-calculation options

use super::GameConstants;
use crate::types::Ailment;
use serde::{Deserialize, Serialize};

/// Which damaging ailments are included in the result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AilmentToggles {
    #[serde(default = "enabled")]
    pub bleed: bool,
    #[serde(default = "enabled")]
    pub ignite: bool,
    #[serde(default = "enabled")]
    pub poison: bool,
}

impl Default for AilmentToggles {
    fn default() -> Self {
        AilmentToggles {
            bleed: true,
            ignite: true,
            poison: true,
        }
    }
}

impl AilmentToggles {
    pub fn is_enabled(&self, ailment: Ailment) -> bool {
        match ailment {
            Ailment::Bleed => self.bleed,
            Ailment::Ignite => self.ignite,
            Ailment::Poison => self.poison,
        }
    }
}

fn enabled() -> bool {
    true
}

/// Minion build parameters; unset fields come from the skill database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinionOptions {
    #[serde(default = "enabled")]
    pub enabled: bool,
    /// Minion skill to evaluate; defaults to the first configured minion skill
    #[serde(default)]
    pub skill: Option<String>,
    #[serde(default)]
    pub count: Option<u32>,
    #[serde(default)]
    pub damage_min: Option<f64>,
    #[serde(default)]
    pub damage_max: Option<f64>,
    #[serde(default)]
    pub attacks_per_second: Option<f64>,
}

impl Default for MinionOptions {
    fn default() -> Self {
        MinionOptions {
            enabled: true,
            skill: None,
            count: None,
            damage_min: None,
            damage_max: None,
            attacks_per_second: None,
        }
    }
}

/// A buff the player keeps up while fighting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuffConfig {
    pub name: String,
    #[serde(default)]
    pub modifiers: Vec<String>,
    #[serde(default = "default_stacks")]
    pub stacks: u32,
}

fn default_stacks() -> u32 {
    1
}

/// Optional calculation configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalcOptions {
    /// Skill to evaluate; defaults to the character's first skill
    #[serde(default)]
    pub selected_skill: Option<String>,
    /// Target evasion rating; takes precedence over `enemy_level`
    #[serde(default)]
    pub enemy_evasion: Option<f64>,
    /// Target level, used to estimate evasion when none is given
    #[serde(default)]
    pub enemy_level: Option<u32>,
    /// Replace the character's resolved accuracy
    #[serde(default)]
    pub accuracy_override: Option<f64>,
    /// Combo stacks consumed per use; defaults to the skill's combo cost
    #[serde(default)]
    pub combo_stacks: Option<u32>,
    #[serde(default)]
    pub ailments: AilmentToggles,
    #[serde(default)]
    pub minion: MinionOptions,
    #[serde(default)]
    pub buffs: Vec<BuffConfig>,
    /// Replaces the caller-supplied constants for this calculation
    #[serde(default)]
    pub constants: Option<GameConstants>,
}

impl CalcOptions {
    pub fn with_skill(mut self, skill: impl Into<String>) -> Self {
        self.selected_skill = Some(skill.into());
        self
    }

    pub fn with_enemy_evasion(mut self, evasion: f64) -> Self {
        self.enemy_evasion = Some(evasion);
        self
    }

    pub fn with_accuracy(mut self, accuracy: f64) -> Self {
        self.accuracy_override = Some(accuracy);
        self
    }

    pub fn with_buff(mut self, name: impl Into<String>, modifiers: Vec<String>, stacks: u32) -> Self {
        self.buffs.push(BuffConfig {
            name: name.into(),
            modifiers,
            stacks,
        });
        self
    }

    /// Evasion of the target: explicit value, else estimated from its level, else zero
    pub fn target_evasion(&self, constants: &GameConstants) -> f64 {
        match (self.enemy_evasion, self.enemy_level) {
            (Some(evasion), _) => evasion,
            (None, Some(level)) => {
                constants.hit.enemy_evasion_base
                    + constants.hit.enemy_evasion_per_level * f64::from(level.saturating_sub(1))
            }
            (None, None) => 0.0,
        }
    }
}
