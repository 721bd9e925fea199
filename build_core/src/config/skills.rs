//! Skill and support gem database

use super::ConfigError;
use crate::modifier::{parse_modifiers, Effect};
use crate::types::{DamageRange, DamageType, SkillTag};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// One base damage line of a skill gem ("Deals 12 to 18 Fire Damage")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseDamage {
    #[serde(rename = "type")]
    pub damage_type: DamageType,
    pub min: f64,
    pub max: f64,
}

impl BaseDamage {
    pub fn range(&self) -> Option<DamageRange> {
        DamageRange::new(self.min, self.max)
    }
}

/// Summoned creature stats for minion skills
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinionBase {
    pub name: String,
    #[serde(default = "default_minion_type")]
    pub damage_type: DamageType,
    pub damage_min: f64,
    pub damage_max: f64,
    #[serde(default = "default_one")]
    pub attacks_per_second: f64,
    #[serde(default = "default_minion_crit")]
    pub crit_chance: f64,
    #[serde(default = "default_minion_count")]
    pub count: u32,
    #[serde(default)]
    pub life: f64,
    /// Percent growth of minion damage per gem level above 1
    #[serde(default)]
    pub damage_per_level: f64,
}

fn default_minion_type() -> DamageType {
    DamageType::Physical
}
fn default_one() -> f64 {
    1.0
}
fn default_minion_crit() -> f64 {
    5.0
}
fn default_minion_count() -> u32 {
    1
}

/// Active skill gem definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillDefinition {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub tags: Vec<SkillTag>,
    /// Percentage of weapon/skill base damage the skill deals at level 1
    #[serde(default = "default_effectiveness")]
    pub damage_effectiveness: f64,
    /// Effectiveness points gained per gem level above 1
    #[serde(default)]
    pub effectiveness_per_level: f64,
    #[serde(default)]
    pub base_damages: Vec<BaseDamage>,
    /// Percent growth of base damages per gem level above 1
    #[serde(default)]
    pub base_damage_per_level: f64,
    /// Cast time in seconds for spells
    #[serde(default)]
    pub cast_time: Option<f64>,
    /// Spell base critical hit chance; attacks use the weapon's
    #[serde(default)]
    pub base_crit_chance: Option<f64>,
    /// Attack speed as percent of weapon speed
    #[serde(default = "default_effectiveness")]
    pub attack_speed_multiplier: f64,
    #[serde(default)]
    pub mana_cost: f64,
    #[serde(default)]
    pub spirit_cost: f64,
    #[serde(default)]
    pub combo_cost: u32,
    #[serde(default)]
    pub combo_generation: u32,
    /// Increased damage per point of gem quality
    #[serde(default = "default_quality_damage")]
    pub quality_increased_damage: f64,
    /// Extra modifier lines the gem grants while active
    #[serde(default)]
    pub modifiers: Vec<String>,
    #[serde(default)]
    pub minion: Option<MinionBase>,
}

fn default_effectiveness() -> f64 {
    100.0
}
fn default_quality_damage() -> f64 {
    0.5
}

impl SkillDefinition {
    /// Canonical fallback when no usable skill is configured
    pub fn basic_attack() -> Self {
        SkillDefinition {
            id: "basic_attack".to_string(),
            name: "Basic Attack".to_string(),
            tags: vec![SkillTag::Attack, SkillTag::Melee, SkillTag::Strike],
            damage_effectiveness: 100.0,
            effectiveness_per_level: 0.0,
            base_damages: Vec::new(),
            base_damage_per_level: 0.0,
            cast_time: None,
            base_crit_chance: None,
            attack_speed_multiplier: 100.0,
            mana_cost: 0.0,
            spirit_cost: 0.0,
            combo_cost: 0,
            combo_generation: 0,
            quality_increased_damage: 0.0,
            modifiers: Vec::new(),
            minion: None,
        }
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

    /// Modifier lines granted by the gem itself, parsed
    pub fn effects(&self) -> Vec<Effect> {
        parse_modifiers(&self.modifiers, &format!("skill:{}", self.id)).effects
    }
}

/// Support gem definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupportDefinition {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub modifiers: Vec<String>,
    /// Mana cost multiplier in percent (130 = 30% more cost)
    #[serde(default = "default_effectiveness")]
    pub cost_multiplier: f64,
    /// Spirit cost added to a persistent supported skill
    #[serde(default)]
    pub spirit_cost: f64,
}

impl SupportDefinition {
    pub fn effects(&self) -> Vec<Effect> {
        parse_modifiers(&self.modifiers, &format!("support:{}", self.id)).effects
    }
}

/// Container for skill configurations
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SkillsConfig {
    #[serde(default)]
    pub skills: Vec<SkillDefinition>,
    #[serde(default)]
    pub supports: Vec<SupportDefinition>,
}

/// Skill and support lookup, keyed by normalized id
#[derive(Debug, Clone, Default)]
pub struct SkillDatabase {
    skills: HashMap<String, SkillDefinition>,
    supports: HashMap<String, SupportDefinition>,
}

impl SkillDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_skill(&mut self, skill: SkillDefinition) {
        self.skills.insert(normalize_key(&skill.id), skill);
    }

    pub fn register_support(&mut self, support: SupportDefinition) {
        self.supports.insert(normalize_key(&support.id), support);
    }

    /// Find a skill by id or display name ("Heavy Strike", "heavy_strike")
    pub fn skill(&self, name: &str) -> Option<&SkillDefinition> {
        self.skills.get(&normalize_key(name))
    }

    /// Find a support by id or display name; "Support" suffixes are ignored
    pub fn support(&self, name: &str) -> Option<&SupportDefinition> {
        let key = normalize_key(name);
        self.supports.get(&key).or_else(|| {
            let trimmed = key.trim_end_matches("_support");
            self.supports.get(trimmed)
        })
    }

    pub fn skill_count(&self) -> usize {
        self.skills.len()
    }

    pub fn support_count(&self) -> usize {
        self.supports.len()
    }

    fn from_config(config: SkillsConfig) -> Result<Self, ConfigError> {
        let mut database = SkillDatabase::new();
        for skill in config.skills {
            if skill.damage_effectiveness < 0.0 {
                return Err(ConfigError::ValidationError(format!(
                    "skill {} has negative damage effectiveness",
                    skill.id
                )));
            }
            if let Some(bad) = skill.base_damages.iter().find(|d| d.range().is_none()) {
                return Err(ConfigError::ValidationError(format!(
                    "skill {} has invalid {:?} damage range {}-{}",
                    skill.id, bad.damage_type, bad.min, bad.max
                )));
            }
            database.register_skill(skill);
        }
        for support in config.supports {
            database.register_support(support);
        }
        Ok(database)
    }
}

fn normalize_key(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

/// Load skill configurations from a TOML file
pub fn load_skill_configs(path: &Path) -> Result<SkillDatabase, ConfigError> {
    let config: SkillsConfig = super::load_toml(path)?;
    SkillDatabase::from_config(config)
}

/// Load skill configurations from a TOML string
pub fn parse_skill_configs(content: &str) -> Result<SkillDatabase, ConfigError> {
    let config: SkillsConfig = super::parse_toml(content)?;
    SkillDatabase::from_config(config)
}

/// Get default skill configurations
pub fn default_skills() -> SkillDatabase {
    let toml = include_str!("../../config/skills.toml");
    parse_skill_configs(toml).unwrap_or_else(|err| {
        tracing::warn!(%err, "embedded skill database failed to load");
        let mut database = SkillDatabase::new();
        database.register_skill(SkillDefinition::basic_attack());
        database
    })
}
