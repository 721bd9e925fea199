//! build_cli - file loading and text output around build_core
//!
//! The binary is a thin clap layer over these helpers.

pub mod simulation;

use build_core::config::{
    load_ailment_configs, load_constants, load_json, load_skill_configs, load_toml, ConfigError,
};
use build_core::damage::CalculationResult;
use build_core::dot::AilmentRegistry;
use build_core::prelude::*;
use std::fmt::Write;
use std::path::Path;
use tracing::info;

/// Character record (JSON)
pub fn load_character(path: &Path) -> Result<Character, ConfigError> {
    let character: Character = load_json(path)?;
    info!(name = %character.name, level = character.level, items = character.items.len(), "loaded character");
    Ok(character)
}

/// Passive node id -> modifier lines (JSON)
pub fn load_tree(path: &Path) -> Result<PassiveTree, ConfigError> {
    let tree: PassiveTree = load_json(path)?;
    info!(nodes = tree.len(), "loaded passive tree");
    Ok(tree)
}

/// Calculation options (TOML)
pub fn load_options(path: &Path) -> Result<CalcOptions, ConfigError> {
    load_toml(path)
}

/// Engine over the embedded data, with any of its tables replaced from files
pub fn build_engine(
    constants: Option<&Path>,
    skills: Option<&Path>,
    ailments: Option<&Path>,
) -> Result<Engine, ConfigError> {
    let constants = match constants {
        Some(path) => load_constants(path)?,
        None => GameConstants::default(),
    };
    let skills = match skills {
        Some(path) => load_skill_configs(path)?,
        None => default_skills(),
    };
    let ailments = match ailments {
        Some(path) => load_ailment_configs(path)?,
        None => AilmentRegistry::with_defaults(),
    };
    Ok(Engine::new(skills, ailments, constants))
}

/// Human-readable summary of a calculation
pub fn format_summary(result: &CalculationResult) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail
    let _ = write_summary(&mut out, result);
    out
}

fn write_summary(out: &mut String, result: &CalculationResult) -> std::fmt::Result {
    writeln!(
        out,
        "{} (level {} {})",
        result.character, result.level, result.class
    )?;
    writeln!(out, "Skill: {}", result.skill)?;
    writeln!(out)?;
    writeln!(out, "Hit DPS:        {:>12.1}", result.total_dps)?;
    for (damage_type, dps) in result.dps_by_type.iter() {
        if dps > 0.0 {
            writeln!(out, "  {:<12}  {:>12.1}", format!("{:?}", damage_type), dps)?;
        }
    }
    if result.combo_multiplier > 1.0 {
        writeln!(
            out,
            "Combo DPS:      {:>12.1}  (x{:.2})",
            result.combo_dps, result.combo_multiplier
        )?;
    }
    for ailment in result.ailments.iter().filter(|a| a.dps > 0.0) {
        writeln!(out, "  {:<12}  {:>12.1}", format!("{:?}", ailment.ailment), ailment.dps)?;
    }
    if let Some(minion) = &result.minion {
        writeln!(
            out,
            "Minions:        {:>12.1}  ({} x {})",
            minion.total_dps, minion.count, minion.name
        )?;
    }
    writeln!(out, "Effective DPS:  {:>12.1}", result.effective_dps)?;
    writeln!(out)?;
    writeln!(out, "Average hit:    {:>12.1}", result.average_hit)?;
    writeln!(out, "Uses/second:    {:>12.2}", result.uses_per_second)?;
    writeln!(out, "Hit chance:     {:>11.1}%", result.hit_chance)?;
    writeln!(out, "Crit chance:    {:>11.1}%", result.crit_chance)?;
    writeln!(out, "Crit multi:     {:>11.1}%", result.crit_multiplier)?;
    if let Some(per_mana) = result.resources.damage_per_mana {
        writeln!(out, "Damage/mana:    {:>12.1}", per_mana)?;
    }
    writeln!(out)?;

    let defense = &result.defense;
    writeln!(
        out,
        "Life {:.0}  ES {:.0}  Mana {:.0}",
        defense.life, defense.energy_shield, defense.mana
    )?;
    writeln!(
        out,
        "Armour {:.0}  Evasion {:.0}  Block {:.0}%",
        defense.armour, defense.evasion, defense.block_chance
    )?;
    writeln!(
        out,
        "Resists {:.0}/{:.0}/{:.0}/{:.0}",
        defense.capped_resistances.fire,
        defense.capped_resistances.cold,
        defense.capped_resistances.lightning,
        defense.capped_resistances.chaos
    )?;
    writeln!(out, "Effective HP:   {:>12.0}", defense.effective_hp)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_lists_damage() {
        let character = Character::new("Summary", "Warrior", 10).with_item(
            Item::new(EquipmentSlot::MainHand, "Club")
                .with_class("One Hand Maces")
                .with_property("Physical Damage", "10-20")
                .with_property("Attacks per Second", "1.5"),
        );
        let result = calculate(&character, &PassiveTree::new(), &CalcOptions::default()).unwrap();
        let summary = format_summary(&result);
        assert!(summary.starts_with("Summary (level 10 Warrior)"));
        assert!(summary.contains("Skill: Basic Attack"));
        assert!(summary.contains("Physical"));
        assert!(!summary.contains("Minions"));
    }

    #[test]
    fn test_default_engine() {
        let engine = build_engine(None, None, None).unwrap();
        assert!(engine.skills().skill_count() > 0);
        assert_eq!(engine.constants(), &GameConstants::default());
    }

    #[test]
    fn test_missing_constants_file() {
        let err = build_engine(Some(Path::new("/nonexistent/constants.toml")), None, None);
        assert!(matches!(err, Err(ConfigError::IoError(_))));
    }
}
