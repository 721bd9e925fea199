//! Flat JSON export of a calculation

use super::result::CalculationResult;
use crate::config::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Flat report: character identity, final DPS and the key stats
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildReport {
    pub character: String,
    pub class: String,
    pub level: u32,
    pub skill: String,
    pub total_dps: f64,
    pub combo_dps: f64,
    pub effective_dps: f64,
    pub physical_dps: f64,
    pub fire_dps: f64,
    pub cold_dps: f64,
    pub lightning_dps: f64,
    pub chaos_dps: f64,
    pub ailment_dps: f64,
    pub minion_dps: f64,
    pub average_hit: f64,
    pub uses_per_second: f64,
    pub hit_chance: f64,
    pub crit_chance: f64,
    pub crit_multiplier: f64,
    pub mana_per_second: f64,
    pub spirit_efficiency: f64,
    pub life: f64,
    pub energy_shield: f64,
    pub mana: f64,
    pub armour: f64,
    pub evasion: f64,
    pub fire_resistance: f64,
    pub cold_resistance: f64,
    pub lightning_resistance: f64,
    pub chaos_resistance: f64,
    pub block_chance: f64,
    pub effective_hp: f64,
}

impl BuildReport {
    pub fn from_result(result: &CalculationResult) -> Self {
        let dps = &result.dps_by_type;
        let defense = &result.defense;
        BuildReport {
            character: result.character.clone(),
            class: result.class.clone(),
            level: result.level,
            skill: result.skill.clone(),
            total_dps: result.total_dps,
            combo_dps: result.combo_dps,
            effective_dps: result.effective_dps,
            physical_dps: dps.physical,
            fire_dps: dps.fire,
            cold_dps: dps.cold,
            lightning_dps: dps.lightning,
            chaos_dps: dps.chaos,
            ailment_dps: result.ailment_dps,
            minion_dps: result.minion.as_ref().map_or(0.0, |m| m.total_dps),
            average_hit: result.average_hit,
            uses_per_second: result.uses_per_second,
            hit_chance: result.hit_chance,
            crit_chance: result.crit_chance,
            crit_multiplier: result.crit_multiplier,
            mana_per_second: result.resources.mana_per_second,
            spirit_efficiency: result.resources.spirit_efficiency,
            life: defense.life,
            energy_shield: defense.energy_shield,
            mana: defense.mana,
            armour: defense.armour,
            evasion: defense.evasion,
            fire_resistance: defense.capped_resistances.fire,
            cold_resistance: defense.capped_resistances.cold,
            lightning_resistance: defense.capped_resistances.lightning,
            chaos_resistance: defense.capped_resistances.chaos,
            block_chance: defense.block_chance,
            effective_hp: defense.effective_hp,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Write a report as pretty JSON
pub fn write_report(path: &Path, report: &BuildReport) -> Result<(), ConfigError> {
    fs::write(path, report.to_json()?)?;
    Ok(())
}

/// Read a report written by [`write_report`]
pub fn read_report(path: &Path) -> Result<BuildReport, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(BuildReport::from_json(&content)?)
}
