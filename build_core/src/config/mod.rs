//! Configuration loading from TOML files

mod ailments;
mod constants;
mod options;
mod skills;

pub use ailments::{load_ailment_configs, parse_ailment_configs};
pub use constants::{
    ArmourConstants, BlockConstants, CharacterConstants, ComboConstants, CritConstants,
    GameConstants, HitConstants, ResistanceConstants,
};
pub use options::{AilmentToggles, BuffConfig, CalcOptions, MinionOptions};
pub use skills::{
    default_skills, load_skill_configs, parse_skill_configs, BaseDamage, MinionBase,
    SkillDatabase, SkillDefinition, SupportDefinition,
};

use std::fs;
use std::path::Path;
use thiserror::Error;

/// Configuration loading error
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Configuration validation error: {0}")]
    ValidationError(String),
}

/// Load a TOML file and deserialize it
pub fn load_toml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_toml(&content)
}

/// Load a TOML string and deserialize it
pub fn parse_toml<T: serde::de::DeserializeOwned>(content: &str) -> Result<T, ConfigError> {
    let config: T = toml::from_str(content)?;
    Ok(config)
}

/// Load a JSON file and deserialize it (character records, passive trees)
pub fn load_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = fs::read_to_string(path)?;
    let value: T = serde_json::from_str(&content)?;
    Ok(value)
}

/// Load game constants from a TOML file and validate them
pub fn load_constants(path: &Path) -> Result<GameConstants, ConfigError> {
    let constants: GameConstants = load_toml(path)?;
    constants.validate().map_err(ConfigError::ValidationError)?;
    Ok(constants)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_toml_error_kind() {
        let result: Result<GameConstants, _> = parse_toml("[hit\nbroken");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let result: Result<GameConstants, _> = load_toml(Path::new("/nonexistent/constants.toml"));
        assert!(matches!(result, Err(ConfigError::IoError(_))));
    }

    #[test]
    fn test_load_constants_validates() {
        let path = std::env::temp_dir().join(format!("build_core_constants_{}.toml", std::process::id()));
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "[hit]\nmin_chance = 90\nmax_chance = 50").unwrap();
        drop(file);

        let result = load_constants(&path);
        let _ = fs::remove_file(&path);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }
}
