//! Ailment configuration loading

use super::ConfigError;
use crate::dot::{AilmentConfig, AilmentRegistry};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Container for ailment configurations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AilmentsConfig {
    pub ailments: Vec<AilmentConfig>,
}

fn into_registry(config: AilmentsConfig) -> Result<AilmentRegistry, ConfigError> {
    let mut registry = AilmentRegistry::new();
    for ailment in config.ailments {
        if ailment.base_duration <= 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "{} has a non-positive duration",
                ailment.name
            )));
        }
        registry.register(ailment);
    }
    Ok(registry)
}

/// Load ailment configurations from a TOML file
pub fn load_ailment_configs(path: &Path) -> Result<AilmentRegistry, ConfigError> {
    let config: AilmentsConfig = super::load_toml(path)?;
    into_registry(config)
}

/// Load ailment configurations from a TOML string
pub fn parse_ailment_configs(content: &str) -> Result<AilmentRegistry, ConfigError> {
    let config: AilmentsConfig = super::parse_toml(content)?;
    into_registry(config)
}
