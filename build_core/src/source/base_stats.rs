//! BaseStatsSource - Stats from character level

use crate::config::CharacterConstants;
use crate::modifier::{Effect, EffectKind, Stat};
use crate::source::StatSource;

/// Stats from base character level
pub struct BaseStatsSource {
    /// Character level (1-100)
    pub level: u32,
    constants: CharacterConstants,
}

impl BaseStatsSource {
    /// Create a new base stats source
    pub fn new(level: u32, constants: CharacterConstants) -> Self {
        BaseStatsSource { level, constants }
    }

    fn levels_gained(&self) -> f64 {
        f64::from(self.level.saturating_sub(1))
    }
}

impl StatSource for BaseStatsSource {
    fn id(&self) -> &str {
        "base_stats"
    }

    fn priority(&self) -> i32 {
        -100 // Base stats apply first
    }

    fn effects(&self) -> Vec<Effect> {
        let c = &self.constants;
        let levels = self.levels_gained();
        [
            (Stat::Life, c.base_life + levels * c.life_per_level),
            (Stat::Mana, c.base_mana + levels * c.mana_per_level),
            (Stat::Spirit, c.base_spirit),
            (Stat::Accuracy, c.base_accuracy + levels * c.accuracy_per_level),
            (Stat::Evasion, c.base_evasion),
        ]
        .into_iter()
        .map(|(stat, value)| Effect::new(stat, EffectKind::Base, value).with_source(self.id()))
        .collect()
    }
}
