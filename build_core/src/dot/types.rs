//! Ailment type definitions

use crate::types::{Ailment, DamageType};
use serde::{Deserialize, Serialize};

/// Ailment stacking behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DotStacking {
    /// Only the strongest instance deals damage
    StrongestOnly,
    /// All instances stack and deal damage independently
    Unlimited,
    /// Strongest + up to N stacks at reduced effectiveness
    Limited {
        max_stacks: u32,
        /// Effectiveness of additional stacks (e.g., 0.5 = 50%)
        stack_effectiveness: f64,
    },
}

impl DotStacking {
    /// Damage multiplier relative to one instance, given the average number
    /// of instances that would be active at once
    pub fn effective_instances(&self, concurrent: f64) -> f64 {
        if concurrent <= 0.0 {
            return 0.0;
        }
        match self {
            DotStacking::StrongestOnly => concurrent.min(1.0),
            DotStacking::Unlimited => concurrent,
            DotStacking::Limited {
                max_stacks,
                stack_effectiveness,
            } => {
                let stacks = concurrent.min(f64::from((*max_stacks).max(1)));
                if stacks <= 1.0 {
                    stacks
                } else {
                    1.0 + (stacks - 1.0) * stack_effectiveness
                }
            }
        }
    }
}

/// Configuration for an ailment type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AilmentConfig {
    pub ailment: Ailment,
    /// Display name
    pub name: String,
    /// The damage type the ailment deals
    pub damage_type: DamageType,
    /// Hit damage channels the ailment is based on
    pub source_types: Vec<DamageType>,
    /// How instances stack
    pub stacking: DotStacking,
    /// Base duration in seconds
    pub base_duration: f64,
    /// Percent of the qualifying hit damage dealt per second
    pub base_damage_percent: f64,
    /// Inherent chance to inflict on hit, before modifiers
    #[serde(default)]
    pub base_chance: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dot_stacking_serialization() {
        let stacking = DotStacking::Limited {
            max_stacks: 8,
            stack_effectiveness: 0.5,
        };
        let json = serde_json::to_string(&stacking).unwrap();
        assert!(json.contains("limited"));
    }

    #[test]
    fn test_effective_instances() {
        assert!((DotStacking::StrongestOnly.effective_instances(3.0) - 1.0).abs() < 1e-12);
        assert!((DotStacking::StrongestOnly.effective_instances(0.5) - 0.5).abs() < 1e-12);
        assert!((DotStacking::Unlimited.effective_instances(3.0) - 3.0).abs() < 1e-12);

        let limited = DotStacking::Limited {
            max_stacks: 4,
            stack_effectiveness: 0.5,
        };
        // 1 full + 3 at half
        assert!((limited.effective_instances(10.0) - 2.5).abs() < 1e-12);
        assert_eq!(limited.effective_instances(0.0), 0.0);
    }
}
