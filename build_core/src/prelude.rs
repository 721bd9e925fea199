//! Prelude module for convenient imports
//!
//! ```rust
//! use build_core::prelude::*;
//! ```

// Input data
pub use crate::character::{Character, Item, PassiveTree, SkillSetup};
pub use crate::types::{Ailment, DamageComponents, DamageType, EquipmentSlot, SkillTag};

// Parsing and aggregation
pub use crate::modifier::{parse_modifier, parse_modifiers, Effect, EffectKind, Stat};
pub use crate::stat_block::{AggregatedStats, StatValue};

// Calculation
pub use crate::damage::{BuildReport, CalculationResult};
pub use crate::engine::{calculate, Engine};
pub use crate::error::CalcError;

// Config
pub use crate::config::{default_skills, CalcOptions, GameConstants};
