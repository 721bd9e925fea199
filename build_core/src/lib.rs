//! build_core - Character stat and damage computation engine
//!
//! This library provides:
//! - Modifier parsing: free-text modifier lines into typed `Effect`s
//! - AggregatedStats: effects from every source folded into accumulators
//! - Weapon/skill resolution with local modifiers and support gems
//! - The damage pipeline: base + added → effectiveness → increased → more
//! - Hit chance, critical hits, defences, ailment and minion DPS

pub mod character;
pub mod combat;
pub mod config;
pub mod damage;
pub mod defense;
pub mod dot;
pub mod engine;
pub mod error;
pub mod minion;
pub mod modifier;
pub mod prelude;
pub mod resolve;
pub mod source;
pub mod stat_block;
pub mod types;

// Re-export core types for convenience
pub use character::{Character, Item, ItemProperty, PassiveTree, SkillSetup, SupportGem};
pub use config::{default_skills, CalcOptions, ConfigError, GameConstants};
pub use damage::{BuildReport, CalculationDetails, CalculationResult};
pub use engine::{calculate, Engine};
pub use error::CalcError;
pub use modifier::{parse_modifier, parse_modifiers, Effect, EffectKind, Stat};
pub use resolve::{SkillProfile, WeaponProfile};
pub use stat_block::{AggregatedStats, StatValue};
pub use types::{Ailment, DamageComponents, DamageType, EquipmentSlot, SkillTag};
