//! Weapon and skill resolution
//!
//! Both profiles are derived independently of the global aggregation and only
//! meet `AggregatedStats` inside the damage pipeline.

mod skill;
mod weapon;

pub use skill::{reserved_spirit, select_skill, SkillProfile, DEFAULT_CAST_TIME};
pub use weapon::{resolve_added_damage, WeaponProfile};
