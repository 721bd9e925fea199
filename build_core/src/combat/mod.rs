//! Combat resolution - hit chance and critical hits

mod crit;
mod hit;

pub use crit::{crit_chance, crit_multiplier, CritProfile};
pub use hit::hit_chance;
