//! Defense system - Armour, Evasion, Resistances, and the summary built on them

mod armour;
mod evasion;
mod resistance;
mod summary;

pub use armour::{armour_reduction_percent, damage_after_armour, max_physical_hit};
pub use evasion::{chance_to_evade, evasion_mitigation_factor};
pub use resistance::{damage_after_resistance, effective_resistance, resistance_mitigation_factor};
pub use summary::DefenseSummary;
