//! Damage formula engine, its result type and the flat report export

mod calculation;
mod report;
mod result;

pub use calculation::{
    base_crit_chance, calculate_damage, calculate_hit_damage, combo_multiplier, combo_stacks,
    resource_efficiency, spirit_efficiency, uses_per_second, ChannelTrace, DamageContext,
    DamageOutcome, ResourceEfficiency,
};
pub use report::{read_report, write_report, BuildReport};
pub use result::{CalculationDetails, CalculationResult};
