//! Stat accumulation: effect folding and the resolved character sheet

mod aggregator;
mod computed;
mod stat_value;

pub use aggregator::{AggregatedStats, DamageModifiers};
pub use computed::{CharacterStats, Resistances};
pub use stat_value::{MoreMultipliers, SortedSum, StatValue};
