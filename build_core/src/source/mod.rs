//! StatSource - Trait and implementations for effect providers

mod base_stats;
mod buff;
mod gear;
mod passive_tree;

pub use base_stats::BaseStatsSource;
pub use buff::BuffSource;
pub use gear::GearSource;
pub use passive_tree::PassiveTreeSource;

use crate::modifier::Effect;

/// Trait for anything that contributes effects to a calculation
pub trait StatSource: Send + Sync {
    /// Unique identifier for this source
    fn id(&self) -> &str;

    /// Priority for collection order (higher = collected later)
    /// Default priority is 0.
    /// Suggested priorities:
    /// - Base stats: -100
    /// - Gear: 0
    /// - Passive tree: 100
    /// - Buffs: 200
    fn priority(&self) -> i32 {
        0
    }

    /// Effects this source contributes
    fn effects(&self) -> Vec<Effect>;
}

/// Gather effects from every source in priority order
///
/// Aggregation is order-independent; the ordering only keeps traces and
/// reports stable.
pub fn collect_effects(sources: &[&dyn StatSource]) -> Vec<Effect> {
    let mut ordered: Vec<&&dyn StatSource> = sources.iter().collect();
    ordered.sort_by_key(|source| source.priority());
    ordered.iter().flat_map(|source| source.effects()).collect()
}
