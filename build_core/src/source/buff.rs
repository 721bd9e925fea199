//! BuffSource - Configured buffs and persistent skill effects

use crate::modifier::{parse_modifiers, Effect};
use crate::source::StatSource;

/// Buff source whose modifier magnitudes scale with its stack count
#[derive(Debug, Clone)]
pub struct BuffSource {
    /// Buff identifier
    pub buff_id: String,
    /// Current stack count
    pub stacks: u32,
    modifiers: Vec<String>,
}

impl BuffSource {
    /// Create a new single-stack buff
    pub fn new(name: &str, modifiers: Vec<String>) -> Self {
        BuffSource {
            buff_id: format!("buff:{}", name.trim().to_lowercase()),
            stacks: 1,
            modifiers,
        }
    }

    /// Set the number of stacks
    pub fn with_stacks(mut self, stacks: u32) -> Self {
        self.stacks = stacks;
        self
    }

    /// Check if the buff is active
    pub fn is_active(&self) -> bool {
        self.stacks > 0
    }
}

impl StatSource for BuffSource {
    fn id(&self) -> &str {
        &self.buff_id
    }

    fn priority(&self) -> i32 {
        200 // Buffs apply after the passive tree
    }

    fn effects(&self) -> Vec<Effect> {
        if !self.is_active() {
            return Vec::new();
        }
        let stacks = f64::from(self.stacks);
        parse_modifiers(&self.modifiers, &self.buff_id)
            .effects
            .into_iter()
            .map(|effect| effect.scaled(stacks))
            .collect()
    }
}
