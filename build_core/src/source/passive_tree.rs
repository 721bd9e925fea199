//! PassiveTreeSource - Stats from allocated passive tree nodes

use crate::character::PassiveTree;
use crate::modifier::{parse_modifiers, Effect};
use crate::source::StatSource;
use tracing::debug;

/// Stats from passive tree nodes
///
/// Holds the allocated node ids and the reference mapping from node id to
/// modifier lines. Tree structure and path validation are not its concern.
pub struct PassiveTreeSource<'a> {
    allocated: &'a [String],
    tree: &'a PassiveTree,
}

impl<'a> PassiveTreeSource<'a> {
    pub fn new(allocated: &'a [String], tree: &'a PassiveTree) -> Self {
        PassiveTreeSource { allocated, tree }
    }
}

impl StatSource for PassiveTreeSource<'_> {
    fn id(&self) -> &str {
        "passive_tree"
    }

    fn priority(&self) -> i32 {
        100
    }

    fn effects(&self) -> Vec<Effect> {
        let mut effects = Vec::new();
        for node in self.allocated {
            match self.tree.node(node) {
                Some(modifiers) => {
                    let source = format!("passive:{node}");
                    effects.extend(parse_modifiers(modifiers, &source).effects);
                }
                None => debug!(node = node.as_str(), "unknown passive node, skipping"),
            }
        }
        effects
    }
}
