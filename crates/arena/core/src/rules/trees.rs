//! Tree growth, decay and yield.

use crate::config::GameConfig;
use crate::state::{Team, Tree};

/// What a tree does at the start of a round.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TreeStep {
    Grow(f64),
    Decay(f64),
}

pub fn tree_step(config: &GameConfig, tree: &Tree) -> TreeStep {
    if tree.is_growing(config) {
        TreeStep::Grow(config.tree_growth)
    } else {
        TreeStep::Decay(config.tree_decay)
    }
}

/// Flux credited to the owner of a tree that took `step` and has `health`
/// left.
///
/// Neutral trees yield nothing, and neither does a round spent growing.
pub fn tree_yield(config: &GameConfig, tree: &Tree, step: TreeStep, health: f64) -> f64 {
    if tree.team == Team::Neutral || matches!(step, TreeStep::Grow(_)) {
        return 0.0;
    }
    health.max(0.0) * config.tree_yield_rate
}
