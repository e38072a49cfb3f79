use std::collections::BTreeMap;

use super::{EntityId, Robot, Team, Tree};

/// All live robots and trees, keyed by ID.
///
/// `BTreeMap` keeps iteration in ascending ID order, which is the processing
/// order for every per-entity phase.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntitiesState {
    pub(crate) robots: BTreeMap<EntityId, Robot>,
    pub(crate) trees: BTreeMap<EntityId, Tree>,
}

impl EntitiesState {
    pub fn robot(&self, id: EntityId) -> Option<&Robot> {
        self.robots.get(&id)
    }

    pub fn tree(&self, id: EntityId) -> Option<&Tree> {
        self.trees.get(&id)
    }

    pub fn robots(&self) -> impl Iterator<Item = &Robot> {
        self.robots.values()
    }

    pub fn trees(&self) -> impl Iterator<Item = &Tree> {
        self.trees.values()
    }

    pub fn team_robots(&self, team: Team) -> impl Iterator<Item = &Robot> {
        self.robots.values().filter(move |r| r.team == team)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.robots.contains_key(&id) || self.trees.contains_key(&id)
    }

    pub(crate) fn robot_mut(&mut self, id: EntityId) -> Option<&mut Robot> {
        self.robots.get_mut(&id)
    }

    pub(crate) fn tree_mut(&mut self, id: EntityId) -> Option<&mut Tree> {
        self.trees.get_mut(&id)
    }
}
