//! Supply network oracle.
//!
//! Towers stand on supply nodes. A team's towers stay healthy only while their
//! node is connected to one of that team's power cores; attackers can only
//! damage towers whose node is connected to the attacker's own network.
use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::state::{Position, Team};

/// Connectivity query over the supply graph.
///
/// `owner` reports which team's tower currently stands on a location.
pub trait SupplyNetwork: Send + Sync {
    /// A network with no nodes means the match is played without supply.
    fn is_empty(&self) -> bool;

    fn is_node(&self, location: Position) -> bool;

    /// Every node connected for `team` given the current tower placement.
    fn connected_nodes(
        &self,
        team: Team,
        owner: &dyn Fn(Position) -> Option<Team>,
    ) -> BTreeSet<Position>;
}

/// Undirected node graph with per-team power cores.
///
/// A node is connected for a team when it is one of the team's cores, or is
/// adjacent to a node reachable from a core through nodes held by the team's
/// towers.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeGraph {
    edges: BTreeMap<Position, BTreeSet<Position>>,
    cores: BTreeMap<Position, Team>,
}

impl NodeGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, location: Position) {
        self.edges.entry(location).or_default();
    }

    pub fn add_edge(&mut self, a: Position, b: Position) {
        self.edges.entry(a).or_default().insert(b);
        self.edges.entry(b).or_default().insert(a);
    }

    pub fn add_core(&mut self, location: Position, team: Team) {
        self.add_node(location);
        self.cores.insert(location, team);
    }

    pub fn nodes(&self) -> impl Iterator<Item = Position> + '_ {
        self.edges.keys().copied()
    }

    pub fn cores(&self) -> impl Iterator<Item = (Position, Team)> + '_ {
        self.cores.iter().map(|(p, t)| (*p, *t))
    }

    pub fn neighbours(&self, location: Position) -> impl Iterator<Item = Position> + '_ {
        self.edges.get(&location).into_iter().flatten().copied()
    }
}

impl SupplyNetwork for NodeGraph {
    fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    fn is_node(&self, location: Position) -> bool {
        self.edges.contains_key(&location)
    }

    fn connected_nodes(
        &self,
        team: Team,
        owner: &dyn Fn(Position) -> Option<Team>,
    ) -> BTreeSet<Position> {
        let mut connected = BTreeSet::new();
        let mut frontier = VecDeque::new();
        for (core, _) in self.cores().filter(|(_, t)| *t == team) {
            if connected.insert(core) {
                frontier.push_back(core);
            }
        }

        // Supply flows out of cores and through nodes held by the team.
        while let Some(node) = frontier.pop_front() {
            let is_core = self.cores.get(&node) == Some(&team);
            if !is_core && owner(node) != Some(team) {
                continue;
            }
            for next in self.neighbours(node) {
                if connected.insert(next) {
                    frontier.push_back(next);
                }
            }
        }
        connected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain() -> NodeGraph {
        let mut graph = NodeGraph::new();
        graph.add_core(Position::new(0, 0), Team::A);
        graph.add_edge(Position::new(0, 0), Position::new(1, 0));
        graph.add_edge(Position::new(1, 0), Position::new(2, 0));
        graph.add_edge(Position::new(2, 0), Position::new(3, 0));
        graph
    }

    #[test]
    fn supply_stops_at_unheld_nodes() {
        let graph = chain();
        let nobody = |_: Position| None;
        let reached = graph.connected_nodes(Team::A, &nobody);
        assert!(reached.contains(&Position::new(1, 0)));
        assert!(!reached.contains(&Position::new(2, 0)));

        let held = |p: Position| (p == Position::new(1, 0)).then_some(Team::A);
        let reached = graph.connected_nodes(Team::A, &held);
        assert!(reached.contains(&Position::new(2, 0)));
        assert!(!reached.contains(&Position::new(3, 0)));
    }

    #[test]
    fn team_without_core_has_no_supply() {
        let graph = chain();
        let held = |_: Position| Some(Team::B);
        assert!(graph.connected_nodes(Team::B, &held).is_empty());
    }
}
