//! Owned oracle set for one match.

use arena_core::{Env, GameEnv, GridMap, MatchSetup, NodeGraph, PcgRng};

/// Terrain, supply network and RNG backing a running match.
#[derive(Clone, Debug)]
pub struct MatchOracles {
    map: GridMap,
    network: NodeGraph,
    rng: PcgRng,
}

impl MatchOracles {
    pub fn new(map: GridMap, network: NodeGraph) -> Self {
        Self {
            map,
            network,
            rng: PcgRng,
        }
    }

    pub fn from_setup(setup: &MatchSetup) -> Self {
        Self::new(setup.map.clone(), setup.network.clone())
    }

    pub fn as_game_env(&self) -> GameEnv<'_> {
        Env::with_all(&self.map, &self.network, &self.rng).into_game_env()
    }

    pub fn map(&self) -> &GridMap {
        &self.map
    }

    pub fn network(&self) -> &NodeGraph {
        &self.network
    }
}
