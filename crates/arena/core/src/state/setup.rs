//! Starting conditions handed to the kernel before round 1.
use crate::catalog::RobotType;
use crate::config::GameConfig;
use crate::env::{GridMap, NodeGraph};
use crate::state::{Direction, Position, Team, TeamMemory};

/// One robot present when the match starts.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RobotPlacement {
    pub team: Team,
    pub robot_type: RobotType,
    pub position: Position,
    pub direction: Direction,
    pub flux: f64,
}

impl RobotPlacement {
    pub fn new(team: Team, robot_type: RobotType, position: Position) -> Self {
        Self {
            team,
            robot_type,
            position,
            direction: Direction::North,
            flux: 0.0,
        }
    }

    pub fn facing(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_flux(mut self, flux: f64) -> Self {
        self.flux = flux;
        self
    }
}

/// One tree present when the match starts.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TreePlacement {
    pub team: Team,
    pub position: Position,
    pub radius: f64,
    pub contained_flux: f64,
    pub contained_robot: Option<RobotType>,
}

impl TreePlacement {
    pub fn new(team: Team, position: Position, radius: f64) -> Self {
        Self {
            team,
            position,
            radius,
            contained_flux: 0.0,
            contained_robot: None,
        }
    }
}

/// Everything the match setup collaborator supplies.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MatchSetup {
    pub map: GridMap,
    pub seed: u64,
    pub config: GameConfig,
    pub robots: Vec<RobotPlacement>,
    pub trees: Vec<TreePlacement>,
    /// Ledger balances for teams A and B.
    pub starting_resources: [f64; 2],
    pub team_memory: [TeamMemory; 2],
    pub network: NodeGraph,
    pub match_index: u32,
    pub total_matches: u32,
}

impl MatchSetup {
    /// A setup on `map` with default rules and no entities.
    pub fn new(map: GridMap, seed: u64) -> Self {
        Self {
            map,
            seed,
            config: GameConfig::default(),
            robots: Vec::new(),
            trees: Vec::new(),
            starting_resources: [0.0; 2],
            team_memory: Default::default(),
            network: NodeGraph::new(),
            match_index: 0,
            total_matches: 1,
        }
    }

    pub fn with_config(mut self, config: GameConfig) -> Self {
        self.config = config;
        self
    }

    pub fn robot(mut self, placement: RobotPlacement) -> Self {
        self.robots.push(placement);
        self
    }

    pub fn tree(mut self, placement: TreePlacement) -> Self {
        self.trees.push(placement);
        self
    }

    pub fn with_network(mut self, network: NodeGraph) -> Self {
        self.network = network;
        self
    }

    pub fn with_resources(mut self, team_a: f64, team_b: f64) -> Self {
        self.starting_resources = [team_a, team_b];
        self
    }
}
