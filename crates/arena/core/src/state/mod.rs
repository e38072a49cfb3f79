//! Authoritative game state representation.
//!
//! This module owns the data structures that describe robots, trees, team
//! ledgers and occupancy. Everything outside the crate reads this state; only
//! signal application mutates it.
mod error;
mod setup;
pub mod types;

pub use error::SetupError;
pub use setup::{MatchSetup, RobotPlacement, TreePlacement};
pub use types::{
    ActiveTurn, Buff, BuffKind, Buffs, DirtyFlags, Direction, EntitiesState, EntityId, Envelope,
    Level, MatchPhase, Message, Position, Robot, Round, RoundSchedule, Team, TeamLedger,
    TeamMemory, TileMap, TileSlots, Tree, WorldState,
};

use crate::config::GameConfig;
use crate::env::{MapOracle, SupplyNetwork};

/// Canonical snapshot of the deterministic game state.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameState {
    /// Rule constants, fixed at setup.
    pub config: GameConfig,

    /// Seed supplied by match setup. Never modified.
    seed: u64,

    /// Number of random draws taken so far; mixed into every draw's seed.
    pub(crate) draws: u64,

    /// Sequential entity ID allocator. Never reused.
    next_entity_id: u32,

    pub(crate) round: Round,
    pub(crate) phase: MatchPhase,
    pub(crate) entities: EntitiesState,
    pub(crate) world: WorldState,
    pub(crate) ledger: TeamLedger,
    pub(crate) schedule: RoundSchedule,

    /// Map width and height, cached for map-memory updates during apply.
    dimensions: (u32, u32),
}

impl GameState {
    /// Builds the round-0 state from a match setup.
    ///
    /// Robots receive IDs first, in placement order, then trees.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError`] when the configuration or any placement is
    /// invalid. Validation completes before any state is returned.
    pub fn from_setup(setup: &MatchSetup) -> Result<Self, SetupError> {
        validate_config(&setup.config)?;

        let map = &setup.map;
        let dims = map.dimensions();
        let mut state = Self {
            config: setup.config.clone(),
            seed: setup.seed,
            draws: 0,
            next_entity_id: 1,
            round: 0,
            phase: MatchPhase::NotStarted,
            entities: EntitiesState::default(),
            world: WorldState::default(),
            ledger: TeamLedger::new(setup.starting_resources, setup.team_memory),
            schedule: RoundSchedule::default(),
            dimensions: (dims.width, dims.height),
        };

        for (index, placement) in setup.robots.iter().enumerate() {
            let position = placement.position;
            let level = placement.robot_type.level();
            if !map.contains(position) {
                return Err(SetupError::OutOfBounds { index, position });
            }
            if !map.is_traversable(position, level) {
                return Err(SetupError::Impassable { index, position });
            }
            if placement.robot_type.is_structure()
                && !setup.network.is_empty()
                && !setup.network.is_node(position)
            {
                return Err(SetupError::StructureOffNetwork { index, position });
            }

            let id = state.allocate_id();
            if !state.world.tile_map.place(position, level, id) {
                return Err(SetupError::Overlap {
                    index,
                    position,
                    level,
                });
            }

            let mut robot = Robot::new(id, placement.team, placement.robot_type, position);
            robot.direction = placement.direction;
            robot.set_flux(placement.flux);
            robot.dirty = DirtyFlags::empty();
            robot.remember_surroundings(dims.width, dims.height);
            state.entities.robots.insert(id, robot);
        }

        for (index, placement) in setup.trees.iter().enumerate() {
            let position = placement.position;
            if !(placement.radius > 0.0) {
                return Err(SetupError::InvalidTreeRadius { index });
            }
            if !map.contains(position) {
                return Err(SetupError::OutOfBounds { index, position });
            }
            if !map.is_traversable(position, Level::Ground) {
                return Err(SetupError::Impassable { index, position });
            }

            let id = state.allocate_id();
            if !state.world.tile_map.place(position, Level::Ground, id) {
                return Err(SetupError::Overlap {
                    index,
                    position,
                    level: Level::Ground,
                });
            }

            let tree = Tree::new(id, placement.team, position, placement.radius, &setup.config)
                .with_payload(placement.contained_flux, placement.contained_robot);
            state.entities.trees.insert(id, tree);
        }

        for team in Team::PLAYERS {
            let has_archon = state
                .entities
                .team_robots(team)
                .any(|r| r.robot_type.is_producer());
            if !has_archon {
                return Err(SetupError::NoArchons { team });
            }
        }

        tracing::debug!(
            robots = state.entities.robots.len(),
            trees = state.entities.trees.len(),
            "match state initialized"
        );

        Ok(state)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn round(&self) -> Round {
        self.round
    }

    pub fn phase(&self) -> &MatchPhase {
        &self.phase
    }

    pub fn entities(&self) -> &EntitiesState {
        &self.entities
    }

    pub fn world(&self) -> &WorldState {
        &self.world
    }

    pub fn ledger(&self) -> &TeamLedger {
        &self.ledger
    }

    pub fn schedule(&self) -> &RoundSchedule {
        &self.schedule
    }

    pub fn robot(&self, id: EntityId) -> Option<&Robot> {
        self.entities.robot(id)
    }

    pub fn tree(&self, id: EntityId) -> Option<&Tree> {
        self.entities.tree(id)
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.dimensions
    }

    /// Entity on `level` at `position`, if any.
    pub fn occupant(&self, position: Position, level: Level) -> Option<EntityId> {
        self.world.tile_map.occupant(position, level)
    }

    /// Sum of robot health per team (A, B).
    pub fn aggregate_health(&self) -> [f64; 2] {
        let mut totals = [0.0; 2];
        for robot in self.entities.robots() {
            if let Some(i) = robot.team.index() {
                totals[i] += robot.health;
            }
        }
        totals
    }

    pub fn archon_count(&self, team: Team) -> usize {
        self.entities
            .team_robots(team)
            .filter(|r| r.robot_type.is_producer())
            .count()
    }

    /// The ID the next spawned entity will receive.
    pub fn peek_next_id(&self) -> EntityId {
        EntityId(self.next_entity_id)
    }

    fn allocate_id(&mut self) -> EntityId {
        let id = EntityId(self.next_entity_id);
        self.next_entity_id += 1;
        id
    }

    /// Keeps the allocator ahead of an ID created by a spawn or build signal.
    pub(crate) fn observe_id(&mut self, id: EntityId) {
        self.next_entity_id = self.next_entity_id.max(id.0 + 1);
    }

    /// Takes one draw position from the shared counter.
    pub(crate) fn next_draw(&mut self) -> u64 {
        let draw = self.draws;
        self.draws += 1;
        draw
    }

    /// Drops buffs that expired before `round`.
    pub(crate) fn prune_buffs(&mut self, round: Round) {
        for robot in self.entities.robots.values_mut() {
            robot.buffs.remove_expired(round);
        }
    }

    /// SHA-256 over the replayable part of the state.
    ///
    /// Covers round, entities, occupancy and ledger. Scheduler bookkeeping
    /// and the random draw counter are excluded.
    #[cfg(feature = "serde")]
    pub fn digest(&self) -> [u8; 32] {
        use sha2::{Digest, Sha256};

        #[derive(serde::Serialize)]
        struct View<'a> {
            round: Round,
            next_entity_id: u32,
            entities: &'a EntitiesState,
            world: &'a WorldState,
            ledger: &'a TeamLedger,
        }

        let view = View {
            round: self.round,
            next_entity_id: self.next_entity_id,
            entities: &self.entities,
            world: &self.world,
            ledger: &self.ledger,
        };
        // Derived impls over sized containers and no size limit: bincode
        // has no failing path for this input.
        let bytes = bincode::serialize(&view).expect("state view serialization should not fail");
        Sha256::digest(&bytes).into()
    }
}

fn validate_config(config: &GameConfig) -> Result<(), SetupError> {
    if config.max_rounds == 0 {
        return Err(SetupError::InvalidConfig("max_rounds must be positive"));
    }
    if config.production_penalty_radius_squared <= 0 {
        return Err(SetupError::InvalidConfig(
            "production_penalty_radius_squared must be positive",
        ));
    }
    if config.min_production > config.max_production {
        return Err(SetupError::InvalidConfig(
            "min_production exceeds max_production",
        ));
    }
    if config.tree_max_health <= 0.0 {
        return Err(SetupError::InvalidConfig("tree_max_health must be positive"));
    }
    if config.unit_upkeep < 0.0 || config.broadcast_cost < 0.0 || config.regen_cost < 0.0 {
        return Err(SetupError::InvalidConfig("costs must not be negative"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::RobotType;
    use crate::env::{GridMap, MapDimensions, NodeGraph, TerrainTile};

    fn base() -> MatchSetup {
        MatchSetup::new(GridMap::open("test", 10, 10), 7)
            .robot(RobotPlacement::new(Team::A, RobotType::Archon, Position::new(1, 1)))
            .robot(RobotPlacement::new(Team::B, RobotType::Archon, Position::new(8, 8)))
    }

    #[test]
    fn ids_follow_placement_order() {
        let setup = base().tree(TreePlacement::new(Team::Neutral, Position::new(5, 5), 1.0));
        let state = GameState::from_setup(&setup).expect("valid setup");
        assert_eq!(state.robot(EntityId(1)).map(|r| r.team), Some(Team::A));
        assert_eq!(state.robot(EntityId(2)).map(|r| r.team), Some(Team::B));
        assert!(state.tree(EntityId(3)).is_some());
        assert_eq!(state.peek_next_id(), EntityId(4));
        assert_eq!(state.occupant(Position::new(5, 5), Level::Ground), Some(EntityId(3)));
    }

    #[test]
    fn overlapping_ground_units_are_rejected() {
        let setup = base().robot(RobotPlacement::new(Team::A, RobotType::Soldier, Position::new(1, 1)));
        assert!(matches!(
            GameState::from_setup(&setup),
            Err(SetupError::Overlap { index: 2, .. })
        ));

        let air = base().robot(RobotPlacement::new(Team::A, RobotType::Scout, Position::new(1, 1)));
        assert!(GameState::from_setup(&air).is_ok());
    }

    #[test]
    fn ground_units_cannot_start_on_void() {
        let mut tiles = vec![TerrainTile::Land; 9];
        tiles[4] = TerrainTile::Void;
        let map = GridMap::new("void", MapDimensions::new(3, 3), tiles).expect("grid");
        let setup = MatchSetup::new(map, 1)
            .robot(RobotPlacement::new(Team::A, RobotType::Archon, Position::new(1, 1)));
        assert!(matches!(
            GameState::from_setup(&setup),
            Err(SetupError::Impassable { index: 0, .. })
        ));
    }

    #[test]
    fn each_team_needs_an_archon() {
        let setup = MatchSetup::new(GridMap::open("test", 4, 4), 1)
            .robot(RobotPlacement::new(Team::A, RobotType::Archon, Position::new(0, 0)));
        assert_eq!(
            GameState::from_setup(&setup),
            Err(SetupError::NoArchons { team: Team::B })
        );
    }

    #[test]
    fn towers_must_stand_on_nodes() {
        let mut network = NodeGraph::new();
        network.add_core(Position::new(0, 0), Team::A);
        let setup = base()
            .with_network(network)
            .robot(RobotPlacement::new(Team::A, RobotType::Tower, Position::new(3, 3)));
        assert!(matches!(
            GameState::from_setup(&setup),
            Err(SetupError::StructureOffNetwork { index: 2, .. })
        ));
    }

    #[test]
    fn bad_config_fails_before_placement() {
        let mut config = GameConfig::default();
        config.min_production = 5.0;
        let setup = base().with_config(config);
        assert!(matches!(
            GameState::from_setup(&setup),
            Err(SetupError::InvalidConfig(_))
        ));
    }
}
