#![allow(dead_code)]

use arena_core::{
    Action, Direction, EntityId, Env, GameConfig, GameEngine, GameEnv, GameState, GridMap,
    MatchSetup, NodeGraph, PcgRng, Position, RobotPlacement, RobotType, RoundSummary, Team,
    TurnReport, TurnSummary,
};

/// Two archons in opposite corners of an open 10x10 map.
///
/// Archon A is #1 and archon B is #2; further placements continue from #3.
pub fn base_setup(seed: u64) -> MatchSetup {
    MatchSetup::new(GridMap::open("arena", 10, 10), seed)
        .robot(
            RobotPlacement::new(Team::A, RobotType::Archon, Position::new(1, 1))
                .facing(Direction::East)
                .with_flux(250.0),
        )
        .robot(
            RobotPlacement::new(Team::B, RobotType::Archon, Position::new(8, 8))
                .facing(Direction::West)
                .with_flux(250.0),
        )
}

pub fn with_max_rounds(setup: MatchSetup, rounds: u32) -> MatchSetup {
    let config = GameConfig {
        max_rounds: rounds,
        ..setup.config.clone()
    };
    setup.with_config(config)
}

pub fn soldier(team: Team, x: i32, y: i32, facing: Direction) -> RobotPlacement {
    RobotPlacement::new(team, RobotType::Soldier, Position::new(x, y))
        .facing(facing)
        .with_flux(10.0)
}

/// Oracles matching a setup.
pub struct Oracles {
    pub map: GridMap,
    pub network: NodeGraph,
    pub rng: PcgRng,
}

impl Oracles {
    pub fn for_setup(setup: &MatchSetup) -> Self {
        Self {
            map: setup.map.clone(),
            network: setup.network.clone(),
            rng: PcgRng,
        }
    }

    pub fn env(&self) -> GameEnv<'_> {
        Env::with_all(&self.map, &self.network, &self.rng).into_game_env()
    }
}

pub fn started(setup: &MatchSetup) -> GameState {
    let mut state = GameState::from_setup(setup).expect("setup should be valid");
    GameEngine::new(&mut state).start().expect("start");
    state
}

/// Opens a round and plays empty turns until `robot` is up, then submits
/// `actions` for it and finishes the round with empty turns.
pub fn play_round_with(
    state: &mut GameState,
    env: GameEnv<'_>,
    robot: EntityId,
    actions: Vec<Action>,
) -> (TurnSummary, RoundSummary) {
    let mut engine = GameEngine::new(state);
    engine.begin_round(env).expect("begin round");
    let mut summary = None;
    let mut actions = Some(actions);
    while let Some(request) = engine.next_turn().expect("next turn") {
        let report = if request.robot.id == robot {
            TurnReport::new(actions.take().unwrap_or_default())
        } else {
            TurnReport::default()
        };
        let result = engine.submit_turn(env, report).expect("submit turn");
        if result.robot == robot {
            summary = Some(result);
        }
    }
    let round = engine.end_round(env).expect("end round");
    (summary.expect("robot should have had a turn"), round)
}
