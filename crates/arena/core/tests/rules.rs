mod common;

use arena_core::signal::{DeathCause, EconomyOp, HealthCause};
use arena_core::state::TreePlacement;
use arena_core::{
    Action, Direction, EntityId, GameConfig, GameEngine, Level, Message, NodeGraph, Position,
    RejectReason, RobotPlacement, RobotType, Signal, Team, TurnReport,
};

use common::{Oracles, base_setup, play_round_with, soldier, started, with_max_rounds};

const SOLDIER_A: EntityId = EntityId(3);
const SOLDIER_B: EntityId = EntityId(4);

#[test]
fn attack_band_and_arc_are_inclusive() {
    // B soldier at d² = 5, the edge of a soldier's range, inside the arc.
    let setup = base_setup(7)
        .robot(soldier(Team::A, 4, 4, Direction::East))
        .robot(soldier(Team::B, 6, 5, Direction::West));
    let oracles = Oracles::for_setup(&setup);
    let mut state = started(&setup);

    let actions = vec![
        Action::Attack {
            target: Position::new(6, 6),
            level: Level::Ground,
        },
        Action::Attack {
            target: Position::new(4, 2),
            level: Level::Ground,
        },
        Action::Attack {
            target: Position::new(6, 5),
            level: Level::Ground,
        },
        Action::Attack {
            target: Position::new(6, 5),
            level: Level::Ground,
        },
    ];
    let (summary, _) = play_round_with(&mut state, oracles.env(), SOLDIER_A, actions);

    let reasons: Vec<_> = summary.rejections.iter().map(|e| e.reason).collect();
    assert_eq!(
        reasons,
        vec![
            RejectReason::OutOfRange,
            RejectReason::OutOfRange,
            RejectReason::Cooldown
        ]
    );
    assert_eq!(summary.accepted, 1);

    let power = RobotType::Soldier.stats().attack_power;
    let target = state.robot(SOLDIER_B).expect("target alive");
    assert_eq!(target.health, RobotType::Soldier.stats().max_health - power);
}

#[test]
fn rejected_action_changes_nothing() {
    let setup = base_setup(11)
        .robot(soldier(Team::A, 4, 4, Direction::East))
        .robot(soldier(Team::B, 5, 4, Direction::West));
    let oracles = Oracles::for_setup(&setup);

    let attack = Action::Attack {
        target: Position::new(5, 4),
        level: Level::Ground,
    };
    let illegal = [
        Action::Move(Direction::East),
        Action::Move(Direction::None),
        Action::Spawn {
            direction: Direction::North,
            robot_type: RobotType::Soldier,
        },
        Action::SetIndicatorString {
            index: GameConfig::NUMBER_OF_INDICATOR_STRINGS,
            text: "x".into(),
        },
        Action::Regenerate,
    ];

    let mut clean = started(&setup);
    play_round_with(&mut clean, oracles.env(), SOLDIER_A, vec![attack.clone()]);

    let mut noisy = started(&setup);
    let mut actions: Vec<Action> = illegal.to_vec();
    actions.push(attack);
    let (summary, _) = play_round_with(&mut noisy, oracles.env(), SOLDIER_A, actions);

    assert_eq!(summary.rejections.len(), illegal.len());
    assert_eq!(summary.accepted, 1);
    assert_eq!(clean.digest(), noisy.digest());
}

#[test]
fn blocked_move_keeps_movement_timer() {
    let setup = base_setup(3)
        .robot(soldier(Team::A, 4, 4, Direction::East))
        .robot(soldier(Team::B, 5, 4, Direction::West));
    let oracles = Oracles::for_setup(&setup);
    let mut state = started(&setup);

    let (summary, _) = play_round_with(
        &mut state,
        oracles.env(),
        SOLDIER_A,
        vec![Action::Move(Direction::East)],
    );
    assert_eq!(summary.rejections[0].reason, RejectReason::Occupied);
    let robot = state.robot(SOLDIER_A).expect("alive");
    assert_eq!(robot.movement_idle, 0);
    assert_eq!(robot.position, Position::new(4, 4));

    let (summary, _) = play_round_with(
        &mut state,
        oracles.env(),
        SOLDIER_A,
        vec![Action::Move(Direction::North), Action::Move(Direction::North)],
    );
    assert_eq!(summary.accepted, 1);
    assert_eq!(summary.rejections[0].reason, RejectReason::Cooldown);

    let robot = state.robot(SOLDIER_A).expect("alive");
    let stats = RobotType::Soldier.stats();
    assert_eq!(robot.position, Position::new(4, 3));
    assert_eq!(robot.direction, Direction::North);
    assert_eq!(robot.movement_idle, stats.move_delay_orthogonal - 1);
    assert_eq!(state.occupant(Position::new(4, 4), Level::Ground), None);
    assert_eq!(
        state.occupant(Position::new(4, 3), Level::Ground),
        Some(SOLDIER_A)
    );
}

#[test]
fn lethal_damage_yields_exactly_one_death() {
    let setup = with_max_rounds(
        base_setup(5)
            .robot(soldier(Team::A, 4, 4, Direction::East))
            .robot(soldier(Team::B, 5, 4, Direction::West)),
        200,
    );
    let oracles = Oracles::for_setup(&setup);
    let mut state = started(&setup);

    let mut deaths = Vec::new();
    for _ in 0..60 {
        let mut engine = GameEngine::new(&mut state);
        let mut executor = |request: &arena_core::TurnRequest| {
            if request.robot.id == SOLDIER_A {
                TurnReport::new(vec![Action::Attack {
                    target: Position::new(5, 4),
                    level: Level::Ground,
                }])
            } else {
                TurnReport::default()
            }
        };
        let round = engine
            .run_round(oracles.env(), &mut executor)
            .expect("round");
        deaths.extend(round.record.signals.into_iter().filter_map(|s| match s {
            Signal::Death { victim, killer, cause, .. } => Some((victim, killer, cause)),
            _ => None,
        }));
        if state.robot(SOLDIER_B).is_none() {
            break;
        }
    }

    assert_eq!(
        deaths,
        vec![(SOLDIER_B, Some(SOLDIER_A), DeathCause::Attack)]
    );
    assert_eq!(state.occupant(Position::new(5, 4), Level::Ground), None);
}

#[test]
fn felled_tree_releases_payload_to_destroyer() {
    let tree = TreePlacement {
        contained_flux: 30.0,
        contained_robot: Some(RobotType::Scout),
        ..TreePlacement::new(Team::Neutral, Position::new(5, 4), 0.3)
    };
    let setup = base_setup(9)
        .robot(soldier(Team::A, 4, 4, Direction::East))
        .tree(tree);
    let oracles = Oracles::for_setup(&setup);
    let mut state = started(&setup);
    let tree_id = EntityId(4);
    assert!(state.tree(tree_id).is_some());

    let (_, round) = play_round_with(
        &mut state,
        oracles.env(),
        SOLDIER_A,
        vec![Action::Attack {
            target: Position::new(5, 4),
            level: Level::Ground,
        }],
    );

    assert!(state.tree(tree_id).is_none());
    assert_eq!(state.ledger().balance(Team::A), 30.0);
    let released = state
        .occupant(Position::new(5, 4), Level::Air)
        .and_then(|id| state.robot(id))
        .expect("scout released");
    assert_eq!(released.robot_type, RobotType::Scout);
    assert_eq!(released.team, Team::A);

    let release = round.record.signals.iter().any(|s| {
        matches!(
            s,
            Signal::TeamResourceChange {
                team: Team::A,
                op: EconomyOp::Release,
                ..
            }
        )
    });
    assert!(release);
}

#[test]
fn crowded_archons_produce_less() {
    let setup = base_setup(1).robot(
        arena_core::RobotPlacement::new(Team::A, RobotType::Archon, Position::new(2, 1))
            .facing(Direction::East),
    );
    let oracles = Oracles::for_setup(&setup);
    let mut state = started(&setup);
    let (_, round) = play_round_with(&mut state, oracles.env(), EntityId(1), Vec::new());

    let produced: Vec<(EntityId, f64)> = round
        .record
        .signals
        .iter()
        .filter_map(|s| match s {
            Signal::FluxChange {
                robot,
                delta,
                op: EconomyOp::Production,
            } => Some((*robot, *delta)),
            _ => None,
        })
        .collect();

    let config = GameConfig::default();
    let crowded = config.min_production
        + (config.max_production - config.min_production)
            * (1.0 / config.production_penalty_radius_squared as f64).sqrt();
    assert_eq!(produced.len(), 3);
    assert!((produced[0].1 - crowded).abs() < 1e-12);
    assert_eq!(produced[1].1, config.max_production);
    assert!((produced[2].1 - crowded).abs() < 1e-12);
}

#[test]
fn upkeep_failure_zeroes_budget_without_removal() {
    let setup = base_setup(2).robot(
        arena_core::RobotPlacement::new(Team::A, RobotType::Soldier, Position::new(4, 4))
            .facing(Direction::East),
    );
    let oracles = Oracles::for_setup(&setup);
    let mut state = started(&setup);

    let mut engine = GameEngine::new(&mut state);
    engine.begin_round(oracles.env()).expect("begin");
    let mut broke = None;
    while let Some(request) = engine.next_turn().expect("next") {
        if request.robot.id == SOLDIER_A {
            broke = Some((request.upkeep_paid, request.bytecode_limit));
        }
        engine
            .submit_turn(oracles.env(), TurnReport::default())
            .expect("submit");
    }
    engine.end_round(oracles.env()).expect("end");

    assert_eq!(broke, Some((false, 0)));
    assert!(state.robot(SOLDIER_A).is_some());
}

#[test]
fn spawn_pays_from_parent_and_wakes_late() {
    let setup = base_setup(4);
    let oracles = Oracles::for_setup(&setup);
    let mut state = started(&setup);
    let child = state.peek_next_id();

    let (summary, _) = play_round_with(
        &mut state,
        oracles.env(),
        EntityId(1),
        vec![
            Action::Spawn {
                direction: Direction::South,
                robot_type: RobotType::Soldier,
            },
            Action::Spawn {
                direction: Direction::South,
                robot_type: RobotType::Soldier,
            },
            Action::Spawn {
                direction: Direction::East,
                robot_type: RobotType::Tower,
            },
        ],
    );
    assert_eq!(summary.accepted, 1);
    let reasons: Vec<_> = summary.rejections.iter().map(|e| e.reason).collect();
    assert_eq!(
        reasons,
        vec![RejectReason::Occupied, RejectReason::NotApplicable]
    );

    let config = GameConfig::default();
    let spawned = state.robot(child).expect("spawned");
    assert_eq!(spawned.position, Position::new(1, 2));
    assert_eq!(spawned.team, Team::A);
    assert_eq!(spawned.movement_idle, config.wake_delay);
    assert!(!spawned.direction.is_none());

    let parent = state.robot(EntityId(1)).expect("parent");
    let produced = config.max_production;
    let expected = 250.0 + produced - RobotType::Soldier.stats().spawn_cost;
    assert!((parent.flux - expected).abs() < 1e-9);
}

#[test]
fn pending_move_cost_counts_against_later_actions() {
    // 0.57 flux leaves 0.42 after upkeep: enough to move, not to also broadcast.
    let setup = base_setup(13).robot(soldier(Team::A, 4, 4, Direction::East).with_flux(0.57));
    let oracles = Oracles::for_setup(&setup);
    let mut state = started(&setup);

    let (summary, _) = play_round_with(
        &mut state,
        oracles.env(),
        SOLDIER_A,
        vec![
            Action::Move(Direction::North),
            Action::Broadcast(Message::default()),
        ],
    );

    assert_eq!(summary.accepted, 1);
    let reasons: Vec<_> = summary.rejections.iter().map(|e| e.reason).collect();
    assert_eq!(reasons, vec![RejectReason::InsufficientResource]);

    let config = GameConfig::default();
    let mover = state.robot(SOLDIER_A).expect("soldier");
    assert_eq!(mover.position, Position::new(4, 3));
    let expected = 0.57 - config.unit_upkeep - RobotType::Soldier.stats().move_cost;
    assert!((mover.flux - expected).abs() < 1e-9);
    assert!(!mover.has_broadcast);
}

/// Core A at (2,2) feeding a chain of nodes to the east.
fn supply_chain() -> NodeGraph {
    let mut network = NodeGraph::new();
    network.add_core(Position::new(2, 2), Team::A);
    network.add_edge(Position::new(2, 2), Position::new(3, 2));
    network.add_edge(Position::new(3, 2), Position::new(4, 2));
    network.add_edge(Position::new(4, 2), Position::new(5, 2));
    network
}

#[test]
fn cut_off_towers_lose_health_at_round_end() {
    let setup = base_setup(17)
        .robot(RobotPlacement::new(Team::A, RobotType::Tower, Position::new(3, 2)))
        .robot(RobotPlacement::new(Team::A, RobotType::Tower, Position::new(5, 2)))
        .with_network(supply_chain());
    let oracles = Oracles::for_setup(&setup);
    let mut state = started(&setup);
    let (supplied, stranded) = (EntityId(3), EntityId(4));

    let (_, round) = play_round_with(&mut state, oracles.env(), EntityId(1), Vec::new());

    let config = GameConfig::default();
    let full = RobotType::Tower.stats().max_health;
    assert_eq!(state.robot(supplied).expect("tower").health, full);
    assert_eq!(
        state.robot(stranded).expect("tower").health,
        full - config.disconnected_node_damage
    );

    let damaged: Vec<EntityId> = round
        .record
        .signals
        .iter()
        .filter_map(|s| match s {
            Signal::HealthChange {
                entries,
                cause: HealthCause::Disconnected,
            } => Some(entries.iter().map(|e| e.id).collect::<Vec<_>>()),
            _ => None,
        })
        .flatten()
        .collect();
    assert_eq!(damaged, vec![stranded]);
}

#[test]
fn towers_only_take_damage_from_teams_they_supply() {
    let tower = EntityId(3);
    let attacker = EntityId(4);
    let shot = vec![Action::Attack {
        target: Position::new(4, 2),
        level: Level::Ground,
    }];

    let mut network = NodeGraph::new();
    network.add_core(Position::new(3, 2), Team::A);
    network.add_edge(Position::new(3, 2), Position::new(4, 2));
    let besieged = |network: NodeGraph| {
        base_setup(19)
            .robot(RobotPlacement::new(Team::A, RobotType::Tower, Position::new(4, 2)))
            .robot(soldier(Team::B, 6, 2, Direction::West))
            .with_network(network)
    };

    // Team B has no core, so the tower is beyond its supply.
    let setup = besieged(network.clone());
    let oracles = Oracles::for_setup(&setup);
    let mut state = started(&setup);
    let (summary, round) = play_round_with(&mut state, oracles.env(), attacker, shot.clone());
    assert_eq!(summary.accepted, 1);
    let hits: Vec<usize> = round
        .record
        .signals
        .iter()
        .filter_map(|s| match s {
            Signal::Attack { hits, .. } => Some(hits.len()),
            _ => None,
        })
        .collect();
    assert_eq!(hits, vec![0]);
    let full = RobotType::Tower.stats().max_health;
    assert_eq!(state.robot(tower).expect("tower").health, full);

    network.add_core(Position::new(5, 2), Team::B);
    network.add_edge(Position::new(5, 2), Position::new(4, 2));
    let setup = besieged(network);
    let oracles = Oracles::for_setup(&setup);
    let mut state = started(&setup);
    play_round_with(&mut state, oracles.env(), attacker, shot);
    assert_eq!(
        state.robot(tower).expect("tower").health,
        full - RobotType::Soldier.stats().attack_power
    );
}

#[test]
fn owned_tree_grows_then_decays_and_yields() {
    let config = GameConfig {
        tree_growth_rounds: 1,
        tree_decay: 15.0,
        ..GameConfig::default()
    };
    let setup = base_setup(23)
        .tree(TreePlacement::new(Team::A, Position::new(5, 5), 1.0))
        .with_config(config.clone());
    let oracles = Oracles::for_setup(&setup);
    let mut state = started(&setup);
    let tree = EntityId(3);
    let initial = config.tree_initial_fraction * config.tree_max_health;

    // Rounds 1 and 2 grow; the second takes the tree past its growth window
    // and still yields nothing.
    for grown in 1..=2 {
        let (_, round) = play_round_with(&mut state, oracles.env(), EntityId(1), Vec::new());
        assert!(round
            .record
            .signals
            .iter()
            .any(|s| matches!(s, Signal::TreeGrowth { tree: t, .. } if *t == tree)));
        let health = state.tree(tree).expect("tree").health;
        assert_eq!(health, initial + f64::from(grown) * config.tree_growth);
        assert_eq!(state.ledger().balance(Team::A), 0.0);
    }

    play_round_with(&mut state, oracles.env(), EntityId(1), Vec::new());
    let left = initial + 2.0 * config.tree_growth - config.tree_decay;
    assert_eq!(state.tree(tree).expect("tree").health, left);
    let paid = left * config.tree_yield_rate;
    assert!((state.ledger().balance(Team::A) - paid).abs() < 1e-9);

    let (_, round) = play_round_with(&mut state, oracles.env(), EntityId(1), Vec::new());
    assert!(state.tree(tree).is_none());
    let deaths: Vec<_> = round
        .record
        .signals
        .iter()
        .filter_map(|s| match s {
            Signal::Death {
                victim,
                killer,
                cause,
                ..
            } => Some((*victim, *killer, *cause)),
            _ => None,
        })
        .collect();
    assert_eq!(deaths, vec![(tree, None, DeathCause::Decay)]);
    assert!((state.ledger().balance(Team::A) - paid).abs() < 1e-9);
}

#[test]
fn watering_heals_adjacent_trees_once_per_attack_cycle() {
    let setup = base_setup(29)
        .robot(soldier(Team::A, 4, 4, Direction::East))
        .tree(TreePlacement::new(Team::Neutral, Position::new(5, 4), 0.3))
        .tree(TreePlacement::new(Team::Neutral, Position::new(8, 4), 0.3));
    let oracles = Oracles::for_setup(&setup);
    let mut state = started(&setup);
    let (near, far) = (EntityId(4), EntityId(5));
    let before = state.tree(near).expect("tree").health;

    let (summary, _) = play_round_with(
        &mut state,
        oracles.env(),
        SOLDIER_A,
        vec![
            Action::WaterTree {
                target: EntityId(99),
            },
            Action::WaterTree { target: far },
            Action::WaterTree { target: near },
            Action::WaterTree { target: near },
        ],
    );

    let reasons: Vec<_> = summary.rejections.iter().map(|e| e.reason).collect();
    assert_eq!(
        reasons,
        vec![
            RejectReason::InvalidArgument,
            RejectReason::OutOfRange,
            RejectReason::Cooldown
        ]
    );
    assert_eq!(summary.accepted, 1);

    let config = GameConfig::default();
    let expected = before + config.tree_growth + config.tree_water_amount;
    assert!((state.tree(near).expect("tree").health - expected).abs() < 1e-9);
    let untouched = state.tree(far).expect("tree").health;
    assert!((untouched - (before + config.tree_growth)).abs() < 1e-9);
}
