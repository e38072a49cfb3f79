//! Built-in robot programs for headless matches and smoke tests.

use async_trait::async_trait;
use arena_core::{Action, Direction, Robot, RobotType, TurnReport, TurnRequest};

use super::{ProgramProvider, errors::Result};

/// Rounds between two soldier spawns of an archon.
const SPAWN_PERIOD: u32 = 5;

/// A simple aggressive program.
///
/// Archons spawn a soldier every few rounds, rotating through the compass.
/// Everything else shoots the closest enemy it senses and closes in on it.
#[derive(Clone, Copy, Debug, Default)]
pub struct Skirmisher;

impl Skirmisher {
    pub fn plan(request: &TurnRequest) -> Vec<Action> {
        let me = &request.robot;
        if me.robot_type.is_structure() {
            return Vec::new();
        }

        if me.robot_type.is_producer() {
            if request.round % SPAWN_PERIOD != 1 {
                return Vec::new();
            }
            let turn = (request.round / SPAWN_PERIOD) as usize;
            return vec![Action::Spawn {
                direction: Direction::COMPASS[turn % Direction::COMPASS.len()],
                robot_type: RobotType::Soldier,
            }];
        }

        let Some(enemy) = closest_enemy(me, &request.sensed_robots) else {
            return Vec::new();
        };

        let mut actions = Vec::with_capacity(2);
        let level = enemy.robot_type.level();
        if me.robot_type.stats().can_attack(level) {
            actions.push(Action::Attack {
                target: enemy.position,
                level,
            });
        }
        if !me.position.is_adjacent(enemy.position) {
            actions.push(Action::Move(me.position.direction_to(enemy.position)));
        }
        actions
    }
}

fn closest_enemy<'a>(me: &Robot, sensed: &'a [Robot]) -> Option<&'a Robot> {
    sensed
        .iter()
        .filter(|r| r.team.is_player() && r.team != me.team)
        .min_by_key(|r| (me.position.distance_squared(r.position), r.id))
}

#[async_trait]
impl ProgramProvider for Skirmisher {
    async fn run_turn(&self, request: &TurnRequest) -> Result<TurnReport> {
        Ok(TurnReport::new(Self::plan(request)))
    }
}

#[cfg(test)]
mod tests {
    use arena_core::{EntityId, Position, Team};

    use super::*;

    fn request(robot: Robot, round: u32, sensed: Vec<Robot>) -> TurnRequest {
        TurnRequest {
            round,
            robot,
            bytecode_limit: 10_000,
            upkeep_paid: true,
            messages: Vec::new(),
            sensed_robots: sensed,
            sensed_trees: Vec::new(),
            team_memory: None,
            control_bits: 0,
        }
    }

    #[test]
    fn archon_spawns_on_its_period() {
        let archon = Robot::new(EntityId(1), Team::A, RobotType::Archon, Position::new(1, 1));

        let spawning = Skirmisher::plan(&request(archon.clone(), 6, Vec::new()));
        assert!(matches!(
            spawning.as_slice(),
            [Action::Spawn {
                robot_type: RobotType::Soldier,
                ..
            }]
        ));
        assert!(Skirmisher::plan(&request(archon, 7, Vec::new())).is_empty());
    }

    #[test]
    fn soldier_targets_the_closest_enemy() {
        let me = Robot::new(EntityId(3), Team::A, RobotType::Soldier, Position::new(2, 2));
        let far = Robot::new(EntityId(4), Team::B, RobotType::Soldier, Position::new(6, 6));
        let near = Robot::new(EntityId(5), Team::B, RobotType::Soldier, Position::new(4, 2));
        let friend = Robot::new(EntityId(6), Team::A, RobotType::Soldier, Position::new(3, 2));

        let actions = Skirmisher::plan(&request(me, 3, vec![far, friend, near]));
        assert_eq!(
            actions,
            vec![
                Action::Attack {
                    target: Position::new(4, 2),
                    level: RobotType::Soldier.level(),
                },
                Action::Move(Direction::East),
            ]
        );
    }
}
