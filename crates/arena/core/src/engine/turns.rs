//! Per-robot turns: beginning-of-turn economy, action processing and the
//! end-of-turn snapshot.

use crate::action::{self, Action, ActionContext, ActionError};
use crate::env::GameEnv;
use crate::rules::{economy, geometry};
use crate::signal::{EconomyOp, HealthCause, HealthEntry, Signal};
use crate::state::{ActiveTurn, EntityId, Envelope, Robot, Round, TeamMemory, Tree};

use super::{EngineError, GameEngine, active_network};

/// Everything a robot's program may observe at the start of its turn.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnRequest {
    pub round: Round,
    /// The robot as of the start of its turn.
    pub robot: Robot,
    /// Zero when upkeep could not be paid.
    pub bytecode_limit: u32,
    pub upkeep_paid: bool,
    /// Messages received since the robot's previous turn.
    pub messages: Vec<Envelope>,
    pub sensed_robots: Vec<Robot>,
    pub sensed_trees: Vec<Tree>,
    pub team_memory: Option<TeamMemory>,
    pub control_bits: u64,
}

/// How a program's turn ended.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum TurnStatus {
    #[default]
    Completed,
    /// Ended its turn early.
    Yielded,
    /// Ran out of bytecodes mid-turn.
    BudgetExhausted,
    /// Raised an error. Actions issued before the crash still count.
    Crashed,
}

/// What a program did with its turn.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnReport {
    /// Requested actions in issue order.
    pub actions: Vec<Action>,
    pub bytecodes_used: u32,
    pub status: TurnStatus,
}

impl TurnReport {
    pub fn new(actions: Vec<Action>) -> Self {
        Self {
            actions,
            ..Self::default()
        }
    }

    pub fn with_status(mut self, status: TurnStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_bytecodes(mut self, bytecodes: u32) -> Self {
        self.bytecodes_used = bytecodes;
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TurnSummary {
    pub robot: EntityId,
    pub accepted: usize,
    pub rejections: Vec<ActionError>,
    pub resigned: bool,
    /// False when the robot died during its own turn.
    pub survived: bool,
    pub status: TurnStatus,
}

/// Runs a robot's program for one turn.
pub trait ProgramExecutor {
    fn execute(&mut self, request: &TurnRequest) -> TurnReport;
}

impl<F> ProgramExecutor for F
where
    F: FnMut(&TurnRequest) -> TurnReport,
{
    fn execute(&mut self, request: &TurnRequest) -> TurnReport {
        self(request)
    }
}

impl GameEngine<'_> {
    /// Starts the next robot's turn, or returns `None` when every robot in
    /// the round's turn order has acted.
    ///
    /// Robots that died since the round began are skipped.
    pub fn next_turn(&mut self) -> Result<Option<TurnRequest>, EngineError> {
        self.ensure_running()?;
        let schedule = &self.state.schedule;
        if !schedule.in_round {
            return Err(EngineError::RoundNotOpen);
        }
        if let Some(active) = &schedule.active {
            return Err(EngineError::TurnInProgress {
                robot: active.robot,
            });
        }

        while let Some(&id) = self.state.schedule.turn_order.get(self.state.schedule.cursor) {
            self.state.schedule.cursor += 1;
            if self.state.robot(id).is_none() {
                continue;
            }
            self.begin_turn_economy(id)?;
            return Ok(Some(self.open_turn(id)?));
        }
        Ok(None)
    }

    /// Production, queued regeneration and upkeep for `id`.
    fn begin_turn_economy(&mut self, id: EntityId) -> Result<(), EngineError> {
        let robot = self.state.robot(id).ok_or(EngineError::UnknownRobot(id))?;
        let config = &self.state.config;

        let production = robot.robot_type.is_producer().then(|| {
            let archons = self
                .state
                .entities
                .team_robots(robot.team)
                .filter(|r| r.robot_type.is_producer())
                .map(|r| (r.id, r.position));
            let nearest = economy::nearest_archon_squared(id, robot.position, archons);
            economy::production(config, nearest)
        });

        let regen = robot.regen.then(|| HealthEntry {
            id,
            health: (robot.health + config.regen_amount).min(robot.max_health()),
        });

        let upkeep = robot.robot_type.pays_upkeep().then(|| {
            if economy::can_pay_upkeep(config, robot.flux) {
                (-config.unit_upkeep, EconomyOp::Upkeep)
            } else {
                (0.0, EconomyOp::UpkeepMissed)
            }
        });

        if let Some(amount) = production {
            self.emit(Signal::FluxChange {
                robot: id,
                delta: amount,
                op: EconomyOp::Production,
            })?;
        }
        if let Some(entry) = regen {
            self.emit(Signal::HealthChange {
                entries: vec![entry],
                cause: HealthCause::Regeneration,
            })?;
        }
        if let Some((delta, op)) = upkeep {
            if op == EconomyOp::UpkeepMissed {
                tracing::debug!(robot = %id, "upkeep missed");
            }
            self.emit(Signal::FluxChange {
                robot: id,
                delta,
                op,
            })?;
        }
        Ok(())
    }

    fn open_turn(&mut self, id: EntityId) -> Result<TurnRequest, EngineError> {
        let state = &*self.state;
        let robot = state.robot(id).ok_or(EngineError::UnknownRobot(id))?;
        let stats = robot.stats();
        let bytecode_limit = if robot.upkeep_paid {
            state.config.bytecode_limit
        } else {
            0
        };

        let sensed_robots = state
            .entities
            .robots()
            .filter(|other| other.id != id)
            .filter(|other| geometry::can_sense(stats, robot.position, robot.direction, other.position))
            .cloned()
            .collect();
        let sensed_trees = state
            .entities
            .trees()
            .filter(|tree| geometry::can_sense(stats, robot.position, robot.direction, tree.position))
            .cloned()
            .collect();

        let request = TurnRequest {
            round: state.round,
            robot: robot.clone(),
            bytecode_limit,
            upkeep_paid: robot.upkeep_paid,
            messages: robot.inbox.clone(),
            sensed_robots,
            sensed_trees,
            team_memory: state.ledger.memory(robot.team).copied(),
            control_bits: robot.control_bits,
        };

        self.state.schedule.active = Some(ActiveTurn {
            robot: id,
            bytecode_limit,
            pending_move: None,
        });
        Ok(request)
    }

    /// Processes the active robot's report and closes its turn.
    ///
    /// Each action is checked against the state left by the previous one.
    /// Illegal actions are recorded and skipped; resignation stops
    /// processing.
    pub fn submit_turn(
        &mut self,
        env: GameEnv<'_>,
        report: TurnReport,
    ) -> Result<TurnSummary, EngineError> {
        self.ensure_running()?;
        let mut active = self
            .state
            .schedule
            .active
            .take()
            .ok_or(EngineError::NoTurnInProgress)?;
        let id = active.robot;
        let map = env.map()?;
        let rng = env.rng()?;
        let network = active_network(env);

        let mut summary = TurnSummary {
            robot: id,
            accepted: 0,
            rejections: Vec::new(),
            resigned: false,
            survived: true,
            status: report.status,
        };

        for requested in &report.actions {
            let planned = {
                let Some(robot) = self.state.robot(id) else {
                    break;
                };
                let ctx = ActionContext {
                    state: &*self.state,
                    map,
                    network,
                    rng,
                    robot,
                    pending_move: active.pending_move.as_ref(),
                };
                action::plan(&ctx, requested)
            };

            let plan = match planned {
                Ok(plan) => plan,
                Err(err) => {
                    tracing::debug!(
                        robot = %id,
                        action = err.action,
                        reason = %err.reason,
                        "action rejected"
                    );
                    summary.rejections.push(err);
                    continue;
                }
            };

            self.state.draws += plan.draws;
            for signal in plan.signals {
                self.emit(signal)?;
            }
            if let Some(movement) = plan.deferred {
                active.pending_move = Some(movement);
            }
            summary.accepted += 1;

            if plan.resign {
                if let Some(team) = self.state.robot(id).map(|r| r.team) {
                    self.resign(team)?;
                }
                summary.resigned = true;
                break;
            }
        }

        summary.survived = self.state.robot(id).is_some();
        if summary.survived {
            self.close_turn(&active, report.bytecodes_used)?;
        }
        Ok(summary)
    }

    /// Commits the deferred move, ticks both timers and emits the
    /// end-of-turn snapshot.
    fn close_turn(&mut self, active: &ActiveTurn, bytecodes_used: u32) -> Result<(), EngineError> {
        let id = active.robot;
        self.emit(Signal::BytecodesUsed {
            robot: id,
            bytecodes: bytecodes_used.min(active.bytecode_limit),
        })?;

        if let Some(movement) = &active.pending_move {
            let level = self.state.robot(id).map(|r| r.level());
            let blocked = match (movement, level) {
                (Signal::Movement { from, to, .. }, Some(level)) => {
                    from != to && self.state.occupant(*to, level).is_some()
                }
                _ => true,
            };
            if blocked {
                tracing::debug!(robot = %id, "deferred move dropped");
            } else {
                self.emit(movement.clone())?;
            }
        }

        let robot = self.state.robot(id).ok_or(EngineError::UnknownRobot(id))?;
        let snapshot = Signal::RobotInfo {
            robot: id,
            flux: robot.flux,
            movement_idle: robot.movement_idle.saturating_sub(1),
            attack_idle: robot.attack_idle.saturating_sub(1),
            upkeep_paid: robot.upkeep_paid,
        };
        self.emit(snapshot)
    }
}
